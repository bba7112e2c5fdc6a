/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Translates parsed `clap` matches into run configuration.
use std::ffi::OsString;

use clap::ArgMatches;
use log::{info, Level};

/// Fully resolved command line configuration for one decoding run.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub input:        OsString,
    pub output:       OsString,
    pub apids:        [i32; 3],
    pub diffcoded:    bool,
    pub interleaved:  bool,
    pub split:        bool,
    pub write_apid70: bool,
    pub write_stat:   bool,
    pub quiet:        bool,
    pub batch:        bool,
}

pub fn parse_options(args: &ArgMatches) -> CliOptions {
    let input = args.get_one::<OsString>("input").expect("required").clone();
    let output = args.get_one::<OsString>("output").expect("required").clone();

    let apids = args
        .get_one::<String>("apid")
        .map(parse_apids)
        .unwrap_or([-1, -1, -1]);

    CliOptions {
        input,
        output,
        apids,
        diffcoded: args.get_flag("diff"),
        interleaved: args.get_flag("int"),
        split: args.get_flag("split"),
        write_apid70: args.get_flag("70"),
        write_stat: args.get_flag("statfile"),
        quiet: args.get_flag("quiet"),
        batch: args.get_flag("batch"),
    }
}

/// Parses a `red,green,blue` APID triple, defaulting unparsed slots to -1
/// (unassigned) the same way the reference decoder's `sscanf` leaves them
/// untouched on a short match.
fn parse_apids(spec: &str) -> [i32; 3] {
    let mut apids = [-1i32, -1, -1];
    for (slot, part) in apids.iter_mut().zip(spec.split(',')) {
        if let Ok(value) = part.trim().parse::<i32>() {
            *slot = value;
        }
    }
    apids
}

/// Sets up the global logger from the `--debug`/`--trace`/`--warn`/`--info`
/// flags, defaulting to `Warn` when none are given.
pub fn setup_logger(args: &ArgMatches) {
    let log_level = if args.get_flag("debug") {
        Level::Debug
    } else if args.get_flag("trace") {
        Level::Trace
    } else if args.get_flag("warn") {
        Level::Warn
    } else if args.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    simple_logger::init_with_level(log_level).unwrap();

    info!("Initialized logger");
    info!("Log level: {}", log_level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_apid_triple() {
        assert_eq!(parse_apids("66,65,64"), [66, 65, 64]);
    }

    #[test]
    fn leaves_trailing_slots_unassigned_on_a_short_triple() {
        assert_eq!(parse_apids("66"), [66, -1, -1]);
    }
}
