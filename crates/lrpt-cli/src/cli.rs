/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Command line argument definitions.
use std::ffi::OsString;

use clap::{value_parser, Arg, ArgAction, Command};

/// Builds the `lrpt` command line.
#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("lrpt")
        .author("lrpt-rs contributors")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decodes Meteor-M LRPT soft-symbol captures into AVHRR imagery")
        .disable_version_flag(true)
        .next_line_help(false)
        .arg(Arg::new("input")
            .help("Soft-symbol capture to decode, or - for stdin")
            .value_parser(value_parser!(OsString))
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .help("Output image path")
            .value_parser(value_parser!(OsString))
            .required(true))
        .arg(Arg::new("apid")
            .short('a')
            .long("apid")
            .help("APIDs to map to the red, green and blue channels")
            .long_help("Comma-separated APID triple (red,green,blue), each in 64..=69. Unset channels are left blank.")
            .value_name("R,G,B")
            .value_parser(value_parser!(String)))
        .arg(Arg::new("diff")
            .short('d')
            .long("diff")
            .help("Input is differentially (NRZ-M) coded")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("int")
            .short('i')
            .long("int")
            .help("Input is convolutionally interleaved (80/160 kbps mode)")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("split")
            .short('s')
            .long("split")
            .help("Write each channel to its own file instead of a composite")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("70")
            .short('7')
            .long("70")
            .help("Also dump raw APID 70 (calibration) telemetry alongside the image")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("statfile")
            .short('t')
            .long("statfile")
            .help("Write a .stat sidecar with onboard pass timing")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .help("Suppress the progress status line")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("batch")
            .short('b')
            .long("batch")
            .help("Print one status line per MPDU instead of overwriting in place")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("version")
            .short('v')
            .long("version")
            .help("Print version information and exit")
            .action(ArgAction::Version))
        .args(add_logging_options())
}

fn add_logging_options() -> [Arg; 4] {
    [
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("Logging")
            .help("Display debug information and higher"),
        Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("Logging")
            .help("Display very verbose information"),
        Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("Logging")
            .help("Display warnings and errors only"),
        Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("Logging")
            .help("Display information about the decoding run"),
    ]
}

#[test]
fn verify_cli() {
    create_cmd_args().debug_assert();
}
