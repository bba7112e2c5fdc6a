/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! `lrpt`: decodes a Meteor-M LRPT soft-symbol capture into AVHRR imagery.
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

use log::{error, info};
use lrpt_core::channel::Channel;
use lrpt_core::options::DecoderOptions;
use lrpt_core::pipeline::{Pipeline, PipelineStats, SampleSource, StepResult};
use lrpt_core::protocol::mpdu::{format_time, MCU_PER_LINE};
use lrpt_core::sink::ImageSink;

use crate::routing::Router;
use crate::sinks::bmp::BmpSink;
use crate::sinks::raw::RawSink;

mod cli;
mod cmd_parsers;
mod routing;
mod sinks;
mod statfile;

fn main() {
    let cmd = cli::create_cmd_args();
    let matches = cmd.get_matches();

    cmd_parsers::setup_logger(&matches);
    let opts = cmd_parsers::parse_options(&matches);

    if let Err(err) = run(&opts) {
        println!();
        error!("Could not complete decoding, reason: {err}");
        exit(1);
    }
}

/// A source of soft symbols backed by any [`Read`] implementation, widening
/// bytes to the signed soft-sample representation [`Pipeline`] expects.
struct FileSource {
    reader: Box<dyn Read>,
}

impl SampleSource for FileSource {
    fn read_samples(&mut self, dst: &mut [i8]) -> bool {
        let mut buf = vec![0u8; dst.len()];
        if self.reader.read_exact(&mut buf).is_err() {
            return false;
        }
        for (d, s) in dst.iter_mut().zip(buf.iter()) {
            *d = *s as i8;
        }
        true
    }
}

/// Opens the input path (or stdin, for `-`), returning its total length
/// when known so the status line can report a completion percentage.
fn open_input(path: &Path) -> io::Result<(FileSource, Option<u64>)> {
    if path == Path::new("-") {
        return Ok((FileSource { reader: Box::new(io::stdin()) }, None));
    }

    let file = File::open(path)?;
    let len = file.metadata().ok().map(|m| m.len());
    Ok((FileSource { reader: Box::new(file) }, len))
}

fn run(opts: &cmd_parsers::CliOptions) -> Result<(), String> {
    let input_path = PathBuf::from(&opts.input);
    let (mut source, file_len) = open_input(&input_path).map_err(|e| e.to_string())?;

    let decoder_options = DecoderOptions::default()
        .set_diffcoded(opts.diffcoded)
        .set_interleaved(opts.interleaved);
    let mut pipeline = Pipeline::new(decoder_options);

    let mut router = Router::new(opts.apids);
    let mut raw_sink = if opts.write_apid70 {
        Some(RawSink::create(&apid70_path(&opts.output)).map_err(|e| e.to_string())?)
    } else {
        None
    };

    let mut mpdu_count = 0u64;

    loop {
        match pipeline.step(&mut source) {
            StepResult::Eof => break,
            StepResult::MpduReady(mpdu) => {
                let apid = mpdu.apid();
                router.route(&mpdu, raw_sink.as_mut());
                mpdu_count += 1;

                if !opts.quiet {
                    print_status_line(opts.batch, &pipeline.stats(), file_len, apid);
                }
            }
            StepResult::StatsOnly => {
                if !opts.quiet {
                    print_status_line(opts.batch, &pipeline.stats(), file_len, 0);
                }
            }
            StepResult::NotReady => {}
        }
    }

    // Each committed strip covers 8 image rows.
    let height = router.channels.iter().map(|c| c.lines).max().unwrap_or(0) * 8;
    let stats = pipeline.stats();

    if !opts.quiet {
        println!();
        println!("MPDUs received: {mpdu_count} ({} lines)", height / 8);
        println!("Onboard time elapsed: {}", format_time(stats.elapsed_us()));
    }

    if height == 0 {
        info!("no complete image lines decoded, nothing to write");
        return Ok(());
    }

    if opts.split {
        write_split(opts, &router.channels, height, &stats)?;
    } else {
        write_composite(opts, &router.channels, height, &stats)?;
    }

    Ok(())
}

fn apid70_path(output: &OsString) -> PathBuf {
    let mut s = output.clone();
    s.push(".70");
    PathBuf::from(s)
}

fn write_split(
    opts: &cmd_parsers::CliOptions, channels: &[Channel; 3], height: usize, stats: &PipelineStats
) -> Result<(), String> {
    let base = Path::new(&opts.output);
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    let ext = base.extension().and_then(|s| s.to_str()).unwrap_or("bmp");
    let parent = base.parent().unwrap_or_else(|| Path::new(""));

    let mut written = Vec::new();
    for channel in channels {
        let Some(apid) = channel.apid else { continue };
        if written.contains(&apid) {
            continue;
        }
        written.push(apid);

        let path = parent.join(format!("{stem}_{apid:02}.{ext}"));
        println!("Saving channel to {}...", path.display());

        let mut sink = BmpSink::create(&path).map_err(|e| e.to_string())?;
        write_mono_channel(&mut sink, channel, height).map_err(|e| e.to_string())?;

        if opts.write_stat {
            let stat_path = parent.join(format!("{stem}_{apid:02}.stat"));
            statfile::write_statfile(&stat_path, stats.first_time_us, stats.elapsed_us())
                .map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

fn write_composite(
    opts: &cmd_parsers::CliOptions, channels: &[Channel; 3], height: usize, stats: &PipelineStats
) -> Result<(), String> {
    let path = PathBuf::from(&opts.output);
    println!("Saving composite to {}...", path.display());

    let mut sink = BmpSink::create(&path).map_err(|e| e.to_string())?;
    sink.init(MCU_PER_LINE * 8, height, false).map_err(|e| e.to_string())?;

    for row in 0..height {
        let (r, g, b) = (row_slice(&channels[0], row), row_slice(&channels[1], row), row_slice(&channels[2], row));
        sink.write_rgb(r, g, b).map_err(|e| e.to_string())?;
    }
    sink.finalize().map_err(|e| e.to_string())?;

    if opts.write_stat {
        statfile::write_statfile(&path.with_extension("stat"), stats.first_time_us, stats.elapsed_us())
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

fn write_mono_channel(sink: &mut BmpSink, channel: &Channel, height: usize) -> Result<(), lrpt_core::errors::LrptError> {
    sink.init(MCU_PER_LINE * 8, height, true)?;
    for row in 0..height {
        sink.write_mono(row_slice(channel, row))?;
    }
    sink.finalize()
}

/// A channel's row, or an all-black row if this channel hasn't assembled
/// that many lines (e.g. a composite's red channel ran a few strips behind
/// green and blue).
fn row_slice(channel: &Channel, row: usize) -> &[u8] {
    const WIDTH: usize = MCU_PER_LINE * 8;
    static BLACK_ROW: [u8; WIDTH] = [0u8; WIDTH];

    let start = row * WIDTH;
    if start + WIDTH <= channel.pixels().len() {
        &channel.pixels()[start..start + WIDTH]
    } else {
        &BLACK_ROW
    }
}

fn print_status_line(batch: bool, stats: &PipelineStats, file_len: Option<u64>, apid: u16) {
    let prefix = if batch { "\n" } else { "\x1b[2K\r" };
    print!("{prefix}");

    if let Some(len) = file_len {
        if len > 0 {
            let percent = (100 * 100 * stats.bytes_read) / len;
            print!("{:3}.{:02}% ", percent / 100, percent % 100);
        }
    }

    print!("vit(avg): {:4} rs: {:3} vcdu: {}", stats.vit_metric, stats.rs_errors, stats.vcdu_seq);

    if apid != 0 {
        print!("  APID {apid:2}  {}", format_time(stats.last_time_us));
    }

    let _ = io::stdout().flush();
}
