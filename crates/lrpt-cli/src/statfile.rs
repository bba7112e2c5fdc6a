/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! `.stat` sidecar: three CRLF-terminated lines recording onboard pass timing.
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use lrpt_core::protocol::mpdu::format_time;

/// Writes `path` with the pass's start time, duration, and a trailing
/// literal zero line whose meaning the reference decoder never documented.
pub fn write_statfile(path: &Path, first_time_us: u64, elapsed_us: u64) -> io::Result<()> {
    let mut fd = File::create(path)?;
    write!(fd, "{}\r\n", format_time(first_time_us))?;
    write!(fd, "{}\r\n", format_time(elapsed_us))?;
    write!(fd, "0\r\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_three_crlf_lines() {
        let dir = std::env::temp_dir();
        let path = dir.join("lrpt_statfile_test.stat");
        write_statfile(&path, 0, 3_661_001_000).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.split("\r\n").collect();
        assert_eq!(lines[0], "00:00:00.000");
        assert_eq!(lines[1], "01:01:01.001");
        assert_eq!(lines[2], "0");

        std::fs::remove_file(&path).unwrap();
    }
}
