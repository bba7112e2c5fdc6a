/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Raw APID-70 (calibration telemetry) passthrough writer.
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use lrpt_core::protocol::Mpdu;

/// Dumps every APID-70 MPDU's header, timestamp and payload verbatim to a
/// file, for offline calibration analysis.
pub struct RawSink {
    file: File,
}

impl RawSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(RawSink { file: File::create(path)? })
    }

    pub fn write_mpdu(&mut self, mpdu: &Mpdu) -> io::Result<()> {
        self.file.write_all(mpdu.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_mpdu_dumps_the_full_fixed_buffer() {
        let dir = std::env::temp_dir();
        let path = dir.join("lrpt_raw_sink_test.70");
        let mut sink = RawSink::create(&path).unwrap();
        let mpdu = Mpdu::new();
        sink.write_mpdu(&mpdu).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), mpdu.as_bytes().len());

        std::fs::remove_file(&path).unwrap();
    }
}
