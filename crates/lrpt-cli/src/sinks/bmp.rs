/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Bottom-up BGR/grayscale BMP writer.
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use lrpt_core::errors::LrptError;
use lrpt_core::sink::ImageSink;

const BMP_HEADER_LEN: u32 = 14;
const DIB_HEADER_LEN: u32 = 40;
const PALETTE_LEN: u32 = 4 * 256;

/// Writes rows into a classic uncompressed Windows BMP.
///
/// BMP stores scanlines bottom-up, so rows handed to [`write_rgb`]/
/// [`write_mono`] in top-to-bottom decode order are buffered and flipped at
/// [`finalize`] rather than written as they arrive.
///
/// [`write_rgb`]: ImageSink::write_rgb
/// [`write_mono`]: ImageSink::write_mono
/// [`finalize`]: ImageSink::finalize
pub struct BmpSink {
    file:  File,
    width: usize,
    mono:  bool,
    rows:  Vec<Vec<u8>>,
}

impl BmpSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(BmpSink { file, width: 0, mono: false, rows: Vec::new() })
    }
}

impl ImageSink for BmpSink {
    fn init(&mut self, width: usize, height: usize, mono: bool) -> Result<(), LrptError> {
        self.width = width;
        self.mono = mono;
        self.rows = Vec::with_capacity(height);

        let bpp: u32 = if mono { 8 } else { 24 };
        let bitmap_size = (width * height) as u32 * bpp / 8;
        let palette = if mono { PALETTE_LEN } else { 0 };
        let offset = BMP_HEADER_LEN + DIB_HEADER_LEN + palette;

        let mut header = Vec::with_capacity(offset as usize);
        header.extend_from_slice(b"BM");
        header.extend_from_slice(&(bitmap_size + offset).to_le_bytes());
        header.extend_from_slice(&0u16.to_le_bytes()); // reserved1
        header.extend_from_slice(&0u16.to_le_bytes()); // reserved2
        header.extend_from_slice(&offset.to_le_bytes());

        header.extend_from_slice(&DIB_HEADER_LEN.to_le_bytes());
        header.extend_from_slice(&(width as i32).to_le_bytes());
        header.extend_from_slice(&(height as i32).to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes()); // color planes
        header.extend_from_slice(&(bpp as u16).to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes()); // compression
        header.extend_from_slice(&bitmap_size.to_le_bytes());
        header.extend_from_slice(&0i32.to_le_bytes()); // horiz resolution
        header.extend_from_slice(&0i32.to_le_bytes()); // vert resolution
        header.extend_from_slice(&0u32.to_le_bytes()); // color count
        header.extend_from_slice(&0u32.to_le_bytes()); // important color count

        self.file.write_all(&header).map_err(|e| LrptError::SinkError(e.to_string()))?;

        if mono {
            for i in 0u8..=255 {
                self.file
                    .write_all(&[i, i, i, 0xFF])
                    .map_err(|e| LrptError::SinkError(e.to_string()))?;
            }
        }

        Ok(())
    }

    fn write_rgb(&mut self, r: &[u8], g: &[u8], b: &[u8]) -> Result<(), LrptError> {
        let mut row = Vec::with_capacity(3 * self.width);
        for i in 0..self.width {
            row.push(b[i]);
            row.push(g[i]);
            row.push(r[i]);
        }
        self.rows.push(row);
        Ok(())
    }

    fn write_mono(&mut self, channel: &[u8]) -> Result<(), LrptError> {
        self.rows.push(channel.to_vec());
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), LrptError> {
        for row in self.rows.iter().rev() {
            self.file.write_all(row).map_err(|e| LrptError::SinkError(e.to_string()))?;
        }
        self.file.flush().map_err(|e| LrptError::SinkError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_header_reserves_a_256_entry_palette() {
        let dir = std::env::temp_dir();
        let path = dir.join("lrpt_bmp_mono_test.bmp");
        let mut sink = BmpSink::create(&path).unwrap();
        sink.init(4, 2, true).unwrap();
        sink.write_mono(&[1, 2, 3, 4]).unwrap();
        sink.write_mono(&[5, 6, 7, 8]).unwrap();
        sink.finalize().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let offset = u32::from_le_bytes(bytes[10..14].try_into().unwrap());
        assert_eq!(offset, BMP_HEADER_LEN + DIB_HEADER_LEN + PALETTE_LEN);
        // Rows are flipped: the first row written to the file is the last
        // one handed to write_mono.
        let pixel_data = &bytes[offset as usize..];
        assert_eq!(&pixel_data[0..4], &[5, 6, 7, 8]);
        assert_eq!(&pixel_data[4..8], &[1, 2, 3, 4]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rgb_row_is_stored_in_bgr_order() {
        let dir = std::env::temp_dir();
        let path = dir.join("lrpt_bmp_rgb_test.bmp");
        let mut sink = BmpSink::create(&path).unwrap();
        sink.init(2, 1, false).unwrap();
        sink.write_rgb(&[10, 20], &[30, 40], &[50, 60]).unwrap();
        sink.finalize().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let offset = u32::from_le_bytes(bytes[10..14].try_into().unwrap()) as usize;
        assert_eq!(&bytes[offset..offset + 6], &[50, 30, 10, 60, 40, 20]);

        std::fs::remove_file(&path).unwrap();
    }
}
