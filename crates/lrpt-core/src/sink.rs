//! Output-agnostic image sink contract.
//!
//! Replaces the reference decoder's `init`/`write_rgb`/`write_mono`/
//! `finalize` function-pointer quartet with a single trait object a front
//! end implements once per file format (BMP, PPM, ...).
use crate::errors::LrptError;

/// A destination for decoded pixel rows.
///
/// `lrpt-core` never opens files or otherwise performs I/O itself; a front
/// end constructs a type implementing `ImageSink` and hands it to the part
/// of its own code that drains [`crate::channel::Channel`] buffers.
pub trait ImageSink
{
    /// Called once, before any row is written.
    ///
    /// `mono` is `true` when the caller intends to call [`write_mono`] only
    /// ([`write_mono`]: ImageSink::write_mono); some formats need to know
    /// this up front to choose a pixel layout.
    fn init(&mut self, width: usize, height: usize, mono: bool) -> Result<(), LrptError>;

    /// Writes one row of three 8-bit channels, interleaved as RGB.
    fn write_rgb(&mut self, r: &[u8], g: &[u8], b: &[u8]) -> Result<(), LrptError>;

    /// Writes one row of a single 8-bit channel.
    fn write_mono(&mut self, channel: &[u8]) -> Result<(), LrptError>;

    /// Called once after the last row, to flush and release any resources.
    fn finalize(&mut self) -> Result<(), LrptError>;
}
