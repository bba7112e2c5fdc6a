//! Global decoder options.

/// Options that control how [`crate::pipeline::Pipeline`] interprets the
/// incoming sample stream.
///
/// Construct with [`DecoderOptions::default`] and adjust with the builder
/// methods, mirroring the CLI switches described for `lrpt-cli`.
#[derive(Copy, Clone, Debug)]
pub struct DecoderOptions
{
    /// Whether the input samples are differentially QPSK coded and need
    /// [`crate::diff`] applied before correlation.
    ///
    /// - Default value: `false`
    /// - Respected by: [`crate::pipeline::Pipeline`]
    diffcoded: bool,

    /// Whether the input samples are convolutionally interleaved ("80k
    /// mode") and need [`crate::deinterleave`] applied before correlation.
    ///
    /// - Default value: `false`
    /// - Respected by: [`crate::pipeline::Pipeline`]
    interleaved: bool,

    /// Maximum number of AVHRR image channels tracked simultaneously.
    ///
    /// - Default value: 3
    /// - Respected by: [`crate::pipeline::Pipeline`]
    num_channels: usize,

    /// Number of pixel-rows worth of strips to reserve per channel
    /// allocation growth step.
    ///
    /// - Default value: 32
    /// - Respected by: [`crate::channel::Channel`]
    strips_per_alloc: usize
}

impl Default for DecoderOptions
{
    fn default() -> Self
    {
        DecoderOptions {
            diffcoded:        false,
            interleaved:      false,
            num_channels:     3,
            strips_per_alloc: 32
        }
    }
}

impl DecoderOptions
{
    /// Set whether incoming samples are differentially coded.
    pub fn set_diffcoded(mut self, yes: bool) -> Self
    {
        self.diffcoded = yes;
        self
    }

    pub fn diffcoded(&self) -> bool
    {
        self.diffcoded
    }

    /// Set whether incoming samples are convolutionally interleaved.
    pub fn set_interleaved(mut self, yes: bool) -> Self
    {
        self.interleaved = yes;
        self
    }

    pub fn interleaved(&self) -> bool
    {
        self.interleaved
    }

    pub fn set_num_channels(mut self, count: usize) -> Self
    {
        self.num_channels = count;
        self
    }

    pub fn num_channels(&self) -> usize
    {
        self.num_channels
    }

    pub fn set_strips_per_alloc(mut self, count: usize) -> Self
    {
        self.strips_per_alloc = count;
        self
    }

    pub fn strips_per_alloc(&self) -> usize
    {
        self.strips_per_alloc
    }
}
