//! Error types returned by `lrpt-core`.
use core::fmt::{Debug, Formatter};

/// Errors that can occur while decoding an LRPT stream.
///
/// Malformed or noisy input is expected and handled locally wherever
/// possible (a bad Reed-Solomon block just resets the reassembler); this
/// enum only carries errors that stop the pipeline outright.
#[non_exhaustive]
pub enum LrptError
{
    /// The caller-supplied sample source ran out of data before a full CADU
    /// could be read.
    UnexpectedEof,
    /// An output sink rejected a write.
    SinkError(String),
    /// A configuration value could not be used as given.
    InvalidOption(&'static str),
    /// Generic allocated message, for errors that don't deserve their own
    /// variant.
    Generic(String)
}

impl Debug for LrptError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            Self::UnexpectedEof =>
            {
                writeln!(f, "Unexpected end of sample stream")
            }
            Self::SinkError(msg) =>
            {
                writeln!(f, "Image sink error: {msg}")
            }
            Self::InvalidOption(opt) =>
            {
                writeln!(f, "Invalid option: {opt}")
            }
            Self::Generic(msg) =>
            {
                writeln!(f, "{msg}")
            }
        }
    }
}

impl std::fmt::Display for LrptError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        <Self as Debug>::fmt(self, f)
    }
}

impl std::error::Error for LrptError {}
