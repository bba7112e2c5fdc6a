//! `lrpt-core` turns a stream of soft QPSK symbols recorded from a Meteor-M
//! LRPT downlink into reassembled AVHRR imagery.
//!
//! The crate does not perform any I/O itself: callers feed soft samples in
//! through [`pipeline::Pipeline::step`] and receive decoded [`protocol::Mpdu`]
//! values and [`channel::Channel`] pixel buffers out. Turning those into
//! files (BMP, raw APID passthrough, `.stat` sidecars) is the job of a
//! front-end such as `lrpt-cli`.
//!
//! ```no_run
//! use lrpt_core::options::DecoderOptions;
//! use lrpt_core::pipeline::{Pipeline, StepResult};
//!
//! let options = DecoderOptions::default();
//! let mut pipeline = Pipeline::new(options);
//!
//! let mut samples: &[i8] = &[];
//! loop {
//!     match pipeline.step(&mut samples) {
//!         StepResult::Eof => break,
//!         StepResult::MpduReady(_mpdu) => {}
//!         StepResult::StatsOnly | StepResult::NotReady => {}
//!     }
//! }
//! ```
#![warn(clippy::correctness, clippy::perf, clippy::missing_errors_doc)]
#![allow(clippy::needless_return, clippy::similar_names)]

#[macro_use]
extern crate log;

pub mod channel;
pub mod correlator;
pub mod deinterleave;
pub mod descramble;
pub mod diff;
pub mod errors;
pub mod gf256;
pub mod jpeg;
pub mod options;
pub mod pipeline;
pub mod protocol;
pub mod reassembler;
pub mod reed_solomon;
pub mod sink;
pub mod viterbi;

pub use crate::errors::LrptError;
pub use crate::options::DecoderOptions;

/// Returns the crate version as set in `Cargo.toml` at compile time.
pub fn get_version() -> &'static str
{
    env!("CARGO_PKG_VERSION")
}
