//! Decoder driver: turns a stream of soft QPSK symbols into reassembled
//! MPDUs.
//!
//! Mirrors the reference decoder's `decode_soft_cadu` state machine
//! (READ / PARSE_MPDU / VIT_SECOND): because the sliding-window Viterbi
//! decoder lags its input by [`VITERBI_DELAY`] bytes, finishing a CADU's
//! tail happens at the START of the *next* CADU's READ step, one call
//! before that CADU's own body is decoded.
use crate::correlator::{autocorrelate, soft_derotate, soft_to_hard, Correlator, Phase};
use crate::deinterleave::{Deinterleaver, MARKER_STRIDE};
use crate::descramble::descramble;
use crate::diff::DiffDecoder;
use crate::options::DecoderOptions;
use crate::protocol::cadu::{CADU_LENGTH, CADU_SOFT_LEN, CONV_CADU_LEN, SYNCWORD};
use crate::protocol::vcdu::VCDU_LENGTH;
use crate::protocol::{Mpdu, Vcdu};
use crate::reassembler::{Reassembler, ReassemblerStatus};
use crate::reed_solomon::rs_fix;
use crate::viterbi::{conv_encode_u32, Viterbi, VITERBI_DELAY};

/// A timestamp that decreases by more than this many microseconds relative
/// to the last observed one is treated as corrupt telemetry and ignored for
/// onboard-time bookkeeping, rather than resetting the elapsed-time clock.
pub const TIMESTAMP_BACKWARDS_JUMP_LIMIT: u64 = 12 * 3600 * 1_000_000;

/// Source of soft (sign-magnitude) QPSK symbols.
///
/// Implemented for `&[i8]` so callers can feed an in-memory buffer directly;
/// wrap a file or socket reader to implement it for a streaming source.
pub trait SampleSource
{
    /// Fills `dst` completely, returning `false` if the source is exhausted
    /// before `dst` could be filled.
    fn read_samples(&mut self, dst: &mut [i8]) -> bool;
}

impl SampleSource for &[i8]
{
    fn read_samples(&mut self, dst: &mut [i8]) -> bool
    {
        if self.len() < dst.len() {
            return false;
        }
        dst.copy_from_slice(&self[..dst.len()]);
        *self = &self[dst.len()..];
        true
    }
}

/// Outcome of a single [`Pipeline::step`] call.
pub enum StepResult
{
    /// The sample source ran out of data.
    Eof,
    /// A complete MPDU was reassembled.
    MpduReady(Mpdu),
    /// A CADU finished decoding but produced no new MPDU (RS failure, or a
    /// VCDU that only contributed to an in-progress MPDU).
    StatsOnly,
    /// More samples are required before anything can be reported.
    NotReady
}

/// Running decoder statistics, recovered from the reference decoder's
/// status line (kept out of the core so it stays I/O-free; a front end
/// polls this after every step).
#[derive(Copy, Clone, Debug, Default)]
pub struct PipelineStats
{
    /// Reed-Solomon symbol errors corrected in the most recent VCDU, or a
    /// negative value if the block was uncorrectable.
    pub rs_errors:     i32,
    /// Average Viterbi path metric per CADU byte, lower is worse.
    pub vit_metric:    i32,
    /// VCDU counter of the most recently decoded frame.
    pub vcdu_seq:      u32,
    /// Onboard timestamp (microseconds) of the first MPDU observed.
    pub first_time_us: u64,
    /// Onboard timestamp (microseconds) of the most recently observed MPDU.
    pub last_time_us:  u64,
    /// Samples consumed from the source so far.
    pub bytes_read:    u64
}

impl PipelineStats
{
    /// Onboard time elapsed between the first and most recent MPDU.
    pub fn elapsed_us(&self) -> u64
    {
        self.last_time_us.saturating_sub(self.first_time_us)
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum State
{
    Read,
    ParseMpdu,
    VitSecond
}

/// Decodes a raw soft-symbol stream into MPDUs and tracks the running
/// statistics a front end needs for its status line.
pub struct Pipeline
{
    diffcoded:          bool,
    interleaved:         bool,
    state:              State,
    diff:               DiffDecoder,
    correlator:         Correlator,
    viterbi:            Viterbi,
    reassembler:        Reassembler,
    deinterleaver:      Option<Deinterleaver>,
    from_prev:          Vec<i8>,
    interleave_rotation: Phase,

    soft_cadu: Vec<i8>,
    hard_cadu: Vec<u8>,
    cadu_full: Vec<u8>,
    offset:    usize,
    vit_accum: i32,

    vcdu: Option<Vcdu>,
    mpdu: Mpdu,

    stats:      PipelineStats,
    first_time_seen: bool
}

impl Pipeline
{
    pub fn new(options: DecoderOptions) -> Self
    {
        let (convolved_syncword, _) = conv_encode_u32(0, SYNCWORD);

        Pipeline {
            diffcoded: options.diffcoded(),
            interleaved: options.interleaved(),
            state: State::Read,
            diff: DiffDecoder::new(),
            correlator: Correlator::new(convolved_syncword),
            viterbi: Viterbi::new(),
            reassembler: Reassembler::new(),
            deinterleaver: if options.interleaved() { Some(Deinterleaver::new()) } else { None },
            from_prev: Vec::new(),
            interleave_rotation: Phase::Phase0,

            soft_cadu: vec![0i8; 2 * CADU_SOFT_LEN],
            hard_cadu: vec![0u8; CONV_CADU_LEN],
            cadu_full: vec![0u8; CADU_LENGTH],
            offset: 0,
            vit_accum: 0,

            vcdu: None,
            mpdu: Mpdu::new(),

            stats: PipelineStats::default(),
            first_time_seen: false
        }
    }

    pub fn stats(&self) -> PipelineStats
    {
        self.stats
    }

    /// Advances the decoder by feeding it samples from `source` as needed,
    /// returning as soon as there's something to report.
    pub fn step<S: SampleSource>(&mut self, source: &mut S) -> StepResult
    {
        match self.state {
            State::Read => self.do_read(source),
            State::ParseMpdu => self.parse_mpdu(),
            State::VitSecond => self.finish_viterbi()
        }
    }

    /// Records an MPDU's onboard timestamp into the running stats,
    /// rejecting apparent backward jumps larger than
    /// [`TIMESTAMP_BACKWARDS_JUMP_LIMIT`] as corrupt telemetry.
    fn observe_timestamp(&mut self, raw_time: u64)
    {
        if !self.first_time_seen {
            self.first_time_seen = true;
            self.stats.first_time_us = raw_time;
            self.stats.last_time_us = raw_time;
            return;
        }

        if self.stats.last_time_us.saturating_sub(raw_time) > TIMESTAMP_BACKWARDS_JUMP_LIMIT {
            warn!("rejecting onboard timestamp that jumped backwards by more than half a day");
            return;
        }

        self.stats.last_time_us = raw_time;
    }

    fn do_read<S: SampleSource>(&mut self, source: &mut S) -> StepResult
    {
        if !self.read_into(source, 0, CADU_SOFT_LEN) {
            return StepResult::Eof;
        }

        if self.diffcoded {
            self.diff.decode(&mut self.soft_cadu[..CADU_SOFT_LEN]);
        }

        soft_to_hard(&mut self.hard_cadu, &self.soft_cadu[..CADU_SOFT_LEN]);
        let (offset, rotation) = self.correlator.correlate(&self.hard_cadu);

        if offset > 0 && !self.read_into(source, CADU_SOFT_LEN, offset) {
            return StepResult::Eof;
        }
        self.offset = offset;

        soft_derotate(&mut self.soft_cadu[offset..offset + CADU_SOFT_LEN], rotation);

        // Finish decoding the previous CADU's tail (output is VITERBI_DELAY
        // bytes late).
        let tail_start = CADU_LENGTH - VITERBI_DELAY;
        let vit1 = self.viterbi.decode(
            &mut self.cadu_full[tail_start..],
            &self.soft_cadu[offset..offset + VITERBI_DELAY * 16],
            VITERBI_DELAY
        );
        self.vit_accum = vit1;

        descramble(&mut self.cadu_full[4..4 + VCDU_LENGTH]);
        let rs_errors = rs_fix(&mut self.cadu_full[4..4 + VCDU_LENGTH]);
        self.stats.rs_errors = rs_errors;

        if rs_errors < 0 {
            self.reassembler = Reassembler::new();
            self.state = State::VitSecond;
            return StepResult::NotReady;
        }

        let mut vcdu_bytes = [0u8; VCDU_LENGTH];
        vcdu_bytes.copy_from_slice(&self.cadu_full[4..4 + VCDU_LENGTH]);
        let vcdu = Vcdu::from_bytes(vcdu_bytes);
        self.stats.vcdu_seq = vcdu.counter();
        self.vcdu = Some(vcdu);
        self.state = State::ParseMpdu;

        self.parse_mpdu()
    }

    fn parse_mpdu(&mut self) -> StepResult
    {
        let vcdu = self.vcdu.as_ref().expect("ParseMpdu state always has a VCDU");
        match self.reassembler.reconstruct(&mut self.mpdu, vcdu) {
            ReassemblerStatus::Parsed => {
                self.observe_timestamp(self.mpdu.raw_time());
                StepResult::MpduReady(self.mpdu.clone())
            }
            ReassemblerStatus::Proceed => {
                self.state = State::VitSecond;
                StepResult::NotReady
            }
            ReassemblerStatus::Fragment => StepResult::NotReady
        }
    }

    fn finish_viterbi(&mut self) -> StepResult
    {
        let bytecount = CADU_LENGTH - VITERBI_DELAY;
        let soft_start = self.offset + 2 * 8 * VITERBI_DELAY;
        let vit2 = self.viterbi.decode(
            &mut self.cadu_full[..bytecount],
            &self.soft_cadu[soft_start..soft_start + bytecount * 16],
            bytecount
        );
        self.vit_accum += vit2;
        self.stats.vit_metric = self.vit_accum / CADU_LENGTH as i32;
        self.state = State::Read;
        StepResult::StatsOnly
    }

    fn read_into<S: SampleSource>(&mut self, source: &mut S, dst_offset: usize, len: usize) -> bool
    {
        let ok = if !self.interleaved {
            source.read_samples(&mut self.soft_cadu[dst_offset..dst_offset + len])
        } else {
            let Pipeline { deinterleaver, from_prev, interleave_rotation, soft_cadu, .. } = self;
            read_interleaved(
                source,
                deinterleaver.as_mut().expect("interleaved pipelines always carry a deinterleaver"),
                from_prev,
                interleave_rotation,
                &mut soft_cadu[dst_offset..dst_offset + len]
            )
        };

        if ok {
            self.stats.bytes_read += len as u64;
        }
        ok
    }
}

/// Reads enough raw interleaved samples to produce `dst.len()` deinterleaved
/// samples, resynchronizing against the interleaver's own sync marker via
/// autocorrelation when there's enough data to do so reliably.
fn read_interleaved<S: SampleSource>(
    source: &mut S,
    deint: &mut Deinterleaver,
    from_prev: &mut Vec<i8>,
    rotation: &mut Phase,
    dst: &mut [i8]
) -> bool
{
    let len = dst.len();
    let num_samples = deint.num_samples_needed(len);
    let mut raw = vec![0i8; num_samples + MARKER_STRIDE];

    let cached = from_prev.len().min(num_samples);
    raw[..cached].copy_from_slice(&from_prev[..cached]);
    from_prev.drain(..cached);

    if num_samples > cached && !source.read_samples(&mut raw[cached..num_samples]) {
        return false;
    }

    if num_samples < MARKER_STRIDE * 8 {
        soft_derotate(&mut raw[..num_samples], *rotation);
        deint.deinterleave(dst, &raw, len);
        return true;
    }

    let hard_len = (num_samples & !0x7) / 8;
    let mut hard = vec![0u8; hard_len];
    soft_to_hard(&mut hard, &raw[..hard_len * 8]);
    let (auto_offset, found_rotation) = autocorrelate(MARKER_STRIDE / 8, &mut hard);
    *rotation = found_rotation;

    let deint_offset = deint.expected_sync_offset();
    let mut offset = (auto_offset as isize - deint_offset as isize + (MARKER_STRIDE - 8) as isize + 1)
        .rem_euclid(MARKER_STRIDE as isize);
    if offset > (MARKER_STRIDE / 2) as isize {
        offset -= MARKER_STRIDE as isize;
    }

    let (start, end) = if offset > 0 {
        let extra = offset as usize;
        if num_samples + extra > raw.len() {
            raw.resize(num_samples + extra, 0);
        }
        if !source.read_samples(&mut raw[num_samples..num_samples + extra]) {
            return false;
        }
        (0usize, num_samples + extra)
    } else if offset < 0 {
        let shift = (-offset) as usize;
        *from_prev = raw[num_samples - shift..num_samples].to_vec();
        (0usize, num_samples - shift)
    } else {
        (0usize, num_samples)
    };

    soft_derotate(&mut raw[start..end], *rotation);
    deint.deinterleave(dst, &raw[start..end], len);

    true
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn eof_on_empty_source_is_reported() {
        let mut pipeline = Pipeline::new(DecoderOptions::default());
        let mut samples: &[i8] = &[];
        matches!(pipeline.step(&mut samples), StepResult::Eof);
    }

    #[test]
    fn timestamp_bookkeeping_tracks_first_and_last() {
        let mut pipeline = Pipeline::new(DecoderOptions::default());
        pipeline.observe_timestamp(1000);
        pipeline.observe_timestamp(2000);
        assert_eq!(pipeline.stats().first_time_us, 1000);
        assert_eq!(pipeline.stats().last_time_us, 2000);
        assert_eq!(pipeline.stats().elapsed_us(), 1000);
    }

    #[test]
    fn large_backward_timestamp_jump_is_rejected() {
        let mut pipeline = Pipeline::new(DecoderOptions::default());
        pipeline.observe_timestamp(TIMESTAMP_BACKWARDS_JUMP_LIMIT * 2);
        pipeline.observe_timestamp(0);
        assert_eq!(pipeline.stats().last_time_us, TIMESTAMP_BACKWARDS_JUMP_LIMIT * 2);
    }
}
