//! Channel Access Data Unit: a VCDU framed with a sync marker for bitstream
//! recovery.
use super::vcdu::VCDU_LENGTH;

/// Size of a VCDU's worth of channel-coded data, in bytes.
pub const CADU_DATA_LENGTH: usize = 1020;
/// CCSDS attached sync marker.
pub const SYNCWORD: u32 = 0x1ACFFC1D;
/// Size of the sync marker, in bytes.
pub const SYNC_LEN: usize = 4;
/// Total size of a CADU (sync marker + VCDU), in bytes.
pub const CADU_LENGTH: usize = SYNC_LEN + VCDU_LENGTH;
/// Size of a convolutionally-encoded CADU, in bytes (one soft bit per
/// channel-coded bit, two channel-coded bits per information bit).
pub const CONV_CADU_LEN: usize = 2 * CADU_LENGTH;
/// Size of a convolutionally-encoded CADU expressed in soft symbols.
pub const CADU_SOFT_LEN: usize = 2 * 8 * CADU_LENGTH;

/// A full Channel Access Data Unit: sync marker + VCDU.
pub struct Cadu
{
    pub syncword: u32,
    pub data:     [u8; VCDU_LENGTH]
}
