//! AVHRR MCU segment decoding: Huffman entropy decode followed by
//! dequantization and inverse DCT.
mod huffman;
mod idct;

use crate::protocol::mcu::{AvhrrSegment, MCU_PER_MPDU};

pub use huffman::huffman_decode;
pub use idct::jpeg_decode;

/// Decodes the blocks of one AVHRR MCU segment into `MCU_PER_MPDU` 8x8
/// pixel strips.
///
/// Carries the JPEG quality factor of the last successfully decoded
/// segment so that a segment with a corrupted (zero) quality factor still
/// decodes to something displayable rather than being discarded.
#[derive(Copy, Clone, Debug, Default)]
pub struct AvhrrDecoder
{
    last_q: u8
}

impl AvhrrDecoder
{
    pub fn new() -> Self
    {
        AvhrrDecoder { last_q: 0 }
    }

    /// Decodes `segment`'s blocks into `dst`. `maxlen` is the number of
    /// payload bytes actually available in the owning MPDU, used to bound
    /// the Huffman decoder against corrupted packets.
    ///
    /// Returns `false` if the Huffman bitstream contained an invalid DC
    /// codeword; `dst` is left in whatever partial state decoding reached.
    pub fn decode(&mut self, dst: &mut [[[u8; 8]; 8]; MCU_PER_MPDU], segment: &AvhrrSegment, maxlen: usize) -> bool
    {
        let mut coeffs = [[[0i16; 8]; 8]; MCU_PER_MPDU];

        if !huffman_decode(&mut coeffs, segment.data(), MCU_PER_MPDU, maxlen) {
            return false;
        }

        let q_factor = segment.q_factor();
        if q_factor == 0 && self.last_q == 0 {
            // No quality factor on the wire and nothing to fall back to yet;
            // there is no way to dequantize this segment.
            return false;
        }

        for i in 0..MCU_PER_MPDU {
            jpeg_decode(&mut dst[i], &mut coeffs[i], q_factor, &mut self.last_q);
        }

        true
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn decode_runs_over_all_blocks_of_a_flat_segment()
    {
        let mut bytes = vec![0u8; 6 + 2048];
        bytes[5] = 80; // q_factor
        let segment = AvhrrSegment::new(&bytes);
        let mut dst = [[[0u8; 8]; 8]; MCU_PER_MPDU];
        let mut decoder = AvhrrDecoder::new();
        let ok = decoder.decode(&mut dst, &segment, bytes.len() - 6);
        assert!(ok);
        assert_eq!(decoder.last_q, 80);
    }

    #[test]
    fn zero_quality_with_no_prior_quality_drops_the_strip()
    {
        let mut bytes = vec![0u8; 6 + 2048];
        bytes[5] = 0; // q_factor
        let segment = AvhrrSegment::new(&bytes);
        let mut dst = [[[0u8; 8]; 8]; MCU_PER_MPDU];
        let mut decoder = AvhrrDecoder::new();
        assert!(!decoder.decode(&mut dst, &segment, bytes.len() - 6));
    }

    #[test]
    fn zero_quality_segment_inherits_previous_quality()
    {
        let mut bytes = vec![0u8; 6 + 2048];
        bytes[5] = 64;
        let segment = AvhrrSegment::new(&bytes);
        let mut dst = [[[0u8; 8]; 8]; MCU_PER_MPDU];
        let mut decoder = AvhrrDecoder::new();
        assert!(decoder.decode(&mut dst, &segment, bytes.len() - 6));

        let mut bytes2 = vec![0u8; 6 + 2048];
        bytes2[5] = 0;
        let segment2 = AvhrrSegment::new(&bytes2);
        assert!(decoder.decode(&mut dst, &segment2, bytes2.len() - 6));
        assert_eq!(decoder.last_q, 64);
    }
}
