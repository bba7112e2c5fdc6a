//! Per-APID pixel-strip assembly for AVHRR image channels.
use crate::protocol::mcu::MCU_PER_MPDU;
use crate::protocol::mpdu::{MCU_PER_LINE, MPDU_MAX_SEQ, MPDU_PER_LINE, MPDU_PER_PERIOD};

/// Number of strips' worth of pixels to grow the buffer by at a time.
const STRIPS_PER_ALLOC: usize = 32;
/// Pixels in one image line.
const PIXELS_PER_STRIP: usize = MCU_PER_LINE * 8 * 8;

type Strip = [[[u8; 8]; 8]; MCU_PER_MPDU];

const BLACK_STRIP: Strip = [[[0u8; 8]; 8]; MCU_PER_MPDU];

/// Assembles decoded AVHRR strips from a single APID into a growable raw
/// grayscale pixel buffer, compensating for lost or out-of-order packets.
pub struct Channel
{
    /// APID this channel is currently bound to, or `None` if unassigned.
    pub apid:    Option<u16>,
    mcu_seq:     i64,
    mpdu_seq:    i64,
    offset:      usize,
    pixels:      Vec<u8>,
    /// Number of image lines assembled so far (`pixels.len() / PIXELS_PER_STRIP / 8`
    /// once a full 8-row strip has been committed).
    pub lines:   usize
}

impl Channel
{
    pub fn new() -> Self
    {
        Channel {
            apid:    None,
            mcu_seq: 0,
            mpdu_seq: -1,
            offset:  0,
            pixels:  vec![0u8; STRIPS_PER_ALLOC * PIXELS_PER_STRIP],
            lines:   0
        }
    }

    pub fn init(apid: u16) -> Self
    {
        let mut ch = Self::new();
        ch.apid = Some(apid);
        ch
    }

    /// Raw pixel buffer assembled so far. Rows are `MCU_PER_LINE*8` pixels wide.
    pub fn pixels(&self) -> &[u8]
    {
        &self.pixels
    }

    /// `true` until this channel's first strip has been appended.
    ///
    /// A caller that only learns an APID's channel assignment partway
    /// through a pass can use this to seed `mpdu_seq` with
    /// [`seed_mpdu_seq`](Channel::seed_mpdu_seq) before the first
    /// [`append_strip`](Channel::append_strip) call, so the lost leading
    /// strips are backfilled instead of miscounted as a large jump.
    pub fn is_unsynced(&self) -> bool
    {
        self.mpdu_seq < 0
    }

    /// Seeds `mpdu_seq` ahead of the first [`append_strip`](Channel::append_strip)
    /// call, so that call's loss compensation accounts for strips missed
    /// before this channel was assigned an APID.
    pub fn seed_mpdu_seq(&mut self, mpdu_seq: i64)
    {
        self.mpdu_seq = mpdu_seq;
    }

    pub fn width(&self) -> usize
    {
        MCU_PER_LINE * 8
    }

    /// Appends one decoded strip of blocks (or backfills black pixels if
    /// `strip` is `None`, e.g. on a Huffman decode failure), realigning to
    /// `mcu_seq`/`mpdu_seq` and padding for any strips lost since the last
    /// call.
    pub fn append_strip(&mut self, strip: Option<&Strip>, mcu_seq: u32, mpdu_seq: u32)
    {
        // Misalignment can occur after a satellite-side buffer overflow;
        // snap back down to the start of the MCU group.
        let mcu_seq = (mcu_seq - mcu_seq % MCU_PER_MPDU as u32) as i64;
        let mpdu_seq = mpdu_seq as i64;

        let mpdu_delta = (mpdu_seq - self.mpdu_seq - 1 + MPDU_MAX_SEQ as i64) % MPDU_MAX_SEQ as i64;
        let mcu_delta = (mcu_seq - self.mcu_seq + MCU_PER_LINE as i64) % MCU_PER_LINE as i64;

        let lines_lost = if self.mpdu_seq < 0 { 0 } else { mpdu_delta / MPDU_PER_PERIOD as i64 };
        let strips_lost = mcu_delta / MCU_PER_MPDU as i64 + lines_lost * MPDU_PER_LINE as i64;

        for _ in 0..strips_lost {
            self.cache_strip(&BLACK_STRIP);
        }

        self.mpdu_seq = mpdu_seq;
        self.mcu_seq = mcu_seq;

        self.cache_strip(strip.unwrap_or(&BLACK_STRIP));
    }

    fn cache_strip(&mut self, strip: &Strip)
    {
        if self.offset + PIXELS_PER_STRIP > self.pixels.len() {
            let old_len = self.pixels.len();
            self.pixels.resize(old_len + STRIPS_PER_ALLOC * PIXELS_PER_STRIP, 0);
        }

        let mcu_seq = self.mcu_seq as usize;
        for row in 0..8 {
            for block in 0..MCU_PER_MPDU {
                let dst_start = self.offset + row * MCU_PER_LINE * 8 + (mcu_seq + block) * 8;
                self.pixels[dst_start..dst_start + 8].copy_from_slice(&strip[block][row]);
            }
        }

        self.mcu_seq += MCU_PER_MPDU as i64;
        if self.mcu_seq as usize >= MCU_PER_LINE {
            self.mcu_seq = 0;
            self.mpdu_seq += MPDU_PER_PERIOD as i64 - MPDU_PER_LINE as i64;
            self.offset += PIXELS_PER_STRIP;
            self.lines += 1;
        }
    }
}

impl Default for Channel
{
    fn default() -> Self
    {
        Self::new()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn gray_strip(value: u8) -> Strip
    {
        [[[value; 8]; 8]; MCU_PER_MPDU]
    }

    #[test]
    fn first_strip_lands_at_offset_zero()
    {
        let mut ch = Channel::init(64);
        ch.append_strip(Some(&gray_strip(200)), 0, 0);
        assert_eq!(ch.pixels()[0], 200);
    }

    #[test]
    fn missing_strips_are_backfilled_with_black()
    {
        let mut ch = Channel::init(64);
        ch.append_strip(Some(&gray_strip(200)), 0, 0);
        // Skip straight to the next image line, losing every intervening
        // strip on this line.
        ch.append_strip(Some(&gray_strip(50)), 0, MPDU_PER_PERIOD);
        assert_eq!(ch.lines, 1);
    }

    #[test]
    fn a_full_line_advances_the_line_counter()
    {
        let mut ch = Channel::init(64);
        for i in 0..MPDU_PER_LINE {
            ch.append_strip(Some(&gray_strip(10)), i * MCU_PER_MPDU as u32, i);
        }
        assert_eq!(ch.lines, 1);
    }
}
