/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Maps incoming MPDUs to image channels by APID, the way the reference
//! decoder's `process_mpdu` does.
use log::warn;
use lrpt_core::channel::Channel;
use lrpt_core::jpeg::AvhrrDecoder;
use lrpt_core::protocol::mcu::{AvhrrSegment, MCU_PER_MPDU};
use lrpt_core::protocol::mpdu::{MPDU_MAX_SEQ, MPDU_PER_PERIOD, MPDU_TIMESTAMP_LEN};
use lrpt_core::protocol::Mpdu;

use crate::sinks::raw::RawSink;

/// Assigns an APID to its first-choice channel slot when no channel already
/// carries it.
fn preferred_channel(apid: u16) -> usize {
    match apid {
        64 => 2,
        65 => 1,
        66 => 0,
        67 => 1,
        68 => 0,
        69 => 2,
        _ => 0,
    }
}

/// Routes reassembled MPDUs into up to three AVHRR image channels (and,
/// optionally, a raw APID-70 passthrough), mirroring `process_mpdu`'s APID
/// dispatch and the channel-reassignment fallback it uses when two
/// requested APIDs collide.
pub struct Router {
    pub channels:       [Channel; 3],
    decoder:            AvhrrDecoder,
    first_mpdu_seq:     Option<u16>,
}

impl Router {
    pub fn new(apids: [i32; 3]) -> Self {
        let mut channels = [Channel::new(), Channel::new(), Channel::new()];
        for (ch, &apid) in channels.iter_mut().zip(apids.iter()) {
            if apid >= 0 {
                ch.apid = Some(apid as u16);
            }
        }
        Router { channels, decoder: AvhrrDecoder::new(), first_mpdu_seq: None }
    }

    pub fn route(&mut self, mpdu: &Mpdu, raw_sink: Option<&mut RawSink>) {
        let apid = mpdu.apid();
        let seq = mpdu.seq();
        let is_first_mpdu = self.first_mpdu_seq.is_none();
        let first_mpdu_seq = *self.first_mpdu_seq.get_or_insert(seq);

        match apid {
            64..=69 => self.route_avhrr(mpdu, apid, seq, is_first_mpdu, first_mpdu_seq),
            70 => {
                if let Some(sink) = raw_sink {
                    if let Err(err) = sink.write_mpdu(mpdu) {
                        warn!("failed to write APID 70 passthrough: {err}");
                    }
                }
            }
            _ => {}
        }
    }

    fn route_avhrr(&mut self, mpdu: &Mpdu, apid: u16, seq: u16, is_first_mpdu: bool, first_mpdu_seq: u16) {
        let mut idx = self.channels.iter().position(|c| c.apid == Some(apid));

        if idx.is_none() {
            let preferred = preferred_channel(apid);
            if self.channels[preferred].apid.is_none() {
                self.channels[preferred].apid = Some(apid);
                idx = Some(preferred);
            } else if let Some(free) = self.channels.iter().position(|c| c.apid.is_none()) {
                self.channels[free].apid = Some(apid);
                idx = Some(free);
            }
        }

        let Some(idx) = idx else {
            return;
        };

        let segment = AvhrrSegment::new(mpdu.data());
        let mut strip = [[[0u8; 8]; 8]; MCU_PER_MPDU];

        // `Mpdu::len()` is the wire-declared length of the timestamp+data
        // region; `Mpdu::data()` is always a fixed-size slice into the
        // packet buffer regardless of how much of it is real, so the
        // Huffman decoder's truncation bound has to come from the former.
        let declared_data_len = (mpdu.len() as usize).saturating_sub(MPDU_TIMESTAMP_LEN);
        let maxlen = declared_data_len.saturating_sub(6).min(mpdu.data().len().saturating_sub(6));
        let ok = self.decoder.decode(&mut strip, &segment, maxlen);

        // A channel whose APID was only discovered partway through the pass
        // may already have missed strips; seed its sequence counter so the
        // next append backfills them instead of miscounting them as a huge
        // jump.
        if self.channels[idx].is_unsynced() && !is_first_mpdu {
            let lines_lost = 1 + (seq as i64 - first_mpdu_seq as i64) / MPDU_PER_PERIOD as i64;
            let seeded = (seq as i64 - MPDU_PER_PERIOD as i64 * lines_lost - 1 + MPDU_MAX_SEQ as i64)
                % MPDU_MAX_SEQ as i64;
            self.channels[idx].seed_mpdu_seq(seeded);
        }

        let strip = if ok { Some(&strip) } else { None };
        self.channels[idx].append_strip(strip, segment.seq() as u32, seq as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_channels_match_the_reference_table() {
        assert_eq!(preferred_channel(64), 2);
        assert_eq!(preferred_channel(65), 1);
        assert_eq!(preferred_channel(66), 0);
        assert_eq!(preferred_channel(67), 1);
        assert_eq!(preferred_channel(68), 0);
        assert_eq!(preferred_channel(69), 2);
    }

    #[test]
    fn unrequested_apid_claims_its_preferred_slot() {
        let mut router = Router::new([-1, -1, -1]);
        let mut mpdu = Mpdu::new();
        mpdu.as_bytes_mut()[0] = 0x00 | (66u16 >> 8) as u8;
        mpdu.as_bytes_mut()[1] = (66u16 & 0xFF) as u8;
        router.route(&mpdu, None);
        assert_eq!(router.channels[0].apid, Some(66));
    }
}
