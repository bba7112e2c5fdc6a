//! VCDU -> MPDU reassembly state machine.
use crate::protocol::mpdu::MPDU_HDR_LEN;
use crate::protocol::{Mpdu, Vcdu};

/// Result of feeding a VCDU to the [`Reassembler`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReassemblerStatus
{
    /// No more data to process in this VCDU.
    Proceed,
    /// Some bytes were consumed, but no MPDU is complete yet.
    Fragment,
    /// A complete MPDU is now available in the destination buffer; the VCDU
    /// may still have more data to process.
    Parsed
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum State
{
    Idle,
    Header,
    Data
}

/// Reassembles MPDUs split across VCDU boundaries.
///
/// Call [`Reassembler::reconstruct`] in a loop on the same VCDU until it
/// returns [`ReassemblerStatus::Proceed`].
pub struct Reassembler
{
    state:       State,
    offset:      u16,
    frag_offset: u16
}

impl Reassembler
{
    pub fn new() -> Self
    {
        Reassembler { state: State::Idle, offset: 0, frag_offset: 0 }
    }

    pub fn reconstruct(&mut self, dst: &mut Mpdu, src: &Vcdu) -> ReassemblerStatus
    {
        let vcdu_data_len = src.data().len() as u16;
        let jmp_idle = src.header_present() && self.offset == 0;

        // A VCDU with version or type zero carries known-bad data; skip it
        // entirely rather than feeding it into the reassembly state
        // machine.
        if src.version() == 0 || src.vcdu_type() == 0 {
            return ReassemblerStatus::Proceed;
        }

        match self.state {
            State::Idle => {
                if src.header_present() {
                    self.offset = src.header_ptr();
                    if self.offset > vcdu_data_len {
                        return ReassemblerStatus::Proceed;
                    }
                    self.frag_offset = 0;
                    self.state = State::Header;
                    ReassemblerStatus::Fragment
                } else {
                    ReassemblerStatus::Proceed
                }
            }
            State::Header => {
                let bytes_left = MPDU_HDR_LEN as u16 - self.frag_offset;
                let data = src.data();

                if self.offset + bytes_left < vcdu_data_len {
                    let dst_bytes = dst.as_bytes_mut();
                    let start = self.offset as usize;
                    dst_bytes[self.frag_offset as usize..self.frag_offset as usize + bytes_left as usize]
                        .copy_from_slice(&data[start..start + bytes_left as usize]);
                    self.frag_offset = 0;
                    self.offset += bytes_left;
                    self.state = State::Data;
                    ReassemblerStatus::Fragment
                } else {
                    let avail = vcdu_data_len - self.offset;
                    let dst_bytes = dst.as_bytes_mut();
                    let start = self.offset as usize;
                    dst_bytes[self.frag_offset as usize..self.frag_offset as usize + avail as usize]
                        .copy_from_slice(&data[start..start + avail as usize]);
                    self.frag_offset += avail;
                    self.offset = 0;
                    ReassemblerStatus::Proceed
                }
            }
            State::Data => {
                let bytes_left = dst.len() - self.frag_offset;
                let data = src.data();

                if self.offset + bytes_left < vcdu_data_len {
                    let start = self.offset as usize;
                    let dst_bytes = dst.as_bytes_mut();
                    let data_region_start = MPDU_HDR_LEN + self.frag_offset as usize;
                    dst_bytes[data_region_start..data_region_start + bytes_left as usize]
                        .copy_from_slice(&data[start..start + bytes_left as usize]);
                    self.frag_offset = 0;
                    self.offset += bytes_left;
                    self.state = if jmp_idle { State::Idle } else { State::Header };
                    ReassemblerStatus::Parsed
                } else {
                    let avail = vcdu_data_len - self.offset;
                    let start = self.offset as usize;
                    let dst_bytes = dst.as_bytes_mut();
                    let data_region_start = MPDU_HDR_LEN + self.frag_offset as usize;
                    dst_bytes[data_region_start..data_region_start + avail as usize]
                        .copy_from_slice(&data[start..start + avail as usize]);
                    self.frag_offset += avail;
                    self.offset = 0;
                    self.state = if jmp_idle { State::Idle } else { State::Data };
                    if jmp_idle { ReassemblerStatus::Fragment } else { ReassemblerStatus::Proceed }
                }
            }
        }
    }
}

impl Default for Reassembler
{
    fn default() -> Self
    {
        Self::new()
    }
}
