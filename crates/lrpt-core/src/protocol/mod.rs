//! Wire-format structs for the CCSDS transfer frame stack used by LRPT:
//! CADU -> VCDU -> MPDU -> AVHRR MCU segment.
pub mod cadu;
pub mod mcu;
pub mod mpdu;
pub mod vcdu;

pub use cadu::Cadu;
pub use mcu::{AvhrrSegment, MCU_PER_MPDU, MCUSEG_MAX_DATA_LEN};
pub use mpdu::Mpdu;
pub use vcdu::Vcdu;
