//! Pseudorandom noise (PN) descrambler.
//!
//! VCDUs are scrambled with an 8-bit LFSR running with period 255; XORing
//! the scrambled data with the same sequence recovers the original bytes.
use std::sync::OnceLock;

const NOISE_PERIOD: usize = 255;

static NOISE: OnceLock<[u8; NOISE_PERIOD]> = OnceLock::new();

fn noise_table() -> &'static [u8; NOISE_PERIOD]
{
    NOISE.get_or_init(|| {
        let mut noise = [0u8; NOISE_PERIOD];
        let mut state = 0xFFu8;

        for slot in noise.iter_mut() {
            let mut byte = 0u8;
            for _ in 0..8 {
                let newbit = ((state >> 7) & 1) ^ ((state >> 5) & 1) ^ ((state >> 3) & 1) ^ (state & 1);
                byte = (byte << 1) | (state & 1);
                state = (state >> 1) | (newbit << 7);
            }
            *slot = byte;
        }

        noise
    })
}

/// Descrambles `data` in place. The LFSR always restarts from its initial
/// state, so this is safe to call independently on each VCDU's 1020-byte
/// data+checksum region.
pub fn descramble(data: &mut [u8])
{
    let noise = noise_table();
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= noise[i % NOISE_PERIOD];
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn descramble_is_an_involution()
    {
        let mut data = vec![0xAAu8; 1020];
        let original = data.clone();
        descramble(&mut data);
        assert_ne!(data, original);
        descramble(&mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn noise_table_is_not_all_zero()
    {
        assert!(noise_table().iter().any(|&b| b != 0));
    }
}
