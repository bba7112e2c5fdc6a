//! GF(2^8) arithmetic used by the Reed-Solomon decoder.
//!
//! The field is generated by the CCSDS polynomial `x^8 + x^7 + x^2 + x + 1`
//! (`0x187`). Tables are computed once, lazily, and shared process-wide.
use std::sync::OnceLock;

/// Generator polynomial for the field, `x^8 + x^7 + x^2 + x + 1`.
pub const GEN_POLY: u32 = 0x187;

/// Degree-`ROOT_SKIP` root spacing used by the CCSDS dual-basis ("gap root")
/// mapping.
pub const ROOT_SKIP: usize = 11;

/// Precomputed log/antilog tables for GF(256).
pub struct Tables
{
    /// `alpha[i] = generator^i`, with `alpha[255] == 0` by convention
    /// (mirrors the reference decoder, never read in that form since `gfpow`
    /// only indexes `alpha` with exponents already reduced mod 255).
    pub alpha: [u8; 256],
    /// `log[alpha[i]] == i` for every nonzero field element; `log[0]` is
    /// never read by the Reed-Solomon decoder and is left at `0`.
    pub log: [u8; 256],
    /// Dual-basis table: `gaproot[x.pow(ROOT_SKIP)] = x` for `x` in
    /// `1..=255`; `gaproot[0] == 0` and is likewise never read.
    pub gaproot: [u8; 255]
}

static TABLES: OnceLock<Tables> = OnceLock::new();

/// Returns the process-wide GF(256) tables, computing them on first use.
pub fn tables() -> &'static Tables
{
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> Tables
{
    let mut alpha = [0u8; 256];
    let mut log = [0u8; 256];

    alpha[0] = 1;
    for i in 1..255usize {
        let mut tmp = (alpha[i - 1] as u32) << 1;
        if tmp > 255 {
            tmp ^= GEN_POLY;
        }
        alpha[i] = tmp as u8;
        log[tmp as usize] = i as u8;
    }
    alpha[255] = 0;

    let mut gaproot = [0u8; 255];
    for i in 0..255u32 {
        let idx = gfpow_raw(&alpha, &log, i as u8, ROOT_SKIP as u32);
        gaproot[idx as usize] = i as u8;
    }

    Tables { alpha, log, gaproot }
}

fn gfpow_raw(alpha: &[u8; 256], log: &[u8; 256], x: u8, exp: u32) -> u8
{
    if x == 0 {
        return 0;
    }
    alpha[(log[x as usize] as u32 * exp % 255) as usize]
}

/// Multiply two field elements.
pub fn gfmul(x: u8, y: u8) -> u8
{
    if x == 0 || y == 0 {
        return 0;
    }
    let t = tables();
    t.alpha[((t.log[x as usize] as u32 + t.log[y as usize] as u32) % 255) as usize]
}

/// Divide `x` by `y`.
pub fn gfdiv(x: u8, y: u8) -> u8
{
    if x == 0 || y == 0 {
        return 0;
    }
    let t = tables();
    let lx = t.log[x as usize] as i32;
    let ly = t.log[y as usize] as i32;
    t.alpha[((lx - ly + 255) % 255) as usize]
}

/// Raise a field element to an integer power.
pub fn gfpow(x: u8, exp: u32) -> u8
{
    if x == 0 {
        return 0;
    }
    let t = tables();
    t.alpha[(t.log[x as usize] as u32 * exp % 255) as usize]
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn mul_div_are_inverses()
    {
        for x in 1..=255u8 {
            for y in 1..=255u8 {
                assert_eq!(gfdiv(gfmul(x, y), y), x);
            }
        }
    }

    #[test]
    fn mul_by_zero_is_zero()
    {
        assert_eq!(gfmul(0, 42), 0);
        assert_eq!(gfmul(42, 0), 0);
    }

    #[test]
    fn pow_one_is_identity()
    {
        for x in 1..=255u8 {
            assert_eq!(gfpow(x, 1), x);
        }
    }

    #[test]
    fn pow_distributes_over_mul_exponents()
    {
        for x in [2u8, 3, 17, 200] {
            assert_eq!(gfpow(x, 4), gfmul(gfmul(x, x), gfmul(x, x)));
        }
    }

    #[test]
    fn gaproot_never_indexed_at_zero_by_rs_decoder()
    {
        // gfdiv(1, i) is nonzero for every nonzero i, so the Reed-Solomon
        // Chien search never reads gaproot[0].
        let t = tables();
        for i in 1..=255u8 {
            let idx = gfdiv(1, i);
            assert_ne!(idx, 0);
            let _ = t.gaproot[idx as usize];
        }
    }
}
