//! Dequantization and inverse DCT for a single 8x8 AVHRR JPEG block.

const Q_SHIFT: i32 = 14;
const Q_1SQRT2: i32 = 0x2d41; // 1/sqrt(2), Q14

/// Standard 50%-quality JPEG luminance quantization table.
#[rustfmt::skip]
const QUANT: [[u8; 8]; 8] = [
    [16, 11, 10, 16, 24, 40, 51, 61],
    [12, 12, 14, 19, 26, 58, 60, 55],
    [14, 13, 16, 24, 40, 57, 69, 56],
    [14, 17, 22, 29, 51, 87, 80, 62],
    [18, 22, 37, 56, 68, 109, 103, 77],
    [24, 35, 55, 64, 81, 104, 113, 92],
    [49, 64, 78, 87, 103, 121, 120, 101],
    [72, 92, 95, 98, 112, 100, 103, 99],
];

/// Un-zigzag permutation for the 8x8 coefficient block.
#[rustfmt::skip]
const ZIGZAG_LUT: [u8; 64] = [
    0,  1,  8,  16, 9,  2,  3,  10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Q14 fixed-point cosine table.
#[rustfmt::skip]
const COS_LUT: [[i16; 8]; 8] = [
    [0x4000, 0x3ec5, 0x3b21, 0x3537, 0x2d41, 0x238e, 0x187e, 0x0c7c],
    [0x4000i16, 0x3537, 0x187e, 0xf384u16 as i16, 0xd2bfu16 as i16, 0xc13bu16 as i16, 0xc4dfu16 as i16, 0xdc72u16 as i16],
    [0x4000, 0x238e, 0xe782u16 as i16, 0xc13bu16 as i16, 0xd2bfu16 as i16, 0x0c7c, 0x3b21, 0x3537],
    [0x4000, 0x0c7c, 0xc4dfu16 as i16, 0xdc72u16 as i16, 0x2d41, 0x3537, 0xe782u16 as i16, 0xc13bu16 as i16],
    [0x4000, 0xf384u16 as i16, 0xc4dfu16 as i16, 0x238e, 0x2d41, 0xcac9u16 as i16, 0xe782u16 as i16, 0x3ec5],
    [0x4000, 0xdc72u16 as i16, 0xe782u16 as i16, 0x3ec5, 0xd2bfu16 as i16, 0xf384u16 as i16, 0x3b21, 0xcac9u16 as i16],
    [0x4000, 0xcac9u16 as i16, 0x187e, 0x0c7c, 0xd2bfu16 as i16, 0x3ec5, 0xc4dfu16 as i16, 0x238e],
    [0x4000, 0xc13bu16 as i16, 0x3b21, 0xcac9u16 as i16, 0x2d41, 0xdc72u16 as i16, 0x187e, 0xf384u16 as i16],
];

fn qmul(x: i32, y: i32) -> i16
{
    ((x * y) >> Q_SHIFT) as i16
}

fn quantization(quality: i32, x: usize, y: usize) -> i32
{
    let quality = quality.max(1);
    let compr_ratio = if quality < 50 { 5000 / quality } else { 200 - 2 * quality };
    (((QUANT[x][y] as i32) * compr_ratio / 50 + 1) / 2).max(1)
}

fn unzigzag(block: &mut [[i16; 8]; 8])
{
    let mut tmp = [0i16; 64];
    for i in 0..8 {
        for j in 0..8 {
            tmp[ZIGZAG_LUT[i * 8 + j] as usize] = block[i][j];
        }
    }
    for i in 0..8 {
        for j in 0..8 {
            block[i][j] = tmp[i * 8 + j];
        }
    }
}

fn dequantize(block: &mut [[i16; 8]; 8], quality: i32)
{
    for i in 0..8 {
        for j in 0..8 {
            block[i][j] = (block[i][j] as i32 * quantization(quality, i, j)) as i16;
        }
    }
}

fn inverse_dct(dst: &mut [[u8; 8]; 8], src: &[[i16; 8]; 8])
{
    let mut work = [[0i32; 8]; 8];

    for i in 0..8 {
        let alpha: i32 = if i != 0 { 0x4000 } else { Q_1SQRT2 };
        for j in 0..8 {
            for u in 0..8 {
                work[j][u] += qmul(alpha, COS_LUT[u][i] as i32) as i32 * src[j][i] as i32;
            }
        }
    }

    for j in 0..8 {
        let mut row = [0i32; 8];

        for i in 0..8 {
            let alpha: i32 = if i != 0 { 0x4000 } else { Q_1SQRT2 };
            for v in 0..8 {
                row[v] += ((work[i][j] as i64 * qmul(alpha, COS_LUT[v][i] as i32) as i64) >> Q_SHIFT) as i32;
            }
        }

        for i in 0..8 {
            let sample = ((row[i] / 4) >> Q_SHIFT) + 128;
            dst[i][j] = sample.clamp(0, 255) as u8;
        }
    }
}

/// Dequantizes and inverse-transforms one Huffman-decoded 8x8 coefficient
/// block into 8-bit pixel samples.
///
/// `q` is the quality factor used by the encoder. A quality of zero can
/// occur when the onboard encoder's packet counter wraps; in that case the
/// last known-good quality factor is reused so the strip still decodes to
/// something displayable instead of being dropped outright.
pub fn jpeg_decode(dst: &mut [[u8; 8]; 8], src: &mut [[i16; 8]; 8], q: u8, last_q: &mut u8)
{
    let q = if q > 0 { q } else { *last_q };
    *last_q = q;

    unzigzag(src);
    dequantize(src, q as i32);
    inverse_dct(dst, src);
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn all_zero_block_decodes_to_mid_gray()
    {
        let mut src = [[0i16; 8]; 8];
        let mut dst = [[0u8; 8]; 8];
        let mut last_q = 0u8;
        jpeg_decode(&mut dst, &mut src, 90, &mut last_q);
        for row in dst.iter() {
            for &px in row.iter() {
                assert_eq!(px, 128);
            }
        }
    }

    #[test]
    fn zero_quality_reuses_last_known_quality()
    {
        let mut last_q = 0u8;
        let mut src1 = [[0i16; 8]; 8];
        let mut dst1 = [[0u8; 8]; 8];
        jpeg_decode(&mut dst1, &mut src1, 77, &mut last_q);
        assert_eq!(last_q, 77);

        let mut src2 = [[0i16; 8]; 8];
        let mut dst2 = [[0u8; 8]; 8];
        jpeg_decode(&mut dst2, &mut src2, 0, &mut last_q);
        assert_eq!(last_q, 77);
    }

    #[test]
    fn quantization_never_returns_zero()
    {
        for q in 0..=100 {
            for x in 0..8 {
                for y in 0..8 {
                    assert!(quantization(q, x, y) >= 1);
                }
            }
        }
    }
}
