//! VP8 4x4 反变换核心 (反 DCT 与反 Walsh-Hadamard).
//!
//! 所有运算均为整数定点, 必须与 libvpx / FFmpeg `vp8_idct_add_c` 逐位一致.
//! 中间结果保存在 16-bit 存储中 (与参考实现的 `int16_t tmp[16]` 相同).
//!
//! 系数布局: 线性下标 `i`, 蝶形运算读取 `i, i+4, i+8, i+12` 一组 (即第 `i` 列).

use vp8_recon_core::{PlaneRegion, ReconResult};

/// cos(π/8)·√2 - 1, 16-bit 定点
const COS_PI8_SQRT2_MINUS1: i32 = 20091;
/// sin(π/8)·√2, 16-bit 定点
const SIN_PI8_SQRT2: i32 = 35468;

/// x · cos(π/8)·√2
///
/// 输入限定为 16-bit, 乘积在 i32 内不会溢出.
#[inline]
pub fn mul_20091(x: i16) -> i32 {
    let x = i32::from(x);
    ((x * COS_PI8_SQRT2_MINUS1) >> 16) + x
}

/// x · sin(π/8)·√2
#[inline]
pub fn mul_35468(x: i16) -> i32 {
    (i32::from(x) * SIN_PI8_SQRT2) >> 16
}

/// 4x4 反 Walsh-Hadamard 变换
///
/// 输入为 Y2 块的 16 个系数, 输出按 `行 * 4 + 列` 排列, 第 k 个值是
/// 宏块内第 (k % 4, k / 4) 个亮度子块的 DC 系数.
pub fn iwht_4x4(coeffs: &[i16; 16]) -> [i16; 16] {
    let c = |idx: usize| i32::from(coeffs[idx]);
    let mut intermediate = [0i16; 16];

    // 第一遍: 按列
    for i in 0..4 {
        let a1 = c(i) + c(i + 12);
        let b1 = c(i + 4) + c(i + 8);
        let c1 = c(i + 4) - c(i + 8);
        let d1 = c(i) - c(i + 12);

        intermediate[i] = (a1 + b1) as i16;
        intermediate[i + 4] = (c1 + d1) as i16;
        intermediate[i + 8] = (a1 - b1) as i16;
        intermediate[i + 12] = (d1 - c1) as i16;
    }

    // 第二遍: 按行, (x + 3) >> 3 舍入
    let mut dc = [0i16; 16];
    for (row, out) in intermediate.chunks_exact(4).zip(dc.chunks_exact_mut(4)) {
        let m = |idx: usize| i32::from(row[idx]);
        let a1 = m(0) + m(3);
        let b1 = m(1) + m(2);
        let c1 = m(1) - m(2);
        let d1 = m(0) - m(3);

        out[0] = ((a1 + b1 + 3) >> 3) as i16;
        out[1] = ((c1 + d1 + 3) >> 3) as i16;
        out[2] = ((a1 - b1 + 3) >> 3) as i16;
        out[3] = ((d1 - c1 + 3) >> 3) as i16;
    }
    dc
}

/// 4x4 反 DCT, 返回行优先的空间域残差
pub fn idct_residual(coeffs: &[i16; 16]) -> [i32; 16] {
    let c = |idx: usize| i32::from(coeffs[idx]);
    let mut intermediate = [0i16; 16];

    // 第一遍: 第 i 列的一维变换写入中间结果第 i 行 (转置)
    for i in 0..4 {
        let t0 = c(i) + c(i + 8);
        let t1 = c(i) - c(i + 8);
        let t2 = mul_35468(coeffs[i + 4]) - mul_20091(coeffs[i + 12]);
        let t3 = mul_20091(coeffs[i + 4]) + mul_35468(coeffs[i + 12]);

        intermediate[i * 4] = (t0 + t3) as i16;
        intermediate[i * 4 + 1] = (t1 + t2) as i16;
        intermediate[i * 4 + 2] = (t1 - t2) as i16;
        intermediate[i * 4 + 3] = (t0 - t3) as i16;
    }

    // 第二遍: 同样按 i, i+4, i+8, i+12 读取, 输出第 i 行, (x + 4) >> 3 舍入
    let m = |idx: usize| i32::from(intermediate[idx]);
    let mut residual = [0i32; 16];
    for i in 0..4 {
        let t0 = m(i) + m(i + 8);
        let t1 = m(i) - m(i + 8);
        let t2 = mul_35468(intermediate[i + 4]) - mul_20091(intermediate[i + 12]);
        let t3 = mul_20091(intermediate[i + 4]) + mul_35468(intermediate[i + 12]);

        residual[i * 4] = (t0 + t3 + 4) >> 3;
        residual[i * 4 + 1] = (t1 + t2 + 4) >> 3;
        residual[i * 4 + 2] = (t1 - t2 + 4) >> 3;
        residual[i * 4 + 3] = (t0 - t3 + 4) >> 3;
    }
    residual
}

/// 反 DCT 并饱和叠加到 4x4 区域 (区域中须已是预测样本)
pub fn idct_add(coeffs: &[i16; 16], output: &mut PlaneRegion<'_>) -> ReconResult<()> {
    output.add_residual(&idct_residual(coeffs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_定点乘法常量() {
        assert_eq!(mul_20091(0), 0);
        assert_eq!(mul_35468(0), 0);
        // 16-bit 输入的两端
        assert_eq!(mul_20091(i16::MAX), 42812);
        assert_eq!(mul_35468(i16::MAX), 17733);
        assert_eq!(mul_20091(i16::MIN), -42814);
        assert_eq!(mul_35468(i16::MIN), -17734);
        // 算术右移向负无穷取整
        assert_eq!(mul_35468(-1), -1);
        assert_eq!(mul_20091(-1), -2);
        assert_eq!(mul_35468(100), 54);
        assert_eq!(mul_20091(100), 130);
    }

    #[test]
    fn test_wht_全零() {
        assert_eq!(iwht_4x4(&[0; 16]), [0; 16]);
    }

    #[test]
    fn test_wht_仅dc() {
        let mut coeffs = [0i16; 16];
        coeffs[0] = 80;
        assert_eq!(iwht_4x4(&coeffs), [10; 16]);
        coeffs[0] = -80;
        // (-80 + 3) >> 3 = -10 (向负无穷)
        assert_eq!(iwht_4x4(&coeffs), [-10; 16]);
    }

    #[test]
    fn test_idct_全零() {
        assert_eq!(idct_residual(&[0; 16]), [0; 16]);
    }

    #[test]
    fn test_idct_仅dc为平坦残差() {
        for (dc, expected) in [(8i16, 1i32), (-8, -1), (1000, 125), (1, 0), (4, 1), (-5, -1)] {
            let mut coeffs = [0i16; 16];
            coeffs[0] = dc;
            assert_eq!(idct_residual(&coeffs), [expected; 16], "dc={dc}");
            assert_eq!(expected, (i32::from(dc) + 4) >> 3);
        }
    }

    // 以下参考向量由 libvpx `vp8_short_idct4x4llm_c` / `vp8_short_inv_walsh4x4_c`
    // 的独立移植生成, 并与 image-webp 的 `idct4x4` / `iwht4x4` 交叉核对

    #[test]
    fn test_idct_参考向量() {
        let coeffs: [i16; 16] = [100, -20, 7, 0, 15, -3, 0, 1, -9, 4, 0, 0, 2, 0, 0, -1];
        assert_eq!(
            idct_residual(&coeffs),
            [11, 12, 14, 18, 11, 11, 16, 19, 10, 11, 13, 18, 8, 7, 9, 12]
        );

        let coeffs: [i16; 16] = [-300, 40, 0, -12, 25, 0, 6, 0, 0, -8, 0, 0, 3, 0, 0, 0];
        assert_eq!(
            idct_residual(&coeffs),
            [
                -28, -30, -38, -37, -29, -31, -42, -43, -32, -33, -43, -46, -38, -37, -45, -47
            ]
        );
    }

    #[test]
    fn test_idct_垂直频率只随行变化() {
        let mut coeffs = [0i16; 16];
        coeffs[4] = 16;
        assert_eq!(
            idct_residual(&coeffs),
            [3, 3, 3, 3, 1, 1, 1, 1, -1, -1, -1, -1, -2, -2, -2, -2]
        );
    }

    #[test]
    fn test_wht_参考向量() {
        let coeffs: [i16; 16] = [200, -40, 12, 0, 30, 8, 0, -4, -16, 0, 2, 0, 6, 0, 0, 1];
        assert_eq!(
            iwht_4x4(&coeffs),
            [25, 22, 29, 34, 27, 25, 32, 36, 20, 16, 29, 31, 15, 10, 23, 26]
        );
    }

    #[test]
    fn test_idct_add_饱和叠加() {
        use vp8_recon_core::Plane;

        let mut plane = Plane::filled(4, 4, 250).unwrap();
        let mut coeffs = [0i16; 16];
        coeffs[0] = 100;
        idct_add(&coeffs, &mut plane.region_mut(0, 0, 4, 4).unwrap()).unwrap();
        // 残差 (100 + 4) >> 3 = 13, 250 + 13 饱和到 255
        assert!(plane.data().iter().all(|&p| p == 255));
    }

    /// 按参考解码器的布局实现: 第一遍按列写回原位, 第二遍按行
    fn reference_idct(input: &[i16; 16]) -> [i32; 16] {
        let mul1 = |x: i32| ((x * 20091) >> 16) + x;
        let mul2 = |x: i32| (x * 35468) >> 16;
        let mut tmp = [0i32; 16];
        for i in 0..4 {
            let ip = |k: usize| i32::from(input[k * 4 + i]);
            let a1 = ip(0) + ip(2);
            let b1 = ip(0) - ip(2);
            let c1 = mul2(ip(1)) - mul1(ip(3));
            let d1 = mul1(ip(1)) + mul2(ip(3));
            tmp[i] = i32::from((a1 + d1) as i16);
            tmp[4 + i] = i32::from((b1 + c1) as i16);
            tmp[8 + i] = i32::from((b1 - c1) as i16);
            tmp[12 + i] = i32::from((a1 - d1) as i16);
        }
        let mut out = [0i32; 16];
        for row in 0..4 {
            let t = &tmp[row * 4..row * 4 + 4];
            let a1 = t[0] + t[2];
            let b1 = t[0] - t[2];
            let c1 = mul2(t[1]) - mul1(t[3]);
            let d1 = mul1(t[1]) + mul2(t[3]);
            out[row * 4] = (a1 + d1 + 4) >> 3;
            out[row * 4 + 1] = (b1 + c1 + 4) >> 3;
            out[row * 4 + 2] = (b1 - c1 + 4) >> 3;
            out[row * 4 + 3] = (a1 - d1 + 4) >> 3;
        }
        out
    }

    #[test]
    fn test_idct_与参考布局一致() {
        let mut state = 0x1234_5678u32;
        for _ in 0..2000 {
            let mut coeffs = [0i16; 16];
            for c in coeffs.iter_mut() {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                *c = ((state >> 16) % 4096) as i16 - 2048;
            }
            assert_eq!(idct_residual(&coeffs), reference_idct(&coeffs), "{coeffs:?}");
        }
    }
}
