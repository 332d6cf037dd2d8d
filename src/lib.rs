//! # vp8-recon
//!
//! 纯 Rust 实现的 VP8 关键帧重建阶段, 与 libvpx 逐位一致.
//!
//! - **反变换**: 4x4 反 DCT, 4x4 反 Walsh-Hadamard
//! - **宏块重建**: 帧内预测与残差叠加的顺序编排 (B_PRED 交错, Y2 先行)
//! - **帧驱动**: 按光栅顺序重建整帧, 可选亮度/色度并行
//!
//! # 快速开始
//!
//! ```rust
//! use vp8_recon::codec::decoders::vp8::transform::idct_residual;
//!
//! let mut coeffs = [0i16; 16];
//! coeffs[0] = 80;
//! assert_eq!(idct_residual(&coeffs), [10; 16]);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `vp8-recon-core` | 错误类型, 定长网格, 像素平面 |
//! | `vp8-recon-codec` | VP8 反变换与宏块重建 |

/// 核心类型与工具
pub use vp8_recon_core as core;

/// VP8 反变换与宏块重建
pub use vp8_recon_codec as codec;

/// 获取版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
