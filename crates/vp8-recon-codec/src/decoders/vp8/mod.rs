//! VP8 帧内重建 (关键帧反变换阶段)
//!
//! 将熵解码得到的系数块反变换为空间域残差, 并与帧内预测样本合成重建宏块.
//! 全部运算为整数定点, 与 libvpx / FFmpeg 逐位一致.
//!
//! ## 模块结构
//!
//! - `transform`: 4x4 反 DCT 与 4x4 反 WHT 核心
//! - `block`: 系数块与变体 (YWithoutY2 / YWithY2 / Y2 / Uv)
//! - `predict`: 预测模式与 `IntraPredictor` 接口
//! - `macroblock`: 宏块头构造与宏块像素视图
//! - `reconstruct`: 宏块级预测与反变换编排
//! - `frame`: 帧缓冲与整帧重建驱动

mod block;
mod frame;
mod macroblock;
mod predict;
mod reconstruct;
pub mod transform;

pub use block::{BlockKind, CoefficientBlock};
pub use frame::{FrameBuffer, FrameReconstructor, ReconOptions, ReconStats};
pub use macroblock::{
    LumaPrediction, MB_CHROMA_SIZE, MB_LUMA_SIZE, MacroblockCoefficients, MacroblockHeader,
    MacroblockRaster, RawBlock,
};
pub use predict::{IntraPredictor, MbMode, PrefilledPredictor, SubblockMode};
pub use reconstruct::MacroblockReport;
