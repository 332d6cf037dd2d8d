//! # vp8-recon-core
//!
//! VP8 重建核心的基础设施: 统一错误类型, 像素平面与区域视图, 固定尺寸网格.

pub mod error;
pub mod grid;
pub mod plane;

// 重导出常用类型
pub use error::{ReconError, ReconResult};
pub use grid::Grid;
pub use plane::{Plane, PlaneRegion, SUBBLOCK_SIZE};
