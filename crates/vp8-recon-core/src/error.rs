//! 统一错误类型定义.
//!
//! 重建核心中几乎所有失败都是调用契约违例 (程序缺陷), 而不是可恢复的运行时错误:
//! 码流合法性由上游熵解码负责校验. `is_defect` 用于区分两类错误.

use thiserror::Error;

/// 重建核心统一错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconError {
    /// 前置条件违例 (对未修补 DC 的块执行 IDCT, 对未编码 Y2 块执行 WHT 等)
    #[error("前置条件违例: {0}")]
    Precondition(String),

    /// 像素区域尺寸与变换块不匹配
    #[error("像素区域尺寸不匹配: 期望 {expected:?}, 实际 {actual:?}")]
    RegionMismatch {
        /// 期望尺寸 (宽, 高)
        expected: (usize, usize),
        /// 实际尺寸 (宽, 高)
        actual: (usize, usize),
    },

    /// 请求的区域超出平面范围
    #[error("区域越界: {0}")]
    OutOfBounds(String),

    /// 无效参数 (帧尺寸, 宏块头数量等)
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 内部错误 (线程池创建失败等)
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ReconError {
    /// 是否属于程序缺陷 (契约违例)
    ///
    /// 只有 `InvalidArgument` 来自调用方可控的输入, 其余均应作为缺陷上报.
    pub fn is_defect(&self) -> bool {
        !matches!(self, Self::InvalidArgument(_))
    }
}

/// 重建核心统一 Result 类型
pub type ReconResult<T> = Result<T, ReconError>;
