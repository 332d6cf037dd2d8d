//! 帧内预测模式与预测器接口.
//!
//! 预测样本的生成由外部协作者实现 (`IntraPredictor`), 重建流程只负责调用顺序:
//! 预测必须先于残差叠加写入目标子块.

use vp8_recon_core::{PlaneRegion, ReconResult};

/// 整块预测模式 (16x16 亮度或 8x8 色度)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MbMode {
    /// DC_PRED: 邻居平均值
    #[default]
    Dc,
    /// V_PRED: 复制上方行
    Vertical,
    /// H_PRED: 复制左侧列
    Horizontal,
    /// TM_PRED: TrueMotion
    TrueMotion,
}

/// 4x4 亮度子块预测模式 (B_PRED 宏块)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubblockMode {
    /// B_DC_PRED
    #[default]
    Dc,
    /// B_TM_PRED
    TrueMotion,
    /// B_VE_PRED
    Vertical,
    /// B_HE_PRED
    Horizontal,
    /// B_LD_PRED
    LeftDown,
    /// B_RD_PRED
    RightDown,
    /// B_VR_PRED
    VerticalRight,
    /// B_VL_PRED
    VerticalLeft,
    /// B_HD_PRED
    HorizontalDown,
    /// B_HU_PRED
    HorizontalUp,
}

/// 帧内预测器
///
/// 实现方写入整个 `region`, 可通过 `above`/`left`/`above_left` 读取已重建的邻居.
pub trait IntraPredictor {
    /// 预测 16x16 亮度区域
    fn predict_luma(&self, region: &mut PlaneRegion<'_>, mode: MbMode) -> ReconResult<()>;

    /// 预测单个 4x4 亮度子块
    fn predict_subblock(&self, region: &mut PlaneRegion<'_>, mode: SubblockMode)
    -> ReconResult<()>;

    /// 预测 8x8 色度区域
    fn predict_chroma(&self, region: &mut PlaneRegion<'_>, mode: MbMode) -> ReconResult<()>;
}

/// 预测样本已由调用方写入缓冲区时使用, 不改动任何像素
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefilledPredictor;

impl IntraPredictor for PrefilledPredictor {
    fn predict_luma(&self, _region: &mut PlaneRegion<'_>, _mode: MbMode) -> ReconResult<()> {
        Ok(())
    }

    fn predict_subblock(
        &self,
        _region: &mut PlaneRegion<'_>,
        _mode: SubblockMode,
    ) -> ReconResult<()> {
        Ok(())
    }

    fn predict_chroma(&self, _region: &mut PlaneRegion<'_>, _mode: MbMode) -> ReconResult<()> {
        Ok(())
    }
}
