//! 宏块头与宏块像素视图.
//!
//! `MacroblockCoefficients` 是熵解码器交付的原始数据; `MacroblockHeader::new`
//! 根据亮度预测粒度与 Y2 编码状态为每个系数块确定变体.

use vp8_recon_core::{Grid, PlaneRegion, ReconError, ReconResult};

use super::block::{BlockKind, CoefficientBlock};
use super::predict::{MbMode, SubblockMode};

/// 宏块亮度边长
pub const MB_LUMA_SIZE: usize = 16;
/// 宏块色度边长 (4:2:0)
pub const MB_CHROMA_SIZE: usize = 8;

/// 熵解码输出的单个块: 系数与 coded 标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawBlock {
    /// 16 个系数, 线性下标
    pub coefficients: [i16; 16],
    /// 至少存在一个非零系数
    pub coded: bool,
}

impl RawBlock {
    /// 由系数构造, coded 由是否存在非零系数推导
    pub fn from_coefficients(coefficients: [i16; 16]) -> Self {
        Self {
            coefficients,
            coded: coefficients.iter().any(|&c| c != 0),
        }
    }
}

/// 熵解码器交付的一个宏块的全部系数
#[derive(Debug, Clone, Default)]
pub struct MacroblockCoefficients {
    /// 16 个亮度块 (4x4 网格)
    pub y: Grid<RawBlock, 4, 4>,
    /// Y2 块, 仅非 B_PRED 宏块存在
    pub y2: Option<RawBlock>,
    /// U 分量 4 个块
    pub u: Grid<RawBlock, 2, 2>,
    /// V 分量 4 个块
    pub v: Grid<RawBlock, 2, 2>,
}

/// 亮度预测方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LumaPrediction {
    /// 整个 16x16 区域使用同一模式
    Macroblock(MbMode),
    /// B_PRED: 16 个子块各自的模式
    PerBlock(Grid<SubblockMode, 4, 4>),
}

impl LumaPrediction {
    pub fn is_per_block(&self) -> bool {
        matches!(self, Self::PerBlock(_))
    }
}

/// 关键帧宏块头
#[derive(Debug, Clone)]
pub struct MacroblockHeader {
    pub(super) y: Grid<CoefficientBlock, 4, 4>,
    pub(super) y2: Option<CoefficientBlock>,
    pub(super) u: Grid<CoefficientBlock, 2, 2>,
    pub(super) v: Grid<CoefficientBlock, 2, 2>,
    pub(super) luma: LumaPrediction,
    pub(super) chroma_mode: MbMode,
    pub(super) has_nonzero: bool,
}

impl MacroblockHeader {
    /// 由熵解码结果构造宏块头
    ///
    /// 变体分配:
    /// - B_PRED: 亮度块为 `YWithoutY2`, 不允许携带 Y2 块
    /// - 整块预测且 Y2 已编码: 亮度块为 `YWithY2`, DC 待 WHT 修补
    /// - 整块预测且 Y2 未编码: 亮度块为 `YWithoutY2`, DC 槽位即最终值
    pub fn new(
        coefficients: MacroblockCoefficients,
        luma: LumaPrediction,
        chroma_mode: MbMode,
        has_nonzero: bool,
    ) -> ReconResult<Self> {
        let (y_kind, y2) = match (&luma, coefficients.y2) {
            (LumaPrediction::PerBlock(_), Some(_)) => {
                return Err(ReconError::Precondition(
                    "B_PRED 宏块不应携带 Y2 块".into(),
                ));
            }
            (LumaPrediction::PerBlock(_), None) => (BlockKind::YWithoutY2, None),
            (LumaPrediction::Macroblock(_), None) => {
                return Err(ReconError::Precondition(
                    "整块亮度预测的宏块缺少 Y2 块".into(),
                ));
            }
            (LumaPrediction::Macroblock(_), Some(raw)) => {
                let y_kind = if raw.coded {
                    BlockKind::YWithY2
                } else {
                    BlockKind::YWithoutY2
                };
                (
                    y_kind,
                    Some(CoefficientBlock::new(
                        BlockKind::Y2,
                        raw.coefficients,
                        raw.coded,
                    )),
                )
            }
        };

        let convert = |kind: BlockKind| {
            move |raw: &RawBlock| CoefficientBlock::new(kind, raw.coefficients, raw.coded)
        };

        Ok(Self {
            y: coefficients.y.map(convert(y_kind)),
            y2,
            u: coefficients.u.map(convert(BlockKind::Uv)),
            v: coefficients.v.map(convert(BlockKind::Uv)),
            luma,
            chroma_mode,
            has_nonzero,
        })
    }

    /// 16 个亮度块 (原始系数, 重建过程不会修改)
    pub fn y_blocks(&self) -> &Grid<CoefficientBlock, 4, 4> {
        &self.y
    }

    pub fn y2_block(&self) -> Option<&CoefficientBlock> {
        self.y2.as_ref()
    }

    pub fn u_blocks(&self) -> &Grid<CoefficientBlock, 2, 2> {
        &self.u
    }

    pub fn v_blocks(&self) -> &Grid<CoefficientBlock, 2, 2> {
        &self.v
    }

    pub fn luma_prediction(&self) -> &LumaPrediction {
        &self.luma
    }

    pub fn uv_prediction_mode(&self) -> MbMode {
        self.chroma_mode
    }

    /// 宏块是否存在任意非零系数 (为 false 时跳过全部反变换)
    pub fn has_nonzero(&self) -> bool {
        self.has_nonzero
    }
}

/// 宏块在三个平面上的可写视图
#[derive(Debug)]
pub struct MacroblockRaster<'a> {
    pub y: PlaneRegion<'a>,
    pub u: PlaneRegion<'a>,
    pub v: PlaneRegion<'a>,
}

impl<'a> MacroblockRaster<'a> {
    /// 组合三个分量视图, 校验 16x16 / 8x8 尺寸
    pub fn new(y: PlaneRegion<'a>, u: PlaneRegion<'a>, v: PlaneRegion<'a>) -> ReconResult<Self> {
        check_region(&y, MB_LUMA_SIZE)?;
        check_region(&u, MB_CHROMA_SIZE)?;
        check_region(&v, MB_CHROMA_SIZE)?;
        Ok(Self { y, u, v })
    }
}

pub(super) fn check_region(region: &PlaneRegion<'_>, size: usize) -> ReconResult<()> {
    if region.width() != size || region.height() != size {
        return Err(ReconError::RegionMismatch {
            expected: (size, size),
            actual: (region.width(), region.height()),
        });
    }
    Ok(())
}
