//! 系数块及其变体.
//!
//! 同一个 `CoefficientBlock` 类型承载全部四种块, 由 `BlockKind` 标记 DC 的来源.
//! WHT 与 IDCT 的前置条件在变体边界上检查.

use vp8_recon_core::{Grid, PlaneRegion, ReconError, ReconResult, SUBBLOCK_SIZE};

use super::transform;

/// 系数块变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// 亮度块, DC 即为解码值
    YWithoutY2,
    /// 亮度块, DC 槽位是占位符, 需由 Y2 块的 WHT 输出修补
    YWithY2,
    /// Y2 (DC 聚合) 块, 每宏块一个
    Y2,
    /// 色度块
    Uv,
}

impl BlockKind {
    /// DC 是否已确定, 可以直接执行 IDCT
    pub fn has_final_dc(self) -> bool {
        matches!(self, Self::YWithoutY2 | Self::Uv)
    }
}

/// 4x4 系数块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoefficientBlock {
    kind: BlockKind,
    coded: bool,
    coefficients: [i16; 16],
}

impl CoefficientBlock {
    /// 由熵解码结果构造, `coded` 表示至少存在一个非零系数
    pub fn new(kind: BlockKind, coefficients: [i16; 16], coded: bool) -> Self {
        Self {
            kind,
            coded,
            coefficients,
        }
    }

    /// 由系数构造, `coded` 根据是否存在非零系数推导
    pub fn from_coefficients(kind: BlockKind, coefficients: [i16; 16]) -> Self {
        let coded = coefficients.iter().any(|&c| c != 0);
        Self::new(kind, coefficients, coded)
    }

    /// 全零未编码块
    pub fn uncoded(kind: BlockKind) -> Self {
        Self::new(kind, [0; 16], false)
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn coded(&self) -> bool {
        self.coded
    }

    pub fn coefficients(&self) -> &[i16; 16] {
        &self.coefficients
    }

    pub fn dc(&self) -> i16 {
        self.coefficients[0]
    }

    /// 用 WHT 输出修补 DC 槽位, 块随之变为 `YWithoutY2`
    ///
    /// 只修改下标 0, AC 系数保持不变. 非零 DC 会把块标记为已编码.
    pub fn set_dc_coefficient(&mut self, value: i16) -> ReconResult<()> {
        if self.kind != BlockKind::YWithY2 {
            return Err(ReconError::Precondition(format!(
                "只有 YWithY2 块可以修补 DC, 当前为 {:?}",
                self.kind
            )));
        }
        self.coefficients[0] = value;
        self.kind = BlockKind::YWithoutY2;
        self.coded |= value != 0;
        Ok(())
    }

    /// 反 WHT: 将本 Y2 块展开为 16 个亮度块的 DC
    ///
    /// 必须在任何亮度 IDCT 之前对整个网格完成. 先校验全部目标块再写入,
    /// 失败时 `output` 保持不变.
    pub fn walsh_transform(&self, output: &mut Grid<CoefficientBlock, 4, 4>) -> ReconResult<()> {
        if self.kind != BlockKind::Y2 {
            return Err(ReconError::Precondition(format!(
                "WHT 只能作用于 Y2 块, 当前为 {:?}",
                self.kind
            )));
        }
        if !self.coded {
            return Err(ReconError::Precondition(
                "WHT 输入 Y2 块未编码, 调用方应直接走 IDCT 路径".into(),
            ));
        }
        if let Some((column, row, block)) = output
            .iter_ij()
            .find(|(_, _, block)| block.kind != BlockKind::YWithY2)
        {
            return Err(ReconError::Precondition(format!(
                "WHT 目标块 ({}, {}) 类型为 {:?}, 期望 YWithY2",
                column, row, block.kind
            )));
        }

        let dc = transform::iwht_4x4(&self.coefficients);
        for (column, row, block) in output.iter_ij_mut() {
            block.set_dc_coefficient(dc[row * 4 + column])?;
        }
        Ok(())
    }

    /// 反 DCT 并叠加到 4x4 区域
    ///
    /// 未修补的 `YWithY2` 块和 Y2 块不能执行. 未编码块不改动像素.
    pub fn idct(&self, output: &mut PlaneRegion<'_>) -> ReconResult<()> {
        if !self.kind.has_final_dc() {
            return Err(ReconError::Precondition(format!(
                "{:?} 块的 DC 尚未确定, 不能执行 IDCT",
                self.kind
            )));
        }
        if output.width() != SUBBLOCK_SIZE || output.height() != SUBBLOCK_SIZE {
            return Err(ReconError::RegionMismatch {
                expected: (SUBBLOCK_SIZE, SUBBLOCK_SIZE),
                actual: (output.width(), output.height()),
            });
        }
        if !self.coded {
            return Ok(());
        }
        transform::idct_add(&self.coefficients, output)
    }
}
