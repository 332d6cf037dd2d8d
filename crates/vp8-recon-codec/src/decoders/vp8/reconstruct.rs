//! 宏块级帧内预测与反变换编排.
//!
//! 顺序约束:
//! - 色度: 两个分量先整块预测, 再对已编码子块执行 IDCT.
//! - B_PRED 亮度: 逐子块 "预测 → IDCT" 交错进行, 后续子块的预测依赖已重建的邻居.
//! - 整块亮度: 先整块预测; Y2 已编码时对亮度块的副本做 WHT, 16 个 DC 全部修补后
//!   才开始 IDCT.

use log::trace;
use vp8_recon_core::{Grid, PlaneRegion, ReconResult};

use super::block::CoefficientBlock;
use super::macroblock::{
    LumaPrediction, MB_CHROMA_SIZE, MB_LUMA_SIZE, MacroblockHeader, MacroblockRaster,
    check_region,
};
use super::predict::IntraPredictor;

/// 单个宏块的重建统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacroblockReport {
    /// 实际叠加了残差的子块数 (未编码块不计)
    pub idct_blocks: usize,
    /// 是否执行了 WHT
    pub walsh_transformed: bool,
}

impl MacroblockReport {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            idct_blocks: self.idct_blocks + other.idct_blocks,
            walsh_transformed: self.walsh_transformed || other.walsh_transformed,
        }
    }
}

/// 对网格中每个块按光栅顺序执行 IDCT, 返回实际叠加残差的块数
fn idct_grid<const W: usize, const H: usize>(
    blocks: &Grid<CoefficientBlock, W, H>,
    region: &mut PlaneRegion<'_>,
) -> ReconResult<usize> {
    let mut applied = 0;
    blocks.try_for_each_ij(|column, row, block| -> ReconResult<()> {
        block.idct(&mut region.sub_block(column, row)?)?;
        applied += usize::from(block.coded());
        Ok(())
    })?;
    Ok(applied)
}

impl MacroblockHeader {
    /// 重建整个宏块: 色度在前, 亮度在后
    pub fn intra_predict_and_inverse_transform<P: IntraPredictor + ?Sized>(
        &self,
        raster: &mut MacroblockRaster<'_>,
        predictor: &P,
    ) -> ReconResult<MacroblockReport> {
        let chroma = self.reconstruct_chroma(&mut raster.u, &mut raster.v, predictor)?;
        let luma = self.reconstruct_luma(&mut raster.y, predictor)?;
        let report = chroma.merge(luma);
        trace!(
            "宏块重建: B_PRED={}, has_nonzero={}, WHT={}, IDCT 块数={}",
            self.luma.is_per_block(),
            self.has_nonzero,
            report.walsh_transformed,
            report.idct_blocks
        );
        Ok(report)
    }

    /// 重建两个色度分量
    ///
    /// 预测总是执行; 仅当 `has_nonzero` 时叠加残差.
    pub fn reconstruct_chroma<P: IntraPredictor + ?Sized>(
        &self,
        u: &mut PlaneRegion<'_>,
        v: &mut PlaneRegion<'_>,
        predictor: &P,
    ) -> ReconResult<MacroblockReport> {
        check_region(u, MB_CHROMA_SIZE)?;
        check_region(v, MB_CHROMA_SIZE)?;

        predictor.predict_chroma(u, self.chroma_mode)?;
        predictor.predict_chroma(v, self.chroma_mode)?;

        let mut report = MacroblockReport::default();
        if self.has_nonzero {
            report.idct_blocks += idct_grid(&self.u, u)?;
            report.idct_blocks += idct_grid(&self.v, v)?;
        }
        Ok(report)
    }

    /// 重建亮度分量
    pub fn reconstruct_luma<P: IntraPredictor + ?Sized>(
        &self,
        y: &mut PlaneRegion<'_>,
        predictor: &P,
    ) -> ReconResult<MacroblockReport> {
        check_region(y, MB_LUMA_SIZE)?;

        let mut report = MacroblockReport::default();
        match &self.luma {
            LumaPrediction::PerBlock(modes) => {
                // 预测与反变换逐子块交错
                for (column, row, block) in self.y.iter_ij() {
                    let mut sub = y.sub_block(column, row)?;
                    predictor.predict_subblock(&mut sub, *modes.at(column, row))?;
                    if self.has_nonzero {
                        block.idct(&mut sub)?;
                        report.idct_blocks += usize::from(block.coded());
                    }
                }
            }
            LumaPrediction::Macroblock(mode) => {
                predictor.predict_luma(y, *mode)?;
                if !self.has_nonzero {
                    return Ok(report);
                }
                match &self.y2 {
                    Some(y2) if y2.coded() => {
                        // 在副本上修补 DC, 宏块头中的原始系数保持不变
                        let mut patched = self.y;
                        y2.walsh_transform(&mut patched)?;
                        report.walsh_transformed = true;
                        report.idct_blocks = idct_grid(&patched, y)?;
                    }
                    _ => {
                        report.idct_blocks = idct_grid(&self.y, y)?;
                    }
                }
            }
        }
        Ok(report)
    }
}
