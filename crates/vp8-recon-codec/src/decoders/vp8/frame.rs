//! 帧级重建: 帧缓冲, 重建选项与按宏块光栅顺序的驱动.

use log::debug;
use serde::{Deserialize, Serialize};
use vp8_recon_core::{Plane, ReconError, ReconResult};

use super::macroblock::{MB_CHROMA_SIZE, MB_LUMA_SIZE, MacroblockHeader, MacroblockRaster};
use super::predict::IntraPredictor;
use super::reconstruct::MacroblockReport;

/// 重建选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconOptions {
    /// 同一宏块的亮度与色度并行重建
    pub parallel_planes: bool,
    /// 并行线程数, 0 表示由 rayon 决定
    pub threads: usize,
}

/// 4:2:0 帧缓冲, 尺寸为整数个宏块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    y: Plane,
    u: Plane,
    v: Plane,
    mb_width: usize,
    mb_height: usize,
}

impl FrameBuffer {
    /// 创建全零帧
    pub fn new(mb_width: usize, mb_height: usize) -> ReconResult<Self> {
        Self::filled(mb_width, mb_height, 0, 0)
    }

    /// 创建以给定亮度/色度值填充的帧
    pub fn filled(mb_width: usize, mb_height: usize, luma: u8, chroma: u8) -> ReconResult<Self> {
        if mb_width == 0 || mb_height == 0 {
            return Err(ReconError::InvalidArgument(format!(
                "宏块行列数不能为 0: {}x{}",
                mb_width, mb_height
            )));
        }
        Ok(Self {
            y: Plane::filled(mb_width * MB_LUMA_SIZE, mb_height * MB_LUMA_SIZE, luma)?,
            u: Plane::filled(mb_width * MB_CHROMA_SIZE, mb_height * MB_CHROMA_SIZE, chroma)?,
            v: Plane::filled(mb_width * MB_CHROMA_SIZE, mb_height * MB_CHROMA_SIZE, chroma)?,
            mb_width,
            mb_height,
        })
    }

    /// 由已有平面构造 (例如已写入运动补偿预测的参考帧)
    pub fn from_planes(y: Plane, u: Plane, v: Plane) -> ReconResult<Self> {
        if y.width() % MB_LUMA_SIZE != 0 || y.height() % MB_LUMA_SIZE != 0 {
            return Err(ReconError::InvalidArgument(format!(
                "亮度平面尺寸 {}x{} 不是宏块整数倍",
                y.width(),
                y.height()
            )));
        }
        let mb_width = y.width() / MB_LUMA_SIZE;
        let mb_height = y.height() / MB_LUMA_SIZE;
        for (name, plane) in [("U", &u), ("V", &v)] {
            if plane.width() != mb_width * MB_CHROMA_SIZE
                || plane.height() != mb_height * MB_CHROMA_SIZE
            {
                return Err(ReconError::InvalidArgument(format!(
                    "{} 平面尺寸 {}x{} 与亮度平面不匹配",
                    name,
                    plane.width(),
                    plane.height()
                )));
            }
        }
        Ok(Self {
            y,
            u,
            v,
            mb_width,
            mb_height,
        })
    }

    pub fn y(&self) -> &Plane {
        &self.y
    }

    pub fn u(&self) -> &Plane {
        &self.u
    }

    pub fn v(&self) -> &Plane {
        &self.v
    }

    pub fn mb_width(&self) -> usize {
        self.mb_width
    }

    pub fn mb_height(&self) -> usize {
        self.mb_height
    }

    /// 第 (mb_x, mb_y) 个宏块的三平面视图
    pub fn macroblock_mut(
        &mut self,
        mb_x: usize,
        mb_y: usize,
    ) -> ReconResult<MacroblockRaster<'_>> {
        if mb_x >= self.mb_width || mb_y >= self.mb_height {
            return Err(ReconError::OutOfBounds(format!(
                "宏块 ({}, {}) 超出帧 {}x{}",
                mb_x, mb_y, self.mb_width, self.mb_height
            )));
        }
        let y = self.y.region_mut(
            mb_x * MB_LUMA_SIZE,
            mb_y * MB_LUMA_SIZE,
            MB_LUMA_SIZE,
            MB_LUMA_SIZE,
        )?;
        let u = self.u.region_mut(
            mb_x * MB_CHROMA_SIZE,
            mb_y * MB_CHROMA_SIZE,
            MB_CHROMA_SIZE,
            MB_CHROMA_SIZE,
        )?;
        let v = self.v.region_mut(
            mb_x * MB_CHROMA_SIZE,
            mb_y * MB_CHROMA_SIZE,
            MB_CHROMA_SIZE,
            MB_CHROMA_SIZE,
        )?;
        MacroblockRaster::new(y, u, v)
    }
}

/// 整帧重建统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconStats {
    /// 宏块总数
    pub macroblocks: usize,
    /// has_nonzero 为 false, 只做了预测的宏块数
    pub prediction_only: usize,
    /// B_PRED 宏块数
    pub per_block: usize,
    /// 执行了 WHT 的宏块数
    pub walsh_transforms: usize,
    /// 实际叠加残差的 4x4 子块数
    pub idct_blocks: usize,
}

impl ReconStats {
    fn record(&mut self, header: &MacroblockHeader, report: MacroblockReport) {
        self.macroblocks += 1;
        self.prediction_only += usize::from(!header.has_nonzero());
        self.per_block += usize::from(header.luma_prediction().is_per_block());
        self.walsh_transforms += usize::from(report.walsh_transformed);
        self.idct_blocks += report.idct_blocks;
    }
}

/// 帧重建器
///
/// 宏块按光栅顺序依次重建, 保证帧内预测读取的邻居均已完成.
/// 开启 `parallel_planes` 时, 每个宏块的亮度与色度在专用线程池上并行.
pub struct FrameReconstructor {
    options: ReconOptions,
    pool: Option<rayon::ThreadPool>,
}

impl FrameReconstructor {
    pub fn new(options: ReconOptions) -> ReconResult<Self> {
        let pool = if options.parallel_planes {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.threads)
                .thread_name(|idx| format!("vp8-recon-{}", idx))
                .build()
                .map_err(|e| ReconError::Internal(format!("创建重建线程池失败: {}", e)))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self { options, pool })
    }

    pub fn options(&self) -> &ReconOptions {
        &self.options
    }

    /// 重建整帧
    ///
    /// `headers` 按宏块光栅顺序排列, 数量必须等于帧的宏块数.
    pub fn reconstruct_frame<P: IntraPredictor + Sync + ?Sized>(
        &self,
        frame: &mut FrameBuffer,
        headers: &[MacroblockHeader],
        predictor: &P,
    ) -> ReconResult<ReconStats> {
        let expected = frame.mb_width() * frame.mb_height();
        if headers.len() != expected {
            return Err(ReconError::InvalidArgument(format!(
                "宏块头数量 {} 与帧宏块数 {} 不一致",
                headers.len(),
                expected
            )));
        }

        let stats = match &self.pool {
            Some(pool) => pool.install(|| Self::run_parallel(frame, headers, predictor))?,
            None => Self::run_sequential(frame, headers, predictor)?,
        };

        debug!(
            "帧重建完成: {}x{} 宏块, 仅预测 {}, B_PRED {}, WHT {}, IDCT 子块 {}",
            frame.mb_width(),
            frame.mb_height(),
            stats.prediction_only,
            stats.per_block,
            stats.walsh_transforms,
            stats.idct_blocks
        );
        Ok(stats)
    }

    fn run_sequential<P: IntraPredictor + ?Sized>(
        frame: &mut FrameBuffer,
        headers: &[MacroblockHeader],
        predictor: &P,
    ) -> ReconResult<ReconStats> {
        let mb_width = frame.mb_width();
        let mut stats = ReconStats::default();
        for (idx, header) in headers.iter().enumerate() {
            let mut raster = frame.macroblock_mut(idx % mb_width, idx / mb_width)?;
            let report = header.intra_predict_and_inverse_transform(&mut raster, predictor)?;
            stats.record(header, report);
        }
        Ok(stats)
    }

    fn run_parallel<P: IntraPredictor + Sync + ?Sized>(
        frame: &mut FrameBuffer,
        headers: &[MacroblockHeader],
        predictor: &P,
    ) -> ReconResult<ReconStats> {
        let mb_width = frame.mb_width();
        let mut stats = ReconStats::default();
        for (idx, header) in headers.iter().enumerate() {
            let mut raster = frame.macroblock_mut(idx % mb_width, idx / mb_width)?;
            let MacroblockRaster { y, u, v } = &mut raster;
            // 三个平面互不重叠, 亮度与色度之间没有数据依赖
            let (chroma, luma) = rayon::join(
                || header.reconstruct_chroma(u, v, predictor),
                || header.reconstruct_luma(y, predictor),
            );
            stats.record(header, chroma?.merge(luma?));
        }
        Ok(stats)
    }
}
