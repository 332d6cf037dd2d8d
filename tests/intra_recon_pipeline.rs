//! VP8 帧内重建流水.
//!
//! 目标:
//! - 通过顶层 crate 驱动整帧重建, 覆盖串行与并行两种模式.
//! - 验证重建结果只依赖宏块头与预测器, 与调度方式无关.

use vp8_recon::codec::decoders::vp8::{
    CoefficientBlock, FrameBuffer, FrameReconstructor, IntraPredictor, LumaPrediction,
    MacroblockCoefficients, MacroblockHeader, MbMode, PrefilledPredictor, RawBlock, ReconOptions,
    SubblockMode,
};
use vp8_recon::core::{Grid, PlaneRegion, ReconResult};

/// 上方行与左侧列的均值, 无邻居时为 128
struct MeanPredictor;

impl MeanPredictor {
    fn predict(region: &mut PlaneRegion<'_>) -> ReconResult<()> {
        let above = (0..region.width()).filter_map(|dx| region.above(dx));
        let left = (0..region.height()).filter_map(|dy| region.left(dy));
        let samples: Vec<u32> = above.chain(left).map(u32::from).collect();
        let value = if samples.is_empty() {
            128
        } else {
            let count = samples.len() as u32;
            ((samples.iter().sum::<u32>() + count / 2) / count) as u8
        };
        region.fill(value);
        Ok(())
    }
}

impl IntraPredictor for MeanPredictor {
    fn predict_luma(&self, region: &mut PlaneRegion<'_>, _mode: MbMode) -> ReconResult<()> {
        Self::predict(region)
    }

    fn predict_subblock(
        &self,
        region: &mut PlaneRegion<'_>,
        _mode: SubblockMode,
    ) -> ReconResult<()> {
        Self::predict(region)
    }

    fn predict_chroma(&self, region: &mut PlaneRegion<'_>, _mode: MbMode) -> ReconResult<()> {
        Self::predict(region)
    }
}

/// 确定性伪随机系数 (线性同余)
struct CoefficientSource(u32);

impl CoefficientSource {
    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.0 >> 8
    }

    fn block(&mut self, density: u32) -> RawBlock {
        let mut coefficients = [0i16; 16];
        for c in coefficients.iter_mut() {
            if self.next() % 16 < density {
                *c = (self.next() % 256) as i16 - 128;
            }
        }
        RawBlock::from_coefficients(coefficients)
    }

    fn header(&mut self) -> MacroblockHeader {
        let has_nonzero = self.next() % 5 != 0;
        let mut coefficients = MacroblockCoefficients {
            y: Grid::from_fn(|_, _| self.block(3)),
            ..Default::default()
        };
        coefficients.u = Grid::from_fn(|_, _| self.block(2));
        coefficients.v = Grid::from_fn(|_, _| self.block(2));

        let luma = if self.next() % 2 == 0 {
            LumaPrediction::PerBlock(Grid::filled(SubblockMode::Dc))
        } else {
            coefficients.y2 = Some(self.block(4));
            LumaPrediction::Macroblock(MbMode::Dc)
        };
        MacroblockHeader::new(coefficients, luma, MbMode::Dc, has_nonzero).unwrap()
    }
}

fn build_headers(count: usize) -> Vec<MacroblockHeader> {
    let mut source = CoefficientSource(0x5eed);
    (0..count).map(|_| source.header()).collect()
}

#[test]
fn test_整帧重建_串行与并行一致() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (mb_width, mb_height) = (5, 4);
    let headers = build_headers(mb_width * mb_height);

    let mut sequential = FrameBuffer::new(mb_width, mb_height).unwrap();
    let stats = FrameReconstructor::new(ReconOptions::default())
        .unwrap()
        .reconstruct_frame(&mut sequential, &headers, &MeanPredictor)
        .unwrap();
    assert_eq!(stats.macroblocks, mb_width * mb_height);
    assert!(stats.idct_blocks > 0);

    let options: ReconOptions =
        serde_json::from_str(r#"{"parallel_planes": true, "threads": 3}"#).unwrap();
    let mut parallel = FrameBuffer::new(mb_width, mb_height).unwrap();
    let parallel_stats = FrameReconstructor::new(options)
        .unwrap()
        .reconstruct_frame(&mut parallel, &headers, &MeanPredictor)
        .unwrap();

    assert_eq!(stats, parallel_stats);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_整帧重建_可重复() {
    let _ = env_logger::builder().is_test(true).try_init();

    let headers = build_headers(6);
    let recon = FrameReconstructor::new(ReconOptions::default()).unwrap();
    let mut first = FrameBuffer::filled(3, 2, 90, 140).unwrap();
    let mut second = first.clone();
    recon
        .reconstruct_frame(&mut first, &headers, &PrefilledPredictor)
        .unwrap();
    recon
        .reconstruct_frame(&mut second, &headers, &PrefilledPredictor)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_无残差帧等于预测帧() {
    let _ = env_logger::builder().is_test(true).try_init();

    let to_raw = |block: &CoefficientBlock| RawBlock {
        coefficients: *block.coefficients(),
        coded: block.coded(),
    };
    let headers: Vec<_> = build_headers(4)
        .into_iter()
        .map(|header| {
            // 保留全部系数, 只关闭 has_nonzero
            let coefficients = MacroblockCoefficients {
                y: header.y_blocks().map(to_raw),
                y2: header.y2_block().map(to_raw),
                u: header.u_blocks().map(to_raw),
                v: header.v_blocks().map(to_raw),
            };
            MacroblockHeader::new(
                coefficients,
                *header.luma_prediction(),
                header.uv_prediction_mode(),
                false,
            )
            .unwrap()
        })
        .collect();
    let coded_chroma = headers
        .iter()
        .flat_map(|h| h.u_blocks().iter_ij().chain(h.v_blocks().iter_ij()))
        .filter(|(_, _, b)| b.coded())
        .count();
    assert!(coded_chroma > 0);

    let mut frame = FrameBuffer::filled(2, 2, 77, 33).unwrap();
    let stats = FrameReconstructor::new(ReconOptions::default())
        .unwrap()
        .reconstruct_frame(&mut frame, &headers, &PrefilledPredictor)
        .unwrap();
    assert_eq!(stats.prediction_only, 4);
    assert_eq!(stats.idct_blocks, 0);
    assert!(frame.y().data().iter().all(|&p| p == 77));
    assert!(frame.u().data().iter().chain(frame.v().data()).all(|&p| p == 33));
}

#[test]
fn test_版本号() {
    assert_eq!(vp8_recon::version(), env!("CARGO_PKG_VERSION"));
}
