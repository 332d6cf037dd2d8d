//! # vp8-recon-codec
//!
//! VP8 解码器的反变换与帧内重建阶段.
//!
//! 码流解析与熵解码, 帧内预测样本生成, 运动补偿, 环路滤波均由外部协作者提供;
//! 本 crate 只负责两种反变换 (4x4 IDCT, 4x4 WHT) 以及按宏块编排预测与残差叠加.
//!
//! ## 使用示例
//!
//! ```rust
//! use vp8_recon_codec::decoders::vp8::{
//!     FrameBuffer, FrameReconstructor, LumaPrediction, MacroblockCoefficients,
//!     MacroblockHeader, MbMode, PrefilledPredictor, RawBlock, ReconOptions,
//! };
//!
//! let mut coeffs = MacroblockCoefficients::default();
//! let mut y2 = [0i16; 16];
//! y2[0] = 80;
//! coeffs.y2 = Some(RawBlock::from_coefficients(y2));
//! let header = MacroblockHeader::new(
//!     coeffs,
//!     LumaPrediction::Macroblock(MbMode::Dc),
//!     MbMode::Dc,
//!     true,
//! )
//! .unwrap();
//!
//! let mut frame = FrameBuffer::filled(1, 1, 128, 128).unwrap();
//! let recon = FrameReconstructor::new(ReconOptions::default()).unwrap();
//! recon
//!     .reconstruct_frame(&mut frame, &[header], &PrefilledPredictor)
//!     .unwrap();
//! // Y2 DC 80 → 每个亮度块 DC 10 → 残差 (10 + 4) >> 3 = 1
//! assert!(frame.y().data().iter().all(|&p| p == 129));
//! ```

pub mod decoders;
