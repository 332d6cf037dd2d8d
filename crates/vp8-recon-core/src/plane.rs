//! 像素平面与可写区域视图.
//!
//! `Plane` 持有单个分量 (Y/U/V) 的 8-bit 样本. `PlaneRegion` 是对平面上一个矩形区域的
//! 独占可写视图: 写入只落在区域内部, 但可以读取区域上方/左侧已重建的邻居样本,
//! 供帧内预测使用.

use crate::error::{ReconError, ReconResult};

/// 变换子块边长
pub const SUBBLOCK_SIZE: usize = 4;

/// 单分量像素平面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    width: usize,
    height: usize,
    stride: usize,
}

impl Plane {
    /// 创建全零平面
    pub fn new(width: usize, height: usize) -> ReconResult<Self> {
        Self::filled(width, height, 0)
    }

    /// 创建以 `value` 填充的平面
    pub fn filled(width: usize, height: usize, value: u8) -> ReconResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReconError::InvalidArgument(format!(
                "平面尺寸不能为 0: {}x{}",
                width, height
            )));
        }
        Ok(Self {
            data: vec![value; width * height],
            width,
            height,
            stride: width,
        })
    }

    /// 从已有样本构造 (行字节数可大于宽度)
    pub fn from_data(
        width: usize,
        height: usize,
        stride: usize,
        data: Vec<u8>,
    ) -> ReconResult<Self> {
        if width == 0 || height == 0 || stride < width {
            return Err(ReconError::InvalidArgument(format!(
                "平面参数无效: {}x{}, stride={}",
                width, height, stride
            )));
        }
        let required = stride * (height - 1) + width;
        if data.len() < required {
            return Err(ReconError::InvalidArgument(format!(
                "平面数据不足: 需要 {} 字节, 实际 {}",
                required,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 每行字节数
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// 原始样本 (含行尾填充)
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 读取 (x, y) 处样本
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width && y < self.height, "像素坐标越界: ({x}, {y})");
        self.data[y * self.stride + x]
    }

    /// 第 `y` 行的有效样本
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// 获取矩形区域的可写视图
    pub fn region_mut(
        &mut self,
        x0: usize,
        y0: usize,
        width: usize,
        height: usize,
    ) -> ReconResult<PlaneRegion<'_>> {
        if width == 0 || height == 0 || x0 + width > self.width || y0 + height > self.height {
            return Err(ReconError::OutOfBounds(format!(
                "区域 ({}, {}) {}x{} 超出平面 {}x{}",
                x0, y0, width, height, self.width, self.height
            )));
        }
        Ok(PlaneRegion {
            plane: self,
            x0,
            y0,
            width,
            height,
        })
    }
}

/// 平面上矩形区域的独占可写视图
#[derive(Debug)]
pub struct PlaneRegion<'a> {
    plane: &'a mut Plane,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
}

impl PlaneRegion<'_> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 区域左上角在平面中的坐标
    pub fn origin(&self) -> (usize, usize) {
        (self.x0, self.y0)
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "区域内坐标越界: ({x}, {y}), 区域 {}x{}",
            self.width,
            self.height
        );
        (self.y0 + y) * self.plane.stride + self.x0 + x
    }

    /// 读取区域内 (x, y) 处样本
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.plane.data[self.offset(x, y)]
    }

    /// 写入区域内 (x, y) 处样本
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        let idx = self.offset(x, y);
        self.plane.data[idx] = value;
    }

    /// 以 `value` 填充整个区域
    pub fn fill(&mut self, value: u8) {
        for y in 0..self.height {
            let start = (self.y0 + y) * self.plane.stride + self.x0;
            self.plane.data[start..start + self.width].fill(value);
        }
    }

    /// 区域上方一行第 `dx` 列的样本
    ///
    /// `dx` 可以超出区域宽度 (右上邻居); 超出平面或区域位于首行时返回 `None`.
    pub fn above(&self, dx: usize) -> Option<u8> {
        let x = self.x0 + dx;
        if self.y0 == 0 || x >= self.plane.width {
            return None;
        }
        Some(self.plane.data[(self.y0 - 1) * self.plane.stride + x])
    }

    /// 区域左侧一列第 `dy` 行的样本
    pub fn left(&self, dy: usize) -> Option<u8> {
        let y = self.y0 + dy;
        if self.x0 == 0 || y >= self.plane.height {
            return None;
        }
        Some(self.plane.data[y * self.plane.stride + self.x0 - 1])
    }

    /// 区域左上角外侧的样本
    pub fn above_left(&self) -> Option<u8> {
        if self.x0 == 0 || self.y0 == 0 {
            return None;
        }
        Some(self.plane.data[(self.y0 - 1) * self.plane.stride + self.x0 - 1])
    }

    /// 第 (column, row) 个 4x4 子块的视图
    pub fn sub_block(&mut self, column: usize, row: usize) -> ReconResult<PlaneRegion<'_>> {
        let x = column * SUBBLOCK_SIZE;
        let y = row * SUBBLOCK_SIZE;
        if x + SUBBLOCK_SIZE > self.width || y + SUBBLOCK_SIZE > self.height {
            return Err(ReconError::OutOfBounds(format!(
                "子块 ({}, {}) 超出区域 {}x{}",
                column, row, self.width, self.height
            )));
        }
        Ok(PlaneRegion {
            plane: &mut *self.plane,
            x0: self.x0 + x,
            y0: self.y0 + y,
            width: SUBBLOCK_SIZE,
            height: SUBBLOCK_SIZE,
        })
    }

    /// 将 4x4 残差 (行优先) 叠加到区域上, 结果饱和到 [0, 255]
    ///
    /// 残差是增量而不是覆盖值: 区域中必须已经是预测样本.
    pub fn add_residual(&mut self, residual: &[i32; 16]) -> ReconResult<()> {
        if self.width != SUBBLOCK_SIZE || self.height != SUBBLOCK_SIZE {
            return Err(ReconError::RegionMismatch {
                expected: (SUBBLOCK_SIZE, SUBBLOCK_SIZE),
                actual: (self.width, self.height),
            });
        }
        let stride = self.plane.stride;
        for (y, deltas) in residual.chunks_exact(SUBBLOCK_SIZE).enumerate() {
            let start = (self.y0 + y) * stride + self.x0;
            for (px, &delta) in self.plane.data[start..start + SUBBLOCK_SIZE]
                .iter_mut()
                .zip(deltas)
            {
                *px = clamp255(i32::from(*px) + delta);
            }
        }
        Ok(())
    }
}

/// 饱和到 8-bit 样本范围
pub fn clamp255(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}
