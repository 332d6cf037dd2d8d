//! 固定尺寸二维网格.
//!
//! 宏块内的系数块与预测模式都按 (列, 行) 寻址. 迭代顺序固定为光栅扫描
//! (先行内从左到右, 再逐行向下), 子块预测依赖已重建的左/上邻居.

/// `W` 列 x `H` 行的网格, 行优先存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid<T, const W: usize, const H: usize> {
    cells: [[T; W]; H],
}

impl<T, const W: usize, const H: usize> Grid<T, W, H> {
    /// 由 (列, 行) 构造函数逐格生成网格
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self {
        Self {
            cells: std::array::from_fn(|row| std::array::from_fn(|column| f(column, row))),
        }
    }

    /// 从行优先的二维数组构造
    pub fn from_rows(cells: [[T; W]; H]) -> Self {
        Self { cells }
    }

    /// 列数
    pub const fn width(&self) -> usize {
        W
    }

    /// 行数
    pub const fn height(&self) -> usize {
        H
    }

    /// 取 (列, 行) 处元素
    ///
    /// 越界属于调用方缺陷, 直接 panic (与切片下标一致).
    pub fn at(&self, column: usize, row: usize) -> &T {
        &self.cells[row][column]
    }

    /// 取 (列, 行) 处可变元素
    pub fn at_mut(&mut self, column: usize, row: usize) -> &mut T {
        &mut self.cells[row][column]
    }

    /// 光栅顺序迭代 `(列, 行, 元素)`
    pub fn iter_ij(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(column, cell)| (column, row, cell))
        })
    }

    /// 光栅顺序迭代 `(列, 行, 可变元素)`
    pub fn iter_ij_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        self.cells.iter_mut().enumerate().flat_map(|(row, cells)| {
            cells
                .iter_mut()
                .enumerate()
                .map(move |(column, cell)| (column, row, cell))
        })
    }

    /// 按光栅顺序对每个元素调用 `f`, 遇到错误立即停止并返回
    pub fn try_for_each_ij<E>(
        &self,
        mut f: impl FnMut(usize, usize, &T) -> Result<(), E>,
    ) -> Result<(), E> {
        for (column, row, cell) in self.iter_ij() {
            f(column, row, cell)?;
        }
        Ok(())
    }

    /// 逐格映射为新网格
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U, W, H> {
        Grid::from_fn(|column, row| f(self.at(column, row)))
    }
}

impl<T: Copy, const W: usize, const H: usize> Grid<T, W, H> {
    /// 所有格子填充同一值
    pub fn filled(value: T) -> Self {
        Self {
            cells: [[value; W]; H],
        }
    }
}

impl<T: Default, const W: usize, const H: usize> Default for Grid<T, W, H> {
    fn default() -> Self {
        Self::from_fn(|_, _| T::default())
    }
}
