//! 4x4 齐次变换矩阵与轴向翻转.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 三维空间的坐标轴.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis3 {
    /// x 轴 (左右方向).
    X,

    /// y 轴 (前后方向).
    Y,

    /// z 轴 (上下方向).
    Z,
}

impl Axis3 {
    /// 轴在 `(x, y, z)` 三元组中的下标.
    #[inline]
    pub const fn index(&self) -> usize {
        match self {
            Axis3::X => 0,
            Axis3::Y => 1,
            Axis3::Z => 2,
        }
    }
}

/// 需要翻转的坐标轴集合.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisFlips {
    x: bool,
    y: bool,
    z: bool,
}

impl AxisFlips {
    /// 不翻转任何轴.
    pub const NONE: Self = Self {
        x: false,
        y: false,
        z: false,
    };

    /// 左右对称翻转 (仅 x 轴).
    pub const LEFT_RIGHT: Self = Self {
        x: true,
        y: false,
        z: false,
    };

    /// 超声采集几何的 z 轴反转 (仅 z 轴).
    pub const INFERIOR_SUPERIOR: Self = Self {
        x: false,
        y: false,
        z: true,
    };

    /// 该轴是否需要翻转?
    #[inline]
    pub const fn contains(&self, axis: Axis3) -> bool {
        match axis {
            Axis3::X => self.x,
            Axis3::Y => self.y,
            Axis3::Z => self.z,
        }
    }

    /// 是否不翻转任何轴?
    #[inline]
    pub const fn is_empty(&self) -> bool {
        !(self.x || self.y || self.z)
    }

    /// 加入一个需要翻转的轴.
    #[inline]
    pub fn with(mut self, axis: Axis3) -> Self {
        match axis {
            Axis3::X => self.x = true,
            Axis3::Y => self.y = true,
            Axis3::Z => self.z = true,
        }
        self
    }
}

impl FromIterator<Axis3> for AxisFlips {
    fn from_iter<I: IntoIterator<Item = Axis3>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// 4x4 齐次变换矩阵, 按行存储.
///
/// 这是一个无状态的值对象. 体数据的方向 (orientation) 以该矩阵表示.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransformMatrix([[f64; 4]; 4]);

impl Default for TransformMatrix {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformMatrix {
    /// 单位矩阵.
    pub const fn identity() -> Self {
        Self([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 直接由按行排列的元素构建.
    #[inline]
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self(rows)
    }

    /// 对角线符号翻转矩阵: `flips` 中的轴对应的对角元为 -1, 其余为 1.
    pub fn sign_flip(flips: AxisFlips) -> Self {
        let mut m = Self::identity();
        for axis in [Axis3::X, Axis3::Y, Axis3::Z] {
            if flips.contains(axis) {
                let i = axis.index();
                m.0[i][i] = -1.0;
            }
        }
        m
    }

    /// 对角线元素.
    #[inline]
    pub fn diagonal(&self) -> [f64; 4] {
        [self.0[0][0], self.0[1][1], self.0[2][2], self.0[3][3]]
    }

    /// 平移分量.
    #[inline]
    pub fn translation(&self) -> [f64; 3] {
        [self.0[0][3], self.0[1][3], self.0[2][3]]
    }

    /// 矩阵乘法 `self * rhs`.
    pub fn compose(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        Self(out)
    }

    /// 逐元素比较, 误差不超过 `tol` 时视为相等.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}
