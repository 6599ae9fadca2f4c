//! 标签掩膜下的体素统计.

use ndarray::{Array3, Zip};
use num::traits::AsPrimitive;
use num::Zero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::data::ensure_same_dimensions;
use crate::{VolError, VolResult, VolumeBuffer};

/// 一次掩膜统计的结果.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatResult {
    /// 平均值.
    pub mean: f64,

    /// 总体标准差 (除以 `n` 而不是 `n - 1`).
    pub std_dev: f64,

    /// 参与统计的体素个数.
    pub voxel_count: usize,
}

impl StatResult {
    /// 统计区域的实际体积. `voxel_volume` 是单个体素的体积 (立方毫米).
    #[inline]
    pub fn region_volume(&self, voxel_volume: f64) -> f64 {
        self.voxel_count as f64 * voxel_volume
    }
}

/// 获取掩膜中的最大标签值. 如果掩膜中不存在大于 0 的值, 返回 `None`.
pub fn max_label<M>(mask: &VolumeBuffer<M>) -> VolResult<Option<M>>
where
    M: Copy + PartialOrd + Zero,
{
    let zero = M::zero();
    let max = mask.scalars()?.iter().fold(zero, |acc, &p| if p > acc { p } else { acc });
    Ok((max > zero).then_some(max))
}

/// 由掩膜构建二值模板: 体素值等于最大标签值的位置为 `true`, 其余为 `false`.
///
/// 若掩膜中有多个不同的非零标签, 只有最大的那个被视为前景.
/// 若掩膜中没有非零标签, 返回 `EmptyMask`.
pub fn foreground_stencil<M>(mask: &VolumeBuffer<M>) -> VolResult<Array3<bool>>
where
    M: Copy + PartialOrd + Zero,
{
    let label = max_label(mask)?.ok_or(VolError::EmptyMask)?;
    Ok(mask.scalars()?.mapv(|p| p == label))
}

/// 计算 `signal` 在 `mask` 前景区域上的平均值、总体标准差和体素个数.
///
/// # 注意
///
/// 1. 该函数 **不会** 重采样. `signal` 与 `mask` 形状不一致时返回
///   `DimensionMismatch`, 对齐工作应由调用方事先完成.
/// 2. 前景的定义见 [`foreground_stencil`].
/// 3. 前景为空时返回 `EmptyMask`.
pub fn masked_stats<S, M>(signal: &VolumeBuffer<S>, mask: &VolumeBuffer<M>) -> VolResult<StatResult>
where
    S: AsPrimitive<f64>,
    M: Copy + PartialOrd + Zero,
{
    ensure_same_dimensions(signal.dimensions(), mask.dimensions())?;
    let stencil = foreground_stencil(mask)?;
    let signal = signal.scalars()?;

    let mut count = 0usize;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    Zip::from(&signal).and(&stencil).for_each(|&s, &inside| {
        if inside {
            let v: f64 = s.as_();
            count += 1;
            sum += v;
            sum_sq += v * v;
        }
    });

    if count == 0 {
        return Err(VolError::EmptyMask);
    }
    let n = count as f64;
    let mean = sum / n;
    // 舍入误差可能使方差略小于 0.
    let variance = (sum_sq / n - mean * mean).max(0.0);
    Ok(StatResult {
        mean,
        std_dev: variance.sqrt(),
        voxel_count: count,
    })
}
