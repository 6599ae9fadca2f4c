//! 多个体数据的逐体素合成: 平均与最大值投影.
//!
//! 所有输入必须形状一致, 且使用整数标量类型 (历史上为 8-bit 约定).
//! 输出继承第一个输入的几何元信息, 输入本身不会被修改.

use ndarray::{Array3, ArrayView3, Zip};
use num::{NumCast, PrimInt};

use crate::config::AveragePolicy;
use crate::data::ensure_same_dimensions;
use crate::{VolError, VolResult, VolumeBuffer};

/// 取出所有输入的标量视图, 并检查形状一致性.
fn aligned_views<'a, T>(
    buffers: &[&'a VolumeBuffer<T>],
    required: usize,
) -> VolResult<Vec<ArrayView3<'a, T>>> {
    if buffers.len() < required {
        return Err(VolError::TooFewOperands {
            required,
            found: buffers.len(),
        });
    }
    let dims = buffers[0].dimensions();
    buffers
        .iter()
        .map(|b| {
            ensure_same_dimensions(dims, b.dimensions())?;
            b.scalars()
        })
        .collect()
}

/// 参与求和的操作数下标序列.
///
/// `Legacy` 且 `n >= 3` 时为 `[0, 1, 1, 2, .., n - 2]`, 其余情况为 `[0, .., n - 1]`.
fn operand_order(policy: AveragePolicy, n: usize) -> Vec<usize> {
    match policy {
        AveragePolicy::Legacy if n >= 3 => [0, 1, 1].into_iter().chain(2..n - 1).collect(),
        _ => (0..n).collect(),
    }
}

/// `a / n`, 整数截断除法. `n` 超出 `T` 的表示范围时商必为 0.
#[inline]
fn divisor<T: PrimInt>(n: usize) -> Option<T> {
    <T as NumCast>::from(n)
}

fn average_imp<T>(
    buffers: &[&VolumeBuffer<T>],
    policy: AveragePolicy,
    name: &str,
    parallel: bool,
) -> VolResult<VolumeBuffer<T>>
where
    T: PrimInt + Send + Sync,
{
    let views = aligned_views(buffers, 1)?;
    let n = views.len();
    let mut out = Array3::<T>::zeros(views[0].raw_dim());
    let Some(d) = divisor::<T>(n) else {
        return buffers[0].derive(name, out);
    };

    let acc = |o: &mut T, &a: &T| *o = o.saturating_add(a / d);
    for i in operand_order(policy, n) {
        let z = Zip::from(&mut out).and(&views[i]);
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                if parallel {
                    z.par_for_each(acc);
                } else {
                    z.for_each(acc);
                }
            } else {
                let _ = parallel;
                z.for_each(acc);
            }
        }
    }
    log::debug!("averaged {n} volumes into `{name}` ({policy:?})");
    buffers[0].derive(name, out)
}

fn max_projection_imp<T>(
    buffers: &[&VolumeBuffer<T>],
    name: &str,
    parallel: bool,
) -> VolResult<VolumeBuffer<T>>
where
    T: PrimInt + Send + Sync,
{
    let views = aligned_views(buffers, 2)?;
    let mut out = views[0].to_owned();

    let keep_max = |o: &mut T, &a: &T| {
        if a > *o {
            *o = a;
        }
    };
    for v in views.iter().skip(1) {
        let z = Zip::from(&mut out).and(v);
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                if parallel {
                    z.par_for_each(keep_max);
                } else {
                    z.for_each(keep_max);
                }
            } else {
                let _ = parallel;
                z.for_each(keep_max);
            }
        }
    }
    log::debug!("max-projected {} volumes into `{name}`", views.len());
    buffers[0].derive(name, out)
}

/// 逐体素平均, 结果命名为 `name`.
///
/// 每个操作数先除以操作数个数 (整数截断除法) 再求和, 以避免窄整数类型的中间结果溢出.
/// 参与求和的操作数由 `policy` 决定, 见 [`AveragePolicy`].
///
/// 至少需要 1 个输入, 否则返回 `TooFewOperands`; 形状不一致时返回 `DimensionMismatch`.
#[inline]
pub fn average<T>(
    buffers: &[&VolumeBuffer<T>],
    policy: AveragePolicy,
    name: &str,
) -> VolResult<VolumeBuffer<T>>
where
    T: PrimInt + Send + Sync,
{
    average_imp(buffers, policy, name, false)
}

/// 逐体素最大值投影, 结果命名为 `name`.
///
/// 至少需要 2 个输入, 否则返回 `TooFewOperands`; 形状不一致时返回 `DimensionMismatch`.
#[inline]
pub fn max_projection<T>(buffers: &[&VolumeBuffer<T>], name: &str) -> VolResult<VolumeBuffer<T>>
where
    T: PrimInt + Send + Sync,
{
    max_projection_imp(buffers, name, false)
}

/// 借助 `rayon`, 并行地计算 [`average`]. 结果与串行版本完全一致.
#[cfg(feature = "rayon")]
#[inline]
pub fn par_average<T>(
    buffers: &[&VolumeBuffer<T>],
    policy: AveragePolicy,
    name: &str,
) -> VolResult<VolumeBuffer<T>>
where
    T: PrimInt + Send + Sync,
{
    average_imp(buffers, policy, name, true)
}

/// 借助 `rayon`, 并行地计算 [`max_projection`]. 结果与串行版本完全一致.
#[cfg(feature = "rayon")]
#[inline]
pub fn par_max_projection<T>(
    buffers: &[&VolumeBuffer<T>],
    name: &str,
) -> VolResult<VolumeBuffer<T>>
where
    T: PrimInt + Send + Sync,
{
    max_projection_imp(buffers, name, true)
}

#[cfg(test)]
mod tests {
    use super::{average, max_projection, operand_order};
    use crate::config::AveragePolicy;
    use crate::{VolError, VolumeBuffer};

    fn vol(raw: Vec<u8>) -> VolumeBuffer<u8> {
        let n = raw.len();
        VolumeBuffer::from_raw("in", (n, 1, 1), [0.5, 0.5, 1.0], [1.0, 2.0, 3.0], raw).unwrap()
    }

    fn raw(v: &VolumeBuffer<u8>) -> Vec<u8> {
        v.to_raw_vec().unwrap()
    }

    #[test]
    fn test_operand_order() {
        assert_eq!(operand_order(AveragePolicy::Legacy, 1), vec![0]);
        assert_eq!(operand_order(AveragePolicy::Legacy, 2), vec![0, 1]);
        assert_eq!(operand_order(AveragePolicy::Legacy, 3), vec![0, 1, 1]);
        assert_eq!(operand_order(AveragePolicy::Legacy, 4), vec![0, 1, 1, 2]);
        assert_eq!(operand_order(AveragePolicy::Corrected, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_four_way_scenario() {
        let (a, b, c, d) = (vol(vec![4]), vol(vec![8]), vol(vec![12]), vol(vec![16]));
        let inputs = [&a, &b, &c, &d];

        let legacy = average(&inputs, AveragePolicy::Legacy, "avg").unwrap();
        // 4/4 + 8/4 + 8/4 + 12/4
        assert_eq!(raw(&legacy), vec![8]);

        let corrected = average(&inputs, AveragePolicy::Corrected, "avg").unwrap();
        // 4/4 + 8/4 + 12/4 + 16/4
        assert_eq!(raw(&corrected), vec![10]);

        let proj = max_projection(&inputs, "proj").unwrap();
        assert_eq!(raw(&proj), vec![16]);
    }

    #[test]
    fn test_average_self() {
        let a = vol(vec![0, 2, 100, 254, 1, 3, 255]);
        for policy in [AveragePolicy::Legacy, AveragePolicy::Corrected] {
            let r = average(&[&a, &a], policy, "avg").unwrap();
            let expected: Vec<u8> = raw(&a).iter().map(|v| v / 2 + v / 2).collect();
            assert_eq!(raw(&r), expected);
            // 偶数值无截断损失.
            assert_eq!(&raw(&r)[..4], &[0, 2, 100, 254]);
        }
    }

    #[test]
    fn test_no_overflow() {
        let a = vol(vec![255; 3]);
        let r = average(&[&a, &a, &a, &a], AveragePolicy::Corrected, "avg").unwrap();
        assert_eq!(raw(&r), vec![252; 3]);
        let r = average(&[&a, &a, &a, &a], AveragePolicy::Legacy, "avg").unwrap();
        assert_eq!(raw(&r), vec![252; 3]);
    }

    #[test]
    fn test_max_projection_commutative() {
        let a = vol(vec![1, 200, 3, 0, 77]);
        let b = vol(vec![9, 100, 3, 255, 76]);
        let c = vol(vec![5, 5, 5, 5, 5]);
        let ab = max_projection(&[&a, &b], "p").unwrap();
        let ba = max_projection(&[&b, &a], "p").unwrap();
        assert_eq!(raw(&ab), raw(&ba));
        assert_eq!(raw(&ab), vec![9, 200, 3, 255, 77]);

        let left = max_projection(&[&ab, &c], "p").unwrap();
        let bc = max_projection(&[&b, &c], "p").unwrap();
        let right = max_projection(&[&a, &bc], "p").unwrap();
        assert_eq!(raw(&left), raw(&right));
        assert_eq!(raw(&left), raw(&max_projection(&[&a, &b, &c], "p").unwrap()));
    }

    #[test]
    fn test_output_metadata() {
        let a = vol(vec![1, 2]);
        let b = vol(vec![3, 4]);
        let r = average(&[&a, &b], AveragePolicy::Legacy, "combined").unwrap();
        assert_eq!(r.name(), "combined");
        assert_eq!(r.dimensions(), a.dimensions());
        assert_eq!(r.spacing(), a.spacing());
        assert_eq!(r.origin(), a.origin());
        // 输入未被修改.
        assert_eq!(raw(&a), vec![1, 2]);
    }

    #[test]
    fn test_operand_errors() {
        let a = vol(vec![1, 2]);
        let short = vol(vec![1]);
        assert!(matches!(
            average::<u8>(&[], AveragePolicy::Legacy, "x"),
            Err(VolError::TooFewOperands { required: 1, found: 0 })
        ));
        assert!(matches!(
            max_projection(&[&a], "x"),
            Err(VolError::TooFewOperands { required: 2, found: 1 })
        ));
        assert!(matches!(
            max_projection(&[&a, &short], "x"),
            Err(VolError::DimensionMismatch((2, 1, 1), (1, 1, 1)))
        ));
    }

    #[test]
    fn test_many_operands_u8() {
        // 操作数个数超出 u8 表示范围时, 每个商均为 0.
        let a = vol(vec![255]);
        let many: Vec<&VolumeBuffer<u8>> = std::iter::repeat(&a).take(300).collect();
        let r = average(&many, AveragePolicy::Corrected, "avg").unwrap();
        assert_eq!(raw(&r), vec![0]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_matches_serial() {
        use super::{par_average, par_max_projection};

        let a = vol((0..=255).collect());
        let b = vol((0..=255).rev().collect());
        let c = vol((0..=255).map(|v: u8| v.wrapping_mul(7)).collect());
        let d = vol(vec![128; 256]);
        let inputs = [&a, &b, &c, &d];
        for policy in [AveragePolicy::Legacy, AveragePolicy::Corrected] {
            assert_eq!(
                raw(&average(&inputs, policy, "s").unwrap()),
                raw(&par_average(&inputs, policy, "p").unwrap())
            );
        }
        assert_eq!(
            raw(&max_projection(&inputs, "s").unwrap()),
            raw(&par_max_projection(&inputs, "p").unwrap())
        );
    }
}
