//! 体数据几何操作: 轴向翻转、原点重定心和对齐检查.
//!
//! 这些操作只修改几何元信息, 不会重采样标量数据.

use crate::config::EmptyInputPolicy;
use crate::consts::GEOMETRY_TOLERANCE;
use crate::{AxisFlips, Geometry, TransformMatrix, VolError, VolResult, VolumeBuffer};

/// 对 `buffers` 中的每一个体数据独立地施加轴向翻转.
///
/// 翻转矩阵右乘到体数据当前的空间变换上: 被翻转轴对应的列取反,
/// 平移分量保持不变. 对于对角形式的空间变换, 这恰好是将对应对角元乘以 -1.
///
/// `buffers` 为空时, 行为由 `policy` 决定.
pub fn apply_sign_flip<T>(
    buffers: &mut [&mut VolumeBuffer<T>],
    flips: AxisFlips,
    policy: EmptyInputPolicy,
) -> VolResult<()> {
    if buffers.is_empty() {
        return match policy {
            EmptyInputPolicy::NoOp => Ok(()),
            EmptyInputPolicy::Reject => Err(VolError::EmptyInput),
        };
    }
    let flip = TransformMatrix::sign_flip(flips);
    for b in buffers.iter_mut() {
        let composed = b.orientation().compose(&flip);
        b.set_orientation(composed);
        log::debug!("applied {flips:?} to `{}`", b.name());
    }
    Ok(())
}

/// 由体素个数和分辨率计算的重定心原点.
///
/// `origin[a] = (dims[a] - 1) * spacing[a] / 2`, 随后 z 分量取反
/// (该采集几何下图像空间的 z 轴与病人空间方向相反).
pub fn centered_origin((nx, ny, nz): (usize, usize, usize), spacing: [f64; 3]) -> [f64; 3] {
    let extent = [nx, ny, nz].map(|n| n.saturating_sub(1) as f64);
    let [x, y, z] = [0, 1, 2].map(|a| extent[a] * spacing[a] / 2.0);
    [x, y, -z]
}

/// 原地将体数据的原点重定心, 见 [`centered_origin`].
///
/// 只依赖体素个数和分辨率, 因此对同一体数据重复调用结果不变.
pub fn recenter_origin<T>(buffer: &mut VolumeBuffer<T>) {
    let origin = centered_origin(buffer.dimensions(), buffer.spacing());
    log::debug!("recentered `{}` to {origin:?}", buffer.name());
    buffer.set_origin(origin);
}

/// 判断两个几何描述是否不一致.
///
/// 体素个数、分辨率、原点或空间变换任一不一致 (容差见 [`GEOMETRY_TOLERANCE`]) 时返回 `true`.
pub fn geometry_differs(a: &Geometry, b: &Geometry) -> bool {
    let close = |u: [f64; 3], v: [f64; 3]| {
        u.iter()
            .zip(v.iter())
            .all(|(x, y)| (x - y).abs() <= GEOMETRY_TOLERANCE)
    };
    a.dims != b.dims
        || !close(a.spacing, b.spacing)
        || !close(a.origin, b.origin)
        || !a.orientation.approx_eq(&b.orientation, GEOMETRY_TOLERANCE)
}

/// 判断 `moving` 是否需要重采样到 `reference` 的网格上.
#[inline]
pub fn needs_resampling<A, B>(reference: &VolumeBuffer<A>, moving: &VolumeBuffer<B>) -> bool {
    geometry_differs(&reference.geometry(), &moving.geometry())
}

#[cfg(test)]
mod tests {
    use super::{apply_sign_flip, centered_origin, needs_resampling, recenter_origin};
    use crate::config::EmptyInputPolicy;
    use crate::{AxisFlips, VolError, VolumeBuffer};

    fn vol(dims: (usize, usize, usize), spacing: [f64; 3]) -> VolumeBuffer<u8> {
        let n = dims.0 * dims.1 * dims.2;
        VolumeBuffer::from_raw("v", dims, spacing, [7.0, 8.0, 9.0], (0..n as u8).collect()).unwrap()
    }

    #[test]
    fn test_flip_metadata_only() {
        let mut a = vol((2, 2, 2), [1.0; 3]);
        let mut b = vol((3, 1, 1), [2.0; 3]);
        let before = a.to_raw_vec().unwrap();

        apply_sign_flip(&mut [&mut a, &mut b], AxisFlips::LEFT_RIGHT, EmptyInputPolicy::NoOp)
            .unwrap();
        assert_eq!(a.orientation().diagonal(), [-1.0, 1.0, 1.0, 1.0]);
        assert_eq!(b.orientation().diagonal(), [-1.0, 1.0, 1.0, 1.0]);
        assert_eq!(a.to_raw_vec().unwrap(), before);
        assert_eq!(a.origin(), [7.0, 8.0, 9.0]);
        assert_eq!(a.orientation().translation(), [0.0; 3]);

        apply_sign_flip(&mut [&mut a], AxisFlips::INFERIOR_SUPERIOR, EmptyInputPolicy::NoOp)
            .unwrap();
        assert_eq!(a.orientation().diagonal(), [-1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_flip_empty_policy() {
        let mut none: [&mut VolumeBuffer<u8>; 0] = [];
        assert!(apply_sign_flip(&mut none, AxisFlips::LEFT_RIGHT, EmptyInputPolicy::NoOp).is_ok());
        assert!(matches!(
            apply_sign_flip(&mut none, AxisFlips::LEFT_RIGHT, EmptyInputPolicy::Reject),
            Err(VolError::EmptyInput)
        ));
    }

    #[test]
    fn test_recenter() {
        assert_eq!(
            centered_origin((737, 370, 366), [0.5, 0.25, 2.0]),
            [184.0, 46.125, -365.0]
        );
        assert_eq!(centered_origin((1, 0, 1), [3.0; 3]), [0.0, 0.0, -0.0]);

        let mut v = vol((5, 3, 2), [1.0, 2.0, 4.0]);
        recenter_origin(&mut v);
        let first = v.origin();
        assert_eq!(first, [2.0, 2.0, -2.0]);
        recenter_origin(&mut v);
        assert_eq!(v.origin(), first);
    }

    #[test]
    fn test_needs_resampling() {
        let a = vol((2, 2, 2), [1.0; 3]);
        let mut b = a.clone_as("b").unwrap();
        assert!(!needs_resampling(&a, &b));

        apply_sign_flip(&mut [&mut b], AxisFlips::LEFT_RIGHT, EmptyInputPolicy::NoOp).unwrap();
        assert!(needs_resampling(&a, &b));

        let c = vol((2, 2, 2), [1.0, 1.0, 1.5]);
        assert!(needs_resampling(&a, &c));
        let d = vol((4, 2, 1), [1.0; 3]);
        assert!(needs_resampling(&a, &d));
    }
}
