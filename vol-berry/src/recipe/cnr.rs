//! 对比噪声比 (CNR).
//!
//! 以病灶标签左右镜像后的区域作为对照区域:
//!
//! `cnr = |lesion.mean - symmetric.mean| / symmetric.std_dev`.

use std::borrow::Cow;
use std::time::Instant;

use num::traits::AsPrimitive;
use num::PrimInt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::OpsConfig;
use crate::consts::slot;
use crate::geometry::{apply_sign_flip, needs_resampling};
use crate::host::{Aligner, RelabelExecutor};
use crate::stats::{masked_stats, StatResult};
use crate::threshold::relabel_with;
use crate::{AxisFlips, VolError, VolResult, VolumeBuffer};

/// CNR 计算结果.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CnrReport {
    /// 病灶区域统计.
    pub lesion: StatResult,

    /// 对称区域统计.
    pub symmetric: StatResult,

    /// 对比噪声比.
    pub cnr: f64,
}

/// 由两组区域统计计算 CNR. 对称区域标准差为 0 时返回 `DivisionByZero`.
pub fn cnr_from_stats(lesion: &StatResult, symmetric: &StatResult) -> VolResult<f64> {
    if symmetric.std_dev == 0.0 {
        return Err(VolError::DivisionByZero);
    }
    Ok((lesion.mean - symmetric.mean).abs() / symmetric.std_dev)
}

/// 若 `mask` 与 `reference` 网格不一致, 借助 `aligner` 重采样; 否则直接借用.
fn aligned<'a, S, L, A>(
    reference: &VolumeBuffer<S>,
    mask: &'a VolumeBuffer<L>,
    aligner: &A,
) -> VolResult<Cow<'a, VolumeBuffer<L>>>
where
    L: Clone,
    A: Aligner<L> + ?Sized,
{
    if needs_resampling(reference, mask) {
        log::debug!("resampling `{}` onto `{}`", mask.name(), reference.name());
        Ok(Cow::Owned(aligner.resample(mask, &reference.geometry())?))
    } else {
        Ok(Cow::Borrowed(mask))
    }
}

/// 计算 `grayscale` 上病灶区域相对其左右对称区域的 CNR.
///
/// 1. 克隆 `lesion` 为 `symmetricLabel`, 并施加左右翻转;
/// 2. 通过 `executor` 将其中所有前景体素改写为 `config.symmetric_label`;
/// 3. 分别在病灶和对称区域上做掩膜统计, 掩膜与灰度图网格不一致时先交由 `aligner` 重采样;
/// 4. 计算 CNR.
///
/// 任何一步失败都会立即返回错误, `lesion` 本身不会被修改.
pub fn contrast_to_noise_ratio<S, L, A, E>(
    grayscale: &VolumeBuffer<S>,
    lesion: &VolumeBuffer<L>,
    aligner: &A,
    executor: &E,
    config: &OpsConfig,
) -> VolResult<CnrReport>
where
    S: AsPrimitive<f64>,
    L: PrimInt + From<u8>,
    A: Aligner<L> + ?Sized,
    E: RelabelExecutor<L> + ?Sized,
{
    log::info!("CNR of `{}` over `{}` started", lesion.name(), grayscale.name());
    let start = Instant::now();

    let mut symmetric = lesion.clone_as(slot::SYMMETRIC_LABEL)?;
    apply_sign_flip(&mut [&mut symmetric], AxisFlips::LEFT_RIGHT, config.empty_flip)?;
    relabel_with(
        executor,
        &mut symmetric,
        config.relabel_threshold,
        <L as From<u8>>::from(config.symmetric_label),
    )?;

    let lesion_stats = masked_stats(grayscale, &*aligned(grayscale, lesion, aligner)?)?;
    let symmetric_stats = masked_stats(grayscale, &*aligned(grayscale, &symmetric, aligner)?)?;
    let cnr = cnr_from_stats(&lesion_stats, &symmetric_stats)?;

    log::info!(
        "CNR = {cnr:.4} (done in {:.2} s)",
        start.elapsed().as_secs_f64()
    );
    Ok(CnrReport {
        lesion: lesion_stats,
        symmetric: symmetric_stats,
        cnr,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use ndarray::Axis;

    use super::{cnr_from_stats, contrast_to_noise_ratio};
    use crate::config::OpsConfig;
    use crate::host::{Aligner, ExecutorError, RelabelExecutor, RelabelRequest};
    use crate::stats::StatResult;
    use crate::threshold::InProcessRelabel;
    use crate::{Geometry, VolError, VolResult, VolumeBuffer};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// 用 x 方向的数组反转模拟左右翻转后的重采样.
    #[derive(Default)]
    struct MirrorAligner {
        calls: Cell<usize>,
    }

    impl Aligner<u8> for MirrorAligner {
        fn resample(
            &self,
            moving: &VolumeBuffer<u8>,
            reference: &Geometry,
        ) -> VolResult<VolumeBuffer<u8>> {
            self.calls.set(self.calls.get() + 1);
            let mut data = moving.scalars()?.to_owned();
            data.invert_axis(Axis(2));
            let data = data.as_standard_layout().into_owned();
            VolumeBuffer::new(
                moving.name(),
                reference.dims,
                reference.spacing,
                reference.origin,
                data,
            )
        }
    }

    /// dims = (4, 2, 1): x = 0 处灰度为 100, x = 3 处灰度为 70 / 90.
    fn scenario() -> (VolumeBuffer<f32>, VolumeBuffer<u8>) {
        let gray = VolumeBuffer::from_raw(
            "gray",
            (4, 2, 1),
            [1.0; 3],
            [0.0; 3],
            vec![100.0f32, 1.0, 2.0, 70.0, 100.0, 3.0, 4.0, 90.0],
        )
        .unwrap();
        let lesion = VolumeBuffer::from_raw(
            "lesion",
            (4, 2, 1),
            [1.0; 3],
            [0.0; 3],
            vec![1u8, 0, 0, 0, 1, 0, 0, 0],
        )
        .unwrap();
        (gray, lesion)
    }

    #[test]
    fn test_cnr_from_stats() {
        let a = StatResult {
            mean: 100.0,
            std_dev: 0.0,
            voxel_count: 2,
        };
        let b = StatResult {
            mean: 80.0,
            std_dev: 10.0,
            voxel_count: 2,
        };
        assert!(f64_eq(cnr_from_stats(&a, &b).unwrap(), 2.0));
        assert!(matches!(
            cnr_from_stats(&b, &a),
            Err(VolError::DivisionByZero)
        ));
    }

    #[test]
    fn test_cnr_scenario() {
        let (gray, lesion) = scenario();
        let aligner = MirrorAligner::default();
        let r = contrast_to_noise_ratio(
            &gray,
            &lesion,
            &aligner,
            &InProcessRelabel,
            &OpsConfig::default(),
        )
        .unwrap();

        assert!(f64_eq(r.lesion.mean, 100.0));
        assert!(f64_eq(r.lesion.std_dev, 0.0));
        assert!(f64_eq(r.symmetric.mean, 80.0));
        assert!(f64_eq(r.symmetric.std_dev, 10.0));
        assert_eq!(r.symmetric.voxel_count, 2);
        assert!(f64_eq(r.cnr, 2.0));

        // 只有翻转后的对称标签需要重采样.
        assert_eq!(aligner.calls.get(), 1);
        // 病灶标签未被修改.
        assert_eq!(lesion.to_raw_vec().unwrap(), vec![1, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_cnr_flat_symmetric_region() {
        let (mut gray, lesion) = scenario();
        gray.scalars_mut().unwrap().fill(5.0);
        let r = contrast_to_noise_ratio(
            &gray,
            &lesion,
            &MirrorAligner::default(),
            &InProcessRelabel,
            &OpsConfig::default(),
        );
        assert!(matches!(r, Err(VolError::DivisionByZero)));
    }

    #[test]
    fn test_cnr_empty_lesion() {
        let (gray, mut lesion) = scenario();
        lesion.scalars_mut().unwrap().fill(0);
        let r = contrast_to_noise_ratio(
            &gray,
            &lesion,
            &MirrorAligner::default(),
            &InProcessRelabel,
            &OpsConfig::default(),
        );
        assert!(matches!(r, Err(VolError::EmptyMask)));
    }

    struct Unreachable;

    impl RelabelExecutor<u8> for Unreachable {
        fn execute(&self, _: RelabelRequest<'_, u8>) -> Result<usize, ExecutorError> {
            Err(ExecutorError::Unreachable("relabel service is down".into()))
        }
    }

    #[test]
    fn test_cnr_executor_unreachable() {
        let (gray, lesion) = scenario();
        let aligner = MirrorAligner::default();
        let r = contrast_to_noise_ratio(
            &gray,
            &lesion,
            &aligner,
            &Unreachable,
            &OpsConfig::default(),
        );
        assert!(matches!(r, Err(VolError::ExecutorUnreachable(_))));
        assert_eq!(aligner.calls.get(), 0);
    }
}
