//! 标签图的门限重赋值.

use std::time::Instant;

use num::traits::AsPrimitive;
use num::PrimInt;

use crate::host::{ExecutorError, RelabelExecutor, RelabelRequest};
use crate::{VolResult, VolumeBuffer};

/// 将 `label` 中所有严格大于 `threshold` 的体素改写为 `value`, 其余体素保持不变.
///
/// 返回总共改写的体素个数.
pub fn relabel_above<T>(label: &mut VolumeBuffer<T>, threshold: f64, value: T) -> VolResult<usize>
where
    T: AsPrimitive<f64>,
{
    let mut cnt = 0usize;
    label
        .scalars_mut()?
        .iter_mut()
        .filter(|p| (**p).as_() > threshold)
        .for_each(|p| {
            cnt += 1;
            *p = value;
        });
    Ok(cnt)
}

/// 将标签图中所有大于 0 的体素改写为 `value`, 值为 0 的体素保持不变.
///
/// 对于非负标签图, 等价于 `out = if in > 0 { value } else { 0 }`.
/// 返回总共改写的体素个数.
pub fn relabel<T: PrimInt>(label: &mut VolumeBuffer<T>, value: T) -> VolResult<usize> {
    let zero = T::zero();
    let mut cnt = 0usize;
    label
        .scalars_mut()?
        .iter_mut()
        .filter(|p| **p > zero)
        .for_each(|p| {
            cnt += 1;
            *p = value;
        });
    Ok(cnt)
}

/// 在本进程内直接完成 relabel 的执行器.
#[derive(Copy, Clone, Debug, Default)]
pub struct InProcessRelabel;

impl<T> RelabelExecutor<T> for InProcessRelabel
where
    T: AsPrimitive<f64>,
{
    fn execute(&self, request: RelabelRequest<'_, T>) -> Result<usize, ExecutorError> {
        relabel_above(request.input, request.threshold, request.above_value)
            .map_err(|e| ExecutorError::Failed(1, e.to_string()))
    }
}

/// 通过 `executor` 同步地 relabel `label`, 结果原地写回.
///
/// 执行器错误被原样转换为 `ExecutorUnreachable` 或 `ExecutorFailed`, 不做重试.
pub fn relabel_with<T, E>(
    executor: &E,
    label: &mut VolumeBuffer<T>,
    threshold: f64,
    value: T,
) -> VolResult<usize>
where
    E: RelabelExecutor<T> + ?Sized,
{
    log::debug!("changing label value of `{}`...", label.name());
    let start = Instant::now();

    let slot = label.name().to_string();
    let cnt = executor.execute(RelabelRequest {
        input: label,
        output_slot: &slot,
        threshold,
        above_value: value,
    })?;

    log::debug!(
        "relabeled {cnt} voxels of `{slot}` (done in {:.2} s)",
        start.elapsed().as_secs_f64()
    );
    Ok(cnt)
}
