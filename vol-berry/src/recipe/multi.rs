//! 多路与两路体数据合成.

use num::PrimInt;

use crate::combine::{average, max_projection};
use crate::config::{AveragePolicy, OpsConfig};
use crate::consts::{slot, MULTI_COMBINE_LEN};
use crate::host::CommitSink;
use crate::{VolResult, VolumeBuffer};

/// 四路合成的两个结果.
#[derive(Debug, Clone)]
pub struct CombineOutputs<T> {
    /// 平均结果, 默认命名为 `ts2334`.
    pub average: VolumeBuffer<T>,

    /// 最大值投影结果, 默认命名为 `proj_2345`.
    pub projection: VolumeBuffer<T>,
}

impl<T> CombineOutputs<T> {
    /// 以结果名称作为槽位, 依次提交平均结果和最大值投影结果.
    pub fn commit_into<C>(self, sink: &mut C) -> VolResult<()>
    where
        C: CommitSink<T> + ?Sized,
    {
        let Self {
            average,
            projection,
        } = self;
        let slot = average.name().to_string();
        sink.commit(&slot, average)?;
        let slot = projection.name().to_string();
        sink.commit(&slot, projection)
    }
}

/// 对恰好 4 个形状一致的体数据同时做平均和最大值投影.
///
/// 平均方式由 `config.average` 决定. 输入不会被修改.
pub fn multi_volume_combine<T>(
    inputs: [&VolumeBuffer<T>; MULTI_COMBINE_LEN],
    config: &OpsConfig,
) -> VolResult<CombineOutputs<T>>
where
    T: PrimInt + Send + Sync,
{
    log::info!(
        "combining {:?}",
        inputs.iter().map(|v| v.name()).collect::<Vec<_>>()
    );
    let average = average(&inputs, config.average, slot::AVERAGE)?;
    let projection = max_projection(&inputs, slot::PROJECTION)?;
    log::info!("combined into `{}` and `{}`", average.name(), projection.name());
    Ok(CombineOutputs {
        average,
        projection,
    })
}

/// 两路平均 `a / 2 + b / 2`, 结果继承 `a` 的几何元信息, 命名为 `CombinedVolume`.
///
/// 两路时各平均方式结果一致.
#[inline]
pub fn pairwise_combine<T>(a: &VolumeBuffer<T>, b: &VolumeBuffer<T>) -> VolResult<VolumeBuffer<T>>
where
    T: PrimInt + Send + Sync,
{
    average(&[a, b], AveragePolicy::Corrected, slot::PAIRWISE)
}
