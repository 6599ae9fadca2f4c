//! 时间步序列的准备与显示.

use either::Either;
use itertools::Itertools;

use crate::config::OpsConfig;
use crate::consts::TIMESTEP_SERIES_LEN;
use crate::geometry::{apply_sign_flip, recenter_origin};
use crate::host::{DisplayConfigurator, VolumeResolver};
use crate::{AxisFlips, VolError, VolResult, VolumeBuffer, WindowLevel};

/// 时间步序列中的一个成员.
#[derive(Debug, Clone)]
pub enum SeriesMember<T> {
    /// 已解析的体数据.
    Resolved(VolumeBuffer<T>),

    /// 无法解析的成员, 携带其标识.
    Missing(String),
}

impl<T> SeriesMember<T> {
    /// 成员标识. 已解析成员为体数据名称.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Resolved(v) => v.name(),
            Self::Missing(id) => id,
        }
    }

    /// 已解析的体数据.
    #[inline]
    pub fn buffer(&self) -> Option<&VolumeBuffer<T>> {
        match self {
            Self::Resolved(v) => Some(v),
            Self::Missing(_) => None,
        }
    }
}

/// 序列准备完成后的报告.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesReport {
    /// 按原顺序排列的成员名称.
    pub members: Vec<String>,

    /// 显示窗口.
    pub window: WindowLevel,
}

/// 依次通过 `resolver` 解析 `ids`, 无法解析的标识记为 [`SeriesMember::Missing`].
pub fn resolve_series<T, R, I>(resolver: &R, ids: I) -> Vec<SeriesMember<T>>
where
    R: VolumeResolver<T> + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ids.into_iter()
        .map(|id| {
            let id = id.as_ref();
            match resolver.resolve(id) {
                Some(v) => SeriesMember::Resolved(v),
                None => {
                    log::warn!("`{id}` cannot be resolved");
                    SeriesMember::Missing(id.to_string())
                }
            }
        })
        .collect()
}

/// 准备时间步序列: 对每个成员重定心原点, 然后统一施加上下翻转.
///
/// 1. 成员个数超过 8 时返回 `SeriesTooLong`;
/// 2. 存在任何无法解析的成员时返回 `IncompleteSeries`, 列出全部缺失标识,
///   此时已解析的成员 **不会** 被修改;
/// 3. 空序列的行为由 `config.empty_flip` 决定.
pub fn prepare_series<T>(
    members: &mut [SeriesMember<T>],
    config: &OpsConfig,
) -> VolResult<SeriesReport> {
    if members.len() > TIMESTEP_SERIES_LEN {
        return Err(VolError::SeriesTooLong {
            max: TIMESTEP_SERIES_LEN,
            found: members.len(),
        });
    }

    let (mut resolved, missing): (Vec<&mut VolumeBuffer<T>>, Vec<String>) =
        members.iter_mut().partition_map(|m| match m {
            SeriesMember::Resolved(v) => Either::Left(v),
            SeriesMember::Missing(id) => Either::Right(id.clone()),
        });
    if !missing.is_empty() {
        log::warn!("series is incomplete, missing {missing:?}");
        return Err(VolError::IncompleteSeries { missing });
    }

    for v in resolved.iter_mut() {
        recenter_origin(v);
    }
    apply_sign_flip(&mut resolved, AxisFlips::INFERIOR_SUPERIOR, config.empty_flip)?;

    let members: Vec<String> = resolved.iter().map(|v| v.name().to_string()).collect();
    log::info!("series {members:?} is ready");
    Ok(SeriesReport {
        members,
        window: config.timestep_window,
    })
}

/// 将已准备好的每个成员连同报告中的窗口交给 `display`.
pub fn configure_display<T, D>(
    members: &[SeriesMember<T>],
    report: &SeriesReport,
    display: &mut D,
) -> VolResult<()>
where
    D: DisplayConfigurator<T> + ?Sized,
{
    members
        .iter()
        .filter_map(SeriesMember::buffer)
        .try_for_each(|v| display.configure(v, report.window))
}
