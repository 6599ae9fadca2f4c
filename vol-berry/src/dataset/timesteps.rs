//! 超声时间步体数据的文件组织.
//!
//! 每个病人有 8 个时间步, 位于 `invivo/Patient{N}/loupas/` 下,
//! 文件名形如 `avolume_ts{k}_737_370_366.nii.gz`, `k = 1..=8`.

use std::path::{Path, PathBuf};

use crate::consts::TIMESTEP_SERIES_LEN;
use crate::data::NiftiScalar;
use crate::host::VolumeResolver;
use crate::VolumeBuffer;

/// 病人 `patient` 第 `k` 个时间步相对于数据集根目录的路径.
#[inline]
pub fn timestep_filename(patient: &str, k: usize) -> String {
    format!("invivo/Patient{patient}/loupas/avolume_ts{k}_737_370_366.nii.gz")
}

/// 病人 `patient` 全部时间步的标识, 按时间步顺序排列.
pub fn timestep_identifiers(patient: &str) -> Vec<String> {
    (1..=TIMESTEP_SERIES_LEN)
        .map(|k| timestep_filename(patient, k))
        .collect()
}

/// 从文件系统解析 nifti 体数据. 标识被视为相对于 `root` 的路径.
#[derive(Debug, Clone)]
pub struct NiftiSeriesResolver {
    root: PathBuf,
}

impl NiftiSeriesResolver {
    /// 以 `root` 为数据集根目录创建解析器.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_owned(),
        }
    }

    /// 数据集根目录.
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl<T: NiftiScalar> VolumeResolver<T> for NiftiSeriesResolver {
    /// 文件不存在或无法解析时返回 `None`, 并记录警告.
    fn resolve(&self, id: &str) -> Option<VolumeBuffer<T>> {
        let path = self.root.join(id);
        match VolumeBuffer::<T>::open(&path) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("failed to load {}: {e}", path.display());
                None
            }
        }
    }
}
