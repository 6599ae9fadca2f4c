//! 对 `vol-berry::dataset` 的更一层封装. 提供更直接的时间步序列加载器.

use std::env;
use std::path::{Path, PathBuf};

use vol_berry::dataset::{self, NiftiSeriesResolver};
use vol_berry::recipe::{self, SeriesMember};
use vol_berry::NiftiScalar;

/// 数据集根目录的环境变量名.
pub const SERIES_ROOT_ENV: &str = "VOL_BERRY_SERIES_ROOT";

/// 获取时间步数据集根目录.
///
/// 1. 若环境变量 `$VOL_BERRY_SERIES_ROOT` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/ProstateStudy`;
/// 3. 无法确定用户主目录时返回 `None`.
pub fn series_root_from_env_or_home() -> Option<PathBuf> {
    match env::var(SERIES_ROOT_ENV) {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => dataset::home_dataset_dir_with(["ProstateStudy"]),
    }
}

/// 加载 `root` 下病人 `patient` 的全部时间步. 无法加载的时间步记为缺失.
pub fn load_patient<T, P>(root: P, patient: &str) -> Vec<SeriesMember<T>>
where
    T: NiftiScalar,
    P: AsRef<Path>,
{
    let resolver = NiftiSeriesResolver::new(root);
    recipe::resolve_series(&resolver, dataset::timestep_identifiers(patient))
}
