//! 由基础运算组合而成的固定处理流程.
//!
//! 各流程只依赖 [`crate::host`] 中的协作接口, 不直接访问任何宿主应用状态.

mod cnr;
mod multi;
mod series;

pub use cnr::{cnr_from_stats, contrast_to_noise_ratio, CnrReport};
pub use multi::{multi_volume_combine, pairwise_combine, CombineOutputs};
pub use series::{configure_display, prepare_series, resolve_series, SeriesMember, SeriesReport};
