//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Dim3;

pub use crate::data::{Axis3, AxisFlips, Geometry, TransformMatrix, VolumeBuffer, WindowLevel};
pub use crate::error::{VolError, VolResult};

pub use crate::config::{AveragePolicy, EmptyInputPolicy, OpsConfig};
pub use crate::consts::{MULTI_COMBINE_LEN, TIMESTEP_SERIES_LEN};

pub use crate::combine::{average, max_projection};
pub use crate::geometry::{apply_sign_flip, needs_resampling, recenter_origin};
pub use crate::stats::{masked_stats, StatResult};
pub use crate::threshold::{relabel, relabel_with, InProcessRelabel};

pub use crate::host::{
    Aligner, CommitSink, DisplayConfigurator, ExecutorError, RelabelExecutor, RelabelRequest,
    VolumeResolver,
};
pub use crate::recipe::{
    contrast_to_noise_ratio, multi_volume_combine, pairwise_combine, prepare_series,
    SeriesMember,
};

pub use crate::dataset::home_dataset_dir_with;
pub use crate::dataset::{self, NiftiSeriesResolver};
