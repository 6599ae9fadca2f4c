//! 程序运行函数.

use std::path::Path;
use std::time::Instant;

use utils::loader;
use vol_berry::config::OpsConfig;
use vol_berry::host::DisplayConfigurator;
use vol_berry::recipe;
use vol_berry::{VolResult, VolumeBuffer, WindowLevel};

use crate::result::SeriesResult;

/// 以日志代替实际显示的显示配置器, 记录每个体数据的窗口.
#[derive(Default)]
struct LogDisplay {
    shown: Vec<(String, WindowLevel)>,
}

impl DisplayConfigurator<f32> for LogDisplay {
    fn configure(&mut self, buffer: &VolumeBuffer<f32>, window: WindowLevel) -> VolResult<()> {
        let gray = buffer.to_display(&window)?;
        let clipped = gray.iter().filter(|&&g| g == u8::MIN || g == u8::MAX).count();
        log::info!(
            "showing `{}` in [{}, {}], {clipped}/{} voxels clipped",
            buffer.name(),
            window.lower_bound(),
            window.upper_bound(),
            gray.len()
        );
        self.shown.push((buffer.name().to_string(), window));
        Ok(())
    }
}

/// 实际运行. `root` 为数据集根目录.
pub fn run(root: &Path, patient: &str) -> VolResult<SeriesResult> {
    log::info!("loading patient {patient} from {}", root.display());

    let start = Instant::now();
    let mut members = loader::load_patient::<f32, _>(root, patient);
    let report = recipe::prepare_series(&mut members, &OpsConfig::default())?;

    let mut display = LogDisplay::default();
    recipe::configure_display(&members, &report, &mut display)?;

    Ok(SeriesResult {
        patient: patient.to_string(),
        shown: display.shown,
        elapsed: start.elapsed(),
    })
}
