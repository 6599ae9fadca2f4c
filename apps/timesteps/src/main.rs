//! 准备并展示单个病人的超声时间步序列.
//!
//! 用法: `timesteps <病人编号>`. 数据集根目录见 `utils::loader`.

use std::process::ExitCode;

mod result;
mod runner;

fn main() -> ExitCode {
    let _ = simple_logger::init_with_level(log::Level::Info);

    let Some(patient) = std::env::args().nth(1) else {
        eprintln!("usage: timesteps <patient>");
        return ExitCode::FAILURE;
    };

    let Some(root) = utils::loader::series_root_from_env_or_home() else {
        eprintln!("cannot determine dataset root, set `${}`", utils::loader::SERIES_ROOT_ENV);
        return ExitCode::FAILURE;
    };

    match runner::run(&root, &patient) {
        Ok(r) => {
            r.analyze();
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
