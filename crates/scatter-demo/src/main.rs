use std::process::ExitCode;

use scatter_engine::device::GpuInit;
use scatter_engine::logging::{init_logging, LoggingConfig};
use scatter_engine::window::{Runtime, RuntimeConfig};
use scatter_engine::{SceneConfig, Shape};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    // `--triangles` draws the shader-hardcoded triangle; the default is the ring mesh.
    let shape = if std::env::args().skip(1).any(|a| a == "--triangles") {
        Shape::Triangle
    } else {
        Shape::default()
    };

    let scene = SceneConfig {
        shape,
        ..SceneConfig::default()
    };

    match Runtime::run(RuntimeConfig::default(), GpuInit::default(), scene) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("scatter stopped: {err:#}");
            ExitCode::FAILURE
        }
    }
}
