#[allow(clippy::module_inception)]
mod config;

pub use config::{
    get_config_path, get_log_file_path, init_wheel_config, load_wheel_config, WheelConfig,
};
