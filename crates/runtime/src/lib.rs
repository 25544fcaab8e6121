mod config;
pub mod logging;
pub mod settings;

pub use config::{
    PROGRAM_NAME, config_dir, default_settings_path, default_socket_path, keys, runtime_dir,
};
pub use settings::{ConfigSource, Settings};

pub use logging::init;
