use std::path::PathBuf;

pub const PROGRAM_NAME: &str = "fileprops";
pub const PROGRAM_LOG_LEVEL: &str = "FILEPROPS_LOG_LEVEL";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const SOCKET_FILE_NAME: &str = "daemon.sock";

/// Configuration keys understood by the renderer.
pub mod keys {
    pub const SIZE_MODE: &str = "sizeMode";
    pub const DATE_TIME_FORMAT: &str = "dateTimeFormat";
    pub const DISABLE_RELATIVE_TIMESTAMPS: &str = "disableRelativeTimestamps";
    pub const QUERY_MEDIA_INFO: &str = "queryMediaInfo";
    pub const OUTPUT_STYLE_PATH: &str = "outputStylePath";
    pub const SHOW_HEADER: &str = "showHeader";
    pub const ZEBRA_STRIPES: &str = "zebraStripes";
    pub const PROPERTY_ROWS: &str = "propertyRows";
}

pub fn xdg_or_home(xdg_var: &str, home_suffix: &str) -> PathBuf {
    if let Some(dir) = std::env::var_os(xdg_var) {
        PathBuf::from(dir)
    } else {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(home_suffix)
    }
}

/// Directory for runtime files such as the daemon socket.
pub fn runtime_dir() -> PathBuf {
    xdg_or_home("XDG_CACHE_HOME", ".cache").join(PROGRAM_NAME)
}

pub fn default_socket_path() -> PathBuf {
    runtime_dir().join(SOCKET_FILE_NAME)
}

/// Directory holding the user's settings file.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME")
        && !dir.is_empty()
    {
        return PathBuf::from(dir).join(PROGRAM_NAME);
    }

    dirs::config_dir()
        .unwrap_or_else(|| xdg_or_home("XDG_CONFIG_HOME", ".config"))
        .join(PROGRAM_NAME)
}

/// Default settings file path
pub fn default_settings_path() -> PathBuf {
    config_dir().join(SETTINGS_FILE_NAME)
}
