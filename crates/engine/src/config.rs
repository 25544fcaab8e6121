use std::path::PathBuf;

use fileprops_runtime::{ConfigSource, keys};
use log::debug;
use serde_json::Value;

use crate::kind::RowKind;

/// Unit factor for byte sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Powers of 1000: kB, MB, ...
    #[default]
    Decimal,
    /// Powers of 1024: KiB, MiB, ...
    Binary,
}

impl SizeMode {
    pub fn factor(self) -> f64 {
        match self {
            SizeMode::Decimal => 1000.0,
            SizeMode::Binary => 1024.0,
        }
    }

    fn from_setting(value: &str) -> Option<Self> {
        match value {
            "kilo" | "decimal" => Some(SizeMode::Decimal),
            "kibi" | "binary" => Some(SizeMode::Binary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ZebraStripes {
    Off,
    #[default]
    On,
    /// Stripes in a CSS color of the user's choosing.
    Custom(String),
}

impl ZebraStripes {
    fn from_setting(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(false) => Some(ZebraStripes::Off),
            Value::Bool(true) => Some(ZebraStripes::On),
            Value::String(color) if color.trim().is_empty() => Some(ZebraStripes::On),
            Value::String(color) => Some(ZebraStripes::Custom(color.trim().to_owned())),
            _ => None,
        }
    }
}

/// Typed view of the settings, read fresh for every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub rows: Vec<RowKind>,
    pub date_format: Option<String>,
    pub relative_timestamps: bool,
    pub size_mode: SizeMode,
    pub show_header: bool,
    pub zebra_stripes: ZebraStripes,
    pub style_path: Option<PathBuf>,
    pub query_media_info: bool,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            rows: RowKind::ALL.to_vec(),
            date_format: None,
            relative_timestamps: true,
            size_mode: SizeMode::Decimal,
            show_header: true,
            zebra_stripes: ZebraStripes::On,
            style_path: None,
            query_media_info: false,
        }
    }
}

impl ConfigSnapshot {
    /// Read every key, falling back to defaults for missing or mistyped
    /// values.
    pub fn read(source: &dyn ConfigSource) -> Self {
        let defaults = Self::default();

        let bool_or = |key: &str, default: bool| {
            source
                .get(key)
                .and_then(|v| v.as_bool())
                .unwrap_or(default)
        };
        let string = |key: &str| {
            source
                .get(key)
                .and_then(|v| v.as_str().map(str::to_owned))
                .filter(|s| !s.trim().is_empty())
        };

        Self {
            rows: source
                .get(keys::PROPERTY_ROWS)
                .and_then(|v| parse_rows(&v))
                .unwrap_or(defaults.rows),
            date_format: string(keys::DATE_TIME_FORMAT),
            relative_timestamps: !bool_or(keys::DISABLE_RELATIVE_TIMESTAMPS, false),
            size_mode: string(keys::SIZE_MODE)
                .and_then(|s| SizeMode::from_setting(&s))
                .unwrap_or(defaults.size_mode),
            show_header: bool_or(keys::SHOW_HEADER, defaults.show_header),
            zebra_stripes: source
                .get(keys::ZEBRA_STRIPES)
                .and_then(|v| ZebraStripes::from_setting(&v))
                .unwrap_or(defaults.zebra_stripes),
            style_path: string(keys::OUTPUT_STYLE_PATH).map(PathBuf::from),
            query_media_info: bool_or(keys::QUERY_MEDIA_INFO, defaults.query_media_info),
        }
    }
}

/// Ordered row selection. Unknown or non-string descriptors are dropped; a
/// value that is not an array means "use the defaults".
fn parse_rows(value: &Value) -> Option<Vec<RowKind>> {
    let items = value.as_array()?;

    let rows = items
        .iter()
        .filter_map(|item| {
            let descriptor = item.as_str()?;
            let kind = RowKind::from_descriptor(descriptor);
            if kind.is_none() {
                debug!("ignoring unknown row descriptor {descriptor:?}");
            }
            kind
        })
        .collect();

    Some(rows)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
