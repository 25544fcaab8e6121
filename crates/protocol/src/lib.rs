pub mod codec;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a surface was opened: a panel for one resource, or the side view that
/// follows the active editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Command,
    #[default]
    Static,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Command => "command",
            ViewKind::Static => "static",
        }
    }
}

/// Late value for a row that was rendered with a placeholder.
///
/// Serialized as `{"command":"row-update","renderGeneration":..,...}`, which
/// is what the document's inline script listens for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename = "row-update", rename_all = "camelCase")]
pub struct RowUpdate {
    pub render_generation: u64,
    pub row_kind: String,
    pub async_token: String,
    pub value: String,
}

/// Messages posted by the rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum ViewMessage {
    Open { target: String },
    OpenExternal { target: String },
    Log { data: Value },
}

/// Stat of a virtual resource supplied by the host, timestamps in
/// milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStat {
    pub size: u64,
    pub ctime: i64,
    pub mtime: i64,
}

/// Host to daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SurfaceEvent {
    /// First message on a connection: the surface exists and shows `locator`.
    Attach {
        view: ViewKind,
        #[serde(default)]
        locator: Option<String>,
        #[serde(default)]
        stat: Option<HostStat>,
    },
    /// The subject resource changed (active editor switched).
    Show {
        #[serde(default)]
        locator: Option<String>,
        #[serde(default)]
        stat: Option<HostStat>,
    },
    Visible,
    Saved {
        locator: String,
        #[serde(default)]
        stat: Option<HostStat>,
    },
    /// Settings changed; `None` means re-read the settings file.
    ConfigChanged {
        #[serde(default)]
        settings: Option<Map<String, Value>>,
    },
    View { message: ViewMessage },
    Dispose,
}

/// Daemon to host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SurfaceCommand {
    SetDocument { html: String },
    Post { message: RowUpdate },
    OpenInEditor { target: String },
    Notify { message: String },
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
