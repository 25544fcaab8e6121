use std::sync::Arc;

mod config;
mod rpc;
mod state;

use anyhow::Context;
use config::DaemonConfig;
use fileprops_runtime::logging;
use state::DaemonState;

use log::info;

fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::from_env()?;

    match &config.log_file {
        Some(path) => logging::init_with_file(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?,
        None => {
            logging::init().ok();
        }
    }

    info!(
        "Starting fileprops daemon: socket={}, settings={}",
        config.socket_path.display(),
        config.settings_path.display(),
    );

    let state = Arc::new(DaemonState::new(config)?);
    rpc::run_rpc_server(state)
}
