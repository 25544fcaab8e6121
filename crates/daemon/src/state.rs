use std::sync::Arc;

use anyhow::Context;
use fileprops_engine::{Assets, RenderEnv};
use fileprops_fs::StaticVirtualFs;
use fileprops_runtime::Settings;
use log::info;

use crate::config::DaemonConfig;

pub struct DaemonState {
    pub config: DaemonConfig,
    assets: Arc<Assets>,
}

/// Per-connection collaborators. The settings and virtual stats are updated by
/// the connection's reader as host events arrive.
pub struct SessionParts {
    pub env: RenderEnv,
    pub settings: Arc<Settings>,
    pub virtual_fs: Arc<StaticVirtualFs>,
}

impl DaemonState {
    pub fn new(config: DaemonConfig) -> anyhow::Result<Self> {
        let assets = match &config.assets_dir {
            Some(dir) => Assets::load(dir)
                .with_context(|| format!("Failed to load assets from {}", dir.display()))?,
            None => Assets::bundled(),
        };

        if let Some(dir) = &config.assets_dir {
            info!("Using assets from {}", dir.display());
        }

        Ok(Self {
            config,
            assets: Arc::new(assets),
        })
    }

    pub fn session_parts(&self) -> SessionParts {
        let settings = Arc::new(Settings::from_file(&self.config.settings_path));
        let virtual_fs = Arc::new(StaticVirtualFs::new());
        let env = RenderEnv::new(settings.clone(), Arc::clone(&self.assets))
            .with_virtual_fs(virtual_fs.clone());

        SessionParts {
            env,
            settings,
            virtual_fs,
        }
    }
}
