use std::sync::Arc;

use chrono::{DateTime, Utc};
use fileprops_fs::{NoVirtualFs, Platform, ProcessRunner, SystemProcessRunner, VirtualFs};
use fileprops_runtime::ConfigSource;

use crate::{assets::Assets, format::ModeBits};

/// Source of "now" for relative timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Collaborators shared by every render of a session.
#[derive(Clone)]
pub struct RenderEnv {
    pub settings: Arc<dyn ConfigSource>,
    pub processes: Arc<dyn ProcessRunner>,
    pub virtual_fs: Arc<dyn VirtualFs>,
    pub assets: Arc<Assets>,
    pub clock: Arc<dyn Clock>,
    pub platform: Platform,
    /// Permission bits the platform can report.
    pub mode_support: ModeBits,
}

impl RenderEnv {
    /// Environment backed by the real system.
    pub fn new(settings: Arc<dyn ConfigSource>, assets: Arc<Assets>) -> Self {
        Self {
            settings,
            processes: Arc::new(SystemProcessRunner),
            virtual_fs: Arc::new(NoVirtualFs),
            assets,
            clock: Arc::new(SystemClock),
            platform: Platform::current(),
            mode_support: ModeBits::platform_supported(),
        }
    }

    pub fn with_processes(mut self, processes: Arc<dyn ProcessRunner>) -> Self {
        self.processes = processes;
        self
    }

    pub fn with_virtual_fs(mut self, virtual_fs: Arc<dyn VirtualFs>) -> Self {
        self.virtual_fs = virtual_fs;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_platform(mut self, platform: Platform, mode_support: ModeBits) -> Self {
        self.platform = platform;
        self.mode_support = mode_support;
        self
    }
}
