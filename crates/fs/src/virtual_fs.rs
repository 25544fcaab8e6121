use std::{
    collections::HashMap,
    io,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use url::Url;

/// Metadata a host exposes for a virtual resource.
///
/// Timestamps are milliseconds since the Unix epoch; hosts report
/// non-positive values when a timestamp is not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualStat {
    pub size: u64,
    pub ctime: i64,
    pub mtime: i64,
}

pub trait VirtualFs: Send + Sync {
    fn stat(&self, url: &Url) -> io::Result<VirtualStat>;
}

/// Host without virtual resources; every stat fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVirtualFs;

impl VirtualFs for NoVirtualFs {
    fn stat(&self, url: &Url) -> io::Result<VirtualStat> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no provider for scheme {:?}", url.scheme()),
        ))
    }
}

/// Stats pushed by the host ahead of a render.
#[derive(Debug, Default)]
pub struct StaticVirtualFs {
    entries: RwLock<HashMap<String, VirtualStat>>,
}

impl StaticVirtualFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &Url, stat: VirtualStat) {
        self.write().insert(url.as_str().to_owned(), stat);
    }

    pub fn remove(&self, url: &Url) -> Option<VirtualStat> {
        self.write().remove(url.as_str())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, VirtualStat>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, VirtualStat>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl VirtualFs for StaticVirtualFs {
    fn stat(&self, url: &Url) -> io::Result<VirtualStat> {
        self.read().get(url.as_str()).copied().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{url} is not known"))
        })
    }
}
