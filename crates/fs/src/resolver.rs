use std::{
    fs::{self, Metadata},
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Utc};
use log::debug;
use thiserror::Error;
use url::Url;

use crate::{locator::Locator, virtual_fs::VirtualFs};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to stat {}: {source}", .path.display())]
    Stat { path: PathBuf, source: io::Error },
    #[error("failed to resolve real path of {}: {source}", .path.display())]
    RealPath { path: PathBuf, source: io::Error },
    #[error("failed to stat {url}: {source}")]
    Virtual { url: Url, source: io::Error },
}

/// Descriptive facts about one resource, resolved once per render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFacts {
    pub locator: Locator,
    pub name: String,
    /// Containing directory; virtual resources have none.
    pub parent: Option<String>,
    /// Link-resolved path, real filesystem entries only.
    pub canonical: Option<PathBuf>,
    pub size: u64,
    pub created: Option<DateTime<Utc>>,
    /// Inode status change time.
    pub changed: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
    pub mode: Option<u32>,
    pub owner_id: Option<u32>,
    pub group_id: Option<u32>,
    pub is_dir: bool,
}

impl ResourceFacts {
    pub fn path(&self) -> Option<&Path> {
        self.locator.as_path()
    }

    /// Full location as shown to the user: the path, or the URI of a virtual
    /// resource.
    pub fn full_path(&self) -> String {
        self.locator.to_string()
    }

    pub fn owner_ids(&self) -> Option<(u32, u32)> {
        Some((self.owner_id?, self.group_id?))
    }
}

/// Resolve the facts for `locator`.
///
/// A failed stat is final; there are no retries.
pub fn resolve(locator: &Locator, virtual_fs: &dyn VirtualFs) -> Result<ResourceFacts, ResolveError> {
    match locator {
        Locator::File(path) => resolve_file(path),
        Locator::Virtual(url) => resolve_virtual(url, virtual_fs),
    }
}

fn resolve_file(path: &Path) -> Result<ResourceFacts, ResolveError> {
    let path = std::path::absolute(path).map_err(|source| ResolveError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata = fs::metadata(&path).map_err(|source| ResolveError::Stat {
        path: path.clone(),
        source,
    })?;

    let canonical = fs::canonicalize(&path).map_err(|source| ResolveError::RealPath {
        path: path.clone(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let parent = path
        .parent()
        .map(|p| p.display().to_string())
        .filter(|p| !p.is_empty());

    let (mode, owner_id, group_id) = unix_ids(&metadata);

    debug!("resolved {} ({} bytes)", path.display(), metadata.len());

    Ok(ResourceFacts {
        name,
        parent,
        canonical: Some(canonical),
        size: metadata.len(),
        created: to_datetime(metadata.created().ok()),
        changed: changed_time(&metadata),
        modified: to_datetime(metadata.modified().ok()),
        accessed: to_datetime(metadata.accessed().ok()),
        mode,
        owner_id,
        group_id,
        is_dir: metadata.is_dir(),
        locator: Locator::File(path),
    })
}

fn resolve_virtual(url: &Url, virtual_fs: &dyn VirtualFs) -> Result<ResourceFacts, ResolveError> {
    let stat = virtual_fs.stat(url).map_err(|source| ResolveError::Virtual {
        url: url.clone(),
        source,
    })?;

    Ok(ResourceFacts {
        locator: Locator::Virtual(url.clone()),
        name: virtual_name(url),
        parent: None,
        canonical: None,
        size: stat.size,
        created: from_epoch_millis(stat.ctime),
        changed: None,
        modified: from_epoch_millis(stat.mtime),
        accessed: None,
        mode: None,
        owner_id: None,
        group_id: None,
        is_dir: false,
    })
}

fn virtual_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_owned)
        .or_else(|| {
            let path = url.path().trim_matches('/');
            (!path.is_empty()).then(|| path.to_owned())
        })
        .unwrap_or_else(|| url.to_string())
}

/// Hosts report missing timestamps as zero or negative values.
pub(crate) fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    if millis <= 0 {
        return None;
    }

    DateTime::from_timestamp_millis(millis)
}

fn to_datetime(t: Option<SystemTime>) -> Option<DateTime<Utc>> {
    t.map(DateTime::<Utc>::from)
}

#[cfg(unix)]
fn changed_time(metadata: &Metadata) -> Option<DateTime<Utc>> {
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    DateTime::from_timestamp(metadata.ctime(), nanos)
}

#[cfg(not(unix))]
fn changed_time(_metadata: &Metadata) -> Option<DateTime<Utc>> {
    None
}

#[cfg(unix)]
fn unix_ids(metadata: &Metadata) -> (Option<u32>, Option<u32>, Option<u32>) {
    use std::os::unix::fs::MetadataExt;

    (
        Some(metadata.mode()),
        Some(metadata.uid()),
        Some(metadata.gid()),
    )
}

#[cfg(not(unix))]
fn unix_ids(_metadata: &Metadata) -> (Option<u32>, Option<u32>, Option<u32>) {
    (None, None, None)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
