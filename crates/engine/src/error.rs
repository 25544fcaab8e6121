use fileprops_fs::ResolveError;
use thiserror::Error;

/// Failure of a whole render. Row-level problems never surface here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to resolve resource: {0}")]
    Resolve(#[from] ResolveError),
}
