use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("empty locator")]
    Empty,
    #[error("invalid locator {input:?}: {source}")]
    Invalid {
        input: String,
        source: url::ParseError,
    },
    #[error("file URL {0:?} does not map to a local path")]
    NotLocal(String),
}

/// Reference to the resource being inspected.
///
/// Plain paths and `file:` URLs become [`Locator::File`]; any other scheme is a
/// host-provided virtual resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    File(PathBuf),
    Virtual(Url),
}

impl Locator {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Locator::File(path.into())
    }

    pub fn parse(input: &str) -> Result<Self, LocatorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LocatorError::Empty);
        }

        if !has_scheme(input) {
            return Ok(Locator::File(PathBuf::from(input)));
        }

        let url = Url::parse(input).map_err(|source| LocatorError::Invalid {
            input: input.to_owned(),
            source,
        })?;

        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|()| LocatorError::NotLocal(input.to_owned()))?;
            Ok(Locator::File(path))
        } else {
            Ok(Locator::Virtual(url))
        }
    }

    pub fn scheme(&self) -> &str {
        match self {
            Locator::File(_) => "file",
            Locator::Virtual(url) => url.scheme(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Locator::File(_))
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Locator::File(path) => Some(path),
            Locator::Virtual(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::File(path) => write!(f, "{}", path.display()),
            Locator::Virtual(url) => write!(f, "{url}"),
        }
    }
}

impl FromStr for Locator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locator::parse(s)
    }
}

/// `scheme:` prefix check. Single letter schemes are Windows drive letters.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());

    starts_alpha
        && scheme.len() >= 2
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
