use std::{
    fs, io,
    path::Path,
};

use log::{debug, warn};

use crate::markup::Markup;

const BUNDLED_COPY: &str = include_str!("../assets/copy.svg");
const BUNDLED_EDIT: &str = include_str!("../assets/edit.svg");
const BUNDLED_EXTERNAL: &str = include_str!("../assets/external.svg");
const BUNDLED_STYLESHEET: &str = include_str!("../assets/style.css");
const BUNDLED_SCRIPT: &str = include_str!("../assets/view.js");

/// Inline SVG icons used by the interactive cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icons {
    pub copy: Markup,
    pub edit: Markup,
    pub external: Markup,
}

/// Static resources embedded in every document. Loaded once per process and
/// shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    pub icons: Icons,
    pub stylesheet: String,
    pub script: String,
}

impl Assets {
    /// Copies compiled into the binary.
    pub fn bundled() -> Self {
        Self {
            icons: Icons {
                copy: Markup::raw(BUNDLED_COPY.trim()),
                edit: Markup::raw(BUNDLED_EDIT.trim()),
                external: Markup::raw(BUNDLED_EXTERNAL.trim()),
            },
            stylesheet: BUNDLED_STYLESHEET.to_owned(),
            script: BUNDLED_SCRIPT.to_owned(),
        }
    }

    /// Load assets from `dir`, preferring `name.min.svg` over `name.svg` for
    /// icons. Files missing from the directory keep their bundled copy.
    pub fn load(dir: &Path) -> io::Result<Self> {
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("asset directory {} not found", dir.display()),
            ));
        }

        let bundled = Self::bundled();
        let icon = |name: &str, fallback: Markup| -> io::Result<Markup> {
            for candidate in [format!("{name}.min.svg"), format!("{name}.svg")] {
                if let Some(text) = read_optional(&dir.join(candidate))? {
                    return Ok(Markup::raw(text.trim()));
                }
            }
            Ok(fallback)
        };

        let icons = Icons {
            copy: icon("copy", bundled.icons.copy)?,
            edit: icon("edit", bundled.icons.edit)?,
            external: icon("external", bundled.icons.external)?,
        };

        Ok(Self {
            icons,
            stylesheet: read_optional(&dir.join("style.css"))?.unwrap_or(bundled.stylesheet),
            script: read_optional(&dir.join("view.js"))?.unwrap_or(bundled.script),
        })
    }

    /// Style sheet for one render: the override when it can be read, the
    /// loaded sheet otherwise.
    pub fn stylesheet_for(&self, override_path: Option<&Path>) -> String {
        let Some(path) = override_path else {
            return self.stylesheet.clone();
        };

        match fs::read_to_string(path) {
            Ok(css) => css,
            Err(err) => {
                warn!(
                    "cannot read style sheet {}: {err}; using the bundled one",
                    path.display()
                );
                self.stylesheet.clone()
            }
        }
    }
}

fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!("loaded asset {}", path.display());
            Ok(Some(text))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
#[path = "assets_tests.rs"]
mod tests;
