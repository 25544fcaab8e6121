use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use fileprops_fs::{ResourceFacts, lookup_owner};

use crate::{
    cells::{breakable_path, copy_button, external_link, open_button, with_copy},
    config::ConfigSnapshot,
    env::RenderEnv,
    format::{format_date, format_permissions, format_size},
    kind::RowKind,
    markup,
    markup::Markup,
    mime::media_type,
    pending::{PLACEHOLDER, PendingValue},
};

/// What a configured row turns into for one resource.
#[derive(Debug)]
pub enum RowDefinition {
    Sync {
        kind: RowKind,
        key: &'static str,
        value: Markup,
    },
    /// Rendered as `placeholder` now, patched with `value` later.
    Async {
        kind: RowKind,
        key: &'static str,
        token: String,
        placeholder: &'static str,
        value: PendingValue,
    },
}

impl RowDefinition {
    pub fn kind(&self) -> RowKind {
        match self {
            RowDefinition::Sync { kind, .. } | RowDefinition::Async { kind, .. } => *kind,
        }
    }
}

/// Builds row definitions for one render.
///
/// Async tokens are numbered per factory, so every render starts again at
/// `owner-1`.
pub struct RowFactory<'a> {
    env: &'a RenderEnv,
    config: &'a ConfigSnapshot,
    facts: &'a ResourceFacts,
    now: DateTime<Utc>,
    size_text: String,
    sequence: u32,
}

impl<'a> RowFactory<'a> {
    pub fn new(env: &'a RenderEnv, config: &'a ConfigSnapshot, facts: &'a ResourceFacts) -> Self {
        Self {
            env,
            config,
            facts,
            now: env.clock.now(),
            size_text: format_size(facts.size, config.size_mode),
            sequence: 0,
        }
    }

    /// Definitions for every configured row, in configured order, with
    /// inapplicable rows left out.
    pub fn build_all(&mut self) -> Vec<RowDefinition> {
        let config = self.config;
        config.rows.iter().filter_map(|&kind| self.build(kind)).collect()
    }

    /// Definition for one row kind, or `None` when it does not apply to this
    /// resource.
    pub fn build(&mut self, kind: RowKind) -> Option<RowDefinition> {
        let env = self.env;
        let facts = self.facts;
        let icons = &env.assets.icons;

        let value = match kind {
            RowKind::Name => with_copy(icons, Markup::text(&facts.name), &facts.name),
            RowKind::Directory => {
                let parent = facts.parent.as_deref()?;
                external_link(icons, breakable_path(parent), parent)
            }
            RowKind::FullPath => {
                let full = facts.full_path();
                let open = (!facts.is_dir).then(|| open_button(icons, &full));
                markup!("{} {}{}", breakable_path(&full), open, copy_button(icons, &full))
            }
            RowKind::RealPath => {
                let real = facts.canonical.as_ref()?.display().to_string();
                with_copy(icons, breakable_path(&real), &real)
            }
            RowKind::Size => Markup::text(&self.size_text),
            RowKind::Created => self.date(facts.created)?,
            RowKind::Changed => self.date(facts.changed)?,
            RowKind::Modified => self.date(facts.modified)?,
            RowKind::Accessed => self.date(facts.accessed)?,
            RowKind::Owner => return self.owner(),
            RowKind::Permissions => {
                Markup::text(&format_permissions(facts.mode?, env.mode_support))
            }
            RowKind::MediaType => Markup::text(media_type(&facts.name, facts.is_dir)?),
        };

        Some(RowDefinition::Sync {
            kind,
            key: kind.label(),
            value,
        })
    }

    fn date(&self, instant: Option<DateTime<Utc>>) -> Option<Markup> {
        let local = instant?.with_timezone(&Local);
        let text = format_date(
            &local,
            self.now,
            self.config.date_format.as_deref(),
            self.config.relative_timestamps,
        );
        Some(Markup::text(&text))
    }

    fn owner(&mut self) -> Option<RowDefinition> {
        let path = self.facts.path()?.to_path_buf();
        let platform = self.env.platform;
        let ids = self.facts.owner_ids();

        // POSIX lookups need the numeric ids, if only as the fallback.
        if !platform.is_windows() && ids.is_none() {
            return None;
        }

        let runner = Arc::clone(&self.env.processes);
        let value = PendingValue::spawn(move || lookup_owner(&*runner, platform, &path, ids));

        Some(RowDefinition::Async {
            kind: RowKind::Owner,
            key: RowKind::Owner.label(),
            token: self.next_token(RowKind::Owner),
            placeholder: PLACEHOLDER,
            value,
        })
    }

    fn next_token(&mut self, kind: RowKind) -> String {
        self.sequence += 1;
        format!("{}-{}", kind.descriptor(), self.sequence)
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
