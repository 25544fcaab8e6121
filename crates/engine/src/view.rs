use fileprops_fs::{Locator, resolve};
use fileprops_protocol::{RowUpdate, ViewKind};
use log::debug;

use crate::{
    assets::Assets,
    config::{ConfigSnapshot, ZebraStripes},
    env::RenderEnv,
    error::RenderError,
    factory::{RowDefinition, RowFactory},
    markup,
    markup::{Markup, escape},
    media_info::media_info_rows,
    pending::PendingRowUpdate,
    row::{PropertyRow, Row},
};

/// Shown instead of a report when the resource cannot be resolved.
pub const RENDER_FAILED_MESSAGE: &str = "Failed to determine file properties.";

/// Shown by the side view when there is nothing to describe.
pub const NO_SUBJECT_MESSAGE: &str = "Open a saved file to view properties.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub view: ViewKind,
    pub locator: Locator,
    pub generation: u64,
}

/// One assembled document and the late values its placeholders wait for.
#[derive(Debug)]
pub struct ViewContent {
    pub generation: u64,
    pub document: Markup,
    pub pending: Vec<PendingRowUpdate>,
}

/// Build the properties document for `request.locator`.
///
/// Only a failure to resolve the resource fails the render. Every async row
/// is rendered as a placeholder with exactly one matching pending update.
pub fn assemble(env: &RenderEnv, request: &RenderRequest) -> Result<ViewContent, RenderError> {
    let facts = resolve(&request.locator, &*env.virtual_fs)?;
    let config = ConfigSnapshot::read(&*env.settings);

    let mut rows = Vec::with_capacity(config.rows.len());
    let mut pending = Vec::new();

    for definition in RowFactory::new(env, &config, &facts).build_all() {
        match definition {
            RowDefinition::Sync { kind, key, value } => {
                rows.push(Row::Property(PropertyRow::new(key, value).with_kind(kind)));
            }
            RowDefinition::Async {
                kind,
                key,
                token,
                placeholder,
                value,
            } => {
                rows.push(Row::Property(
                    PropertyRow::new(key, Markup::text(placeholder))
                        .with_kind(kind)
                        .with_async_token(token.clone()),
                ));
                pending.push(PendingRowUpdate {
                    generation: request.generation,
                    row_kind: kind,
                    async_token: token,
                    value,
                });
            }
        }
    }

    let media_path = facts
        .path()
        .filter(|_| config.query_media_info && !facts.is_dir);
    if let Some(path) = media_path {
        rows.extend(media_info_rows(&*env.processes, path));
    }

    let stylesheet = env.assets.stylesheet_for(config.style_path.as_deref());
    let document = render_document(
        &env.assets,
        &stylesheet,
        &config,
        request.view,
        request.generation,
        &rows,
    );

    debug!(
        "assembled generation {} for {} ({} rows, {} pending)",
        request.generation,
        request.locator,
        rows.len(),
        pending.len()
    );

    Ok(ViewContent {
        generation: request.generation,
        document,
        pending,
    })
}

fn render_document(
    assets: &Assets,
    stylesheet: &str,
    config: &ConfigSnapshot,
    view: ViewKind,
    generation: u64,
    rows: &[Row],
) -> Markup {
    let (table_class, table_style) = match &config.zebra_stripes {
        ZebraStripes::Off => (None, None),
        ZebraStripes::On => (Some(" zebra-stripes"), None),
        ZebraStripes::Custom(color) => (
            Some(" zebra-stripes"),
            Some(markup!(" style=\"--zebra-stripe-background: {};\"", color)),
        ),
    };
    let header_class = (!config.show_header).then(|| Markup::raw(" class=\"sr-only\""));

    let body_rows: Vec<Markup> = rows.iter().map(Row::render).collect();

    markup!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
{}
</style>
<script>window.renderGeneration = {};</script>
<script>
{}
</script>
</head>
<body class="view-{}" data-render-generation="{}">
<table class="properties{}"{}>
<thead{}><tr><th>Property</th><th>Value</th></tr></thead>
<tbody>
{}
</tbody>
</table>
</body>
</html>
"#,
        Markup::raw(stylesheet),
        generation,
        Markup::raw(assets.script.as_str()),
        view.as_str(),
        generation,
        table_class,
        table_style,
        header_class,
        Markup::join(&body_rows, "\n")
    )
}

/// Minimal document carrying a single message.
pub fn message_document(assets: &Assets, message: &str) -> Markup {
    markup!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<style>
{}
</style>
</head>
<body class="message">
<p>{}</p>
</body>
</html>
"#,
        Markup::raw(assets.stylesheet.as_str()),
        message
    )
}

/// Apply a row update to a delivered document the way the inline script
/// does: only for the document's own generation, only in the row whose kind
/// and token match. Returns `None` when nothing matched.
pub fn patch_row(document: &str, update: &RowUpdate) -> Option<String> {
    let generation_marker = format!("data-render-generation=\"{}\"", update.render_generation);
    if !document.contains(&generation_marker) {
        return None;
    }

    let row_marker = markup!(
        "data-type=\"{}\" data-async-id=\"{}\">",
        update.row_kind,
        update.async_token
    );
    const VALUE_OPEN: &str = "<td class=\"value-cell\">";

    let row_start = document.find(row_marker.as_str())?;
    let value_start = row_start + document[row_start..].find(VALUE_OPEN)? + VALUE_OPEN.len();
    let value_end = value_start + document[value_start..].find("</td>")?;

    let mut patched = String::with_capacity(document.len() + update.value.len());
    patched.push_str(&document[..value_start]);
    patched.push_str(&text_content(&update.value));
    patched.push_str(&document[value_end..]);
    Some(patched)
}

/// Literal text as a cell's `textContent`: unlike markup interpolation,
/// `&` is escaped too.
fn text_content(value: &str) -> String {
    escape(&value.replace('&', "&amp;")).into_owned()
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
