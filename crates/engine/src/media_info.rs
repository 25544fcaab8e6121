use std::{ffi::OsStr, path::Path};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use fileprops_fs::ProcessRunner;
use log::debug;
use serde_json::{Map, Value};

use crate::{markup::Markup, row::PropertyRow, row::Row};

pub const MEDIA_INFO_PROGRAM: &str = "mediainfo";
pub const GROUP_LABEL: &str = "Media Info";

const BASE64_TYPE: &str = "binary.base64";

/// Query `mediainfo` for `path` and flatten its tracks into rows.
///
/// Any failure, from spawning the tool to an unexpected output shape,
/// yields no rows at all.
pub fn media_info_rows(runner: &dyn ProcessRunner, path: &Path) -> Vec<Row> {
    let output = match runner.run(
        MEDIA_INFO_PROGRAM,
        &[OsStr::new("--Output=JSON"), path.as_os_str()],
        &[],
    ) {
        Ok(output) => output,
        Err(err) => {
            debug!("skipping media info for {}: {err}", path.display());
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&output) {
        Ok(tree) => rows_from_tree(&tree),
        Err(err) => {
            debug!("unparsable media info for {}: {err}", path.display());
            Vec::new()
        }
    }
}

/// Rows for a parsed `{"media": {"track": [...]}}` tree.
pub fn rows_from_tree(tree: &Value) -> Vec<Row> {
    let Some(tracks) = tree.pointer("/media/track").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for track in tracks {
        let Some(fields) = track.as_object() else {
            continue;
        };
        let label = fields
            .get("@type")
            .and_then(Value::as_str)
            .unwrap_or("Track");

        rows.push(Row::sub_group(label, 0));
        walk_fields(fields, 1, &mut rows);
    }

    if rows.is_empty() {
        return rows;
    }

    rows.insert(0, Row::group(GROUP_LABEL));
    rows
}

fn walk_fields(fields: &Map<String, Value>, indent: usize, rows: &mut Vec<Row>) {
    for (name, value) in fields {
        if name.starts_with('@') {
            continue;
        }
        walk_value(&name.replace('_', " "), value, indent, rows);
    }
}

fn walk_value(key: &str, value: &Value, indent: usize, rows: &mut Vec<Row>) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk_value(key, item, indent, rows);
            }
        }
        Value::Object(fields) if is_base64(fields) => {
            if let Some(text) = decode_base64(fields) {
                push_text(key, &text, indent, rows);
            }
        }
        Value::Object(fields) => {
            let header = rows.len();
            rows.push(Row::sub_group(key, indent));
            walk_fields(fields, indent + 1, rows);

            if rows.len() == header + 1 {
                rows.pop();
            }
        }
        Value::String(text) => push_text(key, text, indent, rows),
        Value::Number(n) if n.as_f64() != Some(0.0) => push_text(key, &n.to_string(), indent, rows),
        Value::Bool(true) => push_text(key, "true", indent, rows),
        Value::Number(_) | Value::Bool(false) | Value::Null => {}
    }
}

fn push_text(key: &str, text: &str, indent: usize, rows: &mut Vec<Row>) {
    if text.is_empty() {
        return;
    }
    rows.push(Row::Property(
        PropertyRow::new(key, Markup::text(text)).indented(indent),
    ));
}

fn is_base64(fields: &Map<String, Value>) -> bool {
    fields.get("@dt").and_then(Value::as_str) == Some(BASE64_TYPE)
}

fn decode_base64(fields: &Map<String, Value>) -> Option<String> {
    let encoded = fields.get("#value")?.as_str()?;
    match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            debug!("invalid base64 media info value: {err}");
            None
        }
    }
}

#[cfg(test)]
#[path = "media_info_tests.rs"]
mod tests;
