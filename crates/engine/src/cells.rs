//! Value cells with buttons and links wired up by the document script.

use crate::{assets::Icons, markup, markup::Markup};

/// Button copying `text` to the clipboard.
pub fn copy_button(icons: &Icons, text: &str) -> Markup {
    markup!(
        "<button class=\"icon-button copy-button\" type=\"button\" title=\"Copy\" data-copy=\"{}\">{}</button>",
        text,
        icons.copy
    )
}

/// Button asking the host to open `target` in the editor.
pub fn open_button(icons: &Icons, target: &str) -> Markup {
    markup!(
        "<button class=\"icon-button open-button\" type=\"button\" title=\"Open\" data-open=\"{}\">{}</button>",
        target,
        icons.edit
    )
}

/// Link asking the host to open `target` with the system's default handler.
pub fn external_link(icons: &Icons, label: Markup, target: &str) -> Markup {
    markup!(
        "<a class=\"open-external\" href=\"#\" title=\"Open externally\" data-open-external=\"{}\">{}{}</a>",
        target,
        label,
        icons.external
    )
}

/// Path text with a line break opportunity after every separator.
pub fn breakable_path(path: &str) -> Markup {
    let mut parts = Vec::new();
    let mut rest = path;

    while let Some(pos) = rest.find(['/', '\\']) {
        let (head, tail) = rest.split_at(pos + 1);
        parts.push(Markup::text(head));
        parts.push(Markup::raw("<wbr>"));
        rest = tail;
    }
    if !rest.is_empty() {
        parts.push(Markup::text(rest));
    }

    markup!("{}", parts)
}

/// `value` followed by a copy button for the same text.
pub fn with_copy(icons: &Icons, value: Markup, copy_text: &str) -> Markup {
    markup!("{} {}", value, copy_button(icons, copy_text))
}

#[cfg(test)]
#[path = "cells_tests.rs"]
mod tests;
