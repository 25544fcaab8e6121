use crate::{kind::RowKind, markup, markup::Markup};

/// One line of the properties table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Property(PropertyRow),
    /// Full-width section header.
    Group { label: String },
    /// Header nested inside a group, indented like the rows it introduces.
    SubGroup { label: String, indent: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    pub key: String,
    pub value: Markup,
    pub indent: usize,
    /// Set for configured rows; lets the live document find the row again.
    pub kind: Option<RowKind>,
    /// Correlation id of a placeholder awaiting a row update.
    pub async_token: Option<String>,
}

impl PropertyRow {
    pub fn new(key: impl Into<String>, value: Markup) -> Self {
        Self {
            key: key.into(),
            value,
            indent: 0,
            kind: None,
            async_token: None,
        }
    }

    pub fn indented(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_kind(mut self, kind: RowKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_async_token(mut self, token: impl Into<String>) -> Self {
        self.async_token = Some(token.into());
        self
    }
}

impl Row {
    pub fn property(key: impl Into<String>, value: Markup) -> Self {
        Row::Property(PropertyRow::new(key, value))
    }

    pub fn group(label: impl Into<String>) -> Self {
        Row::Group {
            label: label.into(),
        }
    }

    pub fn sub_group(label: impl Into<String>, indent: usize) -> Self {
        Row::SubGroup {
            label: label.into(),
            indent,
        }
    }

    pub fn render(&self) -> Markup {
        match self {
            Row::Property(row) => {
                let kind_attr = row.kind.map(|k| markup!(" data-type=\"{}\"", k.descriptor()));
                let token_attr = row
                    .async_token
                    .as_ref()
                    .map(|t| markup!(" data-async-id=\"{}\"", t));

                markup!(
                    "<tr class=\"property-row\"{}{}><td class=\"key-cell\" style=\"--indent: {}\">{}</td><td class=\"value-cell\">{}</td></tr>",
                    kind_attr,
                    token_attr,
                    row.indent,
                    row.key,
                    row.value
                )
            }
            Row::Group { label } => markup!(
                "<tr class=\"group-row\"><th colspan=\"2\" class=\"group-cell\">{}</th></tr>",
                label
            ),
            Row::SubGroup { label, indent } => markup!(
                "<tr class=\"sub-group-row\"><td colspan=\"2\" class=\"sub-group-cell\" style=\"--indent: {}\">{}</td></tr>",
                indent,
                label
            ),
        }
    }
}

#[cfg(test)]
#[path = "row_tests.rs"]
mod tests;
