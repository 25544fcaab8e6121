use std::{borrow::Cow, fmt};

/// A fragment of markup that is already safe to embed.
///
/// Build fragments with [`markup!`](crate::markup!), which escapes every
/// interpolated value unless the value is itself a `Markup`. Composition is
/// lossless: nesting a fragment inside another never escapes it twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    /// Wrap pre-built markup. The content is trusted and passed through as is.
    pub fn raw(content: impl Into<String>) -> Self {
        Markup(content.into())
    }

    /// Escaped text fragment.
    pub fn text(text: &str) -> Self {
        Markup(escape(text).into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join fragments with `separator`, which is treated as raw markup.
    pub fn join<'a, I>(parts: I, separator: &str) -> Markup
    where
        I: IntoIterator<Item = &'a Markup>,
    {
        let mut out = String::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(&part.0);
        }
        Markup(out)
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> Self {
        markup.0
    }
}

/// Escape the three characters that can break out of text or a quoted
/// attribute value: `<`, `>` and `"`.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>', '"']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Values that can be interpolated into markup.
///
/// Text is escaped, [`Markup`] passes through, sequences are flattened with
/// each element handled on its own, and `None` renders nothing.
pub trait ToMarkup {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl ToMarkup for Markup {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToMarkup for str {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(self))
    }
}

impl ToMarkup for String {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt_markup(f)
    }
}

impl ToMarkup for Cow<'_, str> {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt_markup(f)
    }
}

impl<T: ToMarkup + ?Sized> ToMarkup for &T {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_markup(f)
    }
}

impl<T: ToMarkup> ToMarkup for [T] {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|item| item.fmt_markup(f))
    }
}

impl<T: ToMarkup> ToMarkup for Vec<T> {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt_markup(f)
    }
}

impl<T: ToMarkup> ToMarkup for Option<T> {
    fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => value.fmt_markup(f),
            None => Ok(()),
        }
    }
}

macro_rules! impl_to_markup_for_numbers {
    ($($ty:ty),*) => {
        $(
            impl ToMarkup for $ty {
                fn fmt_markup(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(self, f)
                }
            }
        )*
    };
}

impl_to_markup_for_numbers!(u8, u16, u32, u64, usize, i32, i64, f64);

/// Display adapter used by [`markup!`](crate::markup!).
pub struct Escaped<'a, T: ?Sized>(pub &'a T);

impl<T: ToMarkup + ?Sized> fmt::Display for Escaped<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_markup(f)
    }
}

/// Build a [`Markup`] fragment from a format string and positional values.
///
/// The format string is literal markup; every argument goes through
/// [`ToMarkup`]. Inline captures such as `{name}` bypass escaping, so values
/// must always be passed as positional arguments.
///
/// ```
/// use fileprops_engine::{Markup, markup};
///
/// let cell = markup!("<td title=\"{}\">{}</td>", "a \"quote\"", Markup::raw("<b>x</b>"));
/// assert_eq!(cell.as_str(), "<td title=\"a &quot;quote&quot;\"><b>x</b></td>");
/// ```
#[macro_export]
macro_rules! markup {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::Markup::raw(::std::format!($fmt $(, $crate::markup::Escaped(&$arg))*))
    };
}

#[cfg(test)]
#[path = "markup_tests.rs"]
mod tests;
