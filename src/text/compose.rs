//! Right-to-left splicing of markup into escaped text.

use std::borrow::Cow;

use super::entities::Resolution;
use super::utf16::from_utf16;
use crate::Result;

/// HTML-escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Replace spaces with non-breaking spaces that still allow wrapping, and
/// newlines with line breaks.
pub fn substitute_whitespace(markup: &str) -> String {
    markup.replace(' ', "&nbsp;<wbr>").replace('\n', "<br>")
}

/// Escape plain text with no formatting directives.
pub fn compose_plain(text: &str) -> String {
    substitute_whitespace(&escape_html(text))
}

/// Build the final markup from a [`Resolution`].
///
/// Ops are consumed from the highest position down. `escape_bound` marks the
/// left edge of the finished tail: everything at or right of it has already
/// been escaped and had its markup spliced in, so each step only escapes the
/// untouched units between the current op and the bound.
pub fn compose(resolution: &Resolution<'_>) -> Result<String> {
    let units = &resolution.units;
    let mut pieces: Vec<String> = Vec::with_capacity(resolution.ops.len() * 2 + 1);
    let mut escape_bound = units.len();

    for op in resolution.ops.iter().rev() {
        let position = op.position.min(escape_bound);
        let segment = from_utf16(&units[position..escape_bound])?;
        pieces.push(escape_html(&segment).into_owned());
        pieces.push(op.markup.to_owned());
        escape_bound = position;
    }

    let head = from_utf16(&units[..escape_bound])?;
    pieces.push(escape_html(&head).into_owned());

    let mut out = String::with_capacity(pieces.iter().map(String::len).sum());
    for piece in pieces.iter().rev() {
        out.push_str(piece);
    }
    Ok(substitute_whitespace(&out))
}
