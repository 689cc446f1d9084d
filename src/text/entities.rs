//! Formatting directives and their resolution into markup insertions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::utf16::{align_to_boundary, to_utf16};
use crate::{Error, Result};

/// Markup used for kinds missing from a [`TagMapping`].
pub const FALLBACK_MARKUP: (&str, &str) = ("<a>", "</a>");

/// A single formatting instruction over a span of message text.
///
/// `offset` and `length` count UTF-16 code units, as chat APIs report them.
/// They are signed so that bogus values survive deserialization and are
/// rejected by [`resolve`] with a proper error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub offset: i64,
    pub length: i64,
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
}

impl Directive {
    pub fn new(offset: i64, length: i64, kind: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            kind: kind.into(),
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.offset < 0 {
            return Err(Error::InvalidDirective(format!(
                "directive {} ({}) has negative offset {}",
                index, self.kind, self.offset
            )));
        }
        if self.length <= 0 {
            return Err(Error::InvalidDirective(format!(
                "directive {} ({}) has non-positive length {}",
                index, self.kind, self.length
            )));
        }
        Ok(())
    }
}

/// Lookup from directive kind to its opening and closing markup.
#[derive(Debug, Clone)]
pub struct TagMapping {
    tags: HashMap<String, (String, String)>,
}

impl TagMapping {
    /// A mapping with no entries; every kind resolves to [`FALLBACK_MARKUP`].
    pub fn empty() -> Self {
        Self {
            tags: HashMap::new(),
        }
    }

    /// Add or replace the markup pair for `kind`.
    pub fn insert(
        &mut self,
        kind: impl Into<String>,
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> &mut Self {
        self.tags.insert(kind.into(), (open.into(), close.into()));
        self
    }

    pub fn lookup(&self, kind: &str) -> (&str, &str) {
        self.tags
            .get(kind)
            .map(|(open, close)| (open.as_str(), close.as_str()))
            .unwrap_or(FALLBACK_MARKUP)
    }
}

impl Default for TagMapping {
    fn default() -> Self {
        let mut mapping = Self::empty();
        mapping
            .insert("bold", "<b>", "</b>")
            .insert("pre", "<code>", "</code>")
            .insert("code", "<code>", "</code>")
            .insert("italic", "<i>", "</i>")
            .insert("underline", "<u>", "</u>")
            .insert("strikethrough", "<del>", "</del>")
            .insert("strike", "<del>", "</del>")
            .insert("url", "<a>", "</a>");
        mapping
    }
}

/// A literal piece of markup to splice into the text at a UTF-16 position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionOp<'m> {
    pub position: usize,
    /// Secondary sort key: directive index for opens, its negation for closes.
    pub tie_break: i64,
    pub markup: &'m str,
    pub is_opening: bool,
}

/// Output of [`resolve`]: the text as UTF-16 plus the sorted insertions.
#[derive(Debug, Clone)]
pub struct Resolution<'m> {
    pub units: Vec<u16>,
    pub ops: Vec<InsertionOp<'m>>,
}

/// Turn `directives` into insertion operations sorted ascending by
/// `(position, tie_break)`.
///
/// Spans are clamped to the text. No op ever lands between the two halves of
/// a surrogate pair.
pub fn resolve<'m>(
    text: &str,
    directives: &[Directive],
    mapping: &'m TagMapping,
) -> Result<Resolution<'m>> {
    let units = to_utf16(text);
    let len = units.len();
    let mut ops = Vec::with_capacity(directives.len() * 2);

    for (index, directive) in directives.iter().enumerate() {
        directive.validate(index)?;

        let start = clamp_to(directive.offset, len);
        let end = clamp_to(directive.offset.saturating_add(directive.length), len);
        let (open, close) = mapping.lookup(&directive.kind);
        let key = index as i64;

        ops.push(InsertionOp {
            position: start,
            tie_break: key,
            markup: open,
            is_opening: true,
        });
        ops.push(InsertionOp {
            position: end,
            tie_break: -key,
            markup: close,
            is_opening: false,
        });
    }

    ops.sort_by_key(|op| (op.position, op.tie_break));

    for op in &mut ops {
        op.position = align_to_boundary(&units, op.position);
    }

    Ok(Resolution { units, ops })
}

fn clamp_to(value: i64, len: usize) -> usize {
    usize::try_from(value).map_or(0, |v| v.min(len))
}
