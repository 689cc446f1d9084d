//! Rich-text entity formatting
//!
//! Turns message text plus UTF-16 based formatting directives into an
//! HTML fragment:
//!
//! 1. [`entities::resolve`] converts directives into sorted insertion ops,
//! 2. [`compose::compose`] splices them in from right to left while escaping
//!    the untouched text exactly once,
//! 3. [`emoji::wrap_emoji`] puts emoji runs into a colour-font span.
//!
//! ```
//! use quotecard::text::{format_quote_text, Directive};
//!
//! let html = format_quote_text("Hello", &[Directive::new(0, 5, "bold")]).unwrap();
//! assert_eq!(html, "<b>Hello</b>");
//! ```

pub mod compose;
pub mod emoji;
pub mod entities;
pub mod utf16;

pub use compose::{escape_html, substitute_whitespace};
pub use emoji::wrap_emoji;
pub use entities::{Directive, InsertionOp, Resolution, TagMapping};

use std::sync::OnceLock;

use log::debug;

use crate::Result;

fn default_mapping() -> &'static TagMapping {
    static MAPPING: OnceLock<TagMapping> = OnceLock::new();
    MAPPING.get_or_init(TagMapping::default)
}

/// Format `text` with the built-in tag mapping.
///
/// Empty text yields an empty string. Without directives the text is only
/// escaped and whitespace-substituted.
pub fn format_quote_text(text: &str, directives: &[Directive]) -> Result<String> {
    format_with_mapping(text, directives, default_mapping())
}

/// Format `text` using `mapping` to pick markup for each directive kind.
pub fn format_with_mapping(
    text: &str,
    directives: &[Directive],
    mapping: &TagMapping,
) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }

    let markup = if directives.is_empty() {
        compose::compose_plain(text)
    } else {
        let resolution = entities::resolve(text, directives, mapping)?;
        debug!(
            "resolved {} directives into {} insertions over {} UTF-16 units",
            directives.len(),
            resolution.ops.len(),
            resolution.units.len()
        );
        compose::compose(&resolution)?
    };

    Ok(wrap_emoji(&markup))
}

/// Format many independent messages in parallel.
///
/// Results come back in input order; a failing message does not affect
/// the others.
pub fn format_batch<T, D>(items: &[(T, D)]) -> Vec<Result<String>>
where
    T: AsRef<str> + Sync,
    D: AsRef<[Directive]> + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }

    let workers = num_cpus::get().clamp(1, items.len());
    let chunk_size = items.len().div_ceil(workers);

    std::thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk_size)
            .map(|chunk| {
                let handle = scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|(text, directives)| {
                            format_quote_text(text.as_ref(), directives.as_ref())
                        })
                        .collect::<Vec<_>>()
                });
                (chunk.len(), handle)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|(len, handle)| match handle.join() {
                Ok(results) => results,
                Err(_) => (0..len)
                    .map(|_| Err(crate::Error::Other("formatter worker panicked".to_string())))
                    .collect(),
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_text_is_empty() {
        assert_eq!(format_quote_text("", &[]).unwrap(), "");
        assert_eq!(
            format_quote_text("", &[Directive::new(0, 3, "bold")]).unwrap(),
            ""
        );
    }

    #[test]
    fn plain_text_fast_path() {
        assert_eq!(
            format_quote_text("a & b\n<c>", &[]).unwrap(),
            "a&nbsp;<wbr>&amp;&nbsp;<wbr>b<br>&lt;c&gt;"
        );
    }

    #[test]
    fn custom_mapping_is_used() {
        let mut mapping = TagMapping::default();
        mapping.insert("spoiler", "<s>", "</s>");
        let out = format_with_mapping("shh", &[Directive::new(0, 3, "spoiler")], &mapping).unwrap();
        assert_eq!(out, "<s>shh</s>");
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let items = vec![
            ("one".to_string(), vec![Directive::new(0, 3, "bold")]),
            ("two".to_string(), vec![Directive::new(-1, 3, "bold")]),
            ("three".to_string(), vec![]),
        ];
        let results = format_batch(&items);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), "<b>one</b>");
        assert!(matches!(results[1], Err(Error::InvalidDirective(_))));
        assert_eq!(results[2].as_ref().unwrap(), "three");
    }

    #[test]
    fn batch_of_nothing() {
        let items: Vec<(&str, Vec<Directive>)> = Vec::new();
        assert!(format_batch(&items).is_empty());
    }
}
