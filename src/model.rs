//! Request models for quote generation and their render-ready counterparts.
//!
//! The wire types mirror the JSON a chat bot sends: a batch of [`Quote`]s,
//! each with an [`Author`], optional [`Reply`], optional base64 media and
//! optional formatting entities. [`Messages::prepare`] turns them into
//! [`PreparedMessages`] whose strings are already safe to drop into HTML.

use base64::Engine as Base64Engine;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::color::nick_color;
use crate::text::{escape_html, format_quote_text, wrap_emoji, Directive};
use crate::{QuoteSettings, Result};

/// Author of a quoted message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    /// Base64-encoded avatar image
    #[serde(default)]
    pub avatar: Option<String>,
    /// Title shown next to the name (e.g. "admin")
    #[serde(default)]
    pub rank: Option<String>,
    /// Username of the inline bot the message was sent via
    #[serde(default)]
    pub via_bot: Option<String>,
}

/// The message a quote replies to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Reply {
    fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.name.as_deref().map_or(true, str::is_empty)
            && self.text.as_deref().map_or(true, str::is_empty)
    }
}

/// A single quoted message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub text: Option<String>,
    /// Base64-encoded image attached to the message
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub entities: Option<Vec<Directive>>,
    pub author: Author,
    #[serde(default)]
    pub reply: Option<Reply>,
}

/// A batch of quotes rendered into one card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    pub messages: Vec<Quote>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub quote_color: Option<String>,
}

/// Author with HTML-ready fields
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedAuthor {
    pub id: i64,
    pub name: String,
    pub color: &'static str,
    pub avatar: Option<String>,
    pub rank: Option<String>,
    pub via_bot: Option<String>,
}

/// Reply with HTML-ready fields
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedReply {
    pub color: Option<&'static str>,
    pub name: Option<String>,
    pub text: Option<String>,
}

/// Quote with formatted text and `data:` URIs for images
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuote {
    pub text: Option<String>,
    pub media: Option<String>,
    pub author: PreparedAuthor,
    pub reply: Option<PreparedReply>,
}

/// Everything a [`crate::template::Templater`] needs to build the document
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMessages {
    pub messages: Vec<PreparedQuote>,
    pub text_color: String,
    pub quote_color: String,
}

/// Escape a name or reply line and wrap its emoji.
fn prepare_inline(text: &str) -> String {
    wrap_emoji(&escape_html(text))
}

fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Turn a base64 payload into a `data:` URI, or `None` if it is not an image.
pub fn image_data_uri(encoded: &str) -> Option<String> {
    let encoded = encoded.trim();
    let bytes = match base64::engine::general_purpose::STANDARD.decode(encoded) {
        Ok(b) => b,
        Err(e) => {
            warn!("Dropping image with invalid base64: {}", e);
            return None;
        }
    };
    match sniff_image_type(&bytes) {
        Some(mime) => Some(format!("data:{};base64,{}", mime, encoded)),
        None => {
            warn!("Dropping image of unrecognised type ({} bytes)", bytes.len());
            None
        }
    }
}

impl Author {
    pub fn prepare(&self) -> PreparedAuthor {
        PreparedAuthor {
            id: self.id,
            name: prepare_inline(&self.name),
            color: nick_color(self.id),
            avatar: self.avatar.as_deref().and_then(image_data_uri),
            rank: self.rank.as_deref().map(prepare_inline),
            via_bot: self.via_bot.as_deref().map(prepare_inline),
        }
    }
}

impl Reply {
    /// `None` when the reply carries no information at all.
    pub fn prepare(&self) -> Option<PreparedReply> {
        if self.is_blank() {
            return None;
        }
        Some(PreparedReply {
            color: self.id.map(nick_color),
            name: self
                .name
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(prepare_inline),
            text: self
                .text
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(prepare_inline),
        })
    }
}

impl Quote {
    /// Format the text with its entities and prepare the surrounding fields.
    pub fn prepare(&self) -> Result<PreparedQuote> {
        let text = match self.text.as_deref() {
            Some(text) => {
                let entities = self.entities.as_deref().unwrap_or(&[]);
                Some(format_quote_text(text, entities)?)
            }
            None => None,
        };

        Ok(PreparedQuote {
            text,
            media: self.media.as_deref().and_then(image_data_uri),
            author: self.author.prepare(),
            reply: self.reply.as_ref().and_then(Reply::prepare),
        })
    }
}

impl Messages {
    /// Prepare every quote, falling back to `defaults` for missing colours.
    pub fn prepare(&self, defaults: &QuoteSettings) -> Result<PreparedMessages> {
        let messages = self
            .messages
            .iter()
            .map(Quote::prepare)
            .collect::<Result<Vec<_>>>()?;

        Ok(PreparedMessages {
            messages,
            text_color: self
                .text_color
                .clone()
                .unwrap_or_else(|| defaults.text_color.clone()),
            quote_color: self
                .quote_color
                .clone()
                .unwrap_or_else(|| defaults.background_color.clone()),
        })
    }
}
