//! HTML document assembly for quote cards

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::model::{PreparedMessages, PreparedQuote};
use crate::{Error, RenderSettings, Result};

/// Stylesheet embedded when no custom one is configured
pub const DEFAULT_STYLESHEET: &str = include_str!("../assets/quote.css");

/// Builds a complete HTML document from prepared messages
pub trait Templater: Send + Sync {
    fn render_document(&self, messages: &PreparedMessages) -> Result<String>;
}

/// The built-in quote card layout: one chat bubble per message, each with
/// the author's avatar, coloured name, optional reply and media.
#[derive(Debug, Clone)]
pub struct CardTemplate {
    stylesheet: Cow<'static, str>,
}

impl CardTemplate {
    pub fn new() -> Self {
        Self {
            stylesheet: Cow::Borrowed(DEFAULT_STYLESHEET),
        }
    }

    pub fn with_stylesheet(css: impl Into<String>) -> Self {
        Self {
            stylesheet: Cow::Owned(css.into()),
        }
    }

    /// Use the stylesheet file from the settings, if any
    pub fn from_settings(settings: &RenderSettings) -> Result<Self> {
        match &settings.stylesheet {
            Some(path) => {
                let css = std::fs::read_to_string(path).map_err(|e| {
                    Error::TemplateError(format!(
                        "cannot read stylesheet {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(Self::with_stylesheet(css))
            }
            None => Ok(Self::new()),
        }
    }

    fn write_quote(out: &mut String, quote: &PreparedQuote) -> std::fmt::Result {
        let author = &quote.author;
        out.push_str("<div class=\"message\">");
        match &author.avatar {
            Some(uri) => write!(out, "<img class=\"avatar\" src=\"{}\">", uri)?,
            None => write!(
                out,
                "<div class=\"avatar placeholder\" style=\"background: {}\"></div>",
                author.color
            )?,
        }

        out.push_str("<div class=\"bubble\">");
        write!(
            out,
            "<div class=\"author\" style=\"color: {}\">{}",
            author.color, author.name
        )?;
        if let Some(rank) = &author.rank {
            write!(out, "<span class=\"rank\">{}</span>", rank)?;
        }
        if let Some(bot) = &author.via_bot {
            write!(out, "<span class=\"via-bot\">via @{}</span>", bot)?;
        }
        out.push_str("</div>");

        if let Some(reply) = &quote.reply {
            match reply.color {
                Some(color) => write!(out, "<div class=\"reply\" style=\"color: {}\">", color)?,
                None => out.push_str("<div class=\"reply\">"),
            }
            if let Some(name) = &reply.name {
                write!(out, "<div class=\"name\">{}</div>", name)?;
            }
            if let Some(text) = &reply.text {
                write!(out, "<div class=\"text\">{}</div>", text)?;
            }
            out.push_str("</div>");
        }

        if let Some(media) = &quote.media {
            write!(out, "<img class=\"media\" src=\"{}\">", media)?;
        }
        if let Some(text) = &quote.text {
            write!(out, "<div class=\"text\">{}</div>", text)?;
        }
        out.push_str("</div></div>");
        Ok(())
    }
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self::new()
    }
}

/// Accept only colour values that cannot break out of a CSS declaration.
fn css_color(value: &str) -> Result<&str> {
    let ok = !value.is_empty()
        && value.len() <= 64
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '));
    if ok {
        Ok(value)
    } else {
        Err(Error::InvalidRequest(format!("invalid colour `{}`", value)))
    }
}

impl Templater for CardTemplate {
    fn render_document(&self, messages: &PreparedMessages) -> Result<String> {
        let text_color = css_color(&messages.text_color)?;
        let quote_color = css_color(&messages.quote_color)?;

        let mut out = String::with_capacity(self.stylesheet.len() + 1024);
        let fmt_err = |e: std::fmt::Error| Error::TemplateError(e.to_string());

        write!(
            out,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{}\n</style>\n\
             <style>:root {{ --text-color: {}; --quote-color: {}; }}</style>\n</head>\n\
             <body>\n<div class=\"quotes\">",
            self.stylesheet, text_color, quote_color
        )
        .map_err(fmt_err)?;

        for quote in &messages.messages {
            Self::write_quote(&mut out, quote).map_err(fmt_err)?;
        }

        out.push_str("</div>\n</body>\n</html>\n");
        Ok(out)
    }
}
