//! Rasterization of HTML documents and post-processing of the result

pub mod postprocess;
pub mod raster;

pub use raster::WkhtmlRenderer;

use std::str::FromStr;

use serde::Deserialize;

use crate::{Error, Result};

/// Turns a complete HTML document into a PNG image
///
/// Implementations must produce a PNG with an alpha channel so that
/// [`postprocess::crop_to_content`] can find the visible card.
pub trait Renderer: Send + Sync {
    /// Render `html` at a fixed page `width` in pixels
    fn render_png(&self, html: &str, width: u32) -> Result<Vec<u8>>;
}

impl<R: Renderer + ?Sized> Renderer for std::sync::Arc<R> {
    fn render_png(&self, html: &str, width: u32) -> Result<Vec<u8>> {
        (**self).render_png(html, width)
    }
}

/// Encoding of the final image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless WebP
    #[serde(rename = "webp")]
    WebP,
    Png,
    /// Lossy, honours the configured quality; drops transparency
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            OutputFormat::WebP => "image/webp",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "webp" => Ok(OutputFormat::WebP),
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            other => Err(Error::ConfigError(format!("unknown output format `{}`", other))),
        }
    }
}

/// A finished, encoded quote card
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub data: Vec<u8>,
}

impl RenderedImage {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}
