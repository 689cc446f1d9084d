//! Quotecard
//!
//! Renders chat messages into styled "quote card" images.
//!
//! # Features
//!
//! - **Entity formatting**: turns text plus UTF-16 offset/length entities
//!   (bold, italic, code, ...) into escaped, correctly nested HTML without
//!   ever splitting a surrogate pair
//! - **Pluggable collaborators**: templating and rasterization sit behind the
//!   [`template::Templater`] and [`rendering::Renderer`] traits
//! - **Post-processing**: crop to visible content and re-encode as WebP, PNG
//!   or JPEG
//! - **HTTP surface** (`server` feature): `POST /generate`
//!
//! # Example
//!
//! ```
//! use quotecard::text::{format_quote_text, Directive};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let entities = vec![
//!     Directive::new(0, 5, "bold"),
//!     Directive::new(0, 3, "italic"),
//! ];
//! let html = format_quote_text("Hello", &entities)?;
//! assert_eq!(html, "<b><i>Hel</i>lo</b>");
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub mod error;
pub use error::{Error, Result};

pub mod color;
pub mod model;
pub mod text;

// Collaborators: HTML document building and rasterization
pub mod rendering;
pub mod template;

pub mod card;
pub use card::{QuoteCard, RenderedImage};

// Async-friendly front-end (worker-thread backed)
pub mod async_api;
pub use async_api::CardService;

#[cfg(feature = "server")]
pub mod server;

pub use model::Messages;
pub use rendering::OutputFormat;
pub use text::{format_quote_text, Directive};

/// Configuration for quote card generation
///
/// Mirrors the sections of `config.toml`. Every field has a default so a
/// partial file (or no file at all) is valid.
///
/// # Examples
///
/// ```
/// let cfg = quotecard::CardConfig::from_toml_str("[server]\nport = 9000\n").unwrap();
/// assert_eq!(cfg.server.port, 9000);
/// assert_eq!(cfg.render.width, 1792);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub quote: QuoteSettings,
    pub logging: LoggingSettings,
    pub server: ServerSettings,
    pub render: RenderSettings,
}

/// Output and colour settings for rendered quotes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteSettings {
    /// Encoder quality (1-100), used by lossy output formats
    pub quality: u8,
    /// Default text colour when a request does not specify one
    pub text_color: String,
    /// Default quote bubble colour when a request does not specify one
    pub background_color: String,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            quality: 95,
            text_color: "#ffffff".to_string(),
            background_color: "#1f1f1f".to_string(),
        }
    }
}

/// Log filter used by the binary (env_logger syntax, e.g. `info` or `quotecard=debug`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Address the HTTP surface listens on
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Rasterization settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Page width in pixels handed to the renderer
    pub width: u32,
    /// `wkhtmltoimage` executable
    pub binary: PathBuf,
    /// Kill the renderer after this many milliseconds
    pub timeout_ms: u64,
    /// Encoding of the final image
    pub format: OutputFormat,
    /// Replace the built-in stylesheet with this file
    pub stylesheet: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1792,
            binary: PathBuf::from("wkhtmltoimage"),
            timeout_ms: 30000,
            format: OutputFormat::WebP,
            stylesheet: None,
        }
    }
}

impl CardConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let cfg: CardConfig =
            toml::from_str(input).map_err(|e| Error::ConfigError(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Config file not found: `{}`: {}", path.display(), e))
        })?;
        Self::from_toml_str(&data)
    }

    /// Reject settings that cannot produce an image
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quote.quality) {
            return Err(Error::ConfigError(format!(
                "quote.quality must be within 1..=100, got {}",
                self.quote.quality
            )));
        }
        if self.render.width == 0 {
            return Err(Error::ConfigError("render.width must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CardConfig::default();
        assert_eq!(config.render.width, 1792);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.render.format, OutputFormat::WebP);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_file() {
        let cfg = CardConfig::from_toml_str(
            r##"
[quote]
quality = 80
text_color = "#000000"
background_color = "#ffffff"

[logging]
level = "debug"

[server]
port = 8080

[render]
format = "jpeg"
timeout_ms = 500
"##,
        )
        .unwrap();
        assert_eq!(cfg.quote.quality, 80);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.server.addr(), "127.0.0.1:8080");
        assert_eq!(cfg.render.format, OutputFormat::Jpeg);
        assert_eq!(cfg.render.timeout_ms, 500);
        assert_eq!(cfg.render.width, 1792);
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let err = CardConfig::from_toml_str("[quote]\nquality = 0\n").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            CardConfig::from_toml_str("[quote\n"),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = CardConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
