//! The quote card pipeline: messages → HTML document → raster → final image

use std::time::Instant;

use log::{debug, info};

use crate::model::Messages;
use crate::rendering::{postprocess, Renderer, WkhtmlRenderer};
use crate::template::{CardTemplate, Templater};
use crate::{CardConfig, Result};

pub use crate::rendering::RenderedImage;

/// Ties the formatter, templating and rendering collaborators together.
pub struct QuoteCard {
    config: CardConfig,
    templater: Box<dyn Templater>,
    renderer: Box<dyn Renderer>,
}

impl QuoteCard {
    pub fn new(
        config: CardConfig,
        templater: impl Templater + 'static,
        renderer: impl Renderer + 'static,
    ) -> Self {
        Self {
            config,
            templater: Box::new(templater),
            renderer: Box::new(renderer),
        }
    }

    /// Build a card using the built-in template and `wkhtmltoimage`.
    pub fn from_config(config: CardConfig) -> Result<Self> {
        config.validate()?;
        let templater = CardTemplate::from_settings(&config.render)?;
        let renderer = WkhtmlRenderer::from_settings(&config.render);
        Ok(Self::new(config, templater, renderer))
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Produce the full HTML document for `messages`.
    pub fn render_html(&self, messages: &Messages) -> Result<String> {
        let prepared = messages.prepare(&self.config.quote)?;
        let html = self.templater.render_document(&prepared)?;
        debug!(
            "built {} byte document for {} messages",
            html.len(),
            prepared.messages.len()
        );
        Ok(html)
    }

    /// Render `messages` into an encoded, cropped image.
    pub fn render_image(&self, messages: &Messages) -> Result<RenderedImage> {
        let started = Instant::now();
        let html = self.render_html(messages)?;
        let png = self.renderer.render_png(&html, self.config.render.width)?;
        let image = postprocess::finish(&png, self.config.render.format, self.config.quote.quality)?;
        info!(
            "rendered {}x{} {} card ({} bytes) in {}ms",
            image.width,
            image.height,
            image.format.extension(),
            image.data.len(),
            started.elapsed().as_millis()
        );
        Ok(image)
    }
}
