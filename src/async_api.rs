use std::sync::mpsc::{self, Sender};
use std::thread;

use futures::future::join_all;
use log::debug;
use tokio::sync::oneshot;

use crate::{Error, Messages, QuoteCard, RenderedImage, Result};

enum Command {
    Html(Messages, oneshot::Sender<Result<String>>),
    Image(Messages, oneshot::Sender<Result<RenderedImage>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly front-end to a [`QuoteCard`] backed by a dedicated
/// worker thread.
///
/// Rendering shells out and blocks; the worker thread owns the card and
/// executes commands sent from async tasks so callers never block the
/// runtime.
#[derive(Clone)]
pub struct CardService {
    cmd_tx: Sender<Command>,
}

impl CardService {
    /// Spawn the worker thread that owns `card`.
    pub fn new(card: QuoteCard) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Html(messages, resp) => {
                        let _ = resp.send(card.render_html(&messages));
                    }
                    Command::Image(messages, resp) => {
                        let _ = resp.send(card.render_image(&messages));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
            debug!("card worker stopped");
        });

        Self { cmd_tx }
    }

    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .map_err(|_| Error::Other("Card worker has stopped".to_string()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Card worker dropped the request: {}", e)))?
    }

    /// Build the HTML document for `messages`.
    pub async fn html(&self, messages: Messages) -> Result<String> {
        self.call(|tx| Command::Html(messages, tx)).await
    }

    /// Render `messages` into an encoded image.
    pub async fn image(&self, messages: Messages) -> Result<RenderedImage> {
        self.call(|tx| Command::Image(messages, tx)).await
    }

    /// Render several independent cards; each result stands on its own.
    pub async fn images(&self, batch: Vec<Messages>) -> Vec<Result<RenderedImage>> {
        join_all(batch.into_iter().map(|m| self.image(m))).await
    }

    /// Stop the worker thread. Later calls fail with [`Error::Other`].
    pub async fn close(&self) -> Result<()> {
        self.call(Command::Close).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::Renderer;
    use crate::template::CardTemplate;
    use crate::CardConfig;

    struct NoRenderer;

    impl Renderer for NoRenderer {
        fn render_png(&self, _html: &str, _width: u32) -> Result<Vec<u8>> {
            Err(Error::RenderError("no renderer in tests".to_string()))
        }
    }

    fn service() -> CardService {
        CardService::new(QuoteCard::new(
            CardConfig::default(),
            CardTemplate::new(),
            NoRenderer,
        ))
    }

    fn messages(text: &str) -> Messages {
        serde_json::from_value(serde_json::json!({
            "messages": [{ "text": text, "author": { "id": 2, "name": "B" } }]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn html_goes_through_worker() {
        let svc = service();
        let html = svc.html(messages("a < b")).await.unwrap();
        assert!(html.contains("a&nbsp;<wbr>&lt;&nbsp;<wbr>b"));
    }

    #[tokio::test]
    async fn renderer_errors_are_returned() {
        let svc = service();
        let results = svc.images(vec![messages("x"), messages("y")]).await;
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(Error::RenderError(_)))));
    }

    #[tokio::test]
    async fn calls_after_close_fail() {
        let svc = service();
        svc.close().await.unwrap();
        assert!(svc.html(messages("x")).await.is_err());
    }
}
