use image::{Rgba, RgbaImage};
use quotecard::rendering::{postprocess, Renderer};
use quotecard::template::CardTemplate;
use quotecard::{CardConfig, CardService, Error, Messages, OutputFormat, QuoteCard, Result};

struct DotRenderer;

impl Renderer for DotRenderer {
    fn render_png(&self, html: &str, _width: u32) -> Result<Vec<u8>> {
        // One opaque pixel per message bubble, stacked vertically
        let bubbles = html.matches("class=\"bubble\"").count() as u32;
        let mut img = RgbaImage::new(8, 8 * bubbles.max(1));
        for i in 0..bubbles {
            img.put_pixel(2, i * 8 + 1, Rgba([0, 0, 0, 255]));
        }
        postprocess::encode(&img, OutputFormat::Png, 100)
    }
}

fn messages(texts: &[&str]) -> Messages {
    let quotes: Vec<_> = texts
        .iter()
        .map(|t| serde_json::json!({ "text": t, "author": { "id": 9, "name": "N" } }))
        .collect();
    serde_json::from_value(serde_json::json!({ "messages": quotes })).unwrap()
}

fn service() -> CardService {
    let mut config = CardConfig::default();
    config.render.format = OutputFormat::Png;
    CardService::new(QuoteCard::new(config, CardTemplate::new(), DotRenderer))
}

#[tokio::test]
async fn renders_batches_concurrently_in_order() {
    let svc = service();
    let results = svc
        .images(vec![messages(&["one"]), messages(&["a", "b", "c"])])
        .await;

    let heights: Vec<u32> = results.into_iter().map(|r| r.unwrap().height).collect();
    assert_eq!(heights, vec![1, 17]);
    svc.close().await.unwrap();
}

#[tokio::test]
async fn one_bad_card_does_not_poison_the_batch() {
    let svc = service();
    let bad: Messages = serde_json::from_value(serde_json::json!({
        "messages": [{
            "text": "x",
            "entities": [{ "offset": 0, "length": 0, "type": "bold" }],
            "author": { "id": 1, "name": "A" }
        }]
    }))
    .unwrap();

    let results = svc.images(vec![bad, messages(&["fine"])]).await;
    assert!(matches!(results[0], Err(Error::InvalidDirective(_))));
    assert!(results[1].is_ok());
}

#[tokio::test]
async fn service_is_usable_from_spawned_tasks() {
    let svc = service();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.html(messages(&[format!("msg {}", i).as_str()])).await })
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        let html = h.await.unwrap().unwrap();
        assert!(html.contains(&format!("msg&nbsp;<wbr>{}", i)));
    }
}
