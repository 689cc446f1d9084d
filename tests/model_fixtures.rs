use std::fs;

use quotecard::color::nick_color;
use quotecard::text::emoji::{EMOJI_SPAN_CLOSE, EMOJI_SPAN_OPEN};
use quotecard::{Messages, QuoteSettings};

fn load_fixture() -> Messages {
    let data = fs::read_to_string("tests/fixtures/messages.json").expect("read fixture");
    serde_json::from_str(&data).expect("fixture should deserialize")
}

#[test]
fn fixture_prepares_into_render_ready_quotes() {
    let prepared = load_fixture()
        .prepare(&QuoteSettings::default())
        .expect("prepare failed");

    assert_eq!(prepared.text_color, "#eeeeee");
    assert_eq!(prepared.quote_color, "#232323");
    assert_eq!(prepared.messages.len(), 3);

    let first = &prepared.messages[0];
    let expected = format!(
        "<b>Check</b>&nbsp;<wbr>this&nbsp;<wbr>out:&nbsp;<wbr>\
         <code>x&nbsp;<wbr>&lt;&nbsp;<wbr>y&nbsp;<wbr>&amp;&amp;&nbsp;<wbr>y&nbsp;<wbr>&gt;&nbsp;<wbr>z</code>\
         &nbsp;<wbr><i>{}🚀{}</i><br>second&nbsp;<wbr>line",
        EMOJI_SPAN_OPEN, EMOJI_SPAN_CLOSE
    );
    assert_eq!(first.text.as_deref(), Some(expected.as_str()));
    assert_eq!(first.author.name, "Alice &lt;admin&gt;");
    assert_eq!(first.author.color, nick_color(123456789));
    assert!(first
        .author
        .avatar
        .as_deref()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    let reply = first.reply.as_ref().expect("reply kept");
    let reply_text = reply.text.as_deref().unwrap();
    assert!(reply_text.starts_with("what&"));
    assert!(!reply_text.contains('\''));
    assert_eq!(reply.color, Some(nick_color(42)));
}

#[test]
fn empty_reply_is_dropped_and_names_get_emoji_spans() {
    let prepared = load_fixture().prepare(&QuoteSettings::default()).unwrap();
    let second = &prepared.messages[1];
    assert!(second.reply.is_none());
    assert_eq!(second.text.as_deref(), Some("plain&nbsp;<wbr>&amp;&nbsp;<wbr>simple"));
    assert_eq!(
        second.author.name,
        format!("Channel {}📣{}", EMOJI_SPAN_OPEN, EMOJI_SPAN_CLOSE)
    );
    assert_eq!(second.author.via_bot.as_deref(), Some("quotebot"));
}

#[test]
fn media_only_quote_has_no_text() {
    let prepared = load_fixture().prepare(&QuoteSettings::default()).unwrap();
    let third = &prepared.messages[2];
    assert!(third.text.is_none());
    assert!(third.media.as_deref().unwrap().starts_with("data:image/png"));
    assert!(third.author.avatar.is_none());
}
