//! Wrapping emoji in a font span so the renderer picks a colour emoji face.

use unicode_segmentation::UnicodeSegmentation;

/// Opening tag placed before every run of emoji.
pub const EMOJI_SPAN_OPEN: &str = "<span style=\"font-family: 'Noto Color Emoji';\">";
/// Closing tag placed after every run of emoji.
pub const EMOJI_SPAN_CLOSE: &str = "</span>";

// Extended_Pictographic plus the Emoji_Presentation code points outside it
// (regional indicators and skin tone modifiers). Sorted, non-overlapping.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x2199),
    (0x21A9, 0x21AA),
    (0x231A, 0x231B),
    (0x2328, 0x2328),
    (0x2388, 0x2388),
    (0x23CF, 0x23CF),
    (0x23E9, 0x23F3),
    (0x23F8, 0x23FA),
    (0x24C2, 0x24C2),
    (0x25AA, 0x25AB),
    (0x25B6, 0x25B6),
    (0x25C0, 0x25C0),
    (0x25FB, 0x25FE),
    (0x2600, 0x2605),
    (0x2607, 0x2612),
    (0x2614, 0x2685),
    (0x2690, 0x2705),
    (0x2708, 0x2712),
    (0x2714, 0x2714),
    (0x2716, 0x2716),
    (0x271D, 0x271D),
    (0x2721, 0x2721),
    (0x2728, 0x2728),
    (0x2733, 0x2734),
    (0x2744, 0x2744),
    (0x2747, 0x2747),
    (0x274C, 0x274C),
    (0x274E, 0x274E),
    (0x2753, 0x2755),
    (0x2757, 0x2757),
    (0x2763, 0x2767),
    (0x2795, 0x2797),
    (0x27A1, 0x27A1),
    (0x27B0, 0x27B0),
    (0x27BF, 0x27BF),
    (0x2934, 0x2935),
    (0x2B05, 0x2B07),
    (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50),
    (0x2B55, 0x2B55),
    (0x3030, 0x3030),
    (0x303D, 0x303D),
    (0x3297, 0x3297),
    (0x3299, 0x3299),
    (0x1F000, 0x1F0FF),
    (0x1F10D, 0x1F10F),
    (0x1F12F, 0x1F12F),
    (0x1F16C, 0x1F171),
    (0x1F17E, 0x1F17F),
    (0x1F18E, 0x1F18E),
    (0x1F191, 0x1F19A),
    (0x1F1AD, 0x1F1FF),
    (0x1F201, 0x1F20F),
    (0x1F21A, 0x1F21A),
    (0x1F22F, 0x1F22F),
    (0x1F232, 0x1F23A),
    (0x1F23C, 0x1F23F),
    (0x1F249, 0x1F53D),
    (0x1F546, 0x1F64F),
    (0x1F680, 0x1F6FF),
    (0x1F774, 0x1F77F),
    (0x1F7D5, 0x1F7FF),
    (0x1F80C, 0x1F80F),
    (0x1F848, 0x1F84F),
    (0x1F85A, 0x1F85F),
    (0x1F888, 0x1F88F),
    (0x1F8AE, 0x1F8FF),
    (0x1F90C, 0x1F93A),
    (0x1F93C, 0x1F945),
    (0x1F947, 0x1FAFF),
    (0x1FC00, 0x1FFFD),
];

/// True for scalars with `Extended_Pictographic` or `Emoji_Presentation`.
pub fn is_emoji(ch: char) -> bool {
    let cp = ch as u32;
    if cp < 0xA9 {
        return false;
    }
    EMOJI_RANGES
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

fn is_emoji_cluster(cluster: &str) -> bool {
    cluster.chars().next().is_some_and(is_emoji)
}

/// Wrap every maximal run of emoji grapheme clusters in `markup` with
/// [`EMOJI_SPAN_OPEN`]/[`EMOJI_SPAN_CLOSE`].
///
/// Runs that already sit directly inside such a span are left alone, so
/// wrapping twice gives the same result as wrapping once.
pub fn wrap_emoji(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut run_start: Option<usize> = None;
    let mut copied = 0;

    let mut flush = |out: &mut String, start: usize, end: usize| {
        out.push_str(&markup[copied..start]);
        let wrapped = markup[..start].ends_with(EMOJI_SPAN_OPEN)
            && markup[end..].starts_with(EMOJI_SPAN_CLOSE);
        if wrapped {
            out.push_str(&markup[start..end]);
        } else {
            out.push_str(EMOJI_SPAN_OPEN);
            out.push_str(&markup[start..end]);
            out.push_str(EMOJI_SPAN_CLOSE);
        }
        copied = end;
    };

    for (idx, cluster) in markup.grapheme_indices(true) {
        match (is_emoji_cluster(cluster), run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                flush(&mut out, start, idx);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        flush(&mut out, start, markup.len());
    }

    out.push_str(&markup[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(inner: &str) -> String {
        format!("{}{}{}", EMOJI_SPAN_OPEN, inner, EMOJI_SPAN_CLOSE)
    }

    #[test]
    fn classifies_common_emoji() {
        assert!(is_emoji('😀'));
        assert!(is_emoji('🚀'));
        assert!(is_emoji('❤'));
        assert!(is_emoji('©'));
        assert!(is_emoji('🇺'));
        assert!(is_emoji('🏽'));
        assert!(is_emoji('🫠'));
    }

    #[test]
    fn markup_characters_are_not_emoji() {
        for ch in "<>/=\"' abcXYZ019&;\u{200D}\u{FE0F}é中".chars() {
            assert!(!is_emoji(ch), "{:?} misclassified", ch);
        }
    }

    #[test]
    fn wraps_single_emoji() {
        assert_eq!(wrap_emoji("a😀b"), format!("a{}b", span("😀")));
    }

    #[test]
    fn wraps_maximal_runs_once() {
        assert_eq!(wrap_emoji("hi 😀😎!"), format!("hi {}!", span("😀😎")));
    }

    #[test]
    fn keeps_zwj_sequences_and_flags_whole() {
        let family = "👨\u{200D}👩\u{200D}👧";
        assert_eq!(wrap_emoji(family), span(family));
        assert_eq!(wrap_emoji("go 🇺🇦"), format!("go {}", span("🇺🇦")));
        let wave = "👋🏽";
        assert_eq!(wrap_emoji(wave), span(wave));
    }

    #[test]
    fn leaves_tags_alone() {
        let markup = "<b>bold</b>&nbsp;<wbr><i>x</i>";
        assert_eq!(wrap_emoji(markup), markup);
    }

    #[test]
    fn wraps_inside_tags() {
        assert_eq!(wrap_emoji("<b>🔥</b>"), format!("<b>{}</b>", span("🔥")));
    }

    #[test]
    fn is_idempotent() {
        let once = wrap_emoji("x 😀 y 🎉🎉 z");
        assert_eq!(wrap_emoji(&once), once);
    }

    #[test]
    fn empty_input() {
        assert_eq!(wrap_emoji(""), "");
    }
}
