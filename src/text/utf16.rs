//! Conversions between Rust strings and UTF-16 code units.
//!
//! Entity offsets arrive as UTF-16 code-unit positions, so every piece of
//! index arithmetic in the formatter happens on the `u16` buffer produced
//! here and is only converted back to `String` for finished segments.

use crate::{Error, Result};

const HIGH_SURROGATES: std::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// Encode `text` as UTF-16, expanding scalars above U+FFFF into surrogate pairs.
pub fn to_utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Decode a UTF-16 slice, rejecting unpaired or malformed surrogates.
pub fn from_utf16(units: &[u16]) -> Result<String> {
    String::from_utf16(units).map_err(|e| {
        let at = first_unpaired_surrogate(units)
            .map(|i| format!(" at unit {}", i))
            .unwrap_or_default();
        Error::EncodingError(format!("{}{}", e, at))
    })
}

/// True iff splitting `units` at `position` would separate a high surrogate
/// from the low surrogate that follows it.
///
/// Both ends of the buffer are always safe split points.
pub fn is_inside_surrogate_pair(units: &[u16], position: usize) -> bool {
    if position == 0 || position >= units.len() {
        return false;
    }
    HIGH_SURROGATES.contains(&units[position - 1]) && LOW_SURROGATES.contains(&units[position])
}

/// Move `position` right until it is a valid split point.
pub fn align_to_boundary(units: &[u16], mut position: usize) -> usize {
    while is_inside_surrogate_pair(units, position) {
        position += 1;
    }
    position
}

fn first_unpaired_surrogate(units: &[u16]) -> Option<usize> {
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        if HIGH_SURROGATES.contains(&unit) {
            match units.get(i + 1) {
                Some(next) if LOW_SURROGATES.contains(next) => i += 2,
                _ => return Some(i),
            }
        } else if LOW_SURROGATES.contains(&unit) {
            return Some(i);
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn astral_chars_become_pairs() {
        let units = to_utf16("a😀b");
        assert_eq!(units, vec![0x61, 0xD83D, 0xDE00, 0x62]);
        assert_eq!(to_utf16("héllo").len(), 5);
    }

    #[test]
    fn round_trip_preserves_text() {
        let text = "Привет 👋🏽 мир 𝄞";
        assert_eq!(from_utf16(&to_utf16(text)).unwrap(), text);
    }

    #[test]
    fn unpaired_surrogates_are_rejected() {
        let err = from_utf16(&[0x61, 0xD83D]).unwrap_err();
        assert!(matches!(err, Error::EncodingError(ref m) if m.contains("unit 1")));

        assert!(from_utf16(&[0xDE00, 0x61]).is_err());
        assert!(from_utf16(&[0xD83D, 0x61, 0xDE00]).is_err());
    }

    #[test]
    fn detects_positions_between_pair_halves() {
        let units = to_utf16("😀a😀");
        assert!(!is_inside_surrogate_pair(&units, 0));
        assert!(is_inside_surrogate_pair(&units, 1));
        assert!(!is_inside_surrogate_pair(&units, 2));
        assert!(!is_inside_surrogate_pair(&units, 3));
        assert!(is_inside_surrogate_pair(&units, 4));
        assert!(!is_inside_surrogate_pair(&units, 5));
        // past the end is never inside
        assert!(!is_inside_surrogate_pair(&units, 9));
    }

    #[test]
    fn bmp_text_has_no_unsafe_positions() {
        let units = to_utf16("plain ascii");
        assert!((0..=units.len()).all(|p| !is_inside_surrogate_pair(&units, p)));
    }

    #[test]
    fn align_moves_one_unit_right() {
        let units = to_utf16("x😀");
        assert_eq!(align_to_boundary(&units, 2), 3);
        assert_eq!(align_to_boundary(&units, 1), 1);
        assert_eq!(align_to_boundary(&units, 3), 3);
    }
}
