/// Nickname colours, indexed through [`COLOR_ORDER`].
pub const NICK_COLORS: [&str; 8] = [
    "#fb6169", "#85de85", "#f3bc5c", "#65bdf3", "#b48bf2", "#ff5694", "#62d4e3", "#faa357",
];

const COLOR_ORDER: [usize; 7] = [0, 7, 4, 1, 6, 3, 5];

/// Pick a stable nickname colour for a user (or chat) id.
///
/// Chat ids may be negative, so the bucket uses a Euclidean remainder.
pub fn nick_color(user_id: i64) -> &'static str {
    let bucket = user_id.rem_euclid(COLOR_ORDER.len() as i64) as usize;
    NICK_COLORS[COLOR_ORDER[bucket]]
}
