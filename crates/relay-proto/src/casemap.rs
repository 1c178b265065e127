//! Nickname case-mapping.
//!
//! Nicknames compare case-insensitively with three extra equivalences on
//! top of ASCII lowercase: `[` and `{`, `]` and `}`, `\` and `|`. Channel
//! names use plain lowercase instead (see [`crate::chan::channel_to_lower`]).

/// Convert a single character to its folded nickname form.
///
/// In addition to ASCII lowercase conversion, this maps:
/// - `[` → `{`
/// - `]` → `}`
/// - `\` → `|`
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        'A'..='Z' => (c as u8 + 32) as char,
        _ => c,
    }
}

/// Fold a nickname for use as a registry key.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Compare two nicknames under the folding rules.
pub fn irc_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.chars()
        .zip(b.chars())
        .all(|(ca, cb)| irc_lower_char(ca) == irc_lower_char(cb))
}
