//! Channel name utilities.
//!
//! A channel name starts with `#`, is at most [`CHANNEL_MAX_LEN`]
//! characters long, and never contains a space, a comma, BEL (0x07) or a
//! second `#`.

/// Maximum channel name length in characters, including the leading `#`.
pub const CHANNEL_MAX_LEN: usize = 200;

/// Extension trait for checking if a string is a valid channel name.
pub trait ChannelExt {
    /// Check if this string is a valid channel name.
    ///
    /// ```
    /// use relay_proto::ChannelExt;
    ///
    /// assert!("#rust".is_valid_channel_name());
    /// assert!(!"rust".is_valid_channel_name());
    /// assert!(!"#a#b".is_valid_channel_name());
    /// ```
    fn is_valid_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_valid_channel_name(&self) -> bool {
        let Some(rest) = self.strip_prefix('#') else {
            return false;
        };

        if self.chars().count() > CHANNEL_MAX_LEN {
            return false;
        }

        !rest
            .chars()
            .any(|c| matches!(c, ' ' | ',' | '\x07' | '#'))
    }
}

/// Fold a channel name into its registry key.
///
/// A missing `#` is prepended, then the whole name is lowercased. Unlike
/// nickname folding, brackets are left alone.
pub fn channel_to_lower(name: &str) -> String {
    if name.starts_with('#') {
        name.to_lowercase()
    } else {
        format!("#{}", name).to_lowercase()
    }
}
