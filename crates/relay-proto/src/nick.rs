//! Nickname validation utilities.

/// Maximum nickname length in characters.
pub const NICK_MAX_LEN: usize = 9;

/// Extension trait for checking if a string is a valid nickname.
pub trait NickExt {
    /// Check if this string is a valid nickname: one to
    /// [`NICK_MAX_LEN`] ASCII letters or digits.
    ///
    /// ```
    /// use relay_proto::NickExt;
    ///
    /// assert!("Alice".is_valid_nick());
    /// assert!("bot42".is_valid_nick());
    /// assert!(!"too_long_nick".is_valid_nick());
    /// assert!(!"a-b".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        !self.is_empty()
            && self.chars().count() <= NICK_MAX_LEN
            && self.chars().all(|c| c.is_ascii_alphanumeric())
    }
}
