//! Per-connection limits configuration.

use serde::Deserialize;

/// Per-connection limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted inbound line in bytes, CRLF included (default: 512).
    /// A longer line closes the connection.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Outbound queue depth in messages (default: 512).
    /// Broadcasts to a client whose queue is full are dropped for that client.
    #[serde(default = "default_sendq")]
    pub sendq: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            sendq: default_sendq(),
        }
    }
}

fn default_max_line_len() -> usize {
    512
}

fn default_sendq() -> usize {
    512
}
