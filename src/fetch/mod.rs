mod basic;
mod client;
pub mod auth;

pub use basic::{BasicClient, USER_AGENT};
pub use client::HttpClient;

/// Truncates an upstream body for logging.
pub fn fragment(body: &str, limit: usize) -> &str {
    match body.char_indices().nth(limit) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_truncates_on_char_boundary() {
        assert_eq!(fragment("abcdef", 3), "abc");
        assert_eq!(fragment("ab", 3), "ab");
        assert_eq!(fragment("ñandú", 2), "ña");
    }
}
