//! Address of the paired instance

use std::fmt;

/// Base URL of the paired instance's control server, e.g.
/// `http://192.168.1.20:5000`.
///
/// Only emptiness is checked. A missing scheme is filled in with `http://`
/// and trailing slashes are dropped so routes can be appended directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerAddress(String);

impl PeerAddress {
    /// Parse a user-supplied address. Returns `None` when blank.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.contains("://") {
            Some(Self(trimmed.to_string()))
        } else {
            Some(Self(format!("http://{}", trimmed)))
        }
    }

    /// The base URL
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a route path (with or without a leading slash) onto the base URL.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank() {
        assert!(PeerAddress::parse("").is_none());
        assert!(PeerAddress::parse("   ").is_none());
        assert!(PeerAddress::parse("/").is_none());
    }

    #[test]
    fn test_parse_normalizes() {
        let peer = PeerAddress::parse(" http://10.0.0.2:5000/ ").unwrap();
        assert_eq!(peer.as_str(), "http://10.0.0.2:5000");

        let peer = PeerAddress::parse("10.0.0.2:5000").unwrap();
        assert_eq!(peer.as_str(), "http://10.0.0.2:5000");
    }

    #[test]
    fn test_join() {
        let peer = PeerAddress::parse("http://peer:5000").unwrap();
        assert_eq!(peer.join("/seek/120"), "http://peer:5000/seek/120");
        assert_eq!(peer.join("play"), "http://peer:5000/play");
    }
}
