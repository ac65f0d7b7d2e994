//! `HOST[:PORT]` endpoint parsing.

use std::fmt;

use crate::error::{ClientError, Result};

/// Host and port of an A10 device.
///
/// # Examples
///
/// ```
/// use a10_monitoring_client::Endpoint;
///
/// let lb = Endpoint::parse("10.0.0.1", 80).unwrap();
/// assert_eq!(lb.to_string(), "10.0.0.1:80");
///
/// let lb = Endpoint::parse("lb1.example.com:8080", 80).unwrap();
/// assert_eq!(lb.port, 8080);
///
/// let lb = Endpoint::parse("[fe80::1]:443", 80).unwrap();
/// assert_eq!(lb.host, "fe80::1");
/// assert_eq!(lb.to_string(), "[fe80::1]:443");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name or IP address (IPv6 without brackets).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Parses `HOST[:PORT]`, using `default_port` when no port is given.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] for an empty host, a bad
    /// port, or an unterminated IPv6 bracket.
    pub fn parse(raw: &str, default_port: u16) -> Result<Self> {
        let invalid = || ClientError::InvalidEndpoint(raw.to_string());
        let raw_trimmed = raw.trim();

        let (host, port) = if let Some(rest) = raw_trimmed.strip_prefix('[') {
            let (host, after) = rest.split_once(']').ok_or_else(invalid)?;
            let port = match after {
                "" => None,
                _ => Some(after.strip_prefix(':').ok_or_else(invalid)?),
            };
            (host, port)
        } else if raw_trimmed.matches(':').count() > 1 {
            // Bare IPv6 literal without a port.
            (raw_trimmed, None)
        } else {
            match raw_trimmed.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (raw_trimmed, None),
            }
        };

        if host.is_empty() {
            return Err(invalid());
        }
        let port = match port {
            Some(port) => port.parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(invalid)?,
            None => default_port,
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Value for the HTTP `Host` header.
    pub fn host_header(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        let endpoint = Endpoint::parse("lb1", 80).unwrap();
        assert_eq!(endpoint.host, "lb1");
        assert_eq!(endpoint.port, 80);
    }

    #[test]
    fn test_explicit_port() {
        let endpoint = Endpoint::parse(" 10.0.0.1:8080 ", 80).unwrap();
        assert_eq!(endpoint.host, "10.0.0.1");
        assert_eq!(endpoint.port, 8080);
    }

    #[test]
    fn test_bare_ipv6() {
        let endpoint = Endpoint::parse("fe80::1", 80).unwrap();
        assert_eq!(endpoint.host, "fe80::1");
        assert_eq!(endpoint.port, 80);
    }

    #[test]
    fn test_rejects_invalid() {
        for raw in ["", ":80", "lb1:", "lb1:http", "lb1:0", "lb1:70000", "[fe80::1", "[fe80::1]80"] {
            assert!(
                matches!(Endpoint::parse(raw, 80), Err(ClientError::InvalidEndpoint(_))),
                "{raw} should be rejected"
            );
        }
    }
}
