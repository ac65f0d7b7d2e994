//! Minimal HTTP/1.0 GET transport over [`TcpStream`].
//!
//! Requests are sent with `Connection: close` and the response is read to
//! end of stream, so neither keep-alive nor chunked transfer encoding is
//! needed.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::{ClientError, Result};

const USER_AGENT: &str = concat!("a10-monitoring/", env!("CARGO_PKG_VERSION"));

/// Largest response, headers included, read from a device.
pub const MAX_RESPONSE_BYTES: u64 = 16 * 1024 * 1024;

/// A parsed HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase from the status line.
    pub reason: String,
    /// Response headers in order of appearance.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Connect and read timeouts for one request.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// Time allowed to establish the TCP connection.
    pub connect: Duration,
    /// Time allowed for each read and write.
    pub read: Duration,
}

/// Sends `GET path` to `endpoint` and reads the whole response.
///
/// # Errors
///
/// Returns [`ClientError::Transport`] for connection and I/O failures and
/// [`ClientError::MalformedResponse`] if the reply is not HTTP.
pub fn get(endpoint: &Endpoint, path: &str, timeouts: Timeouts) -> Result<HttpResponse> {
    let transport = |source: std::io::Error| ClientError::Transport {
        endpoint: endpoint.to_string(),
        source,
    };

    let addrs: Vec<_> = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(transport)?
        .collect();

    let mut last_error = None;
    let mut stream = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, timeouts.connect) {
            Ok(connected) => {
                stream = Some(connected);
                break;
            }
            Err(e) => {
                debug!(%addr, error = %e, "Connection attempt failed");
                last_error = Some(e);
            }
        }
    }
    let mut stream = match stream {
        Some(stream) => stream,
        None => {
            return Err(transport(last_error.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "host resolved to no addresses")
            })));
        }
    };

    stream.set_read_timeout(Some(timeouts.read)).map_err(transport)?;
    stream.set_write_timeout(Some(timeouts.read)).map_err(transport)?;

    let request = build_request(endpoint, path);
    debug!(%endpoint, path, "Sending request");
    stream.write_all(request.as_bytes()).map_err(transport)?;

    let buffer = read_capped(&mut stream, MAX_RESPONSE_BYTES).map_err(transport)?;
    let Some(buffer) = buffer else {
        return Err(ClientError::MalformedResponse(format!(
            "response exceeds {MAX_RESPONSE_BYTES} bytes"
        )));
    };
    parse_response(&buffer)
}

/// Reads to end of stream, or returns `None` once more than `limit` bytes
/// have arrived.
fn read_capped<R: Read>(reader: R, limit: u64) -> std::io::Result<Option<Vec<u8>>> {
    let mut buffer = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut buffer)?;
    if buffer.len() as u64 > limit {
        return Ok(None);
    }
    Ok(Some(buffer))
}

fn build_request(endpoint: &Endpoint, path: &str) -> String {
    format!(
        "GET {path} HTTP/1.0\r\n\
         Host: {}\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Accept: application/json\r\n\
         Connection: close\r\n\
         \r\n",
        endpoint.host_header()
    )
}

/// Parses a raw HTTP response.
///
/// # Errors
///
/// Returns [`ClientError::MalformedResponse`] if the header block or status
/// line cannot be parsed, or if either part is not valid UTF-8.
pub fn parse_response(buffer: &[u8]) -> Result<HttpResponse> {
    let separator = buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| ClientError::MalformedResponse("no header/body separator".to_string()))?;

    let head = std::str::from_utf8(&buffer[..separator])
        .map_err(|_| ClientError::MalformedResponse("headers are not valid UTF-8".to_string()))?;
    let body = std::str::from_utf8(&buffer[separator + 4..]).map_err(|e| {
        ClientError::MalformedResponse(format!("body is not valid UTF-8: {e}"))
    })?;

    let mut lines = head.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| ClientError::MalformedResponse("empty response".to_string()))?;
    let (status, reason) = parse_status_line(status_line)?;

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    Ok(HttpResponse {
        status,
        reason,
        headers,
        body: body.to_string(),
    })
}

fn parse_status_line(line: &str) -> Result<(u16, String)> {
    let malformed = || ClientError::MalformedResponse(format!("invalid status line: {line}"));

    let mut parts = line.splitn(3, ' ');
    let version = parts.next().ok_or_else(malformed)?;
    if !version.starts_with("HTTP/") {
        return Err(malformed());
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(malformed)?;
    let reason = parts.next().unwrap_or_default().trim().to_string();
    Ok((status, reason))
}
