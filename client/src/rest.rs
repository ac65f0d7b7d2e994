//! A10 REST API queries.
//!
//! Each query is a single `GET` against the API entry point with the metric
//! passed as the `method` parameter, e.g.
//! `/services/rest/V2.1/?format=json&method=slb.virtual_server.getAll`.
//! Failures reported by the device come back inside a JSON envelope:
//!
//! ```json
//! {"response": {"status": "fail", "err": {"code": 1009, "msg": "Invalid session ID"}}}
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{ClientError, Result};
use crate::http::{self, Timeouts};

/// Anything that can answer an A10 metric query.
///
/// Implemented by [`A10RestApi`] for real devices; tests substitute canned
/// responses.
pub trait Query {
    /// Runs `metric` with `params` and returns the parsed JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport or protocol [`ClientError`].
    fn query(&self, metric: &str, params: &BTreeMap<String, String>) -> Result<Value>;
}

/// REST client bound to one device.
#[derive(Debug, Clone)]
pub struct A10RestApi {
    endpoint: Endpoint,
    config: ClientConfig,
}

impl A10RestApi {
    /// Creates a client for `slb` given as `HOST[:PORT]`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] if `slb` cannot be parsed.
    pub fn new(slb: &str, config: ClientConfig) -> Result<Self> {
        let endpoint = Endpoint::parse(slb, config.default_port)?;
        Ok(Self { endpoint, config })
    }

    /// Device this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Builds the request path for a query.
    ///
    /// Parameters are percent-encoded and appended in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use a10_monitoring_client::{A10RestApi, ClientConfig};
    ///
    /// let api = A10RestApi::new("10.0.0.1", ClientConfig::default()).unwrap();
    /// let params = BTreeMap::from([("port_num".to_string(), "1".to_string())]);
    /// assert_eq!(
    ///     api.request_path("network.interface.get", &params),
    ///     "/services/rest/V2.1/?format=json&method=network.interface.get&port_num=1"
    /// );
    /// ```
    pub fn request_path(&self, metric: &str, params: &BTreeMap<String, String>) -> String {
        let mut path = format!(
            "{}?format=json&method={}",
            self.config.api_path,
            percent_encode(metric)
        );
        for (key, value) in params {
            path.push('&');
            path.push_str(&percent_encode(key));
            path.push('=');
            path.push_str(&percent_encode(value));
        }
        path
    }

    fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_millis(self.config.connect_timeout_ms),
            read: Duration::from_millis(self.config.read_timeout_ms),
        }
    }
}

impl Query for A10RestApi {
    fn query(&self, metric: &str, params: &BTreeMap<String, String>) -> Result<Value> {
        let path = self.request_path(metric, params);
        info!(endpoint = %self.endpoint, metric, "Querying A10 API");

        let response = http::get(&self.endpoint, &path, self.timeouts())?;
        debug!(status = response.status, bytes = response.body.len(), "Received response");

        if !response.is_success() {
            return Err(ClientError::HttpStatus {
                status: response.status,
                reason: response.reason,
            });
        }
        parse_body(&response.body)
    }
}

/// Parses a response body and unwraps the A10 failure envelope.
///
/// # Errors
///
/// Returns [`ClientError::Json`] for invalid JSON and [`ClientError::Api`]
/// for a `"status": "fail"` response.
pub fn parse_body(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body)?;
    check_api_error(&value)?;
    Ok(value)
}

fn check_api_error(value: &Value) -> Result<()> {
    let Some(response) = value.get("response") else {
        return Ok(());
    };
    if response.get("status").and_then(Value::as_str) != Some("fail") {
        return Ok(());
    }
    let err = response.get("err");
    Err(ClientError::Api {
        code: err
            .and_then(|e| e.get("code"))
            .and_then(Value::as_i64)
            .unwrap_or_default(),
        message: err
            .and_then(|e| e.get("msg"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string(),
    })
}

/// Percent-encodes everything outside the URL unreserved set.
fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Splits `key=value` arguments into query parameters.
///
/// Only the first `=` separates; the value may contain more.
///
/// # Errors
///
/// Returns the offending argument if it has no `=` or an empty key.
///
/// # Examples
///
/// ```
/// use a10_monitoring_client::parse_params;
///
/// let params = parse_params(["port_num=1", "name=a=b"]).unwrap();
/// assert_eq!(params["port_num"], "1");
/// assert_eq!(params["name"], "a=b");
/// assert_eq!(parse_params(["oops"]).unwrap_err(), "oops");
/// ```
pub fn parse_params<I, S>(args: I) -> std::result::Result<BTreeMap<String, String>, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
                _ => Err(arg.to_string()),
            }
        })
        .collect()
}
