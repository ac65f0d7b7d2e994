//! Load balancer status derived from API queries.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::rest::Query;

/// Metric returning device information, including memory counters.
pub const DEVICE_INFO_METRIC: &str = "system.device_info.get";

/// Memory counters of a device.
///
/// # Examples
///
/// ```
/// use a10_monitoring_client::MemoryUsage;
///
/// let usage = MemoryUsage { used_bytes: 3 << 30, total_bytes: 8 << 30 };
/// assert_eq!(usage.percent_used(), 37.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Bytes in use.
    pub used_bytes: u64,
    /// Total bytes installed.
    pub total_bytes: u64,
}

impl MemoryUsage {
    /// Percentage of memory in use.
    ///
    /// Counters read through [`A10LoadBalancer::memory`] always have a
    /// non-zero total; a zero total yields 100.0 rather than a healthy 0.0.
    pub fn percent_used(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        self.used_bytes as f64 * 100.0 / self.total_bytes as f64
    }
}

/// High-level view of one A10 device.
#[derive(Debug)]
pub struct A10LoadBalancer<Q> {
    api: Q,
}

impl<Q: Query> A10LoadBalancer<Q> {
    /// Wraps a query backend.
    pub fn new(api: Q) -> Self {
        Self { api }
    }

    /// Reads memory counters from [`DEVICE_INFO_METRIC`].
    ///
    /// The device reports kilobytes under `device_information.memory`.
    ///
    /// # Errors
    ///
    /// Propagates query errors and returns [`ClientError::MissingField`] if
    /// the counters are absent or not numbers. Returns
    /// [`ClientError::MalformedResponse`] if a counter overflows when
    /// converted to bytes, the total is zero, or usage exceeds the total.
    pub fn memory(&self) -> Result<MemoryUsage> {
        let response = self.api.query(DEVICE_INFO_METRIC, &BTreeMap::new())?;
        let memory = response
            .pointer("/device_information/memory")
            .ok_or_else(|| ClientError::MissingField("device_information.memory".to_string()))?;

        let usage = MemoryUsage {
            used_bytes: bytes(memory, "used")?,
            total_bytes: bytes(memory, "total")?,
        };
        if usage.total_bytes == 0 {
            return Err(ClientError::MalformedResponse(
                "device reports zero total memory".to_string(),
            ));
        }
        if usage.used_bytes > usage.total_bytes {
            return Err(ClientError::MalformedResponse(format!(
                "device reports {} KB used of {} KB total",
                usage.used_bytes / 1024,
                usage.total_bytes / 1024
            )));
        }
        debug!(
            used = usage.used_bytes,
            total = usage.total_bytes,
            "Read memory usage"
        );
        Ok(usage)
    }
}

/// Reads a kilobyte counter and converts it to bytes.
fn bytes(memory: &Value, field: &str) -> Result<u64> {
    let kilobytes = memory
        .get(field)
        .and_then(Value::as_u64)
        .ok_or_else(|| ClientError::MissingField(format!("device_information.memory.{field}")))?;
    kilobytes.checked_mul(1024).ok_or_else(|| {
        ClientError::MalformedResponse(format!(
            "device_information.memory.{field} out of range: {kilobytes} KB"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Canned(Value);

    impl Query for Canned {
        fn query(&self, metric: &str, params: &BTreeMap<String, String>) -> Result<Value> {
            assert_eq!(metric, DEVICE_INFO_METRIC);
            assert!(params.is_empty());
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_memory_from_device_info() {
        let lb = A10LoadBalancer::new(Canned(json!({
            "device_information": {"memory": {"total": 8_000_000, "used": 2_000_000}}
        })));
        let usage = lb.memory().unwrap();

        assert_eq!(usage.total_bytes, 8_000_000 * 1024);
        assert_eq!(usage.used_bytes, 2_000_000 * 1024);
        assert_eq!(usage.percent_used(), 25.0);
    }

    #[test]
    fn test_memory_missing_counters() {
        let lb = A10LoadBalancer::new(Canned(json!({"device_information": {}})));
        assert!(matches!(lb.memory(), Err(ClientError::MissingField(_))));

        let lb = A10LoadBalancer::new(Canned(json!({
            "device_information": {"memory": {"total": "lots", "used": 1}}
        })));
        assert!(matches!(
            lb.memory(),
            Err(ClientError::MissingField(ref f)) if f == "device_information.memory.total"
        ));
    }

    #[test]
    fn test_zero_total() {
        let usage = MemoryUsage { used_bytes: 5, total_bytes: 0 };
        assert_eq!(usage.percent_used(), 100.0);

        let lb = A10LoadBalancer::new(Canned(json!({
            "device_information": {"memory": {"total": 0, "used": 0}}
        })));
        assert!(matches!(lb.memory(), Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn test_huge_counter_is_rejected() {
        let lb = A10LoadBalancer::new(Canned(json!({
            "device_information": {"memory": {"total": u64::MAX / 512, "used": 1}}
        })));
        assert!(matches!(
            lb.memory(),
            Err(ClientError::MalformedResponse(ref m)) if m.contains("memory.total out of range")
        ));
    }

    #[test]
    fn test_used_above_total_is_rejected() {
        let lb = A10LoadBalancer::new(Canned(json!({
            "device_information": {"memory": {"total": 1024, "used": 2048}}
        })));
        assert!(matches!(lb.memory(), Err(ClientError::MalformedResponse(_))));
    }
}
