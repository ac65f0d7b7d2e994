//! Minimal client for the A10 load balancer status API.
//!
//! The utilities in this workspace hand their parsed options to this crate,
//! which turns them into a single HTTP `GET` against the device's REST entry
//! point and returns the JSON response.
//!
//! - [`Endpoint`]: `HOST[:PORT]` parsing with a default port.
//! - [`Query`] / [`A10RestApi`]: metric queries returning [`serde_json::Value`].
//! - [`A10LoadBalancer`]: typed views such as [`MemoryUsage`].
//! - [`ClientConfig`]: YAML configuration for ports, paths, and timeouts.
//!
//! There is no retry and no session handling; a failed query surfaces
//! immediately as a [`ClientError`].
//!
//! # Quick start
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use a10_monitoring_client::{A10LoadBalancer, A10RestApi, ClientConfig, Query};
//!
//! let config = ClientConfig::from_env()?;
//! let api = A10RestApi::new("10.0.0.1:80", config)?;
//! let servers = api.query("slb.virtual_server.getAll", &BTreeMap::new())?;
//! println!("{servers:#}");
//!
//! let memory = A10LoadBalancer::new(api).memory()?;
//! println!("{:.1}% used", memory.percent_used());
//! # Ok::<(), a10_monitoring_client::ClientError>(())
//! ```

mod config;
mod endpoint;
mod error;
pub mod http;
mod load_balancer;
mod rest;

pub use config::{CONFIG_ENV_VAR, ClientConfig};
pub use endpoint::Endpoint;
pub use error::{ClientError, Result};
pub use load_balancer::{A10LoadBalancer, DEVICE_INFO_METRIC, MemoryUsage};
pub use rest::{A10RestApi, Query, parse_body, parse_params};
