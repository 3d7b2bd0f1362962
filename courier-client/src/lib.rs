//! Buffered metrics client with periodic batched emission.
//!
//! Application code records named numeric measurements with dimensional tags
//! through a shared [`MetricsClient`]; the client buffers them in memory,
//! keyed by namespace, and ships them to a remote time-series ingestion
//! endpoint in batches of at most
//! [`MAX_DATUMS_PER_REQUEST`](courier_metrics::MAX_DATUMS_PER_REQUEST)
//! points, either on a fixed background interval or on demand.
//!
//! # Usage
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use std::time::Duration;
//!
//! use courier_client::{ClientConfig, MetricUnit, MetricsClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), courier_client::ConfigError> {
//! let config = ClientConfig::new(Duration::from_secs(60), "us-east-1");
//! let client = MetricsClient::connect(config)?;
//!
//! let shutdown = CancellationToken::new();
//! client.start(shutdown.clone());
//!
//! client
//!     .add(
//!         "App/Env",
//!         "LoginCount",
//!         1.0,
//!         MetricUnit::Count,
//!         BTreeMap::from([("route".to_owned(), "/login".to_owned())]),
//!     )
//!     .await;
//!
//! // Ship whatever is still buffered, then stop the background loop.
//! client.flush().await;
//! shutdown.cancel();
//! # Ok(())
//! # }
//! ```
//!
//! # Delivery semantics
//!
//! Recording never fails and never blocks on the network. A flush drains the
//! buffer first and transmits afterwards, so every point is attempted exactly
//! once: transmission failures drop the affected chunk without retry. Failed
//! chunks can be observed through
//! [`MetricsClient::on_transmission_error`] but are never surfaced to
//! recording callers. Unflushed points do not survive the process.
//!
//! The buffer lock is held for the entire flush, including the outbound
//! calls. Under high recording concurrency during a slow flush, producers
//! stall until the flush completes; a hung endpoint blocks them
//! indefinitely, since outbound calls carry no timeout of their own.

#![warn(missing_docs)]

mod client;
mod config;
mod transport;

pub use self::client::{MetricsClient, TransmissionErrorHook};
pub use self::config::{ClientConfig, ConfigError, ENDPOINT_ENV, TOKEN_ENV};
pub use self::transport::{HttpTransport, Transport, TransmissionError};

// Re-export the data layer so most consumers only depend on this crate.
pub use courier_metrics::{
    BatchedDatums, Datum, Dimension, MetricPoint, MetricUnit, MetricsBuffer,
    ParseMetricUnitError, MAX_DATUMS_PER_REQUEST,
};
