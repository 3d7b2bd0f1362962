//! Metric protocol types and the namespace-keyed point buffer used by the
//! courier client.
//!
//! This crate is the pure data layer of the courier workspace: it defines
//! what a measurement looks like, how measurements accumulate in memory, and
//! how a drained snapshot is cut into transport-sized batches. It performs no
//! I/O; shipping batches to the ingestion endpoint is the job of
//! `courier-client`.
//!
//! # Buffering
//!
//! A [`MetricPoint`] is one measurement: a name, a floating point value, a
//! semantic [`MetricUnit`], and a map of dimension tags. Points accumulate in
//! a [`MetricsBuffer`] under their namespace, a free-form string partition
//! key. Points are kept verbatim; the buffer never sums, averages or
//! deduplicates.
//!
//! # Batching
//!
//! At flush time every buffered point is converted into a [`Datum`], the wire
//! form carrying the flush cycle's shared timestamp, and the datums of each
//! namespace are sliced into chunks of at most [`MAX_DATUMS_PER_REQUEST`]
//! items by [`BatchedDatums`]. Each chunk becomes exactly one outbound "put
//! metric data" call.

#![warn(missing_docs)]

mod buffer;
mod point;
mod protocol;
mod view;

pub use self::buffer::MetricsBuffer;
pub use self::point::{Datum, Dimension, MetricPoint};
pub use self::protocol::{MetricUnit, ParseMetricUnitError};
pub use self::view::{BatchedDatums, MAX_DATUMS_PER_REQUEST};
