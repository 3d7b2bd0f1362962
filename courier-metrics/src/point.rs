use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::MetricUnit;

/// A single named measurement with dimensional tags.
///
/// Points are immutable once created: the recording entry point constructs
/// them, the flush routine consumes them, and nothing in between mutates them.
///
/// Same-named points are never merged or aggregated locally. Every recorded
/// point is transmitted individually, grouped only by namespace and chunked
/// by count.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricPoint {
    /// Identifier of the metric this point belongs to.
    pub name: String,

    /// The measured value.
    pub value: f64,

    /// The semantic unit of [`value`](Self::value).
    pub unit: MetricUnit,

    /// Tag key/value pairs attached for downstream filtering and grouping.
    ///
    /// Keys are unique within a point. Ordering carries no meaning; on the
    /// wire the map expands into an unordered list of pairs.
    pub dimensions: BTreeMap<String, String>,
}

impl MetricPoint {
    /// Converts this point into its wire form.
    ///
    /// The timestamp is not the instant the point was recorded but the
    /// instant the flush snapshot was taken; all datums of one flush cycle
    /// share it.
    pub fn into_datum(self, timestamp: DateTime<Utc>) -> Datum {
        let dimensions = self
            .dimensions
            .into_iter()
            .map(|(name, value)| Dimension { name, value })
            .collect();

        Datum {
            metric_name: self.name,
            value: self.value,
            unit: self.unit,
            dimensions,
            timestamp,
        }
    }
}

/// A dimension key/value pair in wire form.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    /// The tag key.
    pub name: String,
    /// The tag value.
    pub value: String,
}

/// Wire form of a [`MetricPoint`] as carried in a "put metric data" call.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Datum {
    /// Identifier of the metric.
    pub metric_name: String,

    /// The measured value.
    pub value: f64,

    /// The semantic unit of [`value`](Self::value).
    pub unit: MetricUnit,

    /// Unordered list of dimension pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,

    /// The shared timestamp of the flush cycle that drained this datum.
    pub timestamp: DateTime<Utc>,
}
