use std::fmt;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An error returned when parsing a [`MetricUnit`] from its string form.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("failed to parse metric unit")]
pub struct ParseMetricUnitError(pub(crate) ());

/// The semantic unit of a recorded value.
///
/// Units do not influence buffering or batching in any way. They are passed
/// through to the ingestion endpoint unchanged, where they determine how the
/// value is rendered and which metrics can be plotted on a shared axis.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum MetricUnit {
    /// A plain count of occurrences.
    Count,
    /// Time duration in full seconds.
    Seconds,
    /// Time duration in milliseconds (`10^-3` seconds).
    Milliseconds,
    /// Time duration in microseconds (`10^-6` seconds).
    Microseconds,
    /// Size of information in bytes.
    Bytes,
    /// Size of information in kilobytes (`10^3` bytes).
    Kilobytes,
    /// Size of information in megabytes (`10^6` bytes).
    Megabytes,
    /// Size of information in gigabytes (`10^9` bytes).
    Gigabytes,
    /// Ratio expressed as a percentage, `100` meaning "all of it".
    Percent,
    /// Rate of occurrences per second.
    CountPerSecond,
    /// Throughput in bytes per second.
    BytesPerSecond,
    /// Untyped value without a unit. This is the default.
    #[default]
    None,
}

impl MetricUnit {
    /// Returns the canonical string form of this unit as transmitted on the
    /// wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricUnit::Count => "Count",
            MetricUnit::Seconds => "Seconds",
            MetricUnit::Milliseconds => "Milliseconds",
            MetricUnit::Microseconds => "Microseconds",
            MetricUnit::Bytes => "Bytes",
            MetricUnit::Kilobytes => "Kilobytes",
            MetricUnit::Megabytes => "Megabytes",
            MetricUnit::Gigabytes => "Gigabytes",
            MetricUnit::Percent => "Percent",
            MetricUnit::CountPerSecond => "Count/Second",
            MetricUnit::BytesPerSecond => "Bytes/Second",
            MetricUnit::None => "None",
        }
    }

    /// Returns `true` if this is [`MetricUnit::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, MetricUnit::None)
    }
}

impl fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricUnit {
    type Err = ParseMetricUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Count" => Self::Count,
            "Seconds" => Self::Seconds,
            "Milliseconds" => Self::Milliseconds,
            "Microseconds" => Self::Microseconds,
            "Bytes" => Self::Bytes,
            "Kilobytes" => Self::Kilobytes,
            "Megabytes" => Self::Megabytes,
            "Gigabytes" => Self::Gigabytes,
            "Percent" => Self::Percent,
            "Count/Second" => Self::CountPerSecond,
            "Bytes/Second" => Self::BytesPerSecond,
            "None" | "" => Self::None,
            _ => return Err(ParseMetricUnitError(())),
        })
    }
}

impl Serialize for MetricUnit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MetricUnit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;

        impl de::Visitor<'_> for V {
            type Value = MetricUnit;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a metric unit string")
            }

            fn visit_str<E>(self, value: &str) -> Result<MetricUnit, E>
            where
                E: de::Error,
            {
                value
                    .parse()
                    .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_str(V)
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn test_unit_str_round_trip() {
        for unit in [
            MetricUnit::Count,
            MetricUnit::Seconds,
            MetricUnit::Milliseconds,
            MetricUnit::Microseconds,
            MetricUnit::Bytes,
            MetricUnit::Kilobytes,
            MetricUnit::Megabytes,
            MetricUnit::Gigabytes,
            MetricUnit::Percent,
            MetricUnit::CountPerSecond,
            MetricUnit::BytesPerSecond,
            MetricUnit::None,
        ] {
            assert_eq!(unit.as_str().parse::<MetricUnit>(), Ok(unit));
        }
    }

    #[test]
    fn test_unit_parse_unknown() {
        assert!("Fortnights".parse::<MetricUnit>().is_err());
        assert!("count".parse::<MetricUnit>().is_err());
    }

    #[test]
    fn test_unit_parse_empty() {
        assert_eq!("".parse::<MetricUnit>(), Ok(MetricUnit::None));
    }

    #[test]
    fn test_unit_serde() {
        let unit: MetricUnit = serde_json::from_str("\"Bytes/Second\"").unwrap();
        assert_eq!(unit, MetricUnit::BytesPerSecond);
        assert_eq!(serde_json::to_string(&unit).unwrap(), "\"Bytes/Second\"");
    }

    #[test]
    fn test_unit_default() {
        assert_eq!(MetricUnit::default(), MetricUnit::None);
        assert!(MetricUnit::default().is_none());
    }
}
