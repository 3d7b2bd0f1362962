use async_trait::async_trait;
use courier_metrics::Datum;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Failure of a single outbound "put metric data" call.
///
/// The flush routine absorbs these errors: the affected chunk is dropped and
/// the flush proceeds with the next one. See
/// [`MetricsClient::on_transmission_error`](crate::MetricsClient::on_transmission_error)
/// for the observation hook.
#[derive(Debug, Error)]
pub enum TransmissionError {
    /// The request could not be sent or the connection failed mid-flight.
    #[error("could not send request")]
    Request(#[from] reqwest::Error),
    /// The endpoint rejected the batch.
    #[error("metrics endpoint responded with status {0}")]
    Rejected(StatusCode),
}

/// Outbound session to the remote time-series ingestion endpoint.
///
/// One call transmits a single batch of at most
/// [`MAX_DATUMS_PER_REQUEST`](courier_metrics::MAX_DATUMS_PER_REQUEST) datums
/// scoped to one namespace. Implementations must be safe to share across the
/// scheduler task and direct flush callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submits one batch of datums under the given namespace.
    async fn put_metric_data(
        &self,
        namespace: &str,
        data: &[Datum],
    ) -> Result<(), TransmissionError>;
}

/// Body of a "put metric data" request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PutMetricData<'a> {
    namespace: &'a str,
    metric_data: &'a [Datum],
}

/// [`Transport`] shipping batches to an HTTP endpoint as PascalCase JSON.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    region: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Creates a transport session against `endpoint`.
    pub fn new(endpoint: Url, region: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            region: region.into(),
            token,
        }
    }

    /// Returns the endpoint this transport ships to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn put_metric_data(
        &self,
        namespace: &str,
        data: &[Datum],
    ) -> Result<(), TransmissionError> {
        let body = PutMetricData {
            namespace,
            metric_data: data,
        };

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("X-Courier-Region", &self.region)
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransmissionError::Rejected(status));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use courier_metrics::{MetricPoint, MetricUnit};
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn test_put_metric_data_wire_shape() {
        let timestamp = Utc.with_ymd_and_hms(2024, 7, 8, 9, 10, 11).unwrap();
        let data = vec![MetricPoint {
            name: "LoginCount".to_owned(),
            value: 1.0,
            unit: MetricUnit::Count,
            dimensions: BTreeMap::from([("route".to_owned(), "/login".to_owned())]),
        }
        .into_datum(timestamp)];

        let body = PutMetricData {
            namespace: "App/Env",
            metric_data: &data,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "Namespace": "App/Env",
                "MetricData": [{
                    "MetricName": "LoginCount",
                    "Value": 1.0,
                    "Unit": "Count",
                    "Dimensions": [{"Name": "route", "Value": "/login"}],
                    "Timestamp": "2024-07-08T09:10:11Z",
                }],
            })
        );
    }
}
