use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use courier_metrics::{BatchedDatums, Datum, MetricPoint, MetricUnit, MetricsBuffer};
use tokio::sync::Mutex;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::{ClientConfig, ConfigError};
use crate::transport::{HttpTransport, Transport, TransmissionError};

/// Hook observing transmission failures, invoked with the affected namespace.
pub type TransmissionErrorHook = Box<dyn Fn(&str, &TransmissionError) + Send + Sync>;

/// Shared handle to the metrics buffer and the transport session.
///
/// The handle is cheap to clone; all clones share the same buffer, transport
/// and scheduler state. Typical usage is one handle per process (or per
/// logical destination), cloned into every component that records metrics and
/// once into the background scheduler via [`start`](Self::start).
///
/// Recording ([`add`](Self::add)) cannot fail. Transmission happens later,
/// decoupled, either on the scheduled interval or through a direct call to
/// [`flush`](Self::flush).
#[derive(Clone)]
pub struct MetricsClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Box<dyn Transport>,
    buffer: Mutex<MetricsBuffer>,
    flush_interval: Duration,
    started: AtomicBool,
    error_hook: OnceLock<TransmissionErrorHook>,
}

impl MetricsClient {
    /// Establishes a transport session from `config` and the execution
    /// environment, returning a ready-to-use handle.
    ///
    /// Fails with a [`ConfigError`] if the environment cannot produce a
    /// valid session, see [`ClientConfig::endpoint`].
    pub fn connect(config: ClientConfig) -> Result<Self, ConfigError> {
        let endpoint = config.resolve_endpoint()?;
        let token = config.resolve_token();
        let transport = HttpTransport::new(endpoint, config.region.clone(), token);

        tracing::debug!(
            region = config.region.as_str(),
            "metrics client connected"
        );
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a handle shipping through a custom [`Transport`].
    pub fn with_transport<T>(config: ClientConfig, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                transport: Box::new(transport),
                buffer: Mutex::new(MetricsBuffer::new()),
                flush_interval: config.flush_interval(),
                started: AtomicBool::new(false),
                error_hook: OnceLock::new(),
            }),
        }
    }

    /// Installs a hook observing transmission failures.
    ///
    /// The hook is invoked once per failed chunk with the namespace the chunk
    /// belonged to. It does not change flush behavior: failed chunks are
    /// dropped either way. The hook can be installed at most once; later
    /// calls are ignored.
    pub fn on_transmission_error<F>(&self, hook: F)
    where
        F: Fn(&str, &TransmissionError) + Send + Sync + 'static,
    {
        if self.inner.error_hook.set(Box::new(hook)).is_err() {
            tracing::debug!("transmission error hook already installed, ignoring");
        }
    }

    /// Records one measurement under `namespace`.
    ///
    /// The point is appended to the in-memory buffer, creating the namespace
    /// entry if absent, and stays there until the next flush drains it.
    /// Within one namespace, points are transmitted in the order they were
    /// recorded; there is no ordering between namespaces.
    ///
    /// The call cannot fail and performs no I/O.
    pub async fn add(
        &self,
        namespace: &str,
        name: &str,
        value: f64,
        unit: MetricUnit,
        dimensions: BTreeMap<String, String>,
    ) {
        let point = MetricPoint {
            name: name.to_owned(),
            value,
            unit,
            dimensions,
        };

        self.inner.buffer.lock().await.record(namespace, point);
    }

    /// Drains the buffer and attempts transmission of everything in it.
    ///
    /// The buffer lock is held for the entire flush, including the outbound
    /// calls; concurrent [`add`](Self::add) callers and other flushes wait
    /// until it completes. All datums of one flush share a single timestamp,
    /// the wall-clock instant the snapshot was taken.
    ///
    /// After the call returns, every point buffered before it has been
    /// attempted exactly once and is no longer buffered, regardless of
    /// transmission outcome. Failed chunks are not retried; see
    /// [`on_transmission_error`](Self::on_transmission_error).
    pub async fn flush(&self) {
        let mut buffer = self.inner.buffer.lock().await;
        if buffer.is_empty() {
            return;
        }

        let timestamp = Utc::now();
        for (namespace, points) in buffer.take() {
            let data: Vec<Datum> = points
                .into_iter()
                .map(|point| point.into_datum(timestamp))
                .collect();

            tracing::trace!(
                namespace = namespace.as_str(),
                datums = data.len(),
                "flushing namespace"
            );

            for chunk in BatchedDatums::new(&data) {
                if let Err(error) = self.inner.transport.put_metric_data(&namespace, chunk).await {
                    tracing::debug!(
                        namespace = namespace.as_str(),
                        error = %error,
                        "failed to submit metric batch"
                    );
                    if let Some(hook) = self.inner.error_hook.get() {
                        hook(&namespace, &error);
                    }
                }
            }
        }
    }

    /// Begins periodic background flushing.
    ///
    /// Spawns a timer task that flushes every configured interval, first
    /// firing one full interval after this call, until `shutdown` is
    /// cancelled. Cancellation is observed between firings; a flush already
    /// in flight is not interrupted.
    ///
    /// The lifecycle is one-shot: starting an already started client is a
    /// no-op that keeps the original flush loop, and there is no way back to
    /// the unstarted state. Direct [`flush`](Self::flush) calls remain
    /// possible at any time, including after cancellation.
    pub fn start(&self, shutdown: CancellationToken) {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            tracing::error!("metrics client started twice, keeping the original flush loop");
            return;
        }

        let client = self.clone();
        tokio::spawn(async move {
            let period = client.inner.flush_interval;
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;

                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => client.flush().await,
                }
            }

            tracing::debug!("metrics flush loop stopped");
        });
    }
}

impl fmt::Debug for MetricsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsClient")
            .field("flush_interval", &self.inner.flush_interval)
            .field("started", &self.inner.started.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
