use std::collections::HashMap;
use std::mem;

use crate::point::MetricPoint;

/// In-memory store of recorded points awaiting transmission, keyed by
/// namespace.
///
/// A namespace absent from the map is equivalent to one mapped to an empty
/// list. The buffer upholds the stronger form of that invariant: it never
/// stores an empty list, so [`is_empty`](Self::is_empty) and the flush
/// snapshot only ever see namespaces with pending points.
///
/// The buffer itself is not synchronized. The owning client guards it with a
/// single lock shared by the recording entry point and the flush routine.
#[derive(Debug, Default)]
pub struct MetricsBuffer {
    points: HashMap<String, Vec<MetricPoint>>,
}

impl MetricsBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `point` to the pending list for `namespace`, creating the
    /// entry if absent.
    ///
    /// Within one namespace, points retain the order in which they were
    /// recorded. There is no ordering between namespaces.
    pub fn record(&mut self, namespace: &str, point: MetricPoint) {
        match self.points.get_mut(namespace) {
            Some(pending) => pending.push(point),
            None => {
                self.points.insert(namespace.to_owned(), vec![point]);
            }
        }
    }

    /// Returns the number of namespaces with pending points.
    pub fn namespace_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the total number of pending points across all namespaces.
    pub fn point_count(&self) -> usize {
        self.points.values().map(Vec::len).sum()
    }

    /// Returns `true` if no points are pending.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Takes the entire pending state, leaving the buffer empty.
    ///
    /// This is the flush snapshot: every point recorded before the call is in
    /// the returned map, and the buffer afterwards holds only points recorded
    /// later. Draining happens before any transmission is attempted, so
    /// points leave the buffer exactly once regardless of delivery outcome.
    pub fn take(&mut self) -> HashMap<String, Vec<MetricPoint>> {
        mem::take(&mut self.points)
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;
    use crate::protocol::MetricUnit;

    fn some_point(name: &str) -> MetricPoint {
        MetricPoint {
            name: name.to_owned(),
            value: 42.0,
            unit: MetricUnit::None,
            dimensions: Default::default(),
        }
    }

    #[test]
    fn test_record_preserves_order_per_namespace() {
        let mut buffer = MetricsBuffer::new();
        buffer.record("app", some_point("first"));
        buffer.record("other", some_point("elsewhere"));
        buffer.record("app", some_point("second"));

        let pending = buffer.take();
        let names: Vec<_> = pending["app"].iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(pending["other"].len(), 1);
    }

    #[test]
    fn test_take_leaves_buffer_empty() {
        let mut buffer = MetricsBuffer::new();
        buffer.record("app", some_point("only"));
        assert_eq!(buffer.point_count(), 1);

        let pending = buffer.take();
        assert_eq!(pending.len(), 1);

        // Absent namespace is equivalent to an empty one.
        assert!(buffer.is_empty());
        assert_eq!(buffer.namespace_count(), 0);
        assert!(buffer.take().is_empty());
    }

    #[test]
    fn test_counts() {
        let mut buffer = MetricsBuffer::new();
        assert!(buffer.is_empty());

        buffer.record("a", some_point("x"));
        buffer.record("a", some_point("y"));
        buffer.record("b", some_point("z"));

        assert_eq!(buffer.namespace_count(), 2);
        assert_eq!(buffer.point_count(), 3);
        assert!(!buffer.is_empty());
    }
}
