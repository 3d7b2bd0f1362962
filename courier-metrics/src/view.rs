use std::iter::FusedIterator;

use crate::point::Datum;

/// The maximum number of datums the transport accepts in a single outbound
/// call.
///
/// A flush partitions each namespace's datums into contiguous chunks of at
/// most this many items and issues one "put metric data" call per chunk.
pub const MAX_DATUMS_PER_REQUEST: usize = 20;

/// Iterator slicing a list of wire datums into request-sized chunks.
///
/// ```txt
///                      45 datums
///  /--------------------------------------------\
/// [d1 ............ d20 | d21 ........... d40 | d41 .. d45]
///  \------ chunk ------/\------ chunk ------/\-- chunk --/
/// ```
///
/// Chunks are contiguous and preserve the source order; only the final chunk
/// may hold fewer than [`MAX_DATUMS_PER_REQUEST`] items. An empty source
/// yields no chunks at all.
#[derive(Clone, Debug)]
pub struct BatchedDatums<'a> {
    inner: &'a [Datum],
    max_len: usize,
}

impl<'a> BatchedDatums<'a> {
    /// Creates an iterator over request-sized chunks of `datums`.
    pub fn new(datums: &'a [Datum]) -> Self {
        Self::with_max_len(datums, MAX_DATUMS_PER_REQUEST)
    }

    /// Like [`BatchedDatums::new`], but with an explicit chunk capacity.
    ///
    /// A `max_len` of zero is treated as one.
    pub fn with_max_len(datums: &'a [Datum], max_len: usize) -> Self {
        Self {
            inner: datums,
            max_len: max_len.max(1),
        }
    }

    /// Returns the number of outbound requests the remaining datums split
    /// into.
    pub fn request_count(&self) -> usize {
        self.inner.len().div_ceil(self.max_len)
    }

    /// Returns `true` if no chunks remain.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a> Iterator for BatchedDatums<'a> {
    type Item = &'a [Datum];

    fn next(&mut self) -> Option<Self::Item> {
        if self.inner.is_empty() {
            return None;
        }

        let (chunk, rest) = self.inner.split_at(self.inner.len().min(self.max_len));
        self.inner = rest;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.request_count();
        (count, Some(count))
    }
}

impl ExactSizeIterator for BatchedDatums<'_> {}

impl FusedIterator for BatchedDatums<'_> {}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use similar_asserts::assert_eq;

    use super::*;
    use crate::point::MetricPoint;
    use crate::protocol::MetricUnit;

    fn some_datums(count: usize) -> Vec<Datum> {
        let timestamp = Utc.with_ymd_and_hms(2024, 7, 8, 9, 10, 11).unwrap();
        (0..count)
            .map(|i| {
                MetricPoint {
                    name: format!("metric_{i}"),
                    value: i as f64,
                    unit: MetricUnit::Count,
                    dimensions: Default::default(),
                }
                .into_datum(timestamp)
            })
            .collect()
    }

    #[test]
    fn test_empty_yields_no_chunks() {
        let datums = some_datums(0);
        let mut batches = BatchedDatums::new(&datums);
        assert!(batches.is_empty());
        assert_eq!(batches.request_count(), 0);
        assert_eq!(batches.next(), None);
    }

    #[test]
    fn test_chunk_sizes() {
        let datums = some_datums(45);
        let batches = BatchedDatums::new(&datums);
        assert_eq!(batches.request_count(), 3);

        let sizes: Vec<_> = batches.map(<[Datum]>::len).collect();
        assert_eq!(sizes, vec![20, 20, 5]);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_chunk() {
        let datums = some_datums(40);
        let sizes: Vec<_> = BatchedDatums::new(&datums).map(<[Datum]>::len).collect();
        assert_eq!(sizes, vec![20, 20]);
    }

    #[test]
    fn test_chunks_preserve_order() {
        let datums = some_datums(23);
        let names: Vec<_> = BatchedDatums::new(&datums)
            .flatten()
            .map(|d| d.metric_name.as_str())
            .collect();
        let expected: Vec<_> = datums.iter().map(|d| d.metric_name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_max_len_zero_is_clamped() {
        let datums = some_datums(2);
        let sizes: Vec<_> = BatchedDatums::with_max_len(&datums, 0)
            .map(<[Datum]>::len)
            .collect();
        assert_eq!(sizes, vec![1, 1]);
    }
}
