// Contiguous work ranges over [0, N)

use crate::error::HistoError;
use serde::Serialize;
use std::ops::Range;

/// Half-open index interval [start, end) owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkRange {
    pub start: usize,
    pub end: usize,
}

impl WorkRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split [0, n) into `workers` contiguous ranges whose sizes differ by at most one.
///
/// The first `n % workers` ranges take one extra element. With n == 0 every
/// range is empty.
pub fn partition(n: usize, workers: usize) -> Result<Vec<WorkRange>, HistoError> {
    if workers == 0 {
        return Err(HistoError::ZeroWorkers);
    }

    let chunk = n / workers;
    let remainder = n % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for worker in 0..workers {
        let len = chunk + usize::from(worker < remainder);
        ranges.push(WorkRange { start, end: start + len });
        start += len;
    }
    debug_assert_eq!(start, n);

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let ranges = partition(12, 4).unwrap();
        let lens: Vec<_> = ranges.iter().map(WorkRange::len).collect();
        assert_eq!(lens, vec![3, 3, 3, 3]);
        assert_eq!(ranges[0], WorkRange { start: 0, end: 3 });
        assert_eq!(ranges[3], WorkRange { start: 9, end: 12 });
    }

    #[test]
    fn test_remainder_spread() {
        let ranges = partition(10, 4).unwrap();
        let lens: Vec<_> = ranges.iter().map(WorkRange::len).collect();
        assert_eq!(lens, vec![3, 3, 2, 2]);
        assert_eq!(ranges.last().unwrap().end, 10);
    }

    #[test]
    fn test_more_workers_than_elements() {
        let ranges = partition(2, 5).unwrap();
        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges.iter().filter(|r| r.is_empty()).count(), 3);
        assert_eq!(ranges.iter().map(WorkRange::len).sum::<usize>(), 2);
    }

    #[test]
    fn test_empty_input() {
        let ranges = partition(0, 3).unwrap();
        assert!(ranges.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(partition(10, 0), Err(HistoError::ZeroWorkers)));
    }
}
