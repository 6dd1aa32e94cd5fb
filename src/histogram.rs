// Histogram representations
//
// Histogram is the plain, exclusively-owned form: partial histograms and the
// final result. The shared forms only expose increment() so every write goes
// through their synchronization primitive.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    pub fn zeroed(buckets: usize) -> Self {
        Self { counts: vec![0; buckets] }
    }

    pub fn from_counts(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    #[inline]
    pub fn increment(&mut self, bucket: usize) {
        self.counts[bucket] += 1;
    }

    pub fn buckets(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum of all counts; equals N after a correct run.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Add `other` bucket-wise into self.
    pub fn merge_from(&mut self, other: &Histogram) {
        assert_eq!(self.buckets(), other.buckets(), "bucket count mismatch");
        for (acc, count) in self.counts.iter_mut().zip(&other.counts) {
            *acc += count;
        }
    }
}

/// Histogram that many workers may fill concurrently through `&self`.
pub trait SharedHistogram: Sync {
    fn increment(&self, bucket: usize);

    /// Consume the shared form once all writers are done.
    fn into_histogram(self) -> Histogram;
}

/// Coarse-grained: one lock guards every bucket.
pub struct LockedHistogram {
    counts: Mutex<Vec<u64>>,
}

impl LockedHistogram {
    pub fn new(buckets: usize) -> Self {
        Self {
            counts: Mutex::new(vec![0; buckets]),
        }
    }
}

impl SharedHistogram for LockedHistogram {
    #[inline]
    fn increment(&self, bucket: usize) {
        // A panicking writer cannot leave a half-applied increment behind
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts[bucket] += 1;
    }

    fn into_histogram(self) -> Histogram {
        Histogram::from_counts(self.counts.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Storage cell for one atomic bucket.
pub trait AtomicBin: Sync {
    fn zero() -> Self;
    fn counter(&self) -> &AtomicU64;
}

impl AtomicBin for AtomicU64 {
    fn zero() -> Self {
        AtomicU64::new(0)
    }

    #[inline]
    fn counter(&self) -> &AtomicU64 {
        self
    }
}

/// Bucket on its own cache line to rule out false sharing.
#[repr(align(64))]
pub struct PaddedAtomicU64(AtomicU64);

impl AtomicBin for PaddedAtomicU64 {
    fn zero() -> Self {
        PaddedAtomicU64(AtomicU64::new(0))
    }

    #[inline]
    fn counter(&self) -> &AtomicU64 {
        &self.0
    }
}

/// Lock-free: one word-sized atomic counter per bucket.
pub struct AtomicHistogram<B: AtomicBin = AtomicU64> {
    bins: Vec<B>,
}

pub type PaddedAtomicHistogram = AtomicHistogram<PaddedAtomicU64>;

impl<B: AtomicBin> AtomicHistogram<B> {
    pub fn new(buckets: usize) -> Self {
        Self {
            bins: (0..buckets).map(|_| B::zero()).collect(),
        }
    }
}

impl<B: AtomicBin> SharedHistogram for AtomicHistogram<B> {
    #[inline]
    fn increment(&self, bucket: usize) {
        // Relaxed is enough: the join barrier orders the final reads
        self.bins[bucket].counter().fetch_add(1, Ordering::Relaxed);
    }

    fn into_histogram(self) -> Histogram {
        Histogram::from_counts(
            self.bins
                .into_iter()
                .map(|bin| bin.counter().load(Ordering::Relaxed))
                .collect(),
        )
    }
}
