// Per-worker counting loops
//
// Values are assumed to lie in [0, R); the generator guarantees it and the
// hot loops do not re-check beyond the slice bounds check.

use crate::histogram::{Histogram, SharedHistogram};
use crate::partition::WorkRange;

/// Count `data[range]` into a histogram this worker owns exclusively.
pub fn count_local(data: &[u32], range: WorkRange, histogram: &mut Histogram) {
    for &value in &data[range.indices()] {
        histogram.increment(value as usize);
    }
}

/// Count `data[range]` into a histogram shared with the other workers.
pub fn count_shared<H: SharedHistogram>(data: &[u32], range: WorkRange, histogram: &H) {
    for &value in &data[range.indices()] {
        histogram.increment(value as usize);
    }
}
