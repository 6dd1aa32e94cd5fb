// Reduction of per-worker partial histograms
//
// Only called after the scheduler has joined every worker, so the partials are
// owned here and nobody else can still be writing to them.

use crate::histogram::Histogram;

/// global[b] = sum over workers of partial_w[b], for every bucket b.
pub fn merge(partials: Vec<Histogram>, buckets: usize) -> Histogram {
    let mut global = Histogram::zeroed(buckets);
    for partial in &partials {
        global.merge_from(partial);
    }
    global
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_sums_bucketwise() {
        let partials = vec![
            Histogram::from_counts(vec![1, 0, 2]),
            Histogram::from_counts(vec![0, 3, 1]),
            Histogram::from_counts(vec![2, 2, 2]),
        ];
        let before: u64 = partials.iter().map(Histogram::total).sum();

        let global = merge(partials, 3);
        assert_eq!(global.counts(), &[3, 5, 5]);
        assert_eq!(global.total(), before);
    }

    #[test]
    fn test_merge_nothing() {
        let global = merge(Vec::new(), 4);
        assert_eq!(global.counts(), &[0, 0, 0, 0]);
    }
}
