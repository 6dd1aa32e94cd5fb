// Element sequence generation
//
// The sequence is cut into fixed-size blocks and every block draws from its
// own RNG seeded by (seed, block index). Workers therefore never share
// generator state, and the output depends only on (N, R, seed, distribution),
// not on how many workers produced it.

use crate::config::Distribution;
use crate::error::HistoError;
use crate::partition::partition;
use crate::scheduler::Scheduler;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Elements per independently seeded block.
pub const BLOCK_LEN: usize = 1 << 16;

/// Fraction of elements that land in the hot buckets of a skewed sequence.
const HOT_SHARE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSpec {
    pub elements: usize,
    pub range: u32,
    pub seed: u64,
    pub distribution: Distribution,
}

fn block_rng(seed: u64, block: usize) -> StdRng {
    // Golden-ratio stride keeps neighbouring block seeds far apart
    StdRng::seed_from_u64(seed ^ (block as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Fill `out`, which holds block number `block` of the sequence.
pub fn fill_block(spec: &SequenceSpec, block: usize, out: &mut [u32]) {
    let range = spec.range;
    match spec.distribution {
        Distribution::Cyclic => {
            let offset = (block * BLOCK_LEN) as u64;
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = ((offset + i as u64) % u64::from(range)) as u32;
            }
        }
        Distribution::Uniform => {
            let mut rng = block_rng(spec.seed, block);
            for slot in out.iter_mut() {
                *slot = rng.gen_range(0..range);
            }
        }
        Distribution::Skewed => {
            // first 20% of buckets are hot
            let hot = (range / 5).max(1);
            let mut rng = block_rng(spec.seed, block);
            for slot in out.iter_mut() {
                *slot = if hot < range && !rng.gen_bool(HOT_SHARE) {
                    rng.gen_range(hot..range)
                } else {
                    rng.gen_range(0..hot)
                };
            }
        }
    }
}

/// Produce the full sequence, spreading blocks over the scheduler's workers.
pub fn generate(scheduler: &Scheduler, spec: &SequenceSpec) -> Result<Vec<u32>, HistoError> {
    if spec.range == 0 {
        return Err(HistoError::ZeroRange);
    }

    let mut data = vec![0u32; spec.elements];
    let block_count = spec.elements.div_ceil(BLOCK_LEN);

    let mut blocks = data.chunks_mut(BLOCK_LEN).enumerate();
    let groups: Vec<Vec<(usize, &mut [u32])>> = partition(block_count, scheduler.workers())?
        .iter()
        .map(|range| blocks.by_ref().take(range.len()).collect())
        .collect();

    log::debug!(
        "generating {} elements in {} blocks over {} workers",
        spec.elements,
        block_count,
        groups.len()
    );

    scheduler.run(groups, |_, group| {
        for (block, out) in group {
            fill_block(spec, block, out);
        }
    })?;

    Ok(data)
}
