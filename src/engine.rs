// One benchmark run: generate, count, merge, checksum
//
// Histogram allocation happens between the timed phases, so the counting time
// covers only worker start-up, the counting loops and the join.

use crate::config::{BenchConfig, Strategy};
use crate::error::HistoError;
use crate::generator::{self, SequenceSpec};
use crate::histogram::{AtomicHistogram, Histogram, LockedHistogram, PaddedAtomicHistogram, SharedHistogram};
use crate::merge::merge;
use crate::partition::{partition, WorkRange};
use crate::scheduler::Scheduler;
use crate::strategy::{count_local, count_shared};
use crate::timing::{measure, PhaseTimings};
use serde::Serialize;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub config: BenchConfig,
    pub timings: PhaseTimings,
    /// Sum of all bucket counts.
    pub checksum: u64,
    #[serde(skip)]
    pub histogram: Histogram,
}

impl RunReport {
    /// True when the histogram accounts for every element exactly once.
    pub fn is_consistent(&self) -> bool {
        self.checksum == self.config.elements as u64
    }
}

fn count_into_shared<H: SharedHistogram>(
    scheduler: &Scheduler,
    data: &[u32],
    ranges: Vec<WorkRange>,
    histogram: H,
) -> Result<(Histogram, Duration), HistoError> {
    let (joined, counting) = measure(|| {
        scheduler.run(ranges, |_, range| count_shared(data, range, &histogram))
    });
    joined?;
    Ok((histogram.into_histogram(), counting))
}

/// Execute one run as described by `config`.
pub fn run(config: &BenchConfig) -> Result<RunReport, HistoError> {
    config.validate()?;

    let scheduler = Scheduler::new(config.scheduler, config.workers, config.affinity)?;
    let spec = SequenceSpec {
        elements: config.elements,
        range: config.range as u32,
        seed: config.seed,
        distribution: config.distribution,
    };

    let (data, generation) = measure(|| generator::generate(&scheduler, &spec));
    let data = data?;
    log::info!("generated {} elements in {:.6}s", data.len(), generation.as_secs_f64());

    let ranges = partition(data.len(), config.workers)?;
    log::debug!("work ranges: {:?}", ranges);

    let (histogram, counting, merging) = match config.strategy {
        Strategy::Local => {
            let jobs: Vec<(WorkRange, Histogram)> = ranges
                .into_iter()
                .map(|range| (range, Histogram::zeroed(config.range)))
                .collect();

            let (partials, counting) = measure(|| {
                scheduler.run(jobs, |_, (range, mut partial)| {
                    count_local(&data, range, &mut partial);
                    partial
                })
            });
            let partials = partials?;

            let (histogram, merging) = measure(|| merge(partials, config.range));
            (histogram, counting, merging)
        }
        Strategy::Mutex => {
            let shared = LockedHistogram::new(config.range);
            let (histogram, counting) = count_into_shared(&scheduler, &data, ranges, shared)?;
            (histogram, counting, Duration::ZERO)
        }
        Strategy::Atomic if config.padded => {
            let shared = PaddedAtomicHistogram::new(config.range);
            let (histogram, counting) = count_into_shared(&scheduler, &data, ranges, shared)?;
            (histogram, counting, Duration::ZERO)
        }
        Strategy::Atomic => {
            let shared = AtomicHistogram::<AtomicU64>::new(config.range);
            let (histogram, counting) = count_into_shared(&scheduler, &data, ranges, shared)?;
            (histogram, counting, Duration::ZERO)
        }
    };

    let timings = PhaseTimings::new(generation, counting, merging);
    let checksum = histogram.total();
    log::info!(
        "{} on {} x{}: t_count={:.6}s t_merge={:.6}s checksum={}",
        config.strategy,
        scheduler.kind(),
        scheduler.workers(),
        counting.as_secs_f64(),
        merging.as_secs_f64(),
        checksum
    );

    let report = RunReport {
        config: config.clone(),
        timings,
        checksum,
        histogram,
    };
    if !report.is_consistent() {
        log::error!("checksum {} does not match N = {}", checksum, config.elements);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Distribution, SchedulerKind};

    #[test]
    fn test_local_reports_merge_time_only_for_local() {
        let shared = run(&BenchConfig::new(1000, 8, 2, 1, Strategy::Atomic)).unwrap();
        assert_eq!(shared.timings.merge, Duration::ZERO);

        let local = run(&BenchConfig::new(1000, 8, 2, 1, Strategy::Local)).unwrap();
        assert_eq!(
            local.timings.total,
            local.timings.generation + local.timings.counting + local.timings.merge
        );
    }

    #[test]
    fn test_padded_atomic_matches_plain() {
        let base = BenchConfig::new(50_000, 64, 4, 9, Strategy::Atomic)
            .with_scheduler(SchedulerKind::Rayon)
            .with_distribution(Distribution::Skewed);
        let plain = run(&base).unwrap();
        let padded = run(&base.clone().with_padding(true)).unwrap();
        assert_eq!(plain.histogram, padded.histogram);
        assert!(padded.is_consistent());
    }

    #[test]
    fn test_rejects_before_work() {
        assert!(matches!(
            run(&BenchConfig::new(10, 0, 1, 0, Strategy::Local)),
            Err(HistoError::ZeroRange)
        ));
        assert!(matches!(
            run(&BenchConfig::new(10, 3, 0, 0, Strategy::Mutex)),
            Err(HistoError::ZeroWorkers)
        ));
    }
}
