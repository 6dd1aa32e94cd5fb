// Typed parameters for one benchmark run
//
// The CLI layer parses strings into these types; the engine only ever sees a
// BenchConfig and calls validate() before touching any data.

use crate::error::HistoError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Synchronization discipline used to update the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Private per-worker histograms, merged after the join.
    Local,
    /// One shared histogram behind a single lock.
    Mutex,
    /// One shared histogram of atomic counters.
    Atomic,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Local, Strategy::Mutex, Strategy::Atomic];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Local => "local",
            Strategy::Mutex => "mutex",
            Strategy::Atomic => "atomic",
        }
    }
}

impl TryFrom<u8> for Strategy {
    type Error = HistoError;

    fn try_from(variant: u8) -> Result<Self, Self::Error> {
        match variant {
            0 => Ok(Strategy::Local),
            1 => Ok(Strategy::Mutex),
            2 => Ok(Strategy::Atomic),
            other => Err(HistoError::UnknownStrategy(other.to_string())),
        }
    }
}

impl FromStr for Strategy {
    type Err = HistoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "local" | "private" => Ok(Strategy::Local),
            "1" | "mutex" | "critical" => Ok(Strategy::Mutex),
            "2" | "atomic" => Ok(Strategy::Atomic),
            _ => Err(HistoError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend that runs the per-worker jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    /// One manually spawned scoped thread per worker.
    Threads,
    /// A dedicated rayon pool with one thread per worker.
    Rayon,
}

impl SchedulerKind {
    pub const ALL: [SchedulerKind; 2] = [SchedulerKind::Threads, SchedulerKind::Rayon];

    pub fn name(self) -> &'static str {
        match self {
            SchedulerKind::Threads => "threads",
            SchedulerKind::Rayon => "rayon",
        }
    }
}

impl FromStr for SchedulerKind {
    type Err = HistoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threads" | "thread" | "std" => Ok(SchedulerKind::Threads),
            "rayon" | "pool" => Ok(SchedulerKind::Rayon),
            _ => Err(HistoError::UnknownScheduler(s.to_string())),
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of the generated element sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Seeded RNG, uniform over [0, R).
    Uniform,
    /// ~80% of elements land in the first 20% of buckets.
    Skewed,
    /// Element i is i % R; ignores the seed.
    Cyclic,
}

impl Distribution {
    pub fn name(self) -> &'static str {
        match self {
            Distribution::Uniform => "uniform",
            Distribution::Skewed => "skewed",
            Distribution::Cyclic => "cyclic",
        }
    }
}

impl FromStr for Distribution {
    type Err = HistoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Distribution::Uniform),
            "skewed" => Ok(Distribution::Skewed),
            "cyclic" | "modulo" => Ok(Distribution::Cyclic),
            _ => Err(HistoError::UnknownDistribution(s.to_string())),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchConfig {
    /// N: number of elements to generate and count.
    pub elements: usize,
    /// R: elements take values in [0, R).
    pub range: usize,
    /// W: number of workers.
    pub workers: usize,
    pub seed: u64,
    pub strategy: Strategy,
    pub scheduler: SchedulerKind,
    pub distribution: Distribution,
    /// Atomic strategy only: one cache line per bucket.
    pub padded: bool,
    /// Pin worker i to core i.
    pub affinity: bool,
}

impl BenchConfig {
    pub fn new(elements: usize, range: usize, workers: usize, seed: u64, strategy: Strategy) -> Self {
        Self {
            elements,
            range,
            workers,
            seed,
            strategy,
            scheduler: SchedulerKind::Threads,
            distribution: Distribution::Uniform,
            padded: false,
            affinity: false,
        }
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerKind) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_padding(mut self, padded: bool) -> Self {
        self.padded = padded;
        self
    }

    pub fn with_affinity(mut self, affinity: bool) -> Self {
        self.affinity = affinity;
        self
    }

    /// Reject parameters that would make generation or partitioning undefined.
    pub fn validate(&self) -> Result<(), HistoError> {
        if self.range == 0 {
            return Err(HistoError::ZeroRange);
        }
        if self.range > u32::MAX as usize {
            return Err(HistoError::RangeTooLarge { range: self.range });
        }
        if self.workers == 0 {
            return Err(HistoError::ZeroWorkers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_numeric_variants() {
        assert_eq!(Strategy::try_from(0).unwrap(), Strategy::Local);
        assert_eq!(Strategy::try_from(1).unwrap(), Strategy::Mutex);
        assert_eq!(Strategy::try_from(2).unwrap(), Strategy::Atomic);
        assert!(matches!(
            Strategy::try_from(3),
            Err(HistoError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("private".parse::<Strategy>().unwrap(), Strategy::Local);
        assert_eq!("Critical".parse::<Strategy>().unwrap(), Strategy::Mutex);
        assert_eq!("2".parse::<Strategy>().unwrap(), Strategy::Atomic);
        assert!("spinlock".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_scheduler_and_distribution_parse() {
        assert_eq!("rayon".parse::<SchedulerKind>().unwrap(), SchedulerKind::Rayon);
        assert_eq!("threads".parse::<SchedulerKind>().unwrap(), SchedulerKind::Threads);
        assert_eq!("modulo".parse::<Distribution>().unwrap(), Distribution::Cyclic);
        assert!("normal".parse::<Distribution>().is_err());
    }

    #[test]
    fn test_validate() {
        let ok = BenchConfig::new(10, 4, 2, 1, Strategy::Local);
        assert!(ok.validate().is_ok());

        let zero_range = BenchConfig::new(10, 0, 2, 1, Strategy::Local);
        assert!(matches!(zero_range.validate(), Err(HistoError::ZeroRange)));

        let zero_workers = BenchConfig::new(10, 4, 0, 1, Strategy::Atomic);
        assert!(matches!(zero_workers.validate(), Err(HistoError::ZeroWorkers)));

        let empty = BenchConfig::new(0, 1, 1, 0, Strategy::Mutex);
        assert!(empty.validate().is_ok());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_validate_range_wider_than_element() {
        let widest = BenchConfig::new(10, u32::MAX as usize, 1, 0, Strategy::Local);
        assert!(widest.validate().is_ok());

        let too_wide = BenchConfig::new(10, u32::MAX as usize + 1, 1, 0, Strategy::Local);
        assert!(matches!(
            too_wide.validate(),
            Err(HistoError::RangeTooLarge { range }) if range == u32::MAX as usize + 1
        ));
    }
}
