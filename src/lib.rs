// Histogram contention benchmark
//
// Measures three ways of building a frequency histogram in parallel:
//   1) local:  per-worker histograms merged after the join
//   2) mutex:  one shared histogram behind a single lock
//   3) atomic: one shared histogram of atomic counters
// on either manually spawned threads or a rayon pool.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod histogram;
pub mod merge;
pub mod partition;
pub mod report;
pub mod scheduler;
pub mod strategy;
pub mod timing;

pub use config::{BenchConfig, Distribution, SchedulerKind, Strategy};
pub use engine::{run, RunReport};
pub use error::HistoError;
pub use histogram::Histogram;
pub use partition::{partition, WorkRange};
