// Errors raised by the histogram harness
//
// Everything here is a precondition failure detected before work starts, or a
// failure of the worker machinery itself. Counting and merging never fail once
// the parameters have been accepted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoError {
    #[error("range bound R must be at least 1")]
    ZeroRange,

    #[error("range bound R = {range} does not fit a 32-bit element")]
    RangeTooLarge { range: usize },

    #[error("worker count W must be at least 1")]
    ZeroWorkers,

    #[error("unknown strategy: {0} (use 0|1|2 or local|mutex|atomic)")]
    UnknownStrategy(String),

    #[error("unknown distribution: {0} (use uniform|skewed|cyclic)")]
    UnknownDistribution(String),

    #[error("unknown scheduler: {0} (use threads|rayon)")]
    UnknownScheduler(String),

    #[error("failed to build rayon thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
