// Wall-clock phase timing on the monotonic clock

use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};

/// Run `f` and return its result together with the elapsed time.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

fn as_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Durations of one run. `merge` is zero unless the local strategy ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTimings {
    #[serde(rename = "t_gen", serialize_with = "as_secs")]
    pub generation: Duration,
    #[serde(rename = "t_count", serialize_with = "as_secs")]
    pub counting: Duration,
    #[serde(rename = "t_merge", serialize_with = "as_secs")]
    pub merge: Duration,
    #[serde(serialize_with = "as_secs")]
    pub total: Duration,
}

impl PhaseTimings {
    pub fn new(generation: Duration, counting: Duration, merge: Duration) -> Self {
        Self {
            generation,
            counting,
            merge,
            total: generation + counting + merge,
        }
    }
}
