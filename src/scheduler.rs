// Worker backends
//
// Both backends run one job per worker and hand back every job's result only
// after all workers have finished, so callers can treat the return of run() as
// the join barrier. A panicking job comes back as WorkerPanicked on either
// backend.

use crate::config::SchedulerKind;
use crate::error::HistoError;
use core_affinity::CoreId;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

enum Backend {
    Threads,
    Rayon(rayon::ThreadPool),
}

pub struct Scheduler {
    kind: SchedulerKind,
    workers: usize,
    cores: Option<Vec<CoreId>>,
    backend: Backend,
}

// Pin the calling thread to the worker's core, if there is one for it
fn pin_to_core(cores: Option<&[CoreId]>, worker: usize) {
    if let Some(&core) = cores.and_then(|cores| cores.get(worker)) {
        if !core_affinity::set_for_current(core) {
            log::warn!("could not pin worker {} to core {}", worker, core.id);
        }
    }
}

impl Scheduler {
    /// Build a scheduler with `workers` threads. The rayon pool is created here
    /// so that pool start-up never lands inside a timed phase.
    pub fn new(kind: SchedulerKind, workers: usize, affinity: bool) -> Result<Self, HistoError> {
        if workers == 0 {
            return Err(HistoError::ZeroWorkers);
        }

        let cores = if affinity {
            let cores = core_affinity::get_core_ids();
            if cores.is_none() {
                log::warn!("core ids unavailable, running without affinity");
            }
            cores
        } else {
            None
        };

        let backend = match kind {
            SchedulerKind::Threads => Backend::Threads,
            SchedulerKind::Rayon => {
                let pinned = cores.clone();
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|idx| format!("histo-worker-{idx}"))
                    .start_handler(move |idx| pin_to_core(pinned.as_deref(), idx))
                    .build()?;
                Backend::Rayon(pool)
            }
        };

        log::debug!("scheduler ready: {} with {} workers (pinned: {})", kind, workers, cores.is_some());

        Ok(Self {
            kind,
            workers,
            cores,
            backend,
        })
    }

    pub fn kind(&self) -> SchedulerKind {
        self.kind
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work(worker, job)` for every job in parallel and collect the results
    /// in job order.
    pub fn run<J, T, F>(&self, jobs: Vec<J>, work: F) -> Result<Vec<T>, HistoError>
    where
        J: Send,
        T: Send,
        F: Fn(usize, J) -> T + Sync,
    {
        match &self.backend {
            Backend::Threads => {
                let cores = self.cores.as_deref();
                thread::scope(|s| {
                    let handles: Vec<_> = jobs
                        .into_iter()
                        .enumerate()
                        .map(|(worker, job)| {
                            let work = &work;
                            s.spawn(move || {
                                pin_to_core(cores, worker);
                                work(worker, job)
                            })
                        })
                        .collect();

                    handles
                        .into_iter()
                        .enumerate()
                        .map(|(worker, handle)| {
                            handle
                                .join()
                                .map_err(|_| HistoError::WorkerPanicked { worker })
                        })
                        .collect()
                })
            }
            Backend::Rayon(pool) => pool.install(|| {
                jobs.into_par_iter()
                    .enumerate()
                    .map(|(worker, job)| {
                        panic::catch_unwind(AssertUnwindSafe(|| work(worker, job)))
                            .map_err(|_| HistoError::WorkerPanicked { worker })
                    })
                    .collect()
            }),
        }
    }
}
