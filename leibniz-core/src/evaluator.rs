//! Series Evaluator
//!
//! Fork-join reduction of a series over `[0, N)`.
//!
//! ```text
//!            evaluate(N, schedule)
//!                    │
//!        ┌───────────┼───────────┐      fork: one scoped thread per worker
//!        ▼           ▼           ▼      (auto: a rayon pool of the same size)
//!   ┌─────────┐ ┌─────────┐ ┌─────────┐
//!   │worker 0 │ │worker 1 │ │worker T │  private f64 accumulator each
//!   └────┬────┘ └────┬────┘ └────┬────┘
//!        └───────────┼───────────┘      join barrier
//!                    ▼
//!         Σ partials (worker order) × 4
//! ```
//!
//! Static blocks are fixed before any worker starts. Dynamic and guided
//! workers claim chunks from a shared atomic cursor, which is the only
//! shared mutable state during a reduction.

use crate::panic_message;
use crate::schedule::{Schedule, SchedulePolicy};
use crate::series::{Leibniz, SeriesTerm};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Blocks handed to the work-stealing runtime per worker under `auto`
pub const AUTO_BLOCKS_PER_WORKER: u64 = 8;

/// Chunk size used by dynamic and guided schedules when none is given
pub const DEFAULT_CHUNK_SIZE: u64 = 1;

/// Runtime failures of a reduction
#[derive(Debug, Error)]
pub enum EvalError {
    /// The OS refused to start a worker thread
    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        /// Index of the worker that could not be started
        worker: usize,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A worker panicked before producing its partial sum
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked {
        /// Index of the failed worker
        worker: usize,
        /// Panic payload, if it was a string
        message: String,
    },

    /// The work-stealing pool for `auto` could not be built
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Approximate π with `n` terms of the Leibniz series
pub fn evaluate(n: u64, schedule: &Schedule) -> Result<f64, EvalError> {
    Ok(4.0 * reduce(n, schedule, &Leibniz)?)
}

/// Sum `term` over `[0, n)` according to `schedule`, without scaling.
///
/// Every index is summed exactly once. The result may differ from a
/// sequential sum in the last bits because addition order changes.
pub fn reduce<T>(n: u64, schedule: &Schedule, term: &T) -> Result<f64, EvalError>
where
    T: SeriesTerm + ?Sized,
{
    tracing::trace!(n, schedule = %schedule, "reduce");

    if n == 0 {
        return Ok(0.0);
    }

    let threads = schedule.threads();
    let chunk = schedule.chunk_size().map(|c| c as u64);

    let partials = match schedule.policy() {
        SchedulePolicy::Static => match chunk {
            None => fork_join(threads, |w| static_block(n, threads, w, term))?,
            Some(c) => fork_join(threads, |w| static_round_robin(n, threads, c, w, term))?,
        },
        SchedulePolicy::Dynamic => {
            let cursor = AtomicU64::new(0);
            let c = chunk.unwrap_or(DEFAULT_CHUNK_SIZE);
            fork_join(threads, |_| dynamic_claims(n, c, &cursor, term))?
        }
        SchedulePolicy::Guided => {
            let cursor = AtomicU64::new(0);
            let c = chunk.unwrap_or(DEFAULT_CHUNK_SIZE);
            fork_join(threads, |_| guided_claims(n, threads, c, &cursor, term))?
        }
        SchedulePolicy::Auto => return auto_reduce(n, threads, term),
    };

    Ok(partials.iter().sum())
}

/// Spawn `threads` scoped workers and collect their partial sums in worker order
fn fork_join<F>(threads: usize, work: F) -> Result<Vec<f64>, EvalError>
where
    F: Fn(usize) -> f64 + Sync,
{
    std::thread::scope(|scope| -> Result<Vec<f64>, EvalError> {
        let work = &work;
        let mut handles = Vec::with_capacity(threads);

        for worker in 0..threads {
            let handle = std::thread::Builder::new()
                .name(format!("leibniz-worker-{worker}"))
                .spawn_scoped(scope, move || work(worker))
                .map_err(|source| EvalError::Spawn { worker, source })?;
            handles.push(handle);
        }

        handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle.join().map_err(|payload| EvalError::WorkerPanicked {
                    worker,
                    message: panic_message(payload.as_ref()),
                })
            })
            .collect()
    })
}

/// Bounds of worker `w`'s contiguous block when `n` is split `threads` ways.
///
/// Block lengths differ by at most one; the first `n % threads` workers get
/// the longer blocks.
pub fn static_bounds(n: u64, threads: usize, worker: usize) -> (u64, u64) {
    let t = threads as u64;
    let w = worker as u64;
    let base = n / t;
    let rem = n % t;
    let start = w * base + w.min(rem);
    let len = base + u64::from(w < rem);
    (start, start + len)
}

fn static_block<T: SeriesTerm + ?Sized>(n: u64, threads: usize, worker: usize, term: &T) -> f64 {
    let (start, end) = static_bounds(n, threads, worker);
    term.block_sum(start, end)
}

fn static_round_robin<T: SeriesTerm + ?Sized>(
    n: u64,
    threads: usize,
    chunk: u64,
    worker: usize,
    term: &T,
) -> f64 {
    let stride = (threads as u64).saturating_mul(chunk);
    let mut start = (worker as u64).saturating_mul(chunk);
    let mut sum = 0.0;

    while start < n {
        let end = start.saturating_add(chunk).min(n);
        sum += term.block_sum(start, end);
        start = start.saturating_add(stride);
    }

    sum
}

fn dynamic_claims<T: SeriesTerm + ?Sized>(
    n: u64,
    chunk: u64,
    cursor: &AtomicU64,
    term: &T,
) -> f64 {
    let mut sum = 0.0;

    // The cursor saturates at u64::MAX instead of wrapping back below n
    while let Ok(start) = cursor.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
        (s < n).then(|| s.saturating_add(chunk))
    }) {
        let end = start.saturating_add(chunk).min(n);
        sum += term.block_sum(start, end);
    }

    sum
}

/// Size of the next guided claim given how many indices remain
pub fn guided_chunk(remaining: u64, threads: usize, min_chunk: u64) -> u64 {
    remaining
        .div_ceil(threads as u64)
        .max(min_chunk)
        .min(remaining)
}

fn guided_claims<T: SeriesTerm + ?Sized>(
    n: u64,
    threads: usize,
    min_chunk: u64,
    cursor: &AtomicU64,
    term: &T,
) -> f64 {
    let mut sum = 0.0;
    let mut start = cursor.load(Ordering::Relaxed);

    while start < n {
        let size = guided_chunk(n - start, threads, min_chunk);
        match cursor.compare_exchange_weak(start, start + size, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => {
                sum += term.block_sum(start, start + size);
                start = cursor.load(Ordering::Relaxed);
            }
            Err(current) => start = current,
        }
    }

    sum
}

fn auto_reduce<T: SeriesTerm + ?Sized>(n: u64, threads: usize, term: &T) -> Result<f64, EvalError> {
    // Built per call and dropped on return so no worker outlives the reduction.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("leibniz-auto-{i}"))
        .build()?;

    let blocks = (threads as u64).saturating_mul(AUTO_BLOCKS_PER_WORKER).min(n);
    let block_len = n.div_ceil(blocks);

    Ok(pool.install(|| {
        (0..blocks)
            .into_par_iter()
            .map(|b| {
                let start = b * block_len;
                let end = start.saturating_add(block_len).min(n);
                if start < end {
                    term.block_sum(start, end)
                } else {
                    0.0
                }
            })
            .sum::<f64>()
    }))
}
