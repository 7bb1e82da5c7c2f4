//! # Stress Runner
//!
//! ```text
//!   trial N:  fresh join
//!             ├── spawn 2 × threads-per-party scoped threads (shuffled order)
//!             ├── dropping the start sender releases them together
//!             ├── each thread: signal(party) × calls-per-thread
//!             ├── each thread: send (party, wins) ──> channel
//!             └── sum of wins must be exactly 1
//! ```
//!
//! A trial that claims zero times or more than once stops the run with
//! [`StressError::InvariantViolated`]. A worker the OS refuses to spawn stops
//! it with [`StressError::Spawn`] after the already-spawned workers are
//! released and joined.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use twinjoin_core::{AtomicCompletionJoin, CompletionJoin, Party, TwoPartyJoin};

use crate::config::{Implementation, StressConfig};
use crate::error::{StressError, StressResult};

/// Trials between progress log lines.
const PROGRESS_INTERVAL: usize = 1_000;

/// Summary of a completed stress run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StressReport {
    /// Implementation that was exercised.
    pub implementation: Implementation,
    /// Trials completed.
    pub trials: usize,
    /// Total signals sent across all trials.
    pub signals: u64,
    /// Total signals that returned `true`.
    pub claims: usize,
    /// Claims won by a first-party signal.
    pub first_wins: usize,
    /// Claims won by a second-party signal.
    pub second_wins: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl StressReport {
    /// Average wall-clock time per trial (microseconds).
    #[must_use]
    pub fn avg_trial_us(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() * 1_000_000.0 / self.trials as f64
    }
}

/// Outcome of a single trial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TrialOutcome {
    first_wins: usize,
    second_wins: usize,
}

impl TrialOutcome {
    const fn claims(self) -> usize {
        self.first_wins + self.second_wins
    }
}

/// Runs every trial described by `config`.
///
/// Stops at the first trial whose claim count is not exactly one.
///
/// # Errors
///
/// Returns [`StressError::InvalidConfig`] if `config` fails validation,
/// [`StressError::InvariantViolated`] for a trial that does not claim exactly
/// once, and [`StressError::Spawn`] or [`StressError::WorkerPanicked`] when a
/// worker thread cannot be started or panics.
pub fn run(config: &StressConfig) -> StressResult<StressReport> {
    config.validate()?;
    match config.implementation {
        Implementation::Mutex => run_with(config, CompletionJoin::new),
        Implementation::Atomic => run_with(config, AtomicCompletionJoin::new),
    }
}

/// Runs every trial on joins built by `make`.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_with<J, M>(config: &StressConfig, make: M) -> StressResult<StressReport>
where
    J: TwoPartyJoin,
    M: Fn() -> J,
{
    config.validate()?;

    tracing::info!(
        implementation = %config.implementation,
        trials = config.trials,
        threads_per_party = config.threads_per_party,
        calls_per_thread = config.calls_per_thread,
        seed = config.seed,
        "starting stress run"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut order: Vec<Party> = Party::ALL
        .iter()
        .flat_map(|&party| std::iter::repeat(party).take(config.threads_per_party))
        .collect();

    let mut report = StressReport {
        implementation: config.implementation,
        ..StressReport::default()
    };
    let signals_per_trial =
        (config.threads_per_trial() as u64).saturating_mul(config.calls_per_thread as u64);
    let start = Instant::now();

    for trial in 0..config.trials {
        order.shuffle(&mut rng);

        let join = make();
        let outcome = run_trial(&join, &order, config.calls_per_thread, trial, usize::MAX)?;

        if outcome.claims() != 1 {
            tracing::error!(trial, claims = outcome.claims(), state = %join.state(), "exclusivity violated");
            return Err(StressError::InvariantViolated {
                trial,
                claims: outcome.claims(),
            });
        }

        report.trials += 1;
        report.signals = report.signals.saturating_add(signals_per_trial);
        report.claims += outcome.claims();
        report.first_wins += outcome.first_wins;
        report.second_wins += outcome.second_wins;

        if (trial + 1) % PROGRESS_INTERVAL == 0 {
            tracing::debug!(completed = trial + 1, total = config.trials, "stress progress");
        }
    }

    report.elapsed = start.elapsed();

    tracing::info!(
        trials = report.trials,
        claims = report.claims,
        first_wins = report.first_wins,
        second_wins = report.second_wins,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "stress run passed"
    );

    Ok(report)
}

/// Releases one scoped thread per entry of `order` against `join`.
///
/// Every worker parks on the start channel until all of them are spawned.
/// Dropping the sender wakes them together; if a spawn failed the abort flag
/// is set first and the parked workers exit without signaling.
fn run_trial<J: TwoPartyJoin>(
    join: &J,
    order: &[Party],
    calls_per_thread: usize,
    trial: usize,
    thread_limit: usize,
) -> StressResult<TrialOutcome> {
    let abort = AtomicBool::new(false);
    let (start_tx, start_rx) = bounded::<()>(0);
    let (result_tx, result_rx) = bounded(order.len());

    let joined = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(order.len());
        let mut spawn_error = None;

        for (index, &party) in order.iter().enumerate() {
            let start_rx = start_rx.clone();
            let result_tx = result_tx.clone();
            let abort = &abort;
            let worker = move || {
                // Disconnection is the start signal.
                let _ = start_rx.recv();
                if abort.load(Ordering::Acquire) {
                    return;
                }
                let wins = (0..calls_per_thread).filter(|_| join.signal(party)).count();
                // Receiver outlives the scope.
                let _ = result_tx.send((party, wins));
            };

            match spawn_worker(scope, index, thread_limit, worker) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    spawn_error = Some(err);
                    break;
                }
            }
        }

        if spawn_error.is_some() {
            abort.store(true, Ordering::Release);
        }
        drop(start_tx);

        let panicked = handles
            .into_iter()
            .map(thread::ScopedJoinHandle::join)
            .fold(false, |panicked, result| panicked | result.is_err());

        match spawn_error {
            Some(err) => Err(err),
            None => Ok(panicked),
        }
    });
    drop(result_tx);

    match joined {
        Err(source) => {
            tracing::error!(trial, error = %source, "failed to spawn worker thread");
            return Err(StressError::Spawn { trial, source });
        }
        Ok(true) => return Err(StressError::WorkerPanicked { trial }),
        Ok(false) => {}
    }

    let mut outcome = TrialOutcome::default();
    for (party, wins) in result_rx.try_iter() {
        match party {
            Party::First => outcome.first_wins += wins,
            Party::Second => outcome.second_wins += wins,
        }
    }
    Ok(outcome)
}

/// Spawns worker `index`, refusing once `thread_limit` workers exist.
fn spawn_worker<'scope, F>(
    scope: &'scope thread::Scope<'scope, '_>,
    index: usize,
    thread_limit: usize,
    worker: F,
) -> io::Result<thread::ScopedJoinHandle<'scope, ()>>
where
    F: FnOnce() + Send + 'scope,
{
    if index >= thread_limit {
        return Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            format!("thread limit of {thread_limit} reached"),
        ));
    }
    thread::Builder::new()
        .name(format!("join-worker-{index}"))
        .spawn_scoped(scope, worker)
}
