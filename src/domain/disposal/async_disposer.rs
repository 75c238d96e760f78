use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, mpsc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::domain::config::DisposerConfig;
use crate::domain::disposal::disposable::{Disposable, DisposalState};
use crate::logger::LIFECYCLE_TARGET;

/// Accepts disposal tasks and runs them in the background until they succeed.
pub trait AsyncDisposer: std::fmt::Debug + Send + Sync {
    /// Hands `task` over. Never waits for the task to run.
    fn submit(&self, task: Box<dyn Disposable>);
}

/// What the disposer currently knows about one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposalSnapshot {
    pub display_name: String,
    pub attempts: u32,
    pub last_problem: Option<String>,
}

#[derive(Debug)]
struct TrackedDisposal {
    task: Arc<dyn Disposable>,
    attempts: u32,
    next_attempt: Instant,
    last_problem: Option<String>,
    running: bool,
}

#[derive(Debug, Default)]
struct Backlog {
    next_seq: u64,
    entries: BTreeMap<u64, TrackedDisposal>,
}

#[derive(Debug)]
enum DisposerMessage {
    Wake,
    Shutdown,
}

/// In-process [`AsyncDisposer`] with a single worker thread.
///
/// Failed tasks are retried with exponential backoff; an equal task that is already tracked
/// is not added twice.
#[derive(Debug)]
pub struct AsyncResourceDisposer {
    backlog: Arc<Mutex<Backlog>>,
    tx: mpsc::Sender<DisposerMessage>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AsyncResourceDisposer {
    pub fn start(config: DisposerConfig) -> std::io::Result<Self> {
        let backlog = Arc::new(Mutex::new(Backlog::default()));
        let (tx, rx) = mpsc::channel::<DisposerMessage>();

        let worker_backlog = backlog.clone();
        let worker = thread::Builder::new().name("resource-disposer".to_string()).spawn(move || {
            log::info!("Resource disposer started.");
            Self::run_worker_loop(worker_backlog, rx, config);
            log::info!("Resource disposer stopped.");
        })?;

        Ok(AsyncResourceDisposer { backlog, tx, worker: Mutex::new(Some(worker)) })
    }

    /// Tasks not yet disposed, in submission order.
    pub fn backlog(&self) -> Vec<DisposalSnapshot> {
        let guard = self.backlog.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .entries
            .values()
            .map(|tracked| DisposalSnapshot {
                display_name: tracked.task.display_name(),
                attempts: tracked.attempts,
                last_problem: tracked.last_problem.clone(),
            })
            .collect()
    }

    pub fn is_idle(&self) -> bool {
        self.backlog.lock().unwrap_or_else(PoisonError::into_inner).entries.is_empty()
    }

    /// Stops the worker after its current round. Remaining tasks stay in the backlog.
    pub fn shutdown(&self) {
        let _ = self.tx.send(DisposerMessage::Shutdown);
        let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(worker) = worker {
            if worker.join().is_err() {
                log::error!("Resource disposer worker panicked.");
            }
        }
    }

    fn run_worker_loop(backlog: Arc<Mutex<Backlog>>, rx: mpsc::Receiver<DisposerMessage>, config: DisposerConfig) {
        loop {
            match rx.recv_timeout(config.tick) {
                Ok(DisposerMessage::Wake) | Err(mpsc::RecvTimeoutError::Timeout) => Self::run_due(&backlog, &config),
                Ok(DisposerMessage::Shutdown) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn run_due(backlog: &Mutex<Backlog>, config: &DisposerConfig) {
        let now = Instant::now();
        let due: Vec<(u64, Arc<dyn Disposable>)> = {
            let mut guard = backlog.lock().unwrap_or_else(PoisonError::into_inner);
            guard
                .entries
                .iter_mut()
                .filter(|(_, tracked)| !tracked.running && tracked.next_attempt <= now)
                .map(|(seq, tracked)| {
                    tracked.running = true;
                    (*seq, tracked.task.clone())
                })
                .collect()
        };

        for (seq, task) in due {
            // The lock is not held while the task runs so submissions never wait on it.
            let problem = match task.dispose() {
                Ok(DisposalState::Purged) => None,
                Ok(DisposalState::Failed(reason)) => Some(reason),
                Err(error) => Some(error.to_string()),
            };

            let mut guard = backlog.lock().unwrap_or_else(PoisonError::into_inner);
            match problem {
                None => {
                    guard.entries.remove(&seq);
                    log::info!("Disposed: {}", task.display_name());
                }
                Some(problem) => {
                    if let Some(tracked) = guard.entries.get_mut(&seq) {
                        tracked.attempts += 1;
                        tracked.running = false;
                        tracked.next_attempt = Instant::now() + Self::backoff(config, tracked.attempts);
                        tracing::warn!(
                            target: LIFECYCLE_TARGET,
                            Task = %task.display_name(),
                            Attempts = tracked.attempts,
                            "Disposal attempt failed, will retry: {}",
                            problem
                        );
                        tracked.last_problem = Some(problem);
                    }
                }
            }
        }
    }

    /// `initial_backoff * 2^(attempts - 1)`, capped at `max_backoff`, plus up to 10% jitter.
    fn backoff(config: &DisposerConfig, attempts: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempts.saturating_sub(1));
        let base = config.initial_backoff.saturating_mul(factor).min(config.max_backoff);
        let jitter_ms = (base.as_millis() / 10) as u64;
        let jitter = if jitter_ms > 0 { rand::rng().random_range(0..=jitter_ms) } else { 0 };
        base + Duration::from_millis(jitter)
    }
}

impl AsyncDisposer for AsyncResourceDisposer {
    fn submit(&self, task: Box<dyn Disposable>) {
        let task: Arc<dyn Disposable> = Arc::from(task);
        {
            let mut guard = self.backlog.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.entries.values().any(|tracked| tracked.task.dyn_eq(task.as_ref())) {
                log::debug!("Ignoring duplicate disposal: {}", task.display_name());
                return;
            }

            let seq = guard.next_seq;
            guard.next_seq += 1;
            guard.entries.insert(
                seq,
                TrackedDisposal { task: task.clone(), attempts: 0, next_attempt: Instant::now(), last_problem: None, running: false },
            );
        }

        log::info!("Scheduled disposal: {}", task.display_name());
        if self.tx.send(DisposerMessage::Wake).is_err() {
            log::warn!("Resource disposer is stopped; {} stays in the backlog", task.display_name());
        }
    }
}

impl Drop for AsyncResourceDisposer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
