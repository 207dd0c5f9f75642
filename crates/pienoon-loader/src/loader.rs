//! The loader: a FIFO of jobs, one worker thread, and a finalize step for
//! the owning thread.
//!
//! ```text
//!   queue_job ──► pending ──(worker: load)──► completed ──(try_finalize)──► done
//! ```
//!
//! The worker peeks at the head of `pending` and only removes it once `load`
//! has returned, so "pending is empty" means every queued job has finished
//! loading. User code never runs while the queue lock is held.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::LoaderConfig;
use crate::error::{LoaderError, LoaderResult};
use crate::resource::AsyncResource;
use crate::stats::{LoaderStats, LoaderStatsSnapshot};

/// Lifecycle state of an [`AsyncLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LoaderState {
    /// No worker thread is alive.
    Idle,
    /// The worker is processing (or waiting for) jobs.
    Running,
    /// A shutdown barrier is queued; the worker exits once it reaches it.
    Draining,
}

/// An entry in the pending queue.
#[derive(Clone)]
enum Job {
    Load(Arc<dyn AsyncResource>),
    /// Barrier: the worker exits when this reaches the head.
    Shutdown,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(resource) => f.debug_tuple("Load").field(&resource.filename()).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

#[derive(Default)]
struct Queues {
    pending: VecDeque<Job>,
    completed: VecDeque<Arc<dyn AsyncResource>>,
}

impl Queues {
    fn has_shutdown(&self) -> bool {
        self.pending.iter().any(|job| matches!(job, Job::Shutdown))
    }

    fn ends_with_shutdown(&self) -> bool {
        matches!(self.pending.back(), Some(Job::Shutdown))
    }
}

impl fmt::Debug for Queues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queues")
            .field("pending", &self.pending)
            .field(
                "completed",
                &self.completed.iter().map(|r| r.filename()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// State shared between the owner and the worker.
#[derive(Debug)]
struct Shared {
    queues: Mutex<Queues>,
    /// One token per queued entry. The worker only waits on it when
    /// `pending` is empty, so stale tokens just cause an extra peek.
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
    stats: LoaderStats,
}

impl Shared {
    fn push(&self, job: Job) {
        self.queues.lock().pending.push_back(job);
        if self.wake_tx.send(()).is_err() {
            // Unreachable while `self` owns the receiver.
            warn!("loader wake signal disconnected");
        }
    }
}

/// Loads resources on a background thread and finalizes them on the thread
/// that calls [`AsyncLoader::try_finalize`].
///
/// Jobs are loaded one at a time in the order they were queued, and
/// finalized in the same order.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pienoon_loader::{AsyncLoader, FnResource};
///
/// let mut loader = AsyncLoader::new();
/// loader.queue_job(Arc::new(FnResource::new("menu.png", || {}, || {})));
/// loader.start_loading()?;
/// loader.stop_loading_when_complete();
/// loader.shutdown()?;
/// assert!(loader.try_finalize());
/// assert_eq!(loader.stats().finalized, 1);
/// # Ok::<(), pienoon_loader::LoaderError>(())
/// ```
#[derive(Debug)]
pub struct AsyncLoader {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    config: LoaderConfig,
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncLoader {
    /// Create an idle loader with the default worker config.
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create an idle loader.
    pub fn with_config(config: LoaderConfig) -> Self {
        let (wake_tx, wake_rx) = unbounded();
        Self {
            shared: Arc::new(Shared {
                queues: Mutex::new(Queues::default()),
                wake_tx,
                wake_rx,
                stats: LoaderStats::new(),
            }),
            worker: None,
            config,
        }
    }

    /// The worker config.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Append a resource to the pending queue and wake the worker.
    ///
    /// May be called at any time, including before `start_loading`. A job
    /// queued behind a shutdown barrier waits for the next `start_loading`.
    pub fn queue_job(&self, resource: Arc<dyn AsyncResource>) {
        debug!(file = resource.filename(), "queueing load job");
        self.shared.stats.inc_queued();
        self.shared.push(Job::Load(resource));
    }

    /// Spawn the worker thread.
    ///
    /// A worker that has already exited (after reaching a shutdown barrier)
    /// is joined first, so a drained loader can be started again.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::AlreadyRunning`] if a worker is still alive
    /// - [`LoaderError::WorkerPanicked`] if the previous worker panicked
    /// - [`LoaderError::Spawn`] if the thread cannot be created
    pub fn start_loading(&mut self) -> LoaderResult<()> {
        if let Some(worker) = self.worker.take() {
            if !worker.is_finished() {
                self.worker = Some(worker);
                warn!("start_loading called while the loader worker is running");
                return Err(LoaderError::AlreadyRunning);
            }
            join_worker(worker)?;
        }

        let mut builder = thread::Builder::new().name(self.config.thread_name.clone());
        if let Some(stack_size) = self.config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let shared = Arc::clone(&self.shared);
        let worker = builder
            .spawn(move || worker_main(&shared))
            .map_err(LoaderError::Spawn)?;
        self.worker = Some(worker);

        info!(thread = %self.config.thread_name, "async loader started");
        Ok(())
    }

    /// Queue a shutdown barrier behind every job queued so far.
    ///
    /// The worker finishes those jobs, then exits. Jobs already running are
    /// not interrupted. Does nothing if the last pending entry is already a
    /// barrier; a barrier with jobs queued behind it gets a second one, so
    /// each `start_loading` serves one batch.
    pub fn stop_loading_when_complete(&self) {
        self.queue_shutdown();
    }

    /// Returns false if the tail of `pending` was already a barrier.
    fn queue_shutdown(&self) -> bool {
        let mut queues = self.shared.queues.lock();
        if queues.ends_with_shutdown() {
            debug!("shutdown barrier already queued");
            return false;
        }
        queues.pending.push_back(Job::Shutdown);
        drop(queues);

        if self.shared.wake_tx.send(()).is_err() {
            warn!("loader wake signal disconnected");
        }
        debug!("shutdown barrier queued");
        true
    }

    /// Finalize every completed job, in order, on the calling thread.
    ///
    /// Returns true when nothing is pending and nothing is left to finalize,
    /// so a `true` result means every job queued so far has been finalized.
    /// Never blocks on the worker; call it once per frame.
    pub fn try_finalize(&self) -> bool {
        loop {
            let next = {
                let mut queues = self.shared.queues.lock();
                match queues.completed.pop_front() {
                    Some(resource) => resource,
                    None => return queues.pending.is_empty(),
                }
            };
            debug!(file = next.filename(), "finalizing");
            next.finalize();
            self.shared.stats.inc_finalized();
        }
    }

    /// Queue a shutdown barrier (if none is queued) and wait for the worker
    /// to exit. Completed jobs are left for `try_finalize`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::WorkerPanicked`] if the worker panicked.
    pub fn shutdown(&mut self) -> LoaderResult<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        let queued_barrier = !worker.is_finished() && self.queue_shutdown();
        let result = join_worker(worker);
        if queued_barrier {
            // The worker may have left through an earlier barrier (or
            // panicked) without reaching ours. `&mut self` kept anything from
            // being queued after it, so if it is still there it is the tail.
            let mut queues = self.shared.queues.lock();
            if queues.ends_with_shutdown() {
                queues.pending.pop_back();
            }
        }
        result
    }

    /// Queue a shutdown barrier and let the worker go without joining it.
    ///
    /// The worker still loads every job ahead of the barrier and then exits
    /// on its own, but nothing is finalized and a worker panic goes
    /// unreported. For owners that cannot block, such as a caller that has
    /// given up on a load that never returns.
    pub fn detach(mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        if !worker.is_finished() {
            self.queue_shutdown();
        }
        warn!(
            thread = worker.thread().name().unwrap_or("<unnamed>"),
            "detaching async loader worker without waiting for it"
        );
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoaderState {
        match &self.worker {
            Some(worker) if !worker.is_finished() => {
                if self.shared.queues.lock().has_shutdown() {
                    LoaderState::Draining
                } else {
                    LoaderState::Running
                }
            }
            _ => LoaderState::Idle,
        }
    }

    /// Job counters. Does not take the queue lock.
    pub fn stats(&self) -> LoaderStatsSnapshot {
        self.shared.stats.snapshot()
    }
}

impl Drop for AsyncLoader {
    fn drop(&mut self) {
        if self.worker.is_some() {
            debug!("async loader dropped; waiting for queued jobs");
            if let Err(e) = self.shutdown() {
                error!(error = %e, "async loader worker did not stop cleanly");
            }
        }
    }
}

fn join_worker(worker: JoinHandle<()>) -> LoaderResult<()> {
    match worker.join() {
        Ok(()) => {
            info!("async loader worker stopped cleanly");
            Ok(())
        }
        Err(_) => {
            error!("async loader worker panicked");
            Err(LoaderError::WorkerPanicked)
        }
    }
}

fn worker_main(shared: &Shared) {
    debug!("async loader worker entering loop");
    loop {
        let head = shared.queues.lock().pending.front().cloned();
        match head {
            None => {
                if shared.wake_rx.recv().is_err() {
                    warn!("loader wake signal disconnected; worker exiting");
                    return;
                }
            }
            Some(Job::Shutdown) => {
                // Only this thread removes from `pending`, so the head is
                // still the barrier we peeked.
                let barrier = shared.queues.lock().pending.pop_front();
                debug_assert!(matches!(barrier, Some(Job::Shutdown)));
                debug!("async loader worker reached shutdown barrier");
                return;
            }
            Some(Job::Load(resource)) => {
                debug!(file = resource.filename(), "loading");
                resource.load();
                shared.stats.inc_loaded();

                let mut queues = shared.queues.lock();
                if let Some(Job::Load(done)) = queues.pending.pop_front() {
                    queues.completed.push_back(done);
                }
            }
        }
    }
}
