//! The download manager: a bounded FIFO queue of streaming downloads.
//!
//! # Overview
//!
//! [`DownloadManager`] owns the queue state and a dispatcher task. Admission
//! is FIFO and bounded by the concurrency limit given at construction; every
//! admitted item runs as its own task that resolves the request, streams the
//! body to disk, and reports through the registered observers:
//!
//! - `on_progress` - after every chunk of every item
//! - `on_error` - once per failed item, with the originating request
//! - `on_complete` - once per drain cycle, when the last admitted item
//!   reaches a terminal state and nothing is pending
//!
//! The queue starts paused: nothing is admitted until [`DownloadManager::start`]
//! is called. Pausing stops new admissions only; canceling additionally
//! discards pending items and suppresses further queue-level events.
//!
//! # Example
//!
//! ```no_run
//! use fetchqueue::{DownloadManager, DownloadRequest};
//!
//! # async fn example() {
//! let manager = DownloadManager::new(3);
//! manager.on_progress(|progress| {
//!     println!("{} {:.1}% at {}", progress.file_name, progress.percentage, progress.speed);
//! });
//! manager.on_error(|error, request| eprintln!("{} failed: {error}", request.url));
//! manager.on_complete(|| println!("queue drained"));
//!
//! manager.enqueue(DownloadRequest::new("https://example.com/report.pdf"));
//! manager.enqueue(DownloadRequest::new("https://example.com/archive.tar.gz"));
//! manager.start();
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::{debug, info, instrument, warn};

use crate::download::{
    DownloadError, DownloadProgress, HttpClient, TransferExecutor, resolve,
};
use crate::queue::{DownloadRequest, ItemState, QueueItem, QueueStatus};

mod subscribers;

use subscribers::SubscriberRegistry;

/// Concurrent download limit applied when none is configured.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// A concurrency-bounded FIFO download queue.
///
/// Dropping the manager stops the dispatcher; transfers already in flight
/// are detached and run to completion on the runtime.
pub struct DownloadManager {
    shared: Arc<Shared>,
}

/// State and collaborators shared between the manager handle, the
/// dispatcher task, and per-item worker tasks.
struct Shared {
    state: Mutex<QueueState>,
    wake: Notify,
    subscribers: SubscriberRegistry,
    executor: TransferExecutor,
    concurrency: usize,
    next_item_id: AtomicU64,
}

/// Mutable queue state. The mutex is held only for short, non-blocking
/// sections; observer callbacks are never invoked while it is held.
struct QueueState {
    pending: VecDeque<QueueItem>,
    in_flight: usize,
    status: QueueStatus,
    running: bool,
    /// Set on admission, cleared at drain. Guarantees the completion
    /// callback fires exactly once per drain cycle.
    drain_armed: bool,
    shutdown: bool,
}

impl DownloadManager {
    /// Creates a manager with the given concurrency limit.
    ///
    /// A limit of zero is treated as one; the queue always makes progress
    /// once started. The queue starts paused with status
    /// [`QueueStatus::Queued`].
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime: the dispatcher is
    /// spawned immediately.
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self::with_client(concurrency, HttpClient::new())
    }

    /// Creates a manager using a caller-configured [`HttpClient`].
    ///
    /// Used by tests to shorten timeouts; behaves like [`DownloadManager::new`]
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn with_client(concurrency: usize, client: HttpClient) -> Self {
        let concurrency = concurrency.max(1);
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                in_flight: 0,
                status: QueueStatus::Queued,
                running: false,
                drain_armed: false,
                shutdown: false,
            }),
            wake: Notify::new(),
            subscribers: SubscriberRegistry::new(),
            executor: TransferExecutor::new(client),
            concurrency,
            next_item_id: AtomicU64::new(1),
        });

        tokio::spawn(run_dispatcher(Arc::clone(&shared)));
        info!(concurrency, "download manager created");

        Self { shared }
    }

    /// Appends a request to the queue.
    ///
    /// When the queue is running and a slot is free the item is admitted
    /// right away; otherwise it waits in FIFO order.
    pub fn enqueue(&self, request: DownloadRequest) {
        let id = self.shared.next_item_id.fetch_add(1, Ordering::Relaxed);
        debug!(item_id = id, url = %request.url, "enqueued download");

        let item = QueueItem::new(id, request);
        self.shared.lock_state().pending.push_back(item);
        self.shared.wake.notify_one();
    }

    /// Opens admission and sets the status to `Downloading`.
    ///
    /// Idempotent: calling it while already running, after a drain, or
    /// after a cancel is harmless and reopens admission for whatever is
    /// pending.
    pub fn start(&self) {
        {
            let mut state = self.shared.lock_state();
            state.running = true;
            state.status = QueueStatus::Downloading;
        }
        info!("download queue started");
        self.shared.wake.notify_one();
    }

    /// Reopens admission after a pause. Identical to [`DownloadManager::start`].
    pub fn resume(&self) {
        self.start();
    }

    /// Suspends new admissions and sets the status to `Paused`.
    ///
    /// In-flight transfers run to completion and their progress, error,
    /// and drain events still fire.
    pub fn pause(&self) {
        {
            let mut state = self.shared.lock_state();
            state.running = false;
            state.status = QueueStatus::Paused;
        }
        info!("download queue paused");
    }

    /// Cancels the queue: suspends admission, discards all pending items
    /// silently, and sets the status to `Canceled`.
    ///
    /// In-flight transfers are not interrupted, but they no longer change
    /// the queue status and the drain callback is suppressed.
    pub fn cancel(&self) {
        let discarded = {
            let mut state = self.shared.lock_state();
            state.running = false;
            state.status = QueueStatus::Canceled;
            let discarded = state.pending.len();
            state.pending.clear();
            discarded
        };
        info!(discarded, "download queue canceled");
    }

    /// Number of items waiting for admission.
    #[must_use]
    pub fn count(&self) -> usize {
        self.shared.lock_state().pending.len()
    }

    /// Current aggregate queue status.
    #[must_use]
    pub fn status(&self) -> QueueStatus {
        self.shared.lock_state().status
    }

    /// The effective concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.shared.concurrency
    }

    /// Registers a progress observer, called after every chunk of every
    /// item. Observers fire in registration order.
    ///
    /// Callbacks must not panic; a panic aborts that item's worker task.
    pub fn on_progress<F>(&self, callback: F)
    where
        F: Fn(&DownloadProgress) + Send + Sync + 'static,
    {
        self.shared.subscribers.add_progress(callback);
    }

    /// Registers an error observer, called once per failed item with the
    /// originating request. The queue status is already `Failed` when the
    /// callback runs, unless the queue was canceled (then nothing fires).
    pub fn on_error<F>(&self, callback: F)
    where
        F: Fn(&DownloadError, &DownloadRequest) + Send + Sync + 'static,
    {
        self.shared.subscribers.add_error(callback);
    }

    /// Registers a completion observer, called exactly once per drain
    /// cycle: when the last admitted item reaches a terminal state and
    /// nothing is pending. Item failures do not prevent the drain.
    pub fn on_complete<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.subscribers.add_complete(callback);
    }
}

impl Drop for DownloadManager {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock_state();
            state.shutdown = true;
            state.running = false;
        }
        self.shared.wake.notify_one();
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pops the next pending item when admission is open and a slot is
    /// free. Arms the drain for the cycle this admission belongs to.
    fn admit_next(&self) -> Option<QueueItem> {
        let mut state = self.lock_state();
        if state.shutdown || !state.running || state.in_flight >= self.concurrency {
            return None;
        }
        let item = state.pending.pop_front()?;
        state.in_flight += 1;
        state.drain_armed = true;
        state.status = QueueStatus::Downloading;
        Some(item)
    }

    fn is_shutdown(&self) -> bool {
        self.lock_state().shutdown
    }

    /// Records an item failure. Returns whether the error should be
    /// reported (suppressed after a cancel).
    fn record_failure(&self) -> bool {
        let mut state = self.lock_state();
        if state.status == QueueStatus::Canceled {
            false
        } else {
            state.status = QueueStatus::Failed;
            true
        }
    }

    /// Releases an item's slot; fires the drain callback when this was the
    /// last admitted item and nothing is pending.
    fn finish_item(&self) {
        let drained = {
            let mut state = self.lock_state();
            state.in_flight -= 1;
            if state.in_flight == 0 && state.pending.is_empty() && state.drain_armed {
                state.drain_armed = false;
                if state.status == QueueStatus::Canceled {
                    false
                } else {
                    state.status = QueueStatus::Completed;
                    true
                }
            } else {
                false
            }
        };

        self.wake.notify_one();

        if drained {
            info!("download queue drained");
            self.subscribers.notify_complete();
        }
    }
}

/// Dispatcher loop: admits pending items up to the concurrency limit and
/// sleeps until woken by an enqueue, a state change, or a finished item.
async fn run_dispatcher(shared: Arc<Shared>) {
    debug!("dispatcher started");
    loop {
        // Create the wakeup future before checking state so a notification
        // arriving in between is not lost.
        let wakeup = shared.wake.notified();

        while let Some(item) = shared.admit_next() {
            tokio::spawn(run_item(Arc::clone(&shared), item));
        }

        if shared.is_shutdown() {
            break;
        }
        wakeup.await;
    }
    debug!("dispatcher stopped");
}

/// Runs a single admitted item to its terminal state.
#[instrument(skip(shared, item), fields(item_id = item.id, url = %item.request.url))]
async fn run_item(shared: Arc<Shared>, mut item: QueueItem) {
    debug!(state = %item.state(), "item admitted");

    match execute_item(&shared, &mut item).await {
        Ok(()) => {
            item.advance(ItemState::Completed);
            debug!(state = %item.state(), "item finished");
        }
        Err(error) => {
            item.advance(ItemState::Failed);
            warn!(error = %error, category = ?error.category(), "item failed");
            if shared.record_failure() {
                shared.subscribers.notify_error(&error, &item.request);
            }
        }
    }

    shared.finish_item();
}

/// Resolves the request and streams the transfer, forwarding progress to
/// the registered observers.
async fn execute_item(shared: &Arc<Shared>, item: &mut QueueItem) -> Result<(), DownloadError> {
    let resolved = resolve(&item.request).await?;
    item.advance(ItemState::Resolved);
    debug!(destination = %resolved.destination().display(), "request resolved");

    item.advance(ItemState::Transferring);
    let subscribers = &shared.subscribers;
    shared
        .executor
        .execute(&resolved, |progress| subscribers.notify_progress(progress))
        .await
}
