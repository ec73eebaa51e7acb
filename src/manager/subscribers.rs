//! Observer registration and delivery.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::download::{DownloadError, DownloadProgress};
use crate::queue::DownloadRequest;

type ProgressCallback = Arc<dyn Fn(&DownloadProgress) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&DownloadError, &DownloadRequest) + Send + Sync>;
type CompleteCallback = Arc<dyn Fn() + Send + Sync>;

/// Registered observer callbacks, delivered in registration order.
///
/// Delivery clones the registration list under the lock and invokes the
/// callbacks without holding it, so a callback may register further
/// observers or call back into the manager.
pub(crate) struct SubscriberRegistry {
    progress: Mutex<Vec<ProgressCallback>>,
    error: Mutex<Vec<ErrorCallback>>,
    complete: Mutex<Vec<CompleteCallback>>,
}

impl SubscriberRegistry {
    pub(crate) fn new() -> Self {
        Self {
            progress: Mutex::new(Vec::new()),
            error: Mutex::new(Vec::new()),
            complete: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn add_progress<F>(&self, callback: F)
    where
        F: Fn(&DownloadProgress) + Send + Sync + 'static,
    {
        lock(&self.progress).push(Arc::new(callback));
    }

    pub(crate) fn add_error<F>(&self, callback: F)
    where
        F: Fn(&DownloadError, &DownloadRequest) + Send + Sync + 'static,
    {
        lock(&self.error).push(Arc::new(callback));
    }

    pub(crate) fn add_complete<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.complete).push(Arc::new(callback));
    }

    pub(crate) fn notify_progress(&self, progress: &DownloadProgress) {
        for callback in snapshot(&self.progress) {
            callback(progress);
        }
    }

    pub(crate) fn notify_error(&self, error: &DownloadError, request: &DownloadRequest) {
        for callback in snapshot(&self.error) {
            callback(error, request);
        }
    }

    pub(crate) fn notify_complete(&self) {
        for callback in snapshot(&self.complete) {
            callback();
        }
    }
}

fn snapshot<T: ?Sized>(callbacks: &Mutex<Vec<Arc<T>>>) -> Vec<Arc<T>> {
    lock(callbacks).clone()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
