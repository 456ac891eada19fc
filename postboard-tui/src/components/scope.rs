use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared flag telling a finished request whether anyone still wants it
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Owns the in-flight requests of one view.
///
/// Dropping the scope (the view is torn down) aborts its tasks and cancels
/// the token, so completions that were already queued get discarded by the
/// receiver instead of being applied to state that no longer exists.
#[derive(Debug, Default)]
pub struct TaskScope {
    token: CancelToken,
    tasks: Vec<JoinHandle<()>>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Spawn a task owned by this scope. Must be called inside a tokio runtime.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|handle| !handle.is_finished());
        self.tasks.push(tokio::spawn(task));
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|handle| !handle.is_finished()).count()
    }

    pub fn cancel(&mut self) {
        self.token.cancel();
        for handle in self.tasks.drain(..) {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
