//! Async result slot polled from the UI loop
//!
//! A fetch runs on the tokio runtime and parks its result in a shared slot;
//! the view takes it out on a later frame. Starting a new fetch replaces the
//! slot, so an older response lands in a slot nobody reads any more.

use std::future::Future;
use std::sync::{Arc, Mutex, TryLockError};

use crate::error::ApiError;

type Slot<T> = Arc<Mutex<Option<Result<T, ApiError>>>>;

pub struct PendingFetch<T> {
    slot: Option<Slot<T>>,
}

impl<T> Default for PendingFetch<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T: Send + 'static> PendingFetch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `future`; any outstanding fetch is abandoned
    pub fn start<F>(&mut self, runtime: &tokio::runtime::Runtime, future: F)
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let result: Slot<T> = Arc::new(Mutex::new(None));
        let result_clone = result.clone();

        runtime.spawn(async move {
            let res = future.await;
            let mut guard = result_clone.lock().unwrap_or_else(|e| e.into_inner());
            *guard = Some(res);
        });

        self.slot = Some(result);
    }

    /// Take the result if it has arrived
    pub fn poll(&mut self) -> Option<Result<T, ApiError>> {
        let taken = self.slot.as_ref().and_then(|slot| match slot.try_lock() {
            Ok(mut guard) => guard.take(),
            Err(TryLockError::Poisoned(e)) => e.into_inner().take(),
            Err(TryLockError::WouldBlock) => None,
        });
        if taken.is_some() {
            self.slot = None;
        }
        taken
    }

    /// Forget the outstanding fetch; its result is dropped when it lands
    pub fn discard(&mut self) {
        self.slot = None;
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn wait_for<T: Send + 'static>(pending: &mut PendingFetch<T>) -> Option<Result<T, ApiError>> {
        for _ in 0..400 {
            if let Some(result) = pending.poll() {
                return Some(result);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_poll_takes_result_once() {
        let rt = runtime();
        let mut pending = PendingFetch::new();
        pending.start(&rt, async { Ok::<_, ApiError>(7) });
        assert!(pending.is_loading());

        assert_eq!(wait_for(&mut pending), Some(Ok(7)));
        assert!(!pending.is_loading());
        assert_eq!(pending.poll(), None);
    }

    #[test]
    fn test_last_request_wins() {
        let rt = runtime();
        let mut pending = PendingFetch::new();
        pending.start(&rt, async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, ApiError>("slow")
        });
        pending.start(&rt, async { Ok::<_, ApiError>("fast") });

        assert_eq!(wait_for(&mut pending), Some(Ok("fast")));
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(pending.poll(), None);
    }

    #[test]
    fn test_discard_ignores_late_response() {
        let rt = runtime();
        let mut pending = PendingFetch::new();
        pending.start(&rt, async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err::<u32, _>(ApiError::Transport("connection refused".to_string()))
        });
        pending.discard();
        assert!(!pending.is_loading());

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(pending.poll(), None);
    }
}
