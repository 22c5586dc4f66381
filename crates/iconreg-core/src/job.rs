//! Single-slot runner for long external operations
//!
//! A job runs on its own thread, off the mutation path, and reports its
//! result through a one-shot channel. Jobs cannot be cancelled; a second
//! start while one is outstanding is refused with [`Error::Busy`].

use crate::{Error, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tokio::sync::oneshot;

/// Clears the busy flag when the job ends, including by panic.
struct SlotGuard(Arc<AtomicBool>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// At most one running job at a time
#[derive(Debug, Clone)]
pub struct JobSlot {
    name: String,
    busy: Arc<AtomicBool>,
}

impl JobSlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run `job` on a new thread.
    ///
    /// The receiver resolves with the job's return value; it resolves with
    /// an error instead if the job panicked. Await it from async code or
    /// call `blocking_recv` outside a runtime.
    pub fn try_start<F, T>(&self, job: F) -> Result<oneshot::Receiver<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Busy {
                job: self.name.clone(),
            });
        }

        let (tx, rx) = oneshot::channel();
        let guard = SlotGuard(Arc::clone(&self.busy));
        let name = self.name.clone();

        let spawned = thread::Builder::new()
            .name(format!("iconreg-{name}"))
            .spawn(move || {
                let output = panic::catch_unwind(AssertUnwindSafe(job));
                // free the slot before signalling so the receiver can start again
                drop(guard);
                match output {
                    Ok(value) => {
                        if tx.send(value).is_err() {
                            tracing::debug!(job = %name, "job finished with nobody waiting");
                        }
                    }
                    Err(_) => tracing::warn!(job = %name, "job panicked"),
                }
            });

        match spawned {
            Ok(_) => {
                tracing::info!(job = %self.name, "job started");
                Ok(rx)
            }
            Err(e) => {
                self.busy.store(false, Ordering::Release);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_job_result_delivered() {
        let slot = JobSlot::new("build");
        let rx = slot.try_start(|| 40 + 2).unwrap();
        assert_eq!(rx.blocking_recv().unwrap(), 42);
        assert!(!slot.is_busy());
    }

    #[test]
    fn test_second_start_is_refused() {
        let slot = JobSlot::new("build");
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let rx = slot
            .try_start(move || {
                release_rx.recv().ok();
            })
            .unwrap();

        let err = slot.try_start(|| ()).unwrap_err();
        assert!(matches!(err, Error::Busy { .. }));

        release_tx.send(()).unwrap();
        rx.blocking_recv().unwrap();
        assert!(slot.try_start(|| ()).is_ok());
    }

    #[test]
    fn test_panicking_job_frees_slot() {
        let slot = JobSlot::new("build");
        let rx = slot.try_start(|| -> u8 { panic!("compiler crashed") }).unwrap();
        assert!(rx.blocking_recv().is_err());
        assert!(!slot.is_busy());
    }
}
