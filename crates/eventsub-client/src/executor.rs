//! Runs handler callbacks off the read loop.
//!
//! Three modes, chosen by [`DispatchMode`]:
//!
//! - `Detached`: spawn and return immediately. Handlers start in wire order
//!   but may finish in any order, and nothing bounds how many run at once.
//! - `Bounded`: like `Detached`, but at most `max_concurrent_handlers` run at
//!   once. The read loop waits for a free slot before spawning, and stops
//!   waiting if the client is closed or cancelled.
//! - `Inline`: spawn and wait for completion, up to `handler_timeout_ms`.
//!
//! Panics are caught in every mode and reported as
//! [`ClientError::HandlerPanicked`].

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use eventsub_core::ClientError;
use eventsub_settings::{DispatchMode, DispatchSettings};
use tokio::sync::Semaphore;

use crate::sink::ErrorReporter;

/// Spawns handler invocations according to the dispatch mode.
#[derive(Clone)]
pub struct HandlerExecutor {
    mode: DispatchMode,
    permits: Arc<Semaphore>,
    timeout: Duration,
    reporter: Arc<ErrorReporter>,
}

impl HandlerExecutor {
    /// Create an executor from dispatch settings.
    pub fn new(settings: &DispatchSettings, reporter: Arc<ErrorReporter>) -> Self {
        Self {
            mode: settings.mode,
            permits: Arc::new(Semaphore::new(settings.max_concurrent_handlers.max(1))),
            timeout: settings.handler_timeout(),
            reporter,
        }
    }

    /// The configured mode.
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Run `job` as one handler invocation for `kind`.
    ///
    /// Returns once the job is started (detached, bounded) or finished or
    /// timed out (inline).
    pub async fn run<F>(&self, kind: &str, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let task = guarded(kind.to_owned(), job, self.reporter.clone());
        match self.mode {
            DispatchMode::Detached => {
                let _ = tokio::spawn(task);
            }
            DispatchMode::Bounded => {
                // The semaphore is never closed, so acquire only fails if it is.
                let Ok(permit) = self.permits.clone().acquire_owned().await else {
                    return;
                };
                let _ = tokio::spawn(async move {
                    task.await;
                    drop(permit);
                });
            }
            DispatchMode::Inline => {
                let handle = tokio::spawn(task);
                if tokio::time::timeout(self.timeout, handle).await.is_err() {
                    self.reporter.report(ClientError::HandlerTimedOut {
                        kind: kind.to_owned(),
                        timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    });
                }
            }
        }
    }
}

async fn guarded<F>(kind: String, job: F, reporter: Arc<ErrorReporter>)
where
    F: FnOnce() + Send + 'static,
{
    if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
        reporter.report(ClientError::HandlerPanicked {
            kind,
            message: panic_message(payload.as_ref()),
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BufferedSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn executor(mode: DispatchMode, max: usize, timeout_ms: u64) -> (HandlerExecutor, Arc<BufferedSink>) {
        let buffer = Arc::new(BufferedSink::new(16));
        let reporter = Arc::new(ErrorReporter::new(buffer.clone()));
        let settings = DispatchSettings {
            mode,
            max_concurrent_handlers: max,
            handler_timeout_ms: timeout_ms,
        };
        (HandlerExecutor::new(&settings, reporter), buffer)
    }

    #[tokio::test]
    async fn detached_runs_job() {
        let (exec, _) = executor(DispatchMode::Detached, 1, 1000);
        let (tx, rx) = tokio::sync::oneshot::channel();
        exec.run("session_welcome", move || {
            let _ = tx.send(42);
        })
        .await;
        let got = tokio::time::timeout(Duration::from_secs(1), rx).await.unwrap().unwrap();
        assert_eq!(got, 42);
    }

    #[tokio::test]
    async fn inline_waits_for_completion() {
        let (exec, buffer) = executor(DispatchMode::Inline, 1, 1000);
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let count = count.clone();
            exec.run("notification", move || {
                let _ = count.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn panic_is_reported_not_propagated() {
        let (exec, buffer) = executor(DispatchMode::Inline, 1, 1000);
        exec.run("channel.follow", || panic!("boom")).await;
        let errors = buffer.drain();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ClientError::HandlerPanicked { kind, message } => {
                assert_eq!(kind, "channel.follow");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn inline_timeout_is_reported() {
        let (exec, buffer) = executor(DispatchMode::Inline, 1, 20);
        exec.run("session_keepalive", || {
            std::thread::sleep(Duration::from_millis(200));
        })
        .await;
        assert_eq!(buffer.codes(), vec!["HANDLER_TIMEOUT"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn bounded_caps_concurrency() {
        let (exec, _) = executor(DispatchMode::Bounded, 2, 1000);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..6 {
            let (running, peak, done) = (running.clone(), peak.clone(), done.clone());
            exec.run("notification", move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                let _ = peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(30));
                let _ = running.fetch_sub(1, Ordering::SeqCst);
                let _ = done.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        }

        tokio::time::timeout(Duration::from_secs(5), async {
            while done.load(Ordering::SeqCst) < 6 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}
