//! Where non-fatal errors go.
//!
//! Everything except configuration and unrecovered transport failures is
//! funneled to one [`ErrorSink`] and never interrupts the read loop. The
//! client owns an [`ErrorReporter`] that logs each report and forwards it to
//! the currently installed sink.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use eventsub_core::ClientError;
use parking_lot::{Mutex, RwLock};
use tracing::{error, warn};

/// Receives every error the client reports.
///
/// Called from the read loop and from handler tasks, so implementations must
/// be quick and must not block.
pub trait ErrorSink: Send + Sync {
    /// Accept one report.
    fn report(&self, error: ClientError);
}

impl<F> ErrorSink for F
where
    F: Fn(ClientError) + Send + Sync,
{
    fn report(&self, error: ClientError) {
        self(error);
    }
}

/// Discards every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl ErrorSink for NoopSink {
    fn report(&self, _error: ClientError) {}
}

/// Keeps the most recent reports in a bounded ring.
///
/// When full, the oldest report is dropped and counted.
pub struct BufferedSink {
    capacity: usize,
    entries: Mutex<VecDeque<ClientError>>,
    dropped: AtomicU64,
}

impl BufferedSink {
    /// Create a buffer holding at most `capacity` reports (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            dropped: AtomicU64::new(0),
        }
    }

    /// Remove and return every buffered report, oldest first.
    pub fn drain(&self) -> Vec<ClientError> {
        self.entries.lock().drain(..).collect()
    }

    /// Error codes of the buffered reports, oldest first.
    pub fn codes(&self) -> Vec<&'static str> {
        self.entries.lock().iter().map(ClientError::code).collect()
    }

    /// Number of buffered reports.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Reports evicted because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ErrorSink for BufferedSink {
    fn report(&self, error: ClientError) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            let _ = entries.pop_front();
            let _ = self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        entries.push_back(error);
    }
}

/// Logs reports and forwards them to a swappable sink.
pub struct ErrorReporter {
    sink: RwLock<Arc<dyn ErrorSink>>,
}

impl ErrorReporter {
    /// Create a reporter forwarding to `sink`.
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            sink: RwLock::new(sink),
        }
    }

    /// Replace the sink. Reports already delivered stay where they went.
    pub fn set_sink(&self, sink: Arc<dyn ErrorSink>) {
        *self.sink.write() = sink;
    }

    /// Log `err` and hand it to the sink.
    pub fn report(&self, err: ClientError) {
        if err.is_fatal() {
            error!(code = err.code(), error = %err, "client error");
        } else {
            warn!(code = err.code(), error = %err, "client error");
        }
        let sink = self.sink.read().clone();
        sink.report(err);
    }
}
