//! In-memory source returning canned listings (tests, dry runs).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ipset_exporter_core::error::{ExporterError, Result};
use ipset_exporter_core::SetSnapshot;

use super::StateSource;

#[derive(Debug, Clone)]
enum Reply {
    Sets(Vec<SetSnapshot>),
    Fail(String),
}

/// Source whose next answer is set by the caller.
#[derive(Debug)]
pub struct CannedSource {
    reply: Mutex<Reply>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicU64,
}

impl CannedSource {
    pub fn new(sets: Vec<SetSnapshot>) -> Self {
        Self {
            reply: Mutex::new(Reply::Sets(sets)),
            delay: Mutex::new(None),
            calls: AtomicU64::new(0),
        }
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        let src = Self::new(Vec::new());
        src.fail_with(msg);
        src
    }

    /// Answer subsequent calls with `sets`.
    pub fn set_sets(&self, sets: Vec<SetSnapshot>) {
        self.store(Reply::Sets(sets));
    }

    /// Fail subsequent calls with a collection error.
    pub fn fail_with(&self, msg: impl Into<String>) {
        self.store(Reply::Fail(msg.into()));
    }

    /// Sleep this long before answering (simulates a slow kernel query).
    pub fn set_delay(&self, delay: Option<Duration>) {
        if let Ok(mut g) = self.delay.lock() {
            *g = delay;
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn store(&self, reply: Reply) {
        // Poisoned only if a holder panicked; keep the previous reply then.
        if let Ok(mut g) = self.reply.lock() {
            *g = reply;
        }
    }
}

#[async_trait]
impl StateSource for CannedSource {
    fn kind(&self) -> &'static str {
        "canned"
    }

    async fn list_all(&self) -> Result<Vec<SetSnapshot>> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let delay = self.delay.lock().ok().and_then(|g| *g);
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        let reply = self
            .reply
            .lock()
            .map(|g| g.clone())
            .map_err(|_| ExporterError::Internal("canned source lock poisoned".into()))?;
        match reply {
            Reply::Sets(sets) => Ok(sets),
            Reply::Fail(msg) => Err(ExporterError::Collection(msg)),
        }
    }
}
