//! Background loading of the client list.
//!
//! A fetch runs on its own tokio task. Only the most recently started fetch
//! may deliver a result: starting a new one, cancelling, or dropping the
//! client raises the ignore flag of whatever is still in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::models::Client;
use crate::source::RecordSource;

#[derive(Debug)]
pub enum FetchOutcome {
    Loaded(Vec<Client>),
    Failed(String),
}

type Delivery = (u64, FetchOutcome);

pub struct FetchClient {
    generation: u64,
    pending: bool,
    ignore: Option<Arc<AtomicBool>>,
    tx: mpsc::UnboundedSender<Delivery>,
    rx: mpsc::UnboundedReceiver<Delivery>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generation: 0,
            pending: false,
            ignore: None,
            tx,
            rx,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Starts loading from `source`, superseding any fetch still in flight.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, source: RecordSource) {
        self.cancel();
        self.generation += 1;
        self.pending = true;

        let generation = self.generation;
        let ignore = Arc::new(AtomicBool::new(false));
        self.ignore = Some(Arc::clone(&ignore));
        let tx = self.tx.clone();

        debug!(generation, source = %source.describe(), "fetch started");
        tokio::spawn(async move {
            let outcome = match source.list_clients().await {
                Ok(clients) => FetchOutcome::Loaded(clients),
                Err(err) => {
                    warn!(generation, "failed to fetch clients: {err:#}");
                    FetchOutcome::Failed(format!("{err:#}"))
                }
            };
            if ignore.load(Ordering::Acquire) {
                debug!(generation, "discarding result of superseded fetch");
                return;
            }
            let _ = tx.send((generation, outcome));
        });
    }

    /// Marks the in-flight fetch, if any, as ignored.
    pub fn cancel(&mut self) {
        if let Some(ignore) = self.ignore.take() {
            ignore.store(true, Ordering::Release);
        }
        self.pending = false;
    }

    fn accept(&mut self, (generation, outcome): Delivery) -> Option<FetchOutcome> {
        if generation != self.generation || !self.pending {
            return None;
        }
        self.pending = false;
        self.ignore = None;
        Some(outcome)
    }

    /// Returns the current fetch's outcome if it has completed.
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        while let Ok(delivery) = self.rx.try_recv() {
            if let Some(outcome) = self.accept(delivery) {
                return Some(outcome);
            }
        }
        None
    }

    /// Waits for the current fetch's outcome; `None` when nothing is pending.
    pub async fn next(&mut self) -> Option<FetchOutcome> {
        while self.pending {
            let delivery = self.rx.recv().await?;
            if let Some(outcome) = self.accept(delivery) {
                return Some(outcome);
            }
        }
        None
    }
}

impl Drop for FetchClient {
    fn drop(&mut self) {
        self.cancel();
    }
}
