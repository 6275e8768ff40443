//! Single outstanding request per view.
//!
//! Each view owns one [`RequestSlot`]. Starting a new fetch aborts the one in
//! flight, and a generation ticket keeps a late response from overwriting
//! the state produced by a newer fetch.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

/// Load state of one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one fetch started on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A fetch in flight.
pub struct RequestHandle<T> {
    ticket: Ticket,
    join: JoinHandle<T>,
    generation: Arc<AtomicU64>,
}

impl<T> RequestHandle<T> {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Waits for the result; `None` if the fetch was cancelled or replaced.
    pub async fn result(self) -> Option<T> {
        let value = match self.join.await {
            Ok(value) => value,
            Err(e) => {
                debug!(ticket = self.ticket.0, cancelled = e.is_cancelled(), "Request did not complete");
                return None;
            }
        };
        if self.generation.load(Ordering::SeqCst) != self.ticket.0 {
            debug!(ticket = self.ticket.0, "Dropping stale response");
            return None;
        }
        Some(value)
    }
}

/// Holder of the one outstanding request of a view.
#[derive(Default)]
pub struct RequestSlot {
    generation: Arc<AtomicU64>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `fut`, aborting whatever request was in flight.
    pub async fn spawn<F, T>(&self, fut: F) -> RequestHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let mut in_flight = self.in_flight.lock().await;
        let ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        if let Some(previous) = in_flight.take() {
            debug!(ticket = ticket.0, "Replacing in-flight request");
            previous.abort();
        }
        let join = tokio::spawn(fut);
        *in_flight = Some(join.abort_handle());
        RequestHandle {
            ticket,
            join,
            generation: self.generation.clone(),
        }
    }

    /// Whether `ticket` belongs to the most recent request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Aborts the request in flight and invalidates outstanding tickets.
    pub async fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.in_flight.lock().await.take() {
            previous.abort();
        }
    }
}
