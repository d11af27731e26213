//! Single-flight coordination for token refresh.
//!
//! The first request that needs a refresh receives the lease and starts it;
//! every request, the leader included, waits on a oneshot channel for the
//! shared outcome. The lease is owned, so the refresh can run in its own
//! task and outlive the request that started it. The lock is only held for
//! flag and queue updates, never across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Outcome of a refresh: the new access token or the reason it failed.
pub type RefreshOutcome = ApiResult<String>;

type Waiter = oneshot::Sender<RefreshOutcome>;

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<Waiter>,
}

/// Refresh-in-progress flag plus the queue of requests waiting on it.
#[derive(Debug, Default)]
pub struct RefreshGate {
    state: Mutex<RefreshState>,
}

/// Role handed to a caller of [`RefreshGate::enter`].
#[derive(Debug)]
pub enum Ticket {
    /// No refresh was running; the caller must start it and settle the lease.
    Leader {
        /// Settles the refresh for everyone.
        lease: RefreshLease,
        /// The caller's own copy of the outcome.
        outcome: oneshot::Receiver<RefreshOutcome>,
    },
    /// A refresh is running; await the receiver for its outcome.
    Queued(oneshot::Receiver<RefreshOutcome>),
}

impl Ticket {
    /// Splits the ticket into the lease (leader only) and the outcome receiver.
    #[must_use]
    pub fn into_parts(self) -> (Option<RefreshLease>, oneshot::Receiver<RefreshOutcome>) {
        match self {
            Self::Leader { lease, outcome } => (Some(lease), outcome),
            Self::Queued(outcome) => (None, outcome),
        }
    }
}

impl RefreshGate {
    /// Creates an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Either claims the refresh or queues behind the running one.
    pub fn enter(self: &Arc<Self>) -> Ticket {
        let (tx, rx) = oneshot::channel();
        let mut state = self.lock();
        state.waiters.push(tx);
        if state.in_flight {
            debug!(queued = state.waiters.len(), "refresh in flight, request queued");
            Ticket::Queued(rx)
        } else {
            state.in_flight = true;
            Ticket::Leader {
                lease: RefreshLease {
                    gate: Arc::clone(self),
                    settled: false,
                },
                outcome: rx,
            }
        }
    }

    /// Returns true while a refresh is running.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.lock().in_flight
    }

    /// Number of requests waiting on the running refresh, leader included.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Clears the flag and hands `outcome` to every waiter in arrival order.
    fn release(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        let mut delivered = 0;
        for waiter in waiters {
            // A dropped receiver means the caller gave up; nothing to deliver.
            if waiter.send(outcome.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof that the holder is the one running the refresh.
///
/// Dropping an unsettled lease (the refresh task died before finishing)
/// fails every waiter and reopens the gate, so queued requests never hang.
#[derive(Debug)]
#[must_use = "an unsettled lease fails every queued request when dropped"]
pub struct RefreshLease {
    gate: Arc<RefreshGate>,
    settled: bool,
}

impl RefreshLease {
    /// Publishes the outcome; returns how many waiting requests received it.
    pub fn settle(mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        self.gate.release(outcome)
    }
}

impl Drop for RefreshLease {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.release(&Err(ApiError::Network(
                "token refresh was cancelled".to_string(),
            )));
        }
    }
}
