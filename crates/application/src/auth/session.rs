//! Application session state.
//!
//! `SessionManager` owns whether the user is signed in. The state is
//! published over a `watch` channel so the UI layer can follow it, and
//! transitions are also broadcast as `SessionEvent`s.

use tokio::sync::{broadcast, watch};
use tracing::info;

use crate::ports::SessionController;

/// Capacity of the session event channel.
const EVENT_CAPACITY: usize = 16;

/// Whether the user is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session; the UI shows the login screen.
    #[default]
    Unauthenticated,
    /// Signed in.
    Authenticated {
        /// Backend user id, once known.
        user_id: Option<String>,
    },
}

impl SessionState {
    /// Returns true when signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Session transitions, for UI updates and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user signed in or a stored session was restored.
    SignedIn {
        /// Backend user id, if known.
        user_id: Option<String>,
    },
    /// The user signed out on purpose.
    SignedOut,
    /// The session was ended because it could not be recovered.
    ForcedLogout,
}

/// Owner of the session state.
#[derive(Debug)]
pub struct SessionManager {
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a manager in the signed-out state.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { state, events }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Returns true when signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Follow state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Receive transition events.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Marks the user as signed in.
    pub fn sign_in(&self, user_id: Option<String>) {
        self.state.send_replace(SessionState::Authenticated {
            user_id: user_id.clone(),
        });
        info!(user_id = user_id.as_deref().unwrap_or("unknown"), "session started");
        self.emit(SessionEvent::SignedIn { user_id });
    }

    /// Ends the session on user request.
    pub fn sign_out(&self) {
        if self.end() {
            info!("session ended by user");
            self.emit(SessionEvent::SignedOut);
        }
    }

    /// Switches to signed-out; returns false if already signed out.
    fn end(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_authenticated() {
                *state = SessionState::Unauthenticated;
                true
            } else {
                false
            }
        })
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController for SessionManager {
    fn force_logout(&self) {
        if self.end() {
            info!("session ended: credentials could not be refreshed");
            self.emit(SessionEvent::ForcedLogout);
        }
    }
}
