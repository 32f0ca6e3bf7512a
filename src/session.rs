//! Per-session conversational state.
//!
//! A session is one chat (or one CLI user) interacting with the dispatcher.
//! The only state worth remembering between events is whether the session
//! asked to upload a banner and the next image should be taken as one.
//! Sessions that were never touched are [`SessionState::Idle`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

/// Identifier of a chat/session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        SessionId(id)
    }
}

impl FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SessionId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    /// The next image received for this session becomes its banner.
    AwaitingBanner,
}

/// Thread-safe map of session states, shared by all dispatcher tasks.
#[derive(Debug, Default)]
pub struct SessionStore {
    states: RwLock<HashMap<SessionId, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: SessionId) -> SessionState {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .copied()
            .unwrap_or_default()
    }

    pub fn begin_awaiting(&self, id: SessionId) {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, SessionState::AwaitingBanner);
    }

    /// Return the session to `Idle`. Idle sessions are not stored.
    pub fn reset(&self, id: SessionId) {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    pub fn is_awaiting(&self, id: SessionId) -> bool {
        self.state(id) == SessionState::AwaitingBanner
    }
}
