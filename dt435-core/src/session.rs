//! Session state for a dispenser connection
//!
//! A session tracks:
//! - Connection state (`Disconnected → Connecting → Connected → Disconnected`)
//! - Request sequence numbers, used to correlate log lines
//!
//! There is no reconnecting state: after an error the session is
//! `Disconnected` and the caller decides when to connect again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not connected
    Disconnected,

    /// TCP dial in progress
    Connecting,

    /// Ready for commands
    Connected,
}

/// Session state holder
///
/// Thread-safe and can be cloned cheaply (Arc internally). Reading the state
/// never waits on I/O.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Requests sent since the session was created
    sequence: AtomicU64,

    /// Current session state
    state: parking_lot::RwLock<SessionState>,
}

impl Session {
    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                sequence: AtomicU64::new(0),
                state: parking_lot::RwLock::new(SessionState::Disconnected),
            }),
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        matches!(self.state(), SessionState::Connected)
    }

    /// Move to `Connecting`
    pub fn begin_connect(&self) -> Result<()> {
        let mut state = self.inner.state.write();

        if *state != SessionState::Disconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot connect from state: {:?}",
                *state
            )));
        }

        *state = SessionState::Connecting;
        Ok(())
    }

    /// Move from `Connecting` to `Connected`
    pub fn establish(&self) -> Result<()> {
        let mut state = self.inner.state.write();

        if *state != SessionState::Connecting {
            return Err(Error::InvalidSessionState(format!(
                "Cannot establish from state: {:?}",
                *state
            )));
        }

        *state = SessionState::Connected;
        Ok(())
    }

    /// Close session; valid from any state
    pub fn close(&self) {
        *self.inner.state.write() = SessionState::Disconnected;
    }

    /// Get next request sequence number
    pub fn next_sequence(&self) -> u64 {
        self.inner.sequence.fetch_add(1, Ordering::AcqRel)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
