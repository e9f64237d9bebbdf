//! Recognition session lifecycle with automatic reconnection.
//!
//! Session lifecycle:
//! - Idle -> Listening (start)
//! - Listening -> Reconnecting (transient network error, silent restart)
//! - Reconnecting -> Listening (backend restarted)
//! - Listening/Reconnecting -> Errored (non-transient error, or retries exhausted)
//! - Errored -> Listening (retry, or a plain start)
//! - Listening/Reconnecting/Errored -> Idle (stop, abort)

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use hearth_core::config::RecognitionSettings;

use crate::events::{RecognitionErrorKind, RecognitionEvent};

/// Delay between aborting a wedged backend and restarting it on retry.
const RETRY_SETTLE: Duration = Duration::from_millis(500);

/// Errors raised by the session layer.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The recognition backend failed to start or stop.
    #[error("recognition backend error: {0}")]
    Backend(String),
}

impl From<VoiceError> for hearth_core::error::HearthError {
    fn from(err: VoiceError) -> Self {
        hearth_core::error::HearthError::Recognition(err.to_string())
    }
}

/// Operational state of a recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No session in progress. Ready to start.
    Idle,
    /// Actively listening for speech input.
    Listening,
    /// A transient error occurred; silently restarting the backend.
    Reconnecting,
    /// A surfaced error; waiting for a restart, retry, or stop.
    Errored,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Listening => write!(f, "Listening"),
            SessionState::Reconnecting => write!(f, "Reconnecting"),
            SessionState::Errored => write!(f, "Errored"),
        }
    }
}

impl SessionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Idle, SessionState::Listening)
                | (SessionState::Listening, SessionState::Reconnecting)
                | (SessionState::Reconnecting, SessionState::Listening)
                | (SessionState::Listening, SessionState::Errored)
                | (SessionState::Reconnecting, SessionState::Errored)
                | (SessionState::Errored, SessionState::Listening)
                // Stop / abort transitions
                | (SessionState::Listening, SessionState::Idle)
                | (SessionState::Reconnecting, SessionState::Idle)
                | (SessionState::Errored, SessionState::Idle)
        )
    }
}

/// Control surface for a speech recognition engine.
///
/// Implementations push [`RecognitionEvent`]s to the session owner, which
/// feeds them through [`RecognitionSession::handle_event`].
pub trait RecognitionBackend: Send {
    /// Begin capturing audio. Called again after transient failures.
    fn start(&mut self) -> Result<(), VoiceError>;
    /// Stop capturing gracefully; pending results may still arrive.
    fn stop(&mut self);
    /// Tear down immediately, discarding pending results.
    fn abort(&mut self);
}

/// Supervises one recognition backend.
///
/// Forwards backend events to the returned receiver, transparently absorbing
/// up to `max_reconnect_attempts` consecutive network errors by restarting
/// the backend after a backoff. Only errors that exhaust the retry budget
/// (or are non-transient) reach the consumer.
pub struct RecognitionSession<B: RecognitionBackend> {
    backend: B,
    settings: RecognitionSettings,
    state: SessionState,
    reconnect_attempts: u32,
    last_error: Option<RecognitionErrorKind>,
    tx: UnboundedSender<RecognitionEvent>,
}

impl<B: RecognitionBackend> RecognitionSession<B> {
    /// Create a session around `backend`. The returned receiver yields the
    /// stabilization-ready event stream.
    pub fn new(
        backend: B,
        settings: RecognitionSettings,
    ) -> (Self, UnboundedReceiver<RecognitionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                backend,
                settings,
                state: SessionState::Idle,
                reconnect_attempts: 0,
                last_error: None,
                tx,
            },
            rx,
        )
    }

    /// Returns the current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The most recent surfaced error, cleared by `retry` and `abort`.
    pub fn last_error(&self) -> Option<RecognitionErrorKind> {
        self.last_error
    }

    /// Start listening. A no-op when a session is already active; from
    /// `Errored` it clears the error and restarts, so a plain start works
    /// as recovery.
    pub fn start(&mut self) -> Result<(), VoiceError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Errored => {
                tracing::info!("Restarting recognition after error: {:?}", self.last_error);
                self.backend.abort();
                self.last_error = None;
            }
            _ => {
                tracing::debug!("Session already active ({}), ignoring start", self.state);
                return Ok(());
            }
        }
        self.backend.start()?;
        self.set_state(SessionState::Listening);
        self.reconnect_attempts = 0;
        Ok(())
    }

    /// Stop listening gracefully. The backend's `Ended` event completes the
    /// transition back to Idle.
    pub fn stop(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        self.backend.stop();
    }

    /// Tear the session down immediately and return to Idle.
    pub fn abort(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        self.backend.abort();
        self.last_error = None;
        self.reconnect_attempts = 0;
        self.set_state(SessionState::Idle);
    }

    /// Recover from a surfaced error: abort the wedged backend, wait for it
    /// to settle, then start a fresh session.
    pub async fn retry(&mut self) -> Result<(), VoiceError> {
        tracing::info!("Retrying recognition after error: {:?}", self.last_error);
        self.backend.abort();
        self.last_error = None;
        self.reconnect_attempts = 0;
        tokio::time::sleep(RETRY_SETTLE).await;
        self.backend.start()?;
        self.set_state(SessionState::Listening);
        Ok(())
    }

    /// Feed one backend event through the session.
    ///
    /// Transient network errors within the retry budget restart the backend
    /// silently and are not forwarded; everything else is forwarded to the
    /// consumer after the state is updated.
    pub async fn handle_event(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Started => {
                self.set_state(SessionState::Listening);
                self.forward(RecognitionEvent::Started);
            }
            RecognitionEvent::Partial { .. } | RecognitionEvent::Final { .. } => {
                self.forward(event);
            }
            RecognitionEvent::Error { kind } => {
                if kind.is_transient()
                    && self.reconnect_attempts < self.settings.max_reconnect_attempts
                {
                    self.reconnect_attempts += 1;
                    tracing::warn!(
                        "Transient recognition error ({}), reconnect attempt {}/{}",
                        kind,
                        self.reconnect_attempts,
                        self.settings.max_reconnect_attempts
                    );
                    self.set_state(SessionState::Reconnecting);
                    tokio::time::sleep(Duration::from_millis(
                        self.settings.reconnect_backoff_ms,
                    ))
                    .await;
                    if let Err(e) = self.backend.start() {
                        tracing::error!("Reconnect failed: {}", e);
                        self.last_error = Some(kind);
                        self.set_state(SessionState::Errored);
                        self.forward(RecognitionEvent::Error { kind });
                    }
                    // On success, the backend's Started event restores Listening.
                } else {
                    self.last_error = Some(kind);
                    self.set_state(SessionState::Errored);
                    self.forward(RecognitionEvent::Error { kind });
                }
            }
            RecognitionEvent::Ended => {
                match self.state {
                    // The engine tears down the old session during a silent
                    // reconnect; the consumer never hears about it.
                    SessionState::Reconnecting => {
                        tracing::debug!("Session ended during reconnect, swallowing");
                    }
                    SessionState::Errored => {
                        self.forward(RecognitionEvent::Ended);
                    }
                    _ => {
                        self.set_state(SessionState::Idle);
                        self.reconnect_attempts = 0;
                        self.forward(RecognitionEvent::Ended);
                    }
                }
            }
        }
    }

    fn forward(&self, event: RecognitionEvent) {
        // Receiver dropped means the app is shutting down.
        let _ = self.tx.send(event);
    }

    fn set_state(&mut self, target: SessionState) {
        if self.state == target {
            return;
        }
        if !self.state.can_transition_to(&target) {
            tracing::warn!("Invalid session transition: {} -> {}", self.state, target);
        }
        tracing::debug!("Session state: {} -> {}", self.state, target);
        self.state = target;
    }
}

// =============================================================================
// Tests
// =============================================================================
