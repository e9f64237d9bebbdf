//! Speech recognition session management for Hearth.
//!
//! Wraps a pluggable recognition backend in a lifecycle state machine with
//! automatic reconnection on transient network errors, and stabilizes the
//! raw event stream into settled utterances ready for classification.

pub mod events;
pub mod session;
pub mod stabilizer;

pub use events::{RecognitionErrorKind, RecognitionEvent};
pub use session::{RecognitionBackend, RecognitionSession, SessionState, VoiceError};
pub use stabilizer::{Utterance, UtteranceStabilizer};
