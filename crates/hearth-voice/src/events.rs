//! Events emitted by a speech recognition backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single event from the recognition backend.
///
/// Backends push these in the order the underlying engine produces them:
/// `Started`, then any number of `Partial` results, then `Final` results,
/// with `Error` and `Ended` possible at any point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecognitionEvent {
    /// The backend began capturing audio.
    Started,
    /// An interim hypothesis. May be revised by later events.
    Partial { text: String },
    /// A finalized transcript segment.
    Final { text: String },
    /// The backend reported an error.
    Error {
        #[serde(rename = "error_kind")]
        kind: RecognitionErrorKind,
    },
    /// The backend stopped capturing audio.
    Ended,
}

/// Classified recognition failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionErrorKind {
    /// No speech was detected before the backend gave up.
    NoSpeech,
    /// The session was aborted by the caller.
    Aborted,
    /// No microphone, or audio capture failed to start.
    AudioCaptureUnavailable,
    /// The recognition service could not be reached.
    NetworkError,
    /// Microphone permission was denied.
    PermissionDenied,
    /// The recognition service is not available on this system.
    ServiceUnavailable,
    /// Anything the backend could not classify.
    Other,
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionErrorKind::NoSpeech => write!(f, "no-speech"),
            RecognitionErrorKind::Aborted => write!(f, "aborted"),
            RecognitionErrorKind::AudioCaptureUnavailable => write!(f, "audio-capture"),
            RecognitionErrorKind::NetworkError => write!(f, "network"),
            RecognitionErrorKind::PermissionDenied => write!(f, "not-allowed"),
            RecognitionErrorKind::ServiceUnavailable => write!(f, "service-not-allowed"),
            RecognitionErrorKind::Other => write!(f, "unknown"),
        }
    }
}

impl RecognitionErrorKind {
    /// Message shown to the user when this error surfaces.
    pub fn user_message(&self) -> &'static str {
        match self {
            RecognitionErrorKind::NoSpeech => "No speech was detected. Please try again.",
            RecognitionErrorKind::Aborted => "Listening was cancelled.",
            RecognitionErrorKind::AudioCaptureUnavailable => {
                "No microphone was found. Ensure that a microphone is installed."
            }
            RecognitionErrorKind::NetworkError => {
                "Network error occurred. Please check your connection."
            }
            RecognitionErrorKind::PermissionDenied => {
                "Permission to use microphone was denied."
            }
            RecognitionErrorKind::ServiceUnavailable => {
                "Speech recognition service is not available."
            }
            RecognitionErrorKind::Other => "An unknown error occurred. Please try again.",
        }
    }

    /// Transient errors are eligible for silent automatic reconnection.
    pub fn is_transient(&self) -> bool {
        matches!(self, RecognitionErrorKind::NetworkError)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(RecognitionErrorKind::NoSpeech.to_string(), "no-speech");
        assert_eq!(RecognitionErrorKind::NetworkError.to_string(), "network");
        assert_eq!(
            RecognitionErrorKind::PermissionDenied.to_string(),
            "not-allowed"
        );
    }

    #[test]
    fn test_only_network_errors_are_transient() {
        assert!(RecognitionErrorKind::NetworkError.is_transient());
        assert!(!RecognitionErrorKind::NoSpeech.is_transient());
        assert!(!RecognitionErrorKind::Aborted.is_transient());
        assert!(!RecognitionErrorKind::AudioCaptureUnavailable.is_transient());
        assert!(!RecognitionErrorKind::PermissionDenied.is_transient());
        assert!(!RecognitionErrorKind::ServiceUnavailable.is_transient());
        assert!(!RecognitionErrorKind::Other.is_transient());
    }

    #[test]
    fn test_user_messages_are_nonempty() {
        let kinds = [
            RecognitionErrorKind::NoSpeech,
            RecognitionErrorKind::Aborted,
            RecognitionErrorKind::AudioCaptureUnavailable,
            RecognitionErrorKind::NetworkError,
            RecognitionErrorKind::PermissionDenied,
            RecognitionErrorKind::ServiceUnavailable,
            RecognitionErrorKind::Other,
        ];
        for kind in kinds {
            assert!(!kind.user_message().is_empty());
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = RecognitionEvent::Final {
            text: "go to pantry".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"final\""));
        assert!(json.contains("go to pantry"));

        let back: RecognitionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
