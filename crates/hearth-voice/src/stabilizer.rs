//! Utterance stabilization over the raw recognition event stream.
//!
//! Recognition backends revise interim hypotheses freely and sometimes
//! re-deliver an identical final transcript when a session restarts. The
//! stabilizer tracks the live transcript for display and settles exactly one
//! normalized utterance per distinct final result.

use crate::events::RecognitionEvent;

/// A settled utterance ready for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Trimmed, lowercased transcript text.
    pub text: String,
    /// Always true for settled utterances; kept for symmetry with the live
    /// transcript accessor.
    pub is_final: bool,
}

/// Folds recognition events into settled utterances.
///
/// Not thread-safe by itself; owned by the single task that drains the
/// session's event stream.
#[derive(Debug, Default)]
pub struct UtteranceStabilizer {
    transcript: String,
    last_settled: Option<String>,
    new_session: bool,
}

impl UtteranceStabilizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current live transcript, including interim hypotheses.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// The most recently settled utterance text, if any.
    pub fn last_settled(&self) -> Option<&str> {
        self.last_settled.as_deref()
    }

    /// Feed one recognition event. Returns a settled utterance when a new
    /// final transcript arrives.
    ///
    /// A final transcript identical to the previous settled one is dropped
    /// unless a new session started in between; restarting a session is the
    /// user's way of saying the same thing again on purpose.
    pub fn observe(&mut self, event: &RecognitionEvent) -> Option<Utterance> {
        match event {
            RecognitionEvent::Started => {
                self.transcript.clear();
                self.new_session = true;
                None
            }
            RecognitionEvent::Partial { text } => {
                self.transcript = text.clone();
                None
            }
            RecognitionEvent::Final { text } => {
                self.transcript = text.clone();
                let normalized = text.trim().to_lowercase();
                if normalized.is_empty() {
                    return None;
                }
                if !self.new_session && self.last_settled.as_deref() == Some(&normalized) {
                    tracing::debug!("Dropping re-delivered transcript: {}", normalized);
                    return None;
                }
                self.new_session = false;
                self.last_settled = Some(normalized.clone());
                Some(Utterance {
                    text: normalized,
                    is_final: true,
                })
            }
            RecognitionEvent::Error { .. } | RecognitionEvent::Ended => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(stab: &mut UtteranceStabilizer, text: &str) -> Option<Utterance> {
        stab.observe(&RecognitionEvent::Final {
            text: text.to_string(),
        })
    }

    #[test]
    fn test_partials_update_transcript_without_settling() {
        let mut stab = UtteranceStabilizer::new();
        stab.observe(&RecognitionEvent::Started);
        assert!(stab
            .observe(&RecognitionEvent::Partial {
                text: "go to".to_string()
            })
            .is_none());
        assert_eq!(stab.transcript(), "go to");
        assert!(stab
            .observe(&RecognitionEvent::Partial {
                text: "go to pantry".to_string()
            })
            .is_none());
        assert_eq!(stab.transcript(), "go to pantry");
        assert!(stab.last_settled().is_none());
    }

    #[test]
    fn test_final_settles_normalized() {
        let mut stab = UtteranceStabilizer::new();
        stab.observe(&RecognitionEvent::Started);
        let utterance = settle(&mut stab, "  Go To Pantry ").unwrap();
        assert_eq!(utterance.text, "go to pantry");
        assert!(utterance.is_final);
        assert_eq!(stab.last_settled(), Some("go to pantry"));
    }

    #[test]
    fn test_duplicate_final_in_same_session_dropped() {
        let mut stab = UtteranceStabilizer::new();
        stab.observe(&RecognitionEvent::Started);
        assert!(settle(&mut stab, "switch to dark mode").is_some());
        assert!(settle(&mut stab, "switch to dark mode").is_none());
        assert!(settle(&mut stab, "Switch To Dark Mode").is_none());
    }

    #[test]
    fn test_new_session_allows_repeat() {
        let mut stab = UtteranceStabilizer::new();
        stab.observe(&RecognitionEvent::Started);
        assert!(settle(&mut stab, "switch to dark mode").is_some());

        stab.observe(&RecognitionEvent::Ended);
        stab.observe(&RecognitionEvent::Started);
        assert!(settle(&mut stab, "switch to dark mode").is_some());
    }

    #[test]
    fn test_distinct_finals_both_settle() {
        let mut stab = UtteranceStabilizer::new();
        stab.observe(&RecognitionEvent::Started);
        assert!(settle(&mut stab, "go to reminders").is_some());
        assert!(settle(&mut stab, "go to pantry").is_some());
    }

    #[test]
    fn test_empty_final_dropped() {
        let mut stab = UtteranceStabilizer::new();
        stab.observe(&RecognitionEvent::Started);
        assert!(settle(&mut stab, "   ").is_none());
        assert!(stab.last_settled().is_none());
    }

    #[test]
    fn test_started_resets_transcript() {
        let mut stab = UtteranceStabilizer::new();
        stab.observe(&RecognitionEvent::Started);
        stab.observe(&RecognitionEvent::Partial {
            text: "half a sen".to_string(),
        });
        stab.observe(&RecognitionEvent::Started);
        assert_eq!(stab.transcript(), "");
    }

    #[test]
    fn test_errors_and_ended_are_inert() {
        let mut stab = UtteranceStabilizer::new();
        assert!(stab
            .observe(&RecognitionEvent::Error {
                kind: crate::events::RecognitionErrorKind::NoSpeech
            })
            .is_none());
        assert!(stab.observe(&RecognitionEvent::Ended).is_none());
    }
}
