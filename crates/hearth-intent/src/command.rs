//! Structured commands produced by the classifier.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use hearth_core::types::{Recurrence, ThemeMode};

/// Application surfaces a voice command can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavTarget {
    Reminders,
    Tasks,
    Pantry,
    Assistant,
    Home,
}

impl NavTarget {
    /// Route path for this surface.
    pub fn route_name(&self) -> &'static str {
        match self {
            NavTarget::Reminders => "/reminders",
            NavTarget::Tasks => "/tasks",
            NavTarget::Pantry => "/pantry",
            NavTarget::Assistant => "/assistant",
            NavTarget::Home => "/",
        }
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavTarget::Reminders => write!(f, "reminders"),
            NavTarget::Tasks => write!(f, "tasks"),
            NavTarget::Pantry => write!(f, "pantry"),
            NavTarget::Assistant => write!(f, "assistant"),
            NavTarget::Home => write!(f, "home"),
        }
    }
}

/// A classified voice command.
///
/// Every settled utterance maps to exactly one of these; utterances no rule
/// claims become `Unrecognized` with the raw text preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Navigate {
        target: NavTarget,
    },
    SetTheme {
        mode: ThemeMode,
    },
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
    },
    Logout,
    CreateReminder {
        task_name: String,
        date: NaiveDate,
        time: NaiveTime,
        recurrence: Recurrence,
    },
    CreatePantryItem {
        name: String,
        quantity: String,
    },
    AssignChore {
        work: String,
        worker: String,
    },
    ListReminders,
    ListPantry,
    ListChores,
    Unrecognized {
        raw: String,
    },
}

impl Command {
    /// Render a canonical utterance that classifies back to this command.
    ///
    /// Only defined for the creation commands, which the app echoes back so
    /// users learn phrases the classifier is guaranteed to accept.
    pub fn to_phrase(&self) -> Option<String> {
        match self {
            Command::CreateReminder {
                task_name,
                date,
                time,
                recurrence,
            } => Some(format!(
                "set reminder for {} on {} at {}, type {}",
                task_name,
                date.format("%Y-%m-%d"),
                time.format("%H:%M"),
                recurrence
            )),
            Command::CreatePantryItem { name, quantity } => {
                Some(format!("{}, {}", name, quantity))
            }
            Command::AssignChore { work, worker } => {
                Some(format!("assign {} to {}", work, worker))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
