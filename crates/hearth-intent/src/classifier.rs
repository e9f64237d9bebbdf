//! Ordered regex rules mapping utterance text to commands.
//!
//! Rules are tried in a fixed priority order; the first rule that claims the
//! utterance wins. Anything unclaimed becomes [`Command::Unrecognized`] with
//! the normalized text preserved for fallback handling.

use chrono::{Local, NaiveDateTime};
use regex::Regex;

use hearth_core::types::{truncate_to_minute, Recurrence, ThemeMode};

use crate::command::{Command, NavTarget};
use crate::datetime::{parse_spoken_date, parse_spoken_time};

type Rule = fn(&Classifier, &str, NaiveDateTime) -> Option<Command>;

/// Rule priority order. Reminder phrases must outrank the pantry patterns
/// (a reminder phrase contains a comma), and assignment must outrank the
/// bare pantry pattern (an assignment can contain a quantity-like number).
const RULES: [Rule; 7] = [
    Classifier::match_theme,
    Classifier::match_navigation,
    Classifier::match_auth,
    Classifier::match_reminder,
    Classifier::match_assign,
    Classifier::match_pantry,
    Classifier::match_listing,
];

/// Compiled rule set. Compile once, reuse for every utterance.
pub struct Classifier {
    theme: Regex,
    navigation: Regex,
    login: Regex,
    register: Regex,
    reminder: Regex,
    reminder_body: Regex,
    pantry_comma: Regex,
    pantry_simple: Regex,
    assign: Regex,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Create a classifier with all rules compiled.
    pub fn new() -> Self {
        Self {
            theme: Regex::new(r"\b(?P<mode>dark|light)\s+(?:mode|theme)\b")
                .expect("Invalid theme regex"),
            navigation: Regex::new(
                r"(?:go to|open|show(?: me)?|take me to|navigate to)\s+(?:the\s+)?(?P<target>.+?)(?:\s+page)?$",
            )
            .expect("Invalid navigation regex"),
            login: Regex::new(r"log\s?in with (?P<user>\w+)(?:(?: and |,\s*| )(?P<pass>\w+))?")
                .expect("Invalid login regex"),
            register: Regex::new(
                r"register with (?P<user>\w+)(?:(?: and |,\s*| )(?P<pass>\w+))?",
            )
            .expect("Invalid register regex"),
            reminder: Regex::new(
                r"^set reminder for (?P<body>.+?)(?:,\s*(?:type:?\s*)?|\s+type:?\s*)(?P<rec>daily|once)$",
            )
            .expect("Invalid reminder regex"),
            reminder_body: Regex::new(
                r"^(?P<task>.+?)(?:\s+on\s+(?P<date>.+?))?(?:\s+at\s+(?P<time>.+?))?$",
            )
            .expect("Invalid reminder body regex"),
            pantry_comma: Regex::new(r"^(?P<name>[\w\s]+?)\s*,\s*(?P<qty>[\w\s]+?)$")
                .expect("Invalid pantry comma regex"),
            pantry_simple: Regex::new(r"^(?P<name>[a-z][a-z\s]*?)\s+(?P<qty>\d+[\w\s]*?)$")
                .expect("Invalid pantry regex"),
            assign: Regex::new(r"^assign\s+(?P<work>.+)\s+to\s+(?P<worker>\S.*)$")
                .expect("Invalid assignment regex"),
        }
    }

    /// Classify an utterance against the current wall clock.
    pub fn classify(&self, text: &str) -> Command {
        self.classify_at(text, Local::now().naive_local())
    }

    /// Classify an utterance, resolving relative dates and omitted fields
    /// against `now`.
    pub fn classify_at(&self, text: &str, now: NaiveDateTime) -> Command {
        let text = text.trim().to_lowercase();
        for rule in RULES {
            if let Some(command) = rule(self, &text, now) {
                tracing::debug!("Classified {:?} as {:?}", text, command);
                return command;
            }
        }
        Command::Unrecognized { raw: text }
    }

    fn match_theme(&self, text: &str, _now: NaiveDateTime) -> Option<Command> {
        let caps = self.theme.captures(text)?;
        let mode = match &caps["mode"] {
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::Light,
        };
        Some(Command::SetTheme { mode })
    }

    /// Navigation matches anywhere in the utterance, so polite framing
    /// ("please go to pantry") still lands. The bare phrases have no verb
    /// and are checked by containment.
    fn match_navigation(&self, text: &str, _now: NaiveDateTime) -> Option<Command> {
        if text.contains("talk to me") {
            return Some(Command::Navigate {
                target: NavTarget::Assistant,
            });
        }
        if text.contains("task assignment") {
            return Some(Command::Navigate {
                target: NavTarget::Tasks,
            });
        }
        let caps = self.navigation.captures(text)?;
        let spoken = &caps["target"];
        let target = if spoken.contains("reminder") {
            NavTarget::Reminders
        } else if spoken.contains("task") || spoken.contains("chore") {
            NavTarget::Tasks
        } else if spoken.contains("pantry") {
            NavTarget::Pantry
        } else if spoken.contains("assistant") {
            NavTarget::Assistant
        } else if spoken.contains("home") {
            NavTarget::Home
        } else {
            return None;
        };
        Some(Command::Navigate { target })
    }

    fn match_auth(&self, text: &str, _now: NaiveDateTime) -> Option<Command> {
        if text.contains("log out")
            || text.contains("log me out")
            || text.contains("logout")
            || text.contains("sign out")
        {
            return Some(Command::Logout);
        }
        if let Some(caps) = self.login.captures(text) {
            let (username, password) = credentials(&caps);
            return Some(Command::Login { username, password });
        }
        let caps = self.register.captures(text)?;
        let (username, password) = credentials(&caps);
        Some(Command::Register { username, password })
    }

    fn match_reminder(&self, text: &str, now: NaiveDateTime) -> Option<Command> {
        if !text.starts_with("set reminder") {
            return None;
        }
        // From here on the utterance is shaped like a reminder; parse
        // failures become Unrecognized rather than falling through to
        // rules that would misread it.
        let unrecognized = || {
            Some(Command::Unrecognized {
                raw: text.to_string(),
            })
        };

        let caps = match self.reminder.captures(text) {
            Some(caps) => caps,
            None => return unrecognized(),
        };
        let recurrence = match &caps["rec"] {
            "daily" => Recurrence::Daily,
            _ => Recurrence::Once,
        };

        let body = caps["body"].trim().trim_end_matches(',').trim_end();
        let body_caps = match self.reminder_body.captures(body) {
            Some(caps) => caps,
            None => return unrecognized(),
        };
        let task_name = body_caps["task"].trim().to_string();
        if task_name.is_empty() {
            return unrecognized();
        }

        let date = match body_caps.name("date") {
            Some(m) => match parse_spoken_date(m.as_str(), now.date()) {
                Some(date) => date,
                None => return unrecognized(),
            },
            None => now.date(),
        };
        let time = match body_caps.name("time") {
            Some(m) => match parse_spoken_time(m.as_str()) {
                Some(time) => time,
                None => return unrecognized(),
            },
            None => truncate_to_minute(now.time()),
        };

        Some(Command::CreateReminder {
            task_name,
            date,
            time,
            recurrence,
        })
    }

    fn match_assign(&self, text: &str, _now: NaiveDateTime) -> Option<Command> {
        let caps = self.assign.captures(text)?;
        Some(Command::AssignChore {
            work: caps["work"].trim().to_string(),
            worker: caps["worker"].trim().to_string(),
        })
    }

    fn match_pantry(&self, text: &str, _now: NaiveDateTime) -> Option<Command> {
        if let Some(caps) = self.pantry_comma.captures(text) {
            return Some(Command::CreatePantryItem {
                name: caps["name"].trim().to_string(),
                quantity: caps["qty"].trim().to_string(),
            });
        }
        let caps = self.pantry_simple.captures(text)?;
        Some(Command::CreatePantryItem {
            name: caps["name"].trim().to_string(),
            quantity: caps["qty"].trim().to_string(),
        })
    }

    fn match_listing(&self, text: &str, _now: NaiveDateTime) -> Option<Command> {
        if text.contains("what are my reminders") || text.contains("list my reminders") {
            return Some(Command::ListReminders);
        }
        if text.contains("what's in my pantry")
            || text.contains("what is in my pantry")
            || text.contains("list my pantry")
        {
            return Some(Command::ListPantry);
        }
        if text.contains("what tasks are assigned") || text.contains("what chores are assigned") {
            return Some(Command::ListChores);
        }
        None
    }
}

/// Pulls the username and password out of an auth capture. A spoken login
/// rarely includes a credential, so a fixed placeholder keeps the demo flow
/// usable when the password is omitted.
fn credentials(caps: &regex::Captures<'_>) -> (String, String) {
    let username = caps["user"].to_string();
    let password = caps
        .name("pass")
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "password".to_string());
    (username, password)
}

// =============================================================================
// Tests
// =============================================================================
