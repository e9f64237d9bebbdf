//! Core domain types for the household assistant.
//!
//! Defines the persisted entities (reminders, pantry items, chores) and
//! their supporting enumerations.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// How often a reminder repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// Fires once at its scheduled date and time.
    Once,
    /// Fires every day at its scheduled time, starting from its date.
    Daily,
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Once => write!(f, "once"),
            Recurrence::Daily => write!(f, "daily"),
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(Recurrence::Once),
            "daily" => Ok(Recurrence::Daily),
            _ => Err(format!("Unknown recurrence: {}", s)),
        }
    }
}

/// Application color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(format!("Unknown theme mode: {}", s)),
        }
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// An authenticated user of the household account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub username: String,
}

/// A scheduled reminder owned by one user.
///
/// Time is stored at minute granularity; seconds are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub task_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub recurrence: Recurrence,
    pub completed: bool,
    pub owner_id: Uuid,
}

impl Reminder {
    /// Create a new incomplete reminder with a generated identifier.
    pub fn new(
        task_name: String,
        date: NaiveDate,
        time: NaiveTime,
        recurrence: Recurrence,
        owner_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_name,
            date,
            time: truncate_to_minute(time),
            recurrence,
            completed: false,
            owner_id,
        }
    }

    /// Whether this reminder is due at the given wall-clock date and time.
    ///
    /// Matching is at minute granularity. A `Once` reminder requires exact
    /// date equality; a `Daily` reminder matches on time alone once its
    /// start date has been reached.
    pub fn is_due_at(&self, date: NaiveDate, time: NaiveTime) -> bool {
        if self.completed {
            return false;
        }
        let minute_match =
            self.time.hour() == time.hour() && self.time.minute() == time.minute();
        if !minute_match {
            return false;
        }
        match self.recurrence {
            Recurrence::Once => self.date == date,
            Recurrence::Daily => self.date <= date,
        }
    }
}

/// A pantry inventory entry.
///
/// The quantity is a free-form magnitude-plus-unit string ("5 kilograms");
/// units are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: String,
    pub recorded_at: DateTime<Utc>,
    pub owner_id: Uuid,
}

impl PantryItem {
    /// Create a new pantry item recorded at the current instant.
    pub fn new(name: String, quantity: String, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            quantity,
            recorded_at: Utc::now(),
            owner_id,
        }
    }
}

/// A household chore assigned to a person by voice or direct entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chore {
    pub id: Uuid,
    pub work: String,
    pub worker: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub owner_id: Uuid,
}

impl Chore {
    /// Create a new incomplete chore assignment.
    pub fn new(work: String, worker: String, date: NaiveDate, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            work,
            worker,
            date,
            completed: false,
            owner_id,
        }
    }
}

/// Drop the seconds component of a time value.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
        .expect("hour and minute always form a valid time")
}

// =============================================================================
// Tests
// =============================================================================
