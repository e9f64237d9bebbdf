//! Due-reminder polling and notification lifecycle.

pub mod scheduler;

pub use scheduler::{PromptAction, ReminderPrompter, ReminderScheduler};
