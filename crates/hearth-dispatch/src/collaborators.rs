//! Interfaces the dispatcher drives.
//!
//! The dispatcher never talks to a UI directly; the hosting application
//! provides these and decides what navigation, theming, and speech mean
//! for its surface.

use hearth_core::types::ThemeMode;
use hearth_intent::command::NavTarget;

/// Moves the UI to another surface. Must take effect before it returns, so
/// a follow-up utterance lands on the new surface.
pub trait Navigator: Send + Sync {
    fn go_to(&self, target: NavTarget);
}

/// Applies a visual theme.
pub trait ThemeSink: Send + Sync {
    fn set_theme(&self, mode: ThemeMode);
}

/// Speaks a response aloud (or prints it, in headless mode).
pub trait Announcer: Send + Sync {
    fn speak(&self, text: &str);
}
