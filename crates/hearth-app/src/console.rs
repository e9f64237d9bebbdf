//! Console implementations of the UI collaborator traits.
//!
//! The headless binary has no screen to navigate or theme, so these print
//! what a real surface would do.

use async_trait::async_trait;

use hearth_core::types::{Reminder, ThemeMode};
use hearth_dispatch::collaborators::{Announcer, Navigator, ThemeSink};
use hearth_intent::command::NavTarget;
use hearth_schedule::scheduler::{PromptAction, ReminderPrompter};

/// Prints navigation, theme, and speech effects to stdout.
pub struct ConsoleSurface;

impl Navigator for ConsoleSurface {
    fn go_to(&self, target: NavTarget) {
        println!("[nav] {}", target.route_name());
    }
}

impl ThemeSink for ConsoleSurface {
    fn set_theme(&self, mode: ThemeMode) {
        println!("[theme] {}", mode);
    }
}

impl Announcer for ConsoleSurface {
    fn speak(&self, text: &str) {
        println!("[speak] {}", text);
    }
}

/// Prints reminder notifications.
///
/// A console prompt cannot be clicked, so it resolves as a snooze; the
/// scheduler will ask again after the snooze delay, the same way a dismissed
/// toast would.
pub struct ConsolePrompter;

#[async_trait]
impl ReminderPrompter for ConsolePrompter {
    async fn present(&self, reminder: &Reminder) -> PromptAction {
        println!(
            "[reminder] {} (due {} at {})",
            reminder.task_name,
            reminder.date.format("%Y-%m-%d"),
            reminder.time.format("%H:%M")
        );
        PromptAction::Snooze
    }
}
