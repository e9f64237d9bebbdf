//! Maps classified commands to side effects and spoken responses.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, NaiveTime, Timelike};

use hearth_core::config::DispatchSettings;
use hearth_core::types::{Chore, PantryItem, Reminder, ThemeMode, UserIdentity};
use hearth_intent::command::{Command, NavTarget};
use hearth_store::auth::AuthService;
use hearth_store::store::{ChoreStore, PantryStore, ReminderStore};

use crate::collaborators::{Announcer, Navigator, ThemeSink};
use crate::guard::IdempotencyGuard;

/// How many entries a spoken listing names before summarizing the rest.
const LISTING_LIMIT: usize = 3;

/// The result of dispatching one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Text shown to the user.
    pub response: String,
    /// Whether the response was also spoken aloud.
    pub announced: bool,
}

/// Executes commands against the stores and UI collaborators.
pub struct Dispatcher {
    navigator: Arc<dyn Navigator>,
    theme: Arc<dyn ThemeSink>,
    announcer: Arc<dyn Announcer>,
    auth: Arc<dyn AuthService>,
    reminders: Arc<ReminderStore>,
    pantry: Arc<PantryStore>,
    chores: Arc<ChoreStore>,
    guard: IdempotencyGuard,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        navigator: Arc<dyn Navigator>,
        theme: Arc<dyn ThemeSink>,
        announcer: Arc<dyn Announcer>,
        auth: Arc<dyn AuthService>,
        reminders: Arc<ReminderStore>,
        pantry: Arc<PantryStore>,
        chores: Arc<ChoreStore>,
        settings: &DispatchSettings,
    ) -> Self {
        Self {
            navigator,
            theme,
            announcer,
            auth,
            reminders,
            pantry,
            chores,
            guard: IdempotencyGuard::new(Duration::from_millis(settings.idempotency_cooldown_ms)),
        }
    }

    /// Execute one command.
    ///
    /// Returns `None` when the command was suppressed as a duplicate of one
    /// just executed; the user already heard the response the first time.
    pub fn dispatch(&self, command: Command) -> Option<DispatchOutcome> {
        let key = idempotency_key(&command);
        if let Some(key) = &key {
            if !self.guard.acquire(key) {
                tracing::debug!("Suppressing duplicate command: {}", key);
                return None;
            }
        }

        let outcome = self.execute(command);
        if let Some(key) = &key {
            self.guard.release(key);
        }

        if outcome.announced {
            self.announcer.speak(&outcome.response);
        }
        Some(outcome)
    }

    fn execute(&self, command: Command) -> DispatchOutcome {
        match command {
            Command::Navigate { target } => {
                self.navigator.go_to(target);
                spoken(navigation_response(target))
            }
            Command::SetTheme { mode } => {
                self.theme.set_theme(mode);
                match mode {
                    ThemeMode::Dark => spoken("Switched to dark mode"),
                    ThemeMode::Light => spoken("Switched to light mode"),
                }
            }
            Command::Login { username, password } => match self.auth.login(&username, &password) {
                Ok(user) => spoken(format!("Welcome back, {}", user.username)),
                Err(e) => {
                    tracing::warn!("Login failed for {}: {}", username, e);
                    spoken("I couldn't log you in. Please check your username and password.")
                }
            },
            Command::Register { username, password } => {
                match self.auth.register(&username, &password) {
                    Ok(user) => spoken(format!("Welcome, {}", user.username)),
                    Err(e) => {
                        tracing::warn!("Registration failed for {}: {}", username, e);
                        spoken("That username is already taken. Try another one.")
                    }
                }
            }
            Command::Logout => match self.auth.logout() {
                Some(_) => {
                    self.navigator.go_to(NavTarget::Home);
                    spoken("You've been logged out")
                }
                None => spoken("You're not logged in"),
            },
            Command::CreateReminder {
                task_name,
                date,
                time,
                recurrence,
            } => match self.auth.current_user() {
                Some(user) => self.create_reminder(user, task_name, date, time, recurrence),
                None => spoken("Please log in to set reminders"),
            },
            Command::CreatePantryItem { name, quantity } => match self.auth.current_user() {
                Some(user) => {
                    let item = self
                        .pantry
                        .create(PantryItem::new(name, quantity, user.id));
                    spoken(format!(
                        "Added {} of {} to your pantry",
                        item.quantity, item.name
                    ))
                }
                None => spoken("Please log in to manage your pantry"),
            },
            Command::AssignChore { work, worker } => match self.auth.current_user() {
                Some(user) => {
                    let chore = self.chores.create(Chore::new(
                        work,
                        worker,
                        Local::now().date_naive(),
                        user.id,
                    ));
                    spoken(format!("Assigned {} to {}", chore.work, chore.worker))
                }
                None => spoken("Please log in to assign tasks"),
            },
            Command::ListReminders => match self.auth.current_user() {
                Some(user) => spoken(self.reminder_summary(&user)),
                None => spoken("Please log in to see your reminders"),
            },
            Command::ListPantry => match self.auth.current_user() {
                Some(user) => spoken(self.pantry_summary(&user)),
                None => spoken("Please log in to see your pantry"),
            },
            Command::ListChores => match self.auth.current_user() {
                Some(user) => spoken(self.chore_summary(&user)),
                None => spoken("Please log in to see assigned tasks"),
            },
            Command::Unrecognized { raw } => {
                if raw.starts_with("set reminder") {
                    spoken("I couldn't set that reminder. Please check the date and time format.")
                } else {
                    // Left unspoken so a chat assistant can answer instead.
                    DispatchOutcome {
                        response: format!("I heard you say: {}", raw),
                        announced: false,
                    }
                }
            }
        }
    }

    fn create_reminder(
        &self,
        user: UserIdentity,
        task_name: String,
        date: NaiveDate,
        time: NaiveTime,
        recurrence: hearth_core::types::Recurrence,
    ) -> DispatchOutcome {
        let reminder = self.reminders.create(Reminder::new(
            task_name, date, time, recurrence, user.id,
        ));
        spoken(format!(
            "Reminder set for {} on {} at {}",
            reminder.task_name,
            spoken_date(reminder.date),
            spoken_time(reminder.time)
        ))
    }

    fn reminder_summary(&self, user: &UserIdentity) -> String {
        let reminders = self.reminders.list(user.id);
        if reminders.is_empty() {
            return "You have no reminders set".to_string();
        }
        let names: Vec<String> = reminders
            .iter()
            .map(|reminder| reminder.task_name.clone())
            .collect();
        format!(
            "You have {}: {}",
            count_noun(names.len(), "reminder"),
            summarize(&names)
        )
    }

    fn pantry_summary(&self, user: &UserIdentity) -> String {
        let items = self.pantry.list(user.id);
        if items.is_empty() {
            return "Your pantry is empty".to_string();
        }
        let names: Vec<String> = items
            .iter()
            .map(|item| format!("{} of {}", item.quantity, item.name))
            .collect();
        format!(
            "Your pantry has {}: {}",
            count_noun(names.len(), "item"),
            summarize(&names)
        )
    }

    fn chore_summary(&self, user: &UserIdentity) -> String {
        let chores = self.chores.list(user.id);
        if chores.is_empty() {
            return "No tasks are assigned".to_string();
        }
        let names: Vec<String> = chores
            .iter()
            .map(|chore| format!("{} for {}", chore.work, chore.worker))
            .collect();
        format!(
            "There {} {}: {}",
            if names.len() == 1 { "is" } else { "are" },
            count_noun(names.len(), "task"),
            summarize(&names)
        )
    }
}

fn spoken(response: impl Into<String>) -> DispatchOutcome {
    DispatchOutcome {
        response: response.into(),
        announced: true,
    }
}

fn navigation_response(target: NavTarget) -> &'static str {
    match target {
        NavTarget::Reminders => "Opening reminders page",
        NavTarget::Tasks => "Opening task assignment page",
        NavTarget::Pantry => "Opening pantry management page",
        NavTarget::Assistant => "Opening voice assistant page. What's on your mind today?",
        NavTarget::Home => "Going to the home page",
    }
}

/// Only the first command of an identical burst should run; everything else
/// is side-effect free and safe to repeat.
fn idempotency_key(command: &Command) -> Option<String> {
    match command {
        Command::CreateReminder {
            task_name,
            date,
            time,
            recurrence,
        } => Some(format!(
            "reminder:{}:{}:{}:{}",
            task_name, date, time, recurrence
        )),
        Command::CreatePantryItem { name, quantity } => {
            Some(format!("pantry:{}:{}", name, quantity))
        }
        Command::AssignChore { work, worker } => Some(format!("chore:{}:{}", work, worker)),
        _ => None,
    }
}

fn spoken_date(date: NaiveDate) -> String {
    format!("{} {}", date.format("%B"), date.day())
}

fn spoken_time(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "pm" } else { "am" }
    )
}

fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn summarize(names: &[String]) -> String {
    let shown = names
        .iter()
        .take(LISTING_LIMIT)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > LISTING_LIMIT {
        format!("{}, and {} more", shown, names.len() - LISTING_LIMIT)
    } else {
        shown
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hearth_core::types::Recurrence;
    use hearth_store::auth::LocalAuth;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        navigations: Mutex<Vec<NavTarget>>,
        themes: Mutex<Vec<ThemeMode>>,
        announcements: Mutex<Vec<String>>,
    }

    impl Navigator for Recorder {
        fn go_to(&self, target: NavTarget) {
            self.navigations.lock().unwrap().push(target);
        }
    }

    impl ThemeSink for Recorder {
        fn set_theme(&self, mode: ThemeMode) {
            self.themes.lock().unwrap().push(mode);
        }
    }

    impl Announcer for Recorder {
        fn speak(&self, text: &str) {
            self.announcements.lock().unwrap().push(text.to_string());
        }
    }

    struct Fixture {
        recorder: Arc<Recorder>,
        auth: Arc<LocalAuth>,
        reminders: Arc<ReminderStore>,
        pantry: Arc<PantryStore>,
        chores: Arc<ChoreStore>,
        dispatcher: Dispatcher,
    }

    fn fixture() -> Fixture {
        fixture_with_cooldown(1500)
    }

    fn fixture_with_cooldown(cooldown_ms: u64) -> Fixture {
        let recorder = Arc::new(Recorder::default());
        let auth = Arc::new(LocalAuth::new());
        auth.register("anna", "secret1").unwrap();
        auth.logout();
        let reminders = Arc::new(ReminderStore::new());
        let pantry = Arc::new(PantryStore::new());
        let chores = Arc::new(ChoreStore::new());
        let dispatcher = Dispatcher::new(
            recorder.clone(),
            recorder.clone(),
            recorder.clone(),
            auth.clone(),
            reminders.clone(),
            pantry.clone(),
            chores.clone(),
            &DispatchSettings {
                idempotency_cooldown_ms: cooldown_ms,
            },
        );
        Fixture {
            recorder,
            auth,
            reminders,
            pantry,
            chores,
            dispatcher,
        }
    }

    fn login(fix: &Fixture) {
        fix.auth.login("anna", "secret1").unwrap();
    }

    fn reminder_command(task: &str) -> Command {
        Command::CreateReminder {
            task_name: task.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
            time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            recurrence: Recurrence::Once,
        }
    }

    #[test]
    fn test_navigation_happens_exactly_once() {
        let fix = fixture();
        let outcome = fix
            .dispatcher
            .dispatch(Command::Navigate {
                target: NavTarget::Pantry,
            })
            .unwrap();
        assert_eq!(outcome.response, "Opening pantry management page");
        assert!(outcome.announced);
        assert_eq!(
            *fix.recorder.navigations.lock().unwrap(),
            vec![NavTarget::Pantry]
        );
        assert_eq!(
            *fix.recorder.announcements.lock().unwrap(),
            vec!["Opening pantry management page"]
        );
        assert!(fix.reminders.is_empty());
        assert!(fix.pantry.is_empty());
        assert!(fix.chores.is_empty());
    }

    #[test]
    fn test_assistant_navigation_response() {
        let fix = fixture();
        let outcome = fix
            .dispatcher
            .dispatch(Command::Navigate {
                target: NavTarget::Assistant,
            })
            .unwrap();
        assert_eq!(
            outcome.response,
            "Opening voice assistant page. What's on your mind today?"
        );
    }

    #[test]
    fn test_theme_switch() {
        let fix = fixture();
        let outcome = fix
            .dispatcher
            .dispatch(Command::SetTheme {
                mode: ThemeMode::Dark,
            })
            .unwrap();
        assert_eq!(outcome.response, "Switched to dark mode");
        assert_eq!(*fix.recorder.themes.lock().unwrap(), vec![ThemeMode::Dark]);
    }

    #[test]
    fn test_login_success_and_failure() {
        let fix = fixture();
        let outcome = fix
            .dispatcher
            .dispatch(Command::Login {
                username: "anna".to_string(),
                password: "secret1".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.response, "Welcome back, anna");
        assert!(fix.auth.current_user().is_some());

        let outcome = fix
            .dispatcher
            .dispatch(Command::Login {
                username: "anna".to_string(),
                password: "wrong".to_string(),
            })
            .unwrap();
        assert_eq!(
            outcome.response,
            "I couldn't log you in. Please check your username and password."
        );
    }

    #[test]
    fn test_register_opens_session() {
        let fix = fixture();
        let outcome = fix
            .dispatcher
            .dispatch(Command::Register {
                username: "ben".to_string(),
                password: "secret2".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.response, "Welcome, ben");
        assert_eq!(fix.auth.current_user().unwrap().username, "ben");

        let outcome = fix
            .dispatcher
            .dispatch(Command::Register {
                username: "anna".to_string(),
                password: "other".to_string(),
            })
            .unwrap();
        assert_eq!(
            outcome.response,
            "That username is already taken. Try another one."
        );
    }

    #[test]
    fn test_logout_navigates_home() {
        let fix = fixture();
        login(&fix);
        let outcome = fix.dispatcher.dispatch(Command::Logout).unwrap();
        assert_eq!(outcome.response, "You've been logged out");
        assert_eq!(
            *fix.recorder.navigations.lock().unwrap(),
            vec![NavTarget::Home]
        );

        let outcome = fix.dispatcher.dispatch(Command::Logout).unwrap();
        assert_eq!(outcome.response, "You're not logged in");
    }

    #[test]
    fn test_create_reminder_requires_login() {
        let fix = fixture();
        let outcome = fix.dispatcher.dispatch(reminder_command("laundry")).unwrap();
        assert_eq!(outcome.response, "Please log in to set reminders");
        assert!(fix.reminders.is_empty());
    }

    #[test]
    fn test_create_reminder() {
        let fix = fixture();
        login(&fix);
        let outcome = fix.dispatcher.dispatch(reminder_command("laundry")).unwrap();
        assert_eq!(
            outcome.response,
            "Reminder set for laundry on April 10 at 3:00 pm"
        );
        assert_eq!(fix.reminders.len(), 1);
    }

    #[test]
    fn test_duplicate_creation_suppressed() {
        let fix = fixture();
        login(&fix);
        assert!(fix.dispatcher.dispatch(reminder_command("laundry")).is_some());
        assert!(fix.dispatcher.dispatch(reminder_command("laundry")).is_none());
        assert_eq!(fix.reminders.len(), 1);
        // Only one announcement reached the user.
        assert_eq!(fix.recorder.announcements.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_creation_allowed_after_cooldown() {
        let fix = fixture_with_cooldown(1);
        login(&fix);
        assert!(fix.dispatcher.dispatch(reminder_command("laundry")).is_some());
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(fix.dispatcher.dispatch(reminder_command("laundry")).is_some());
        assert_eq!(fix.reminders.len(), 2);
    }

    #[test]
    fn test_distinct_creations_not_suppressed() {
        let fix = fixture();
        login(&fix);
        assert!(fix.dispatcher.dispatch(reminder_command("laundry")).is_some());
        assert!(fix.dispatcher.dispatch(reminder_command("dishes")).is_some());
        assert_eq!(fix.reminders.len(), 2);
    }

    #[test]
    fn test_create_pantry_item() {
        let fix = fixture();
        login(&fix);
        let outcome = fix
            .dispatcher
            .dispatch(Command::CreatePantryItem {
                name: "rice".to_string(),
                quantity: "5 kilograms".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.response, "Added 5 kilograms of rice to your pantry");
        assert_eq!(fix.pantry.len(), 1);
    }

    #[test]
    fn test_assign_chore() {
        let fix = fixture();
        login(&fix);
        let outcome = fix
            .dispatcher
            .dispatch(Command::AssignChore {
                work: "cooking".to_string(),
                worker: "cook".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.response, "Assigned cooking to cook");
        assert_eq!(fix.chores.len(), 1);
    }

    #[test]
    fn test_list_reminders_empty() {
        let fix = fixture();
        login(&fix);
        let outcome = fix.dispatcher.dispatch(Command::ListReminders).unwrap();
        assert_eq!(outcome.response, "You have no reminders set");
    }

    #[test]
    fn test_list_reminders_summarizes_overflow() {
        let fix = fixture();
        login(&fix);
        for task in ["a", "b", "c", "d", "e"] {
            fix.dispatcher.dispatch(reminder_command(task)).unwrap();
        }
        let outcome = fix.dispatcher.dispatch(Command::ListReminders).unwrap();
        assert_eq!(
            outcome.response,
            "You have 5 reminders: a, b, c, and 2 more"
        );
    }

    #[test]
    fn test_list_pantry() {
        let fix = fixture();
        login(&fix);
        fix.dispatcher
            .dispatch(Command::CreatePantryItem {
                name: "rice".to_string(),
                quantity: "5 kilograms".to_string(),
            })
            .unwrap();
        let outcome = fix.dispatcher.dispatch(Command::ListPantry).unwrap();
        assert_eq!(
            outcome.response,
            "Your pantry has 1 item: 5 kilograms of rice"
        );
    }

    #[test]
    fn test_list_chores() {
        let fix = fixture();
        login(&fix);
        let outcome = fix.dispatcher.dispatch(Command::ListChores).unwrap();
        assert_eq!(outcome.response, "No tasks are assigned");

        fix.dispatcher
            .dispatch(Command::AssignChore {
                work: "cooking".to_string(),
                worker: "cook".to_string(),
            })
            .unwrap();
        let outcome = fix.dispatcher.dispatch(Command::ListChores).unwrap();
        assert_eq!(outcome.response, "There is 1 task: cooking for cook");
    }

    #[test]
    fn test_listing_requires_login() {
        let fix = fixture();
        let outcome = fix.dispatcher.dispatch(Command::ListReminders).unwrap();
        assert_eq!(outcome.response, "Please log in to see your reminders");
    }

    #[test]
    fn test_listing_scoped_to_current_user() {
        let fix = fixture();
        fix.auth.register("ben", "secret2").unwrap();
        login(&fix);
        fix.dispatcher.dispatch(reminder_command("laundry")).unwrap();

        fix.auth.login("ben", "secret2").unwrap();
        let outcome = fix.dispatcher.dispatch(Command::ListReminders).unwrap();
        assert_eq!(outcome.response, "You have no reminders set");
    }

    #[test]
    fn test_unrecognized_reminder_shaped() {
        let fix = fixture();
        let outcome = fix
            .dispatcher
            .dispatch(Command::Unrecognized {
                raw: "set reminder for stuff on someday, type once".to_string(),
            })
            .unwrap();
        assert_eq!(
            outcome.response,
            "I couldn't set that reminder. Please check the date and time format."
        );
        assert!(outcome.announced);
    }

    #[test]
    fn test_unrecognized_echoes_without_speaking() {
        let fix = fixture();
        let outcome = fix
            .dispatcher
            .dispatch(Command::Unrecognized {
                raw: "tell me a joke".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.response, "I heard you say: tell me a joke");
        assert!(!outcome.announced);
        assert!(fix.recorder.announcements.lock().unwrap().is_empty());
    }
}
