//! Polls the reminder store and runs the notification lifecycle.
//!
//! Each due reminder moves Idle -> Notifying exactly once per due minute; a
//! snooze returns it to Idle and re-presents after the snooze delay, and a
//! prompt nobody touches counts as a snooze.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use tokio::sync::Notify;
use uuid::Uuid;

use hearth_core::config::SchedulerSettings;
use hearth_core::types::{Recurrence, Reminder};
use hearth_store::store::ReminderStore;

/// What the user did with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// Mark the reminder done.
    Complete,
    /// Ask again after the snooze delay.
    Snooze,
}

/// Presents one reminder notification and resolves with the user's choice.
///
/// Implementations block (asynchronously) until the user acts; the scheduler
/// applies its own timeout around the call.
#[async_trait]
pub trait ReminderPrompter: Send + Sync {
    async fn present(&self, reminder: &Reminder) -> PromptAction;
}

/// Drives due-reminder notifications off a polling loop.
///
/// Cheap to clone; clones share all state, so one instance can run the poll
/// loop while another triggers shutdown.
#[derive(Clone)]
pub struct ReminderScheduler {
    store: Arc<ReminderStore>,
    prompter: Arc<dyn ReminderPrompter>,
    notifying: Arc<Mutex<HashSet<Uuid>>>,
    shutdown: Arc<Notify>,
    shutting_down: Arc<AtomicBool>,
    poll_interval: Duration,
    snooze_delay: Duration,
    prompt_timeout: Duration,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<ReminderStore>,
        prompter: Arc<dyn ReminderPrompter>,
        settings: &SchedulerSettings,
    ) -> Self {
        Self {
            store,
            prompter,
            notifying: Arc::new(Mutex::new(HashSet::new())),
            shutdown: Arc::new(Notify::new()),
            shutting_down: Arc::new(AtomicBool::new(false)),
            poll_interval: Duration::from_secs(settings.poll_interval_secs),
            snooze_delay: Duration::from_secs(settings.snooze_delay_secs),
            prompt_timeout: Duration::from_secs(settings.prompt_timeout_secs),
        }
    }

    /// Run the poll loop until [`ReminderScheduler::shutdown`] is called.
    /// Checks immediately on startup, then once per poll interval.
    pub async fn run(&self) {
        tracing::info!(
            "Reminder scheduler started (poll every {:?})",
            self.poll_interval
        );
        self.check_due(Local::now().naive_local());
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {
                    self.check_due(Local::now().naive_local());
                }
                _ = self.shutdown.notified() => break,
            }
        }
        tracing::info!("Reminder scheduler stopped");
    }

    /// Stop the poll loop and tell snoozed notification tasks to wind down.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    /// Whether a notification for `id` is currently active or snoozed.
    pub fn is_notifying(&self, id: Uuid) -> bool {
        self.notifying.lock().expect("notifying mutex poisoned").contains(&id)
    }

    /// Scan the store and start a notification cycle for every reminder due
    /// at `now` that is not already being notified.
    pub fn check_due(&self, now: NaiveDateTime) {
        for reminder in self.store.snapshot() {
            if reminder.is_due_at(now.date(), now.time()) && self.claim(reminder.id) {
                tracing::info!("Reminder due: {}", reminder.task_name);
                let scheduler = self.clone();
                let id = reminder.id;
                tokio::spawn(async move {
                    scheduler.prompt_cycle(id).await;
                });
            }
        }
    }

    async fn prompt_cycle(&self, id: Uuid) {
        loop {
            let reminder = match self.store.get(id) {
                Some(reminder) if !reminder.completed => reminder,
                // Deleted or completed elsewhere while we held the claim.
                _ => {
                    self.release(id);
                    return;
                }
            };

            let action =
                match tokio::time::timeout(self.prompt_timeout, self.prompter.present(&reminder))
                    .await
                {
                    Ok(action) => action,
                    // Nobody touched the prompt.
                    Err(_) => PromptAction::Snooze,
                };

            match action {
                PromptAction::Complete => {
                    if reminder.recurrence == Recurrence::Once {
                        if let Err(e) = self.store.update(id, |reminder| reminder.completed = true)
                        {
                            tracing::warn!("Failed to complete reminder {}: {}", id, e);
                        }
                    }
                    self.release(id);
                    return;
                }
                PromptAction::Snooze => {
                    // Idle during the snooze window; the poll loop may start
                    // a fresh cycle if the reminder comes due again.
                    self.release(id);
                    tokio::time::sleep(self.snooze_delay).await;
                    if self.shutting_down.load(Ordering::SeqCst) {
                        return;
                    }
                    if !self.claim(id) {
                        return;
                    }
                }
            }
        }
    }

    fn claim(&self, id: Uuid) -> bool {
        self.notifying.lock().expect("notifying mutex poisoned").insert(id)
    }

    fn release(&self, id: Uuid) {
        self.notifying.lock().expect("notifying mutex poisoned").remove(&id);
    }
}

// =============================================================================
// Tests
// =============================================================================
