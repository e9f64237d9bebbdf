//! Duplicate suppression for creation commands.
//!
//! Recognition engines occasionally deliver the same final transcript twice
//! in quick succession, which would otherwise create two reminders from one
//! sentence. The guard tracks a key per creation command: while the command
//! is in flight, or within a cooldown window after it completed, repeats of
//! the same key are rejected.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
enum GuardState {
    InFlight,
    Cooling(Instant),
}

/// Tracks recently executed command keys.
pub struct IdempotencyGuard {
    entries: Mutex<HashMap<String, GuardState>>,
    cooldown: Duration,
}

impl IdempotencyGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            cooldown,
        }
    }

    /// Try to claim `key`. Returns false while an identical command is in
    /// flight or still cooling down.
    pub fn acquire(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().expect("guard mutex poisoned");
        let now = Instant::now();
        entries.retain(|_, state| match state {
            GuardState::InFlight => true,
            GuardState::Cooling(since) => now.duration_since(*since) < self.cooldown,
        });

        match entries.get(key) {
            Some(GuardState::InFlight) => false,
            Some(GuardState::Cooling(_)) => false,
            None => {
                entries.insert(key.to_string(), GuardState::InFlight);
                true
            }
        }
    }

    /// Mark `key` complete, starting its cooldown window.
    pub fn release(&self, key: &str) {
        let mut entries = self.entries.lock().expect("guard mutex poisoned");
        entries.insert(key.to_string(), GuardState::Cooling(Instant::now()));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_then_duplicate_rejected() {
        let guard = IdempotencyGuard::new(Duration::from_secs(60));
        assert!(guard.acquire("reminder:laundry"));
        assert!(!guard.acquire("reminder:laundry"));
    }

    #[test]
    fn test_distinct_keys_independent() {
        let guard = IdempotencyGuard::new(Duration::from_secs(60));
        assert!(guard.acquire("reminder:laundry"));
        assert!(guard.acquire("pantry:rice"));
    }

    #[test]
    fn test_release_starts_cooldown() {
        let guard = IdempotencyGuard::new(Duration::from_secs(60));
        assert!(guard.acquire("reminder:laundry"));
        guard.release("reminder:laundry");
        assert!(!guard.acquire("reminder:laundry"));
    }

    #[test]
    fn test_reacquire_after_cooldown() {
        let guard = IdempotencyGuard::new(Duration::from_millis(1));
        assert!(guard.acquire("reminder:laundry"));
        guard.release("reminder:laundry");
        std::thread::sleep(Duration::from_millis(10));
        assert!(guard.acquire("reminder:laundry"));
    }

    #[test]
    fn test_expired_entries_purged() {
        let guard = IdempotencyGuard::new(Duration::from_millis(1));
        assert!(guard.acquire("a"));
        guard.release("a");
        std::thread::sleep(Duration::from_millis(10));
        // Touching another key sweeps the expired entry out.
        assert!(guard.acquire("b"));
        assert!(guard.entries.lock().unwrap().get("a").is_none());
    }
}
