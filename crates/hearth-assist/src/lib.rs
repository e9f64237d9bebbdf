//! Canned-response chat assistant.
//!
//! Answers small talk and household questions that are not commands. Replies
//! come from keyword-matched response pools, with a random pick per reply so
//! repeated questions do not sound robotic.

use rand::seq::SliceRandom;

/// One keyword group and its response pool.
struct ResponseGroup {
    keywords: &'static [&'static str],
    replies: &'static [&'static str],
}

/// Groups are checked in order; the first keyword hit wins.
const GROUPS: &[ResponseGroup] = &[
    ResponseGroup {
        keywords: &["recipe", "cook", "bake", "food", "meal", "dinner", "lunch", "breakfast"],
        replies: &[
            "For a quick meal, check what's in your pantry first. Say \"what's in my pantry\" and I can help you plan around it.",
            "How about something simple tonight? A stir fry works with almost anything you have on hand.",
            "If you're baking, remember to preheat the oven before you start mixing.",
        ],
    },
    ResponseGroup {
        keywords: &["busy", "time", "schedule", "organize", "organise", "planning", "overwhelmed"],
        replies: &[
            "When things pile up, start with the smallest task. Say \"assign\" to hand chores out, and I'll track who does what.",
            "Try setting reminders for the things you keep forgetting. Just say \"set reminder for\" followed by the task.",
            "One thing at a time. Want me to read back what's already on your plate?",
        ],
    },
    ResponseGroup {
        keywords: &["hello", "hi ", "hey", "good morning", "good evening"],
        replies: &[
            "Hello! How can I help around the house today?",
            "Hi there! Ask me about meals, chores, or reminders.",
            "Hey! What can I do for you?",
        ],
    },
    ResponseGroup {
        keywords: &["thank", "thanks"],
        replies: &[
            "You're welcome!",
            "Anytime. That's what I'm here for.",
            "Happy to help!",
        ],
    },
    ResponseGroup {
        keywords: &["bye", "goodbye", "good night"],
        replies: &[
            "Goodbye! I'll keep an eye on your reminders.",
            "See you later!",
            "Good night! Rest well.",
        ],
    },
];

const FALLBACK: &[&str] = &[
    "I'm not sure about that one. I'm best with meals, chores, and reminders.",
    "Hmm, that's outside my kitchen. Ask me about your pantry, tasks, or reminders.",
    "I didn't quite follow. Try asking about cooking, chores, or your schedule.",
];

/// Keyword-matched canned responder.
#[derive(Default)]
pub struct Assistant;

impl Assistant {
    pub fn new() -> Self {
        Self
    }

    /// Produce a reply for a free-form message.
    pub fn reply(&self, message: &str) -> String {
        let message = message.to_lowercase();
        let pool = GROUPS
            .iter()
            .find(|group| group.keywords.iter().any(|kw| message.contains(kw)))
            .map(|group| group.replies)
            .unwrap_or(FALLBACK);
        let reply = pool
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FALLBACK[0]);
        tracing::debug!("Assistant replying to {:?}", message);
        reply.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
