//! Intent classification for settled voice utterances.
//!
//! Turns normalized transcript text into structured [`Command`]s via an
//! ordered set of regex rules, with spoken date and time parsing for
//! reminder phrases.

pub mod classifier;
pub mod command;
pub mod datetime;

pub use classifier::Classifier;
pub use command::{Command, NavTarget};
pub use datetime::{parse_spoken_date, parse_spoken_time};
