//! Command dispatch: side effects and spoken responses.

pub mod collaborators;
pub mod dispatcher;
pub mod guard;

pub use collaborators::{Announcer, Navigator, ThemeSink};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use guard::IdempotencyGuard;
