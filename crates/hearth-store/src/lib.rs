//! In-memory stores and local authentication for Hearth.

pub mod auth;
pub mod store;

pub use auth::{AuthError, AuthService, LocalAuth};
pub use store::{
    ChangeEvent, ChangeKind, ChoreStore, Entity, PantryStore, ReminderStore, Store, StoreError,
};
