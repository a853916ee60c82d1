//! Services module
//!
//! Reminder scheduling and push registration on top of the notifier
//! seam.

pub mod registrar;
pub mod scheduler;

pub use registrar::PushRegistrar;
pub use scheduler::{next_occurrence, ReminderScheduler};
