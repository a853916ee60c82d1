//! Application configuration constants
//!
//! Central location for storage keys, scheduling sentinels, and the
//! default notification channel settings.

// ===== Storage Keys =====

/// Storage key holding the JSON array of plants
pub const PLANTS_KEY: &str = "plants";

/// Storage key holding the JSON array of dose events
pub const DOSE_HISTORY_KEY: &str = "dose_history";

// ===== Scheduling =====

/// Duration value meaning the watering schedule has no end date
pub const ONGOING_DURATION: i64 = -1;

/// Title used for every watering reminder notification
pub const REMINDER_TITLE: &str = "Watering reminder";

// ===== Notification Channel =====

/// Identifier of the channel watering reminders are delivered on
pub const DEFAULT_CHANNEL_ID: &str = "default";

/// Vibration pattern for the default channel, alternating pause/vibrate
/// milliseconds
pub const DEFAULT_VIBRATION_PATTERN: [u32; 4] = [0, 250, 250, 250];

/// Notification LED color for the default channel
pub const DEFAULT_LIGHT_COLOR: &str = "#1A8E2D";
