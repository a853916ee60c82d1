//! Notifications module
//!
//! The notification seam: trigger and content types plus the
//! [`Notifier`] trait the scheduler and registrar talk to. Two
//! implementations live here, a cron-backed notifier for the daemon and
//! an in-memory one for tests.

pub mod cron;
pub mod memory;

pub use cron::CronNotifier;
pub use memory::{MemoryNotifier, PermissionScript};

use crate::config;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque identifier for a scheduled trigger
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerId(pub String);

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload attached to a watering reminder, linking it back to its
/// plant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPayload {
    pub flower_id: String,
}

/// What a fired reminder shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub payload: TriggerPayload,
}

/// A trigger that repeats every day at a fixed wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    pub hour: u32,
    pub minute: u32,
}

/// A scheduled trigger as reported back by a notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTrigger {
    pub id: TriggerId,
    pub content: NotificationContent,
    pub trigger: DailyTrigger,
}

/// Notification permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Opaque device push token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushToken(pub String);

/// How notifications present while the app is foregrounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationConfig {
    pub show_alert: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: true,
            set_badge: true,
        }
    }
}

/// Delivery channel importance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelImportance {
    Default,
    High,
    Max,
}

/// A named delivery channel with its presentation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub importance: ChannelImportance,
    pub vibration_pattern: Vec<u32>,
    pub light_color: String,
}

impl ChannelConfig {
    /// The default watering-reminder channel
    pub fn default_channel() -> Self {
        Self {
            id: config::DEFAULT_CHANNEL_ID.to_string(),
            name: config::DEFAULT_CHANNEL_ID.to_string(),
            importance: ChannelImportance::Max,
            vibration_pattern: config::DEFAULT_VIBRATION_PATTERN.to_vec(),
            light_color: config::DEFAULT_LIGHT_COLOR.to_string(),
        }
    }
}

/// Delivery backend for watering reminders
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Apply foreground presentation settings
    async fn initialize(&self, presentation: PresentationConfig) -> Result<()>;

    /// Current permission status without prompting
    async fn permissions(&self) -> Result<PermissionStatus>;

    /// Prompt for permission and return the resulting status
    async fn request_permissions(&self) -> Result<PermissionStatus>;

    /// Device push token; errors if permission has not been granted
    async fn push_token(&self) -> Result<PushToken>;

    /// Create or update a delivery channel
    async fn ensure_channel(&self, channel: ChannelConfig) -> Result<()>;

    /// Schedule a daily repeating trigger and return its id
    async fn schedule(
        &self,
        content: NotificationContent,
        trigger: DailyTrigger,
    ) -> Result<TriggerId>;

    /// Enumerate all currently scheduled triggers
    async fn scheduled(&self) -> Result<Vec<ScheduledTrigger>>;

    /// Cancel a scheduled trigger. Unknown ids are not an error.
    async fn cancel(&self, id: &TriggerId) -> Result<()>;
}
