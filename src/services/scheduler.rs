//! Reminder scheduler
//!
//! Turns a plant's configured watering times into daily repeating
//! triggers on the notifier, and cancels them by matching the plant id
//! carried in each trigger's payload. By default only the first
//! configured time is scheduled per plant; `schedule_all_times` opts
//! into one trigger per time.

use crate::config;
use crate::error::Result;
use crate::notifications::{DailyTrigger, NotificationContent, Notifier, TriggerId, TriggerPayload};
use crate::records::{parse_time, Plant};
use chrono::{DateTime, Duration, Local, Timelike};
use std::sync::Arc;

/// Schedules and cancels watering reminders for plants
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    schedule_all_times: bool,
}

impl ReminderScheduler {
    /// Create a scheduler that registers one trigger per plant (the
    /// first configured time)
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            schedule_all_times: false,
        }
    }

    /// Whether to register a trigger for every configured time instead
    /// of just the first
    pub fn schedule_all_times(mut self, enabled: bool) -> Self {
        self.schedule_all_times = enabled;
        self
    }

    /// Schedule daily reminders for a plant.
    ///
    /// Returns the first trigger id on success, or `None` when the
    /// plant has reminders disabled, has no times, or scheduling
    /// failed. Failures are logged, never raised.
    pub async fn schedule_watering_reminder(&self, plant: &Plant) -> Option<TriggerId> {
        if !plant.reminder {
            return None;
        }

        let mut first_id = None;

        for time in &plant.times {
            let (hour, minute) = match parse_time(time) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::error!("Error scheduling reminder for {}: {}", plant.name, e);
                    break;
                }
            };

            let next = next_occurrence(Local::now(), hour, minute);
            tracing::debug!(
                flower_id = %plant.id,
                "Next reminder for {} at {}",
                plant.name,
                next.format("%Y-%m-%d %H:%M")
            );

            let content = NotificationContent {
                title: config::REMINDER_TITLE.to_string(),
                body: format!("Time to water {} ({})", plant.name, plant.dosage),
                payload: TriggerPayload {
                    flower_id: plant.id.clone(),
                },
            };

            let id = match self
                .notifier
                .schedule(content, DailyTrigger { hour, minute })
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    tracing::error!("Error scheduling reminder for {}: {}", plant.name, e);
                    break;
                }
            };

            if first_id.is_none() {
                first_id = Some(id);
            }

            if !self.schedule_all_times {
                break;
            }
        }

        first_id
    }

    /// Cancel every scheduled reminder whose payload matches the plant.
    /// Failures are logged, never raised.
    pub async fn cancel_watering_reminders(&self, flower_id: &str) {
        let scheduled = match self.notifier.scheduled().await {
            Ok(scheduled) => scheduled,
            Err(e) => {
                tracing::error!("Error canceling reminders for {}: {}", flower_id, e);
                return;
            }
        };

        for trigger in scheduled {
            if trigger.content.payload.flower_id != flower_id {
                continue;
            }

            if let Err(e) = self.notifier.cancel(&trigger.id).await {
                tracing::error!("Error canceling reminder {}: {}", trigger.id, e);
            }
        }
    }

    /// Replace a plant's reminders with ones matching its current
    /// configuration
    pub async fn update_watering_reminders(&self, plant: &Plant) {
        self.cancel_watering_reminders(&plant.id).await;
        let _ = self.schedule_watering_reminder(plant).await;
    }
}

/// The next instant at or after `now` that falls on the given
/// wall-clock time, today or tomorrow
pub fn next_occurrence(now: DateTime<Local>, hour: u32, minute: u32) -> DateTime<Local> {
    let candidate = now
        .with_hour(hour)
        .and_then(|t| t.with_minute(minute))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    if candidate < now {
        candidate + Duration::days(1)
    } else {
        candidate
    }
}
