//! Cron-backed notifier
//!
//! Schedules daily reminder jobs with `tokio-cron-scheduler` and emits
//! each firing as a structured log event. Trigger bookkeeping is
//! delegated to an inner [`MemoryNotifier`] so enumeration and
//! cancellation see exactly what the cron scheduler is running.

use crate::error::{AppError, Result};
use crate::notifications::{
    ChannelConfig, DailyTrigger, MemoryNotifier, NotificationContent, Notifier, PermissionStatus,
    PresentationConfig, PushToken, ScheduledTrigger, TriggerId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// Notifier that delivers reminders from an in-process cron scheduler
pub struct CronNotifier {
    registry: MemoryNotifier,
    scheduler: Arc<RwLock<JobScheduler>>,
    jobs: Arc<Mutex<HashMap<TriggerId, Uuid>>>,
    presentation: Arc<Mutex<PresentationConfig>>,
}

impl CronNotifier {
    /// Create the notifier and its underlying job scheduler
    pub async fn new() -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Notification(format!("failed to create scheduler: {}", e)))?;

        Ok(Self {
            registry: MemoryNotifier::new(),
            scheduler: Arc::new(RwLock::new(scheduler)),
            jobs: Arc::new(Mutex::new(HashMap::new())),
            presentation: Arc::new(Mutex::new(PresentationConfig::default())),
        })
    }

    /// Start running scheduled jobs
    pub async fn start(&self) -> Result<()> {
        self.scheduler
            .read()
            .await
            .start()
            .await
            .map_err(|e| AppError::Notification(format!("failed to start scheduler: {}", e)))?;

        tracing::info!("Reminder scheduler started");
        Ok(())
    }

    /// Stop the scheduler and drop all pending jobs
    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.scheduler.write().await;
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::Notification(format!("failed to shut down scheduler: {}", e)))?;

        tracing::info!("Reminder scheduler stopped");
        Ok(())
    }
}

#[async_trait]
impl Notifier for CronNotifier {
    async fn initialize(&self, presentation: PresentationConfig) -> Result<()> {
        *self.presentation.lock().await = presentation;
        self.registry.initialize(presentation).await
    }

    async fn permissions(&self) -> Result<PermissionStatus> {
        self.registry.permissions().await
    }

    async fn request_permissions(&self) -> Result<PermissionStatus> {
        self.registry.request_permissions().await
    }

    async fn push_token(&self) -> Result<PushToken> {
        self.registry.push_token().await
    }

    async fn ensure_channel(&self, channel: ChannelConfig) -> Result<()> {
        tracing::debug!(
            channel = %channel.id,
            importance = ?channel.importance,
            "Ensuring delivery channel"
        );
        self.registry.ensure_channel(channel).await
    }

    async fn schedule(
        &self,
        content: NotificationContent,
        trigger: DailyTrigger,
    ) -> Result<TriggerId> {
        let id = self.registry.schedule(content.clone(), trigger).await?;

        let cron_expr = format!("0 {} {} * * *", trigger.minute, trigger.hour);
        let presentation = self.presentation.clone();

        let job = Job::new_async(cron_expr.as_str(), move |_uuid, _lock| {
            let content = content.clone();
            let presentation = presentation.clone();
            Box::pin(async move {
                let presentation = *presentation.lock().await;
                if !presentation.show_alert {
                    return;
                }
                tracing::info!(
                    flower_id = %content.payload.flower_id,
                    sound = presentation.play_sound,
                    badge = presentation.set_badge,
                    "{}: {}",
                    content.title,
                    content.body
                );
            })
        })
        .map_err(|e| AppError::Notification(format!("invalid trigger: {}", e)))?;

        let job_id = job.guid();

        if let Err(e) = self.scheduler.read().await.add(job).await {
            let _ = self.registry.cancel(&id).await;
            return Err(AppError::Notification(format!(
                "failed to add reminder job: {}",
                e
            )));
        }

        self.jobs.lock().await.insert(id.clone(), job_id);

        tracing::debug!(
            trigger_id = %id,
            cron = %cron_expr,
            "Scheduled daily reminder job"
        );

        Ok(id)
    }

    async fn scheduled(&self) -> Result<Vec<ScheduledTrigger>> {
        self.registry.scheduled().await
    }

    async fn cancel(&self, id: &TriggerId) -> Result<()> {
        self.registry.cancel(id).await?;

        if let Some(job_id) = self.jobs.lock().await.remove(id) {
            self.scheduler
                .read()
                .await
                .remove(&job_id)
                .await
                .map_err(|e| {
                    AppError::Notification(format!("failed to remove reminder job: {}", e))
                })?;

            tracing::debug!(trigger_id = %id, "Cancelled reminder job");
        }

        Ok(())
    }
}
