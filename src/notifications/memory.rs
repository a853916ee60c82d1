//! In-memory notifier
//!
//! Keeps scheduled triggers in a mutex-guarded list and answers
//! permission checks from a configurable script. Used as the trigger
//! registry inside the cron notifier and as the notifier in tests.

use crate::error::{AppError, Result};
use crate::notifications::{
    ChannelConfig, DailyTrigger, NotificationContent, Notifier, PermissionStatus,
    PresentationConfig, PushToken, ScheduledTrigger, TriggerId,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// How the notifier answers permission checks and requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionScript {
    /// Permission is already granted
    AlwaysGranted,
    /// Undetermined until requested, then granted
    GrantOnRequest,
    /// Undetermined until requested, then denied
    DenyOnRequest,
}

#[derive(Default)]
struct Inner {
    presentation: Option<PresentationConfig>,
    permission: Option<PermissionStatus>,
    channels: Vec<ChannelConfig>,
    triggers: Vec<ScheduledTrigger>,
}

/// Notifier that records everything in memory
#[derive(Clone)]
pub struct MemoryNotifier {
    script: PermissionScript,
    inner: Arc<Mutex<Inner>>,
}

impl MemoryNotifier {
    /// Create a notifier with permissions already granted
    pub fn new() -> Self {
        Self::with_permissions(PermissionScript::AlwaysGranted)
    }

    /// Create a notifier with the given permission script
    pub fn with_permissions(script: PermissionScript) -> Self {
        Self {
            script,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Channels registered so far
    pub async fn channels(&self) -> Vec<ChannelConfig> {
        self.inner.lock().await.channels.clone()
    }

    /// Presentation settings applied by `initialize`, if any
    pub async fn presentation(&self) -> Option<PresentationConfig> {
        self.inner.lock().await.presentation
    }
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn initialize(&self, presentation: PresentationConfig) -> Result<()> {
        self.inner.lock().await.presentation = Some(presentation);
        Ok(())
    }

    async fn permissions(&self) -> Result<PermissionStatus> {
        let inner = self.inner.lock().await;
        if let Some(status) = inner.permission {
            return Ok(status);
        }

        Ok(match self.script {
            PermissionScript::AlwaysGranted => PermissionStatus::Granted,
            PermissionScript::GrantOnRequest | PermissionScript::DenyOnRequest => {
                PermissionStatus::Undetermined
            }
        })
    }

    async fn request_permissions(&self) -> Result<PermissionStatus> {
        let status = match self.script {
            PermissionScript::AlwaysGranted | PermissionScript::GrantOnRequest => {
                PermissionStatus::Granted
            }
            PermissionScript::DenyOnRequest => PermissionStatus::Denied,
        };

        self.inner.lock().await.permission = Some(status);
        Ok(status)
    }

    async fn push_token(&self) -> Result<PushToken> {
        if self.permissions().await? != PermissionStatus::Granted {
            return Err(AppError::Notification(
                "push token requested without granted permission".to_string(),
            ));
        }

        Ok(PushToken(format!("push-{}", Uuid::new_v4())))
    }

    async fn ensure_channel(&self, channel: ChannelConfig) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.channels.retain(|c| c.id != channel.id);
        inner.channels.push(channel);
        Ok(())
    }

    async fn schedule(
        &self,
        content: NotificationContent,
        trigger: DailyTrigger,
    ) -> Result<TriggerId> {
        let id = TriggerId(Uuid::new_v4().to_string());

        self.inner.lock().await.triggers.push(ScheduledTrigger {
            id: id.clone(),
            content,
            trigger,
        });

        Ok(id)
    }

    async fn scheduled(&self) -> Result<Vec<ScheduledTrigger>> {
        Ok(self.inner.lock().await.triggers.clone())
    }

    async fn cancel(&self, id: &TriggerId) -> Result<()> {
        self.inner.lock().await.triggers.retain(|t| &t.id != id);
        Ok(())
    }
}
