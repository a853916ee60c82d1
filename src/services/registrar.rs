//! Push registrar
//!
//! Obtains a device push token, prompting for permission when the
//! current status allows it, and makes sure the default delivery
//! channel exists. Every failure path degrades to `None` so callers can
//! fall back to local-only reminders.

use crate::notifications::{ChannelConfig, Notifier, PermissionStatus, PushToken};
use std::sync::Arc;

/// Registers the device for push delivery
pub struct PushRegistrar {
    notifier: Arc<dyn Notifier>,
}

impl PushRegistrar {
    /// Create a registrar over the given notifier
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Request permission if needed and return the push token, or
    /// `None` if permission is missing or any step fails
    pub async fn register_for_push_notifications(&self) -> Option<PushToken> {
        let mut status = match self.notifier.permissions().await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("Error getting push token: {}", e);
                return None;
            }
        };

        if status != PermissionStatus::Granted {
            status = match self.notifier.request_permissions().await {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!("Error getting push token: {}", e);
                    return None;
                }
            };
        }

        if status != PermissionStatus::Granted {
            tracing::warn!("Push permission not granted");
            return None;
        }

        let token = match self.notifier.push_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("Error getting push token: {}", e);
                return None;
            }
        };

        if let Err(e) = self
            .notifier
            .ensure_channel(ChannelConfig::default_channel())
            .await
        {
            tracing::error!("Error configuring delivery channel: {}", e);
        }

        tracing::info!("Registered for push notifications");

        Some(token)
    }
}
