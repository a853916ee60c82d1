// Floradose - plant watering reminder daemon
// Entry point and runtime setup

use anyhow::Context;
use floradose::notifications::{CronNotifier, Notifier, PresentationConfig};
use floradose::records::RecordStore;
use floradose::services::{PushRegistrar, ReminderScheduler};
use floradose::storage::FileKvStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "floradose=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Floradose");

    let data_dir = std::env::var("FLORADOSE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    let kv = Arc::new(FileKvStore::new(data_dir));
    kv.initialize()
        .await
        .context("Failed to initialize key-value store")?;

    let store = RecordStore::new(kv);

    let notifier = Arc::new(
        CronNotifier::new()
            .await
            .context("Failed to create notifier")?,
    );
    notifier.start().await.context("Failed to start notifier")?;
    notifier
        .initialize(PresentationConfig::default())
        .await
        .context("Failed to initialize notifier")?;

    let registrar = PushRegistrar::new(notifier.clone());
    if registrar.register_for_push_notifications().await.is_none() {
        tracing::warn!("Push notifications unavailable, using local delivery only");
    }

    let scheduler = ReminderScheduler::new(notifier.clone());

    let plants = store.get_plants().await;
    tracing::info!("Scheduling reminders for {} plants", plants.len());
    for plant in &plants {
        let _ = scheduler.schedule_watering_reminder(plant).await;
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Shutting down");
    notifier.shutdown().await.context("Failed to shut down")?;

    Ok(())
}
