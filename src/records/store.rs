//! Record store
//!
//! Owns the two persisted collections (plants and dose history) on top
//! of the key-value store. Reads are fail-open: a missing or corrupt
//! document yields an empty collection rather than an error. Writes are
//! fail-closed and serialized through a single writer lock so that
//! concurrent read-modify-write cycles cannot drop each other's
//! records.

use crate::config;
use crate::error::Result;
use crate::records::models::{DoseEvent, Plant};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Local, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Store for plants and their dose history
#[derive(Clone)]
pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    /// Create a new record store backed by the given key-value store
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get all plants. Returns an empty list if nothing has been stored
    /// yet or the stored document cannot be read.
    pub async fn get_plants(&self) -> Vec<Plant> {
        self.read_collection(config::PLANTS_KEY).await
    }

    /// Add a plant to the stored collection
    pub async fn add_plant(&self, plant: Plant) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut plants = self.read_collection::<Plant>(config::PLANTS_KEY).await;
        plants.push(plant);
        self.write_collection(config::PLANTS_KEY, &plants).await?;

        tracing::info!("Added plant ({} total)", plants.len());

        Ok(())
    }

    /// Get the full dose history, oldest first
    pub async fn get_dose_history(&self) -> Vec<DoseEvent> {
        self.read_collection(config::DOSE_HISTORY_KEY).await
    }

    /// Get doses recorded today (local time)
    pub async fn get_todays_doses(&self) -> Vec<DoseEvent> {
        let today = Local::now().date_naive();

        self.get_dose_history()
            .await
            .into_iter()
            .filter(|dose| dose.timestamp.with_timezone(&Local).date_naive() == today)
            .collect()
    }

    /// Record a dose (watered or skipped) for a plant and return the
    /// stored event
    pub async fn record_dose(
        &self,
        flower_id: &str,
        watered: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<DoseEvent> {
        let _guard = self.write_lock.lock().await;

        let event = DoseEvent::new(flower_id, watered, timestamp);

        let mut history = self
            .read_collection::<DoseEvent>(config::DOSE_HISTORY_KEY)
            .await;
        history.push(event.clone());
        self.write_collection(config::DOSE_HISTORY_KEY, &history)
            .await?;

        tracing::info!(
            flower_id = %flower_id,
            watered = watered,
            "Recorded dose event: {}",
            event.id
        );

        Ok(event)
    }

    /// Remove both collections entirely
    pub async fn clear_all_data(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.kv
            .remove_many(&[config::PLANTS_KEY, config::DOSE_HISTORY_KEY])
            .await?;

        tracing::info!("Cleared all stored records");

        Ok(())
    }

    async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.kv.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Failed to read collection '{}': {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("Failed to parse collection '{}': {}", key, e);
                Vec::new()
            }
        }
    }

    async fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.kv.set(key, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::records::models::{CreatePlantRequest, PlantDuration};
    use crate::storage::FileKvStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_plant(name: &str) -> Plant {
        Plant::create(CreatePlantRequest {
            name: name.to_string(),
            dosage: "250ml".to_string(),
            times: vec!["09:00".to_string()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration: PlantDuration::Days(30),
            color: "#1A8E2D".to_string(),
            reminder: true,
            current_supply: 10,
            total_supply: 10,
            refill_at: 2,
            refill_reminder: false,
        })
        .unwrap()
    }

    async fn create_test_store() -> (RecordStore, Arc<FileKvStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let kv = Arc::new(FileKvStore::new(temp_dir.path().join("store")));
        kv.initialize().await.unwrap();
        (RecordStore::new(kv.clone()), kv, temp_dir)
    }

    #[tokio::test]
    async fn test_add_and_get_plants() {
        let (store, _kv, _temp) = create_test_store().await;

        let plant = test_plant("Monstera");
        store.add_plant(plant.clone()).await.unwrap();

        let plants = store.get_plants().await;
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0], plant);

        store.add_plant(test_plant("Fern")).await.unwrap();
        assert_eq!(store.get_plants().await.len(), 2);
    }

    #[tokio::test]
    async fn test_reads_are_idempotent() {
        let (store, _kv, _temp) = create_test_store().await;

        store.add_plant(test_plant("Monstera")).await.unwrap();

        let first = store.get_plants().await;
        let second = store.get_plants().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_store_reads_empty() {
        let (store, _kv, _temp) = create_test_store().await;

        assert!(store.get_plants().await.is_empty());
        assert!(store.get_dose_history().await.is_empty());
        assert!(store.get_todays_doses().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_dose_appends() {
        let (store, _kv, _temp) = create_test_store().await;

        let first = store.record_dose("p1", true, Utc::now()).await.unwrap();
        let second = store.record_dose("p1", false, Utc::now()).await.unwrap();
        assert_ne!(first.id, second.id);

        let history = store.get_dose_history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], first);
        assert_eq!(history[1], second);
    }

    #[tokio::test]
    async fn test_todays_doses_filters_by_local_date() {
        let (store, _kv, _temp) = create_test_store().await;

        store.record_dose("p1", true, Utc::now()).await.unwrap();
        store
            .record_dose("p2", true, Utc::now() - chrono::Duration::days(2))
            .await
            .unwrap();

        let today = store.get_todays_doses().await;
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].flower_id, "p1");
    }

    #[tokio::test]
    async fn test_clear_all_data() {
        let (store, _kv, _temp) = create_test_store().await;

        store.add_plant(test_plant("Monstera")).await.unwrap();
        store.record_dose("p1", true, Utc::now()).await.unwrap();

        store.clear_all_data().await.unwrap();

        assert!(store.get_plants().await.is_empty());
        assert!(store.get_dose_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_reads_empty() {
        let (store, kv, _temp) = create_test_store().await;

        kv.set(config::PLANTS_KEY, "definitely not json")
            .await
            .unwrap();

        assert!(store.get_plants().await.is_empty());
    }

    struct FailingKv;

    #[async_trait]
    impl KeyValueStore for FailingKv {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AppError::Storage("disk full".to_string()))
        }

        async fn remove_many(&self, _keys: &[&str]) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_write_failures_surface() {
        let store = RecordStore::new(Arc::new(FailingKv));

        assert!(store.add_plant(test_plant("Monstera")).await.is_err());
        assert!(store.record_dose("p1", true, Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_doses_both_survive() {
        let (store, _kv, _temp) = create_test_store().await;

        let a = store.clone();
        let b = store.clone();
        let (ra, rb) = tokio::join!(
            a.record_dose("p1", true, Utc::now()),
            b.record_dose("p2", true, Utc::now())
        );
        ra.unwrap();
        rb.unwrap();

        assert_eq!(store.get_dose_history().await.len(), 2);
    }
}
