//! Record models
//!
//! Serde structs for the two persisted collections. Field names follow
//! the camelCase layout of the stored JSON arrays.

use crate::config;
use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a watering schedule stays active.
///
/// Stored as an integer day-count; `-1` means ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantDuration {
    /// Fixed number of days from the start date
    Days(u32),
    /// No end date
    Ongoing,
}

impl Serialize for PlantDuration {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let value = match self {
            PlantDuration::Days(days) => i64::from(*days),
            PlantDuration::Ongoing => config::ONGOING_DURATION,
        };
        serializer.serialize_i64(value)
    }
}

impl<'de> Deserialize<'de> for PlantDuration {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        match value {
            v if v == config::ONGOING_DURATION => Ok(PlantDuration::Ongoing),
            v if (0..=i64::from(u32::MAX)).contains(&v) => Ok(PlantDuration::Days(v as u32)),
            v => Err(serde::de::Error::custom(format!(
                "invalid duration: {}",
                v
            ))),
        }
    }
}

/// A watering-care profile for a single plant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub name: String,
    /// Free-text "how much water" description
    pub dosage: String,
    /// Wall-clock reminder times in "HH:MM" 24-hour form; empty for
    /// as-needed plants
    pub times: Vec<String>,
    pub start_date: NaiveDate,
    pub duration: PlantDuration,
    pub color: String,
    /// Whether reminders are active; records stored without the field
    /// default to enabled
    #[serde(default = "default_reminder")]
    pub reminder: bool,
    pub current_supply: u32,
    pub total_supply: u32,
    pub refill_at: u32,
    pub refill_reminder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_refill_date: Option<NaiveDate>,
}

fn default_reminder() -> bool {
    true
}

/// Create plant request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantRequest {
    pub name: String,
    pub dosage: String,
    pub times: Vec<String>,
    pub start_date: NaiveDate,
    pub duration: PlantDuration,
    pub color: String,
    #[serde(default = "default_reminder")]
    pub reminder: bool,
    #[serde(default)]
    pub current_supply: u32,
    #[serde(default)]
    pub total_supply: u32,
    #[serde(default)]
    pub refill_at: u32,
    #[serde(default)]
    pub refill_reminder: bool,
}

impl Plant {
    /// Build a new plant with a generated id, validating every reminder
    /// time
    pub fn create(req: CreatePlantRequest) -> Result<Self> {
        for time in &req.times {
            parse_time(time)?;
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            dosage: req.dosage,
            times: req.times,
            start_date: req.start_date,
            duration: req.duration,
            color: req.color,
            reminder: req.reminder,
            current_supply: req.current_supply,
            total_supply: req.total_supply,
            refill_at: req.refill_at,
            refill_reminder: req.refill_reminder,
            last_refill_date: None,
        })
    }
}

/// An immutable record of a single watering (or explicit skip)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoseEvent {
    pub id: String,
    /// Plant this dose belongs to; dangling references are tolerated
    pub flower_id: String,
    /// Instant the dose was recorded, not the scheduled time
    pub timestamp: DateTime<Utc>,
    /// True if watered, false if explicitly skipped
    pub watered: bool,
}

impl DoseEvent {
    /// Build a dose event with a freshly generated id
    pub fn new(flower_id: &str, watered: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            flower_id: flower_id.to_string(),
            timestamp,
            watered,
        }
    }
}

/// Parse a wall-clock "HH:MM" time into (hour, minute)
pub fn parse_time(time: &str) -> Result<(u32, u32)> {
    let (h, m) = time
        .split_once(':')
        .ok_or_else(|| AppError::InvalidTime(time.to_string()))?;

    let hours: u32 = h
        .parse()
        .map_err(|_| AppError::InvalidTime(time.to_string()))?;
    let minutes: u32 = m
        .parse()
        .map_err(|_| AppError::InvalidTime(time.to_string()))?;

    if hours > 23 || minutes > 59 {
        return Err(AppError::InvalidTime(time.to_string()));
    }

    Ok((hours, minutes))
}

/// A watering-frequency preset offered by the add-plant flow
#[derive(Debug, Clone, Copy)]
pub struct FrequencyPreset {
    pub label: &'static str,
    pub times: &'static [&'static str],
}

/// Watering-frequency presets, from once daily to as-needed
pub const FREQUENCY_PRESETS: &[FrequencyPreset] = &[
    FrequencyPreset {
        label: "Once daily",
        times: &["09:00"],
    },
    FrequencyPreset {
        label: "Twice daily",
        times: &["09:00", "21:00"],
    },
    FrequencyPreset {
        label: "Three times daily",
        times: &["09:00", "15:00", "21:00"],
    },
    FrequencyPreset {
        label: "Four times daily",
        times: &["09:00", "13:00", "17:00", "21:00"],
    },
    FrequencyPreset {
        label: "As needed",
        times: &[],
    },
];

/// Schedule-duration presets offered by the add-plant flow
pub const DURATION_PRESETS: &[(&str, PlantDuration)] = &[
    ("7 days", PlantDuration::Days(7)),
    ("14 days", PlantDuration::Days(14)),
    ("30 days", PlantDuration::Days(30)),
    ("90 days", PlantDuration::Days(90)),
    ("Ongoing", PlantDuration::Ongoing),
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_request() -> CreatePlantRequest {
        CreatePlantRequest {
            name: "Monstera".to_string(),
            dosage: "250ml".to_string(),
            times: vec!["09:00".to_string(), "21:00".to_string()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration: PlantDuration::Ongoing,
            color: "#1A8E2D".to_string(),
            reminder: true,
            current_supply: 10,
            total_supply: 10,
            refill_at: 2,
            refill_reminder: false,
        }
    }

    #[test]
    fn test_create_generates_unique_ids() {
        let a = Plant::create(test_request()).unwrap();
        let b = Plant::create(test_request()).unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_rejects_malformed_times() {
        for bad in ["25:00", "09:60", "9:00am", "0900", ""] {
            let mut req = test_request();
            req.times = vec![bad.to_string()];

            let result = Plant::create(req);
            assert!(result.is_err(), "expected {:?} to be rejected", bad);
        }
    }

    #[test]
    fn test_parse_time_bounds() {
        assert_eq!(parse_time("00:00").unwrap(), (0, 0));
        assert_eq!(parse_time("23:59").unwrap(), (23, 59));
        assert_eq!(parse_time("9:05").unwrap(), (9, 5));

        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_plant_serializes_camel_case() {
        let plant = Plant::create(test_request()).unwrap();
        let json = serde_json::to_value(&plant).unwrap();

        assert!(json.get("startDate").is_some());
        assert!(json.get("currentSupply").is_some());
        assert!(json.get("refillReminder").is_some());
        assert!(json.get("start_date").is_none());
    }

    #[test]
    fn test_reminder_defaults_to_enabled() {
        let json = r##"{
            "id": "p1",
            "name": "Fern",
            "dosage": "100ml",
            "times": ["08:00"],
            "startDate": "2024-01-01",
            "duration": 7,
            "color": "#2E7D32",
            "currentSupply": 0,
            "totalSupply": 0,
            "refillAt": 0,
            "refillReminder": false
        }"##;

        let plant: Plant = serde_json::from_str(json).unwrap();
        assert!(plant.reminder);
        assert_eq!(plant.duration, PlantDuration::Days(7));
    }

    #[test]
    fn test_duration_sentinel_round_trip() {
        assert_eq!(serde_json::to_string(&PlantDuration::Ongoing).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&PlantDuration::Days(30)).unwrap(), "30");

        let ongoing: PlantDuration = serde_json::from_str("-1").unwrap();
        assert_eq!(ongoing, PlantDuration::Ongoing);

        let days: PlantDuration = serde_json::from_str("90").unwrap();
        assert_eq!(days, PlantDuration::Days(90));

        assert!(serde_json::from_str::<PlantDuration>("-2").is_err());
    }

    #[test]
    fn test_dose_event_wire_layout() {
        let event = DoseEvent::new("p1", true, Utc::now());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json.get("flowerId").unwrap(), "p1");
        assert_eq!(json.get("watered").unwrap(), true);
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_frequency_presets_shape() {
        assert_eq!(FREQUENCY_PRESETS.len(), 5);

        let as_needed = FREQUENCY_PRESETS.last().unwrap();
        assert!(as_needed.times.is_empty());

        for preset in FREQUENCY_PRESETS {
            for time in preset.times {
                assert!(parse_time(time).is_ok());
            }
        }
    }
}
