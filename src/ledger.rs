//! Dose ledger
//!
//! Pure queries over dose history: per-day filtering, watered checks,
//! and daily progress against each plant's scheduled times. All dates
//! are interpreted in local time, matching how doses are recorded.

use crate::records::{DoseEvent, Plant};
use chrono::{Local, NaiveDate};

/// Doses recorded on the given local date, in recorded order
pub fn doses_on(date: NaiveDate, history: &[DoseEvent]) -> Vec<DoseEvent> {
    history
        .iter()
        .filter(|dose| dose.timestamp.with_timezone(&Local).date_naive() == date)
        .cloned()
        .collect()
}

/// Whether a plant has at least one watered dose on the given date.
/// Explicit skips do not count.
pub fn is_watered(flower_id: &str, date: NaiveDate, history: &[DoseEvent]) -> bool {
    history.iter().any(|dose| {
        dose.flower_id == flower_id
            && dose.watered
            && dose.timestamp.with_timezone(&Local).date_naive() == date
    })
}

/// Completion summary for one day across all scheduled plants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyProgress {
    /// Watering slots satisfied by a watered dose
    pub completed: usize,
    /// Total watering slots across all plants with scheduled times
    pub total: usize,
}

impl DailyProgress {
    /// Completion as a fraction in 0.0..=1.0; zero when nothing is
    /// scheduled
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Compute daily progress from the plant list and today's doses.
///
/// Each plant contributes one slot per scheduled time. Plants with no
/// times (as-needed) contribute nothing. Watered doses beyond a plant's
/// slot count are capped so progress never exceeds 100%.
pub fn daily_progress(plants: &[Plant], todays_doses: &[DoseEvent]) -> DailyProgress {
    let mut completed = 0;
    let mut total = 0;

    for plant in plants {
        let slots = plant.times.len();
        if slots == 0 {
            continue;
        }
        total += slots;

        let watered = todays_doses
            .iter()
            .filter(|dose| dose.flower_id == plant.id && dose.watered)
            .count();
        completed += watered.min(slots);
    }

    DailyProgress { completed, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CreatePlantRequest, Plant, PlantDuration};
    use chrono::{DateTime, Duration, Utc};

    fn test_plant(name: &str, times: &[&str]) -> Plant {
        Plant::create(CreatePlantRequest {
            name: name.to_string(),
            dosage: "100ml".to_string(),
            times: times.iter().map(|t| t.to_string()).collect(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration: PlantDuration::Ongoing,
            color: "#1A8E2D".to_string(),
            reminder: true,
            current_supply: 0,
            total_supply: 0,
            refill_at: 0,
            refill_reminder: false,
        })
        .unwrap()
    }

    fn dose(flower_id: &str, watered: bool, timestamp: DateTime<Utc>) -> DoseEvent {
        DoseEvent::new(flower_id, watered, timestamp)
    }

    #[test]
    fn test_doses_on_filters_by_date() {
        let now = Utc::now();
        let history = vec![
            dose("p1", true, now),
            dose("p2", false, now),
            dose("p1", true, now - Duration::days(3)),
        ];

        let today = Local::now().date_naive();
        let todays = doses_on(today, &history);
        assert_eq!(todays.len(), 2);

        let old = doses_on(today - Duration::days(3), &history);
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].flower_id, "p1");
    }

    #[test]
    fn test_is_watered_ignores_skips() {
        let now = Utc::now();
        let today = Local::now().date_naive();

        let history = vec![dose("p1", false, now), dose("p2", true, now)];

        assert!(!is_watered("p1", today, &history));
        assert!(is_watered("p2", today, &history));
        assert!(!is_watered("p3", today, &history));
    }

    #[test]
    fn test_is_watered_respects_date() {
        let history = vec![dose("p1", true, Utc::now() - Duration::days(1))];
        let today = Local::now().date_naive();

        assert!(!is_watered("p1", today, &history));
        assert!(is_watered("p1", today - Duration::days(1), &history));
    }

    #[test]
    fn test_daily_progress_counts_slots() {
        let a = test_plant("Monstera", &["09:00", "21:00"]);
        let b = test_plant("Fern", &["12:00"]);
        let plants = vec![a.clone(), b];

        let todays = vec![dose(&a.id, true, Utc::now())];

        let progress = daily_progress(&plants, &todays);
        assert_eq!(progress, DailyProgress { completed: 1, total: 3 });
        assert!((progress.percent() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_progress_caps_per_plant() {
        let plant = test_plant("Monstera", &["09:00"]);
        let todays = vec![
            dose(&plant.id, true, Utc::now()),
            dose(&plant.id, true, Utc::now()),
        ];

        let progress = daily_progress(&[plant], &todays);
        assert_eq!(progress, DailyProgress { completed: 1, total: 1 });
    }

    #[test]
    fn test_daily_progress_skips_as_needed_plants() {
        let plant = test_plant("Cactus", &[]);

        let progress = daily_progress(&[plant], &[]);
        assert_eq!(progress, DailyProgress { completed: 0, total: 0 });
        assert_eq!(progress.percent(), 0.0);
    }
}
