use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{format_display_date, parse_display_date};

/// Marker stored in place of a date for plants that were never watered
pub const NEVER_WATERED: &str = "Never";

/// When a plant was last watered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Watered {
    #[default]
    Never,
    On(NaiveDate),
}

impl Watered {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Watered::Never => None,
            Watered::On(date) => Some(*date),
        }
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date() == Some(day)
    }
}

impl fmt::Display for Watered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Watered::Never => f.write_str(NEVER_WATERED),
            Watered::On(date) => f.write_str(&format_display_date(*date)),
        }
    }
}

impl Serialize for Watered {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Watered {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == NEVER_WATERED {
            return Ok(Watered::Never);
        }
        parse_display_date(&raw)
            .map(Watered::On)
            .map_err(|e| de::Error::custom(format!("invalid lastWatered '{}': {}", raw, e)))
    }
}

/// One tracked plant.
///
/// Field names on the wire are camelCase (`lastWatered`, `dateAdded`) and
/// unknown fields are rejected so a foreign slot never half-loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlantRecord {
    pub name: String,
    pub last_watered: Watered,
    #[serde(with = "display_date")]
    pub date_added: NaiveDate,
    pub notes: String,
}

impl PlantRecord {
    /// Create a fresh record: never watered, no notes
    pub fn new(name: String, date_added: NaiveDate) -> Self {
        Self {
            name,
            last_watered: Watered::Never,
            date_added,
            notes: String::new(),
        }
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}

mod display_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_display_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_display_date(&raw)
            .map_err(|e| de::Error::custom(format!("invalid dateAdded '{}': {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_record_is_never_watered_and_has_no_notes() {
        let record = PlantRecord::new("Fern".to_string(), day(2026, 3, 1));
        assert_eq!(record.last_watered, Watered::Never);
        assert!(!record.has_notes());
        assert_eq!(record.date_added, day(2026, 3, 1));
    }

    #[test]
    fn serializes_with_original_field_names() {
        let mut record = PlantRecord::new("Basil".to_string(), day(2026, 10, 6));
        record.last_watered = Watered::On(day(2026, 10, 16));
        record.notes = "south window".to_string();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Basil");
        assert_eq!(value["lastWatered"], "10/16/2026");
        assert_eq!(value["dateAdded"], "10/6/2026");
        assert_eq!(value["notes"], "south window");
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn never_watered_uses_sentinel_string() {
        let record = PlantRecord::new("Cactus".to_string(), day(2026, 1, 2));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["lastWatered"], NEVER_WATERED);
    }

    #[test]
    fn accepts_iso_dates_on_load() {
        let json = r#"{"name":"Rose","lastWatered":"2026-05-04","dateAdded":"2026-05-01","notes":""}"#;
        let record: PlantRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.last_watered, Watered::On(day(2026, 5, 4)));
        assert_eq!(record.date_added, day(2026, 5, 1));
    }

    #[test]
    fn rejects_unknown_fields_and_bad_dates() {
        let extra = r#"{"name":"Rose","lastWatered":"Never","dateAdded":"5/1/2026","notes":"","id":3}"#;
        assert!(serde_json::from_str::<PlantRecord>(extra).is_err());

        let bad_date = r#"{"name":"Rose","lastWatered":"yesterday","dateAdded":"5/1/2026","notes":""}"#;
        assert!(serde_json::from_str::<PlantRecord>(bad_date).is_err());

        let missing = r#"{"name":"Rose","lastWatered":"Never","dateAdded":"5/1/2026"}"#;
        assert!(serde_json::from_str::<PlantRecord>(missing).is_err());
    }

    #[test]
    fn watered_display_and_day_check() {
        let today = day(2026, 10, 16);
        assert_eq!(Watered::Never.to_string(), "Never");
        assert!(Watered::On(today).is_on(today));
        assert!(!Watered::Never.is_on(today));
        assert!(!Watered::On(day(2026, 10, 15)).is_on(today));
    }
}
