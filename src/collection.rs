use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{PlantRecord, Watered};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("Please enter a plant name!")]
    EmptyName,
    #[error("\"{0}\" is already in your collection")]
    Duplicate(String),
    #[error("No plant at position {index} (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The ordered plant collection.
///
/// Positions are the addressing scheme for every mutation. Insertion order is
/// kept; only `remove` shifts later records down by one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantCollection {
    records: Vec<PlantRecord>,
}

impl PlantCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a snapshot. Names must be non-blank; case variants are
    /// kept since rename can produce them.
    pub fn from_records(records: Vec<PlantRecord>) -> Result<Self, CollectionError> {
        let records = records
            .into_iter()
            .map(|record| {
                let name = normalize_name(&record.name)?;
                Ok(PlantRecord { name, ..record })
            })
            .collect::<Result<Vec<_>, CollectionError>>()?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[PlantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlantRecord> {
        self.records.get(index)
    }

    /// Position of the record whose name matches case-insensitively
    pub fn position_of(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        self.records
            .iter()
            .position(|record| record.name.trim().to_lowercase() == needle)
    }

    /// Check that `add` would accept this name; returns it trimmed
    pub fn check_new_name(&self, raw_name: &str) -> Result<String, CollectionError> {
        let name = normalize_name(raw_name)?;
        if self.position_of(&name).is_some() {
            return Err(CollectionError::Duplicate(name));
        }
        Ok(name)
    }

    pub fn add(&mut self, raw_name: &str, today: NaiveDate) -> Result<usize, CollectionError> {
        let name = self.check_new_name(raw_name)?;
        self.records.push(PlantRecord::new(name, today));
        Ok(self.records.len() - 1)
    }

    pub fn water(&mut self, index: usize, today: NaiveDate) -> Result<(), CollectionError> {
        let record = self.record_mut(index)?;
        record.last_watered = Watered::On(today);
        Ok(())
    }

    /// Replace the name. Uniqueness against other records is not checked here,
    /// only that the trimmed name is non-empty.
    pub fn rename(&mut self, index: usize, raw_new_name: &str) -> Result<(), CollectionError> {
        self.ensure_index(index)?;
        let name = normalize_name(raw_new_name)?;
        self.record_mut(index)?.name = name;
        Ok(())
    }

    pub fn annotate(&mut self, index: usize, raw_notes: &str) -> Result<(), CollectionError> {
        let record = self.record_mut(index)?;
        record.notes = raw_notes.trim().to_string();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<PlantRecord, CollectionError> {
        self.ensure_index(index)?;
        Ok(self.records.remove(index))
    }

    pub fn ensure_index(&self, index: usize) -> Result<(), CollectionError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(CollectionError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }

    fn record_mut(&mut self, index: usize) -> Result<&mut PlantRecord, CollectionError> {
        let len = self.records.len();
        self.records
            .get_mut(index)
            .ok_or(CollectionError::IndexOutOfRange { index, len })
    }
}

fn normalize_name(raw: &str) -> Result<String, CollectionError> {
    let name = raw.trim();
    if name.is_empty() {
        Err(CollectionError::EmptyName)
    } else {
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn names(collection: &PlantCollection) -> Vec<&str> {
        collection.records().iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> PlantCollection {
        let mut collection = PlantCollection::new();
        for name in ["Fern", "Basil", "Cactus", "Tulip"] {
            collection.add(name, day(1)).unwrap();
        }
        collection
    }

    #[test]
    fn distinct_adds_keep_call_order() {
        let mut collection = PlantCollection::new();
        assert_eq!(collection.add("  Fern ", day(1)).unwrap(), 0);
        assert_eq!(collection.add("Basil", day(2)).unwrap(), 1);
        assert_eq!(collection.add("Monstera", day(3)).unwrap(), 2);
        assert_eq!(names(&collection), vec!["Fern", "Basil", "Monstera"]);

        let added = collection.get(2).unwrap();
        assert_eq!(added.date_added, day(3));
        assert_eq!(added.last_watered, Watered::Never);
        assert!(added.notes.is_empty());
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut collection = PlantCollection::new();
        assert_eq!(collection.add("", day(1)), Err(CollectionError::EmptyName));
        assert_eq!(collection.add("   ", day(1)), Err(CollectionError::EmptyName));
        assert!(collection.is_empty());
    }

    #[test]
    fn duplicate_names_ignore_case() {
        let mut collection = PlantCollection::new();
        collection.add("Rose", day(1)).unwrap();
        assert_eq!(
            collection.add("rose", day(1)),
            Err(CollectionError::Duplicate("rose".to_string()))
        );
        assert!(matches!(collection.add(" ROSE ", day(1)), Err(CollectionError::Duplicate(_))));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn water_touches_only_the_target_and_is_idempotent() {
        let mut collection = sample();
        let before = collection.clone();

        collection.water(1, day(16)).unwrap();
        let once = collection.clone();
        collection.water(1, day(16)).unwrap();
        assert_eq!(collection, once);

        let watered = collection.get(1).unwrap();
        assert_eq!(watered.last_watered, Watered::On(day(16)));
        assert_eq!(watered.name, "Basil");
        assert_eq!(watered.date_added, day(1));
        for i in [0, 2, 3] {
            assert_eq!(collection.get(i), before.get(i));
        }
    }

    #[test]
    fn remove_shifts_later_records_down() {
        let mut collection = sample();
        let removed = collection.remove(1).unwrap();
        assert_eq!(removed.name, "Basil");
        assert_eq!(names(&collection), vec!["Fern", "Cactus", "Tulip"]);
        assert_eq!(
            collection.remove(3),
            Err(CollectionError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn out_of_range_index_changes_nothing() {
        let mut collection = sample();
        let before = collection.clone();
        assert!(collection.water(9, day(2)).is_err());
        assert!(collection.rename(9, "Ivy").is_err());
        assert!(collection.annotate(4, "x").is_err());
        assert_eq!(collection, before);
    }

    #[test]
    fn rename_replaces_only_the_name() {
        let mut collection = sample();
        collection.water(2, day(5)).unwrap();
        collection.annotate(2, "needs sun").unwrap();

        collection.rename(2, "  Prickly Pear  ").unwrap();
        let record = collection.get(2).unwrap();
        assert_eq!(record.name, "Prickly Pear");
        assert_eq!(record.last_watered, Watered::On(day(5)));
        assert_eq!(record.date_added, day(1));
        assert_eq!(record.notes, "needs sun");
    }

    #[test]
    fn rename_to_blank_is_rejected_without_change() {
        let mut collection = sample();
        assert_eq!(collection.rename(0, "  "), Err(CollectionError::EmptyName));
        assert_eq!(collection.get(0).unwrap().name, "Fern");
    }

    #[test]
    fn rename_does_not_check_other_names() {
        let mut collection = sample();
        collection.rename(0, "basil").unwrap();
        assert_eq!(names(&collection), vec!["basil", "Basil", "Cactus", "Tulip"]);
    }

    #[test]
    fn annotate_trims_and_accepts_empty() {
        let mut collection = sample();
        collection.annotate(0, "  repot in spring \n").unwrap();
        assert_eq!(collection.get(0).unwrap().notes, "repot in spring");
        collection.annotate(0, "").unwrap();
        assert!(collection.get(0).unwrap().notes.is_empty());
    }

    #[test]
    fn from_records_rejects_only_blank_names() {
        let ok = vec![PlantRecord::new("Fern".into(), day(1)), PlantRecord::new("Ivy".into(), day(2))];
        assert_eq!(PlantCollection::from_records(ok).unwrap().len(), 2);

        let variants = vec![PlantRecord::new("Fern".into(), day(1)), PlantRecord::new("FERN".into(), day(2))];
        let loaded = PlantCollection::from_records(variants).unwrap();
        assert_eq!(names(&loaded), vec!["Fern", "FERN"]);

        let blank = vec![PlantRecord::new(" ".into(), day(1))];
        assert_eq!(PlantCollection::from_records(blank), Err(CollectionError::EmptyName));
    }
}
