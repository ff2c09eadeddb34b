use std::cell::{Cell, RefCell};
use thiserror::Error;
use tracing::{debug, warn};

use crate::collection::{CollectionError, PlantCollection};
use crate::models::PlantRecord;

/// Key of the slot that holds the whole collection
pub const PLANTS_KEY: &str = "myPlants";

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("malformed plant data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("plant data breaks collection rules: {0}")]
    Invalid(#[from] CollectionError),
}

/// Durable home of the collection snapshot.
///
/// Neither method can fail from the caller's point of view: `load` falls back
/// to an empty collection and `save` logs and swallows its own errors.
pub trait PlantStore {
    fn load(&self) -> PlantCollection;
    fn save(&self, records: &[PlantRecord]);
}

/// Serialize the ordered records as the slot's JSON array
pub fn encode_collection(records: &[PlantRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

pub fn decode_collection(raw: &str) -> Result<PlantCollection, SlotError> {
    let records: Vec<PlantRecord> = serde_json::from_str(raw)?;
    Ok(PlantCollection::from_records(records)?)
}

/// Turn the raw slot contents into a collection, treating anything unusable as empty
pub fn collection_from_slot(slot: Option<&str>) -> PlantCollection {
    match slot {
        None => {
            debug!("no saved plants, starting empty");
            PlantCollection::new()
        }
        Some(raw) => match decode_collection(raw) {
            Ok(collection) => {
                debug!(count = collection.len(), "loaded saved plants");
                collection
            }
            Err(e) => {
                warn!(error = %e, "ignoring saved plants");
                PlantCollection::new()
            }
        },
    }
}

/// Slot kept in memory; used by tests and embedders that do not want a file
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw slot contents, valid or not
    pub fn with_slot(raw: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(raw.into())),
            saves: Cell::new(0),
        }
    }

    pub fn slot(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Number of saves issued so far
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl PlantStore for MemoryStore {
    fn load(&self) -> PlantCollection {
        collection_from_slot(self.slot.borrow().as_deref())
    }

    fn save(&self, records: &[PlantRecord]) {
        self.saves.set(self.saves.get() + 1);
        match encode_collection(records) {
            Ok(raw) => *self.slot.borrow_mut() = Some(raw),
            Err(e) => warn!(error = %e, "failed to encode plants"),
        }
    }
}
