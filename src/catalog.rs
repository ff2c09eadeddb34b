/// Species every session starts with, in suggestion order
pub const SEED_SPECIES: &[&str] = &["Aloe Vera", "Basil", "Cactus", "Fern", "Rose", "Tulip"];

/// Known species names used for autocomplete and known/novel classification.
///
/// Append-only for the lifetime of the process and never persisted: a restart
/// goes back to [`SEED_SPECIES`].
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    entries: Vec<String>,
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl SpeciesCatalog {
    pub fn seeded() -> Self {
        Self {
            entries: SEED_SPECIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive membership
    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.entries.iter().any(|entry| entry.to_lowercase() == needle)
    }

    /// Append a name as entered. Returns false when it was already known.
    pub fn append(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.entries.push(name.to_string());
        true
    }

    /// Every entry containing `query` (case-insensitive), in catalog order.
    /// An empty query yields nothing so the caller can hide the suggestion box.
    pub fn suggest(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| entry.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }
}
