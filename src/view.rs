use chrono::NaiveDate;

use crate::models::PlantRecord;
use crate::utils::format_display_date;

/// Display-ready copy of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantView {
    /// Position in the collection (0-based)
    pub index: usize,
    pub name: String,
    pub last_watered: String,
    pub date_added: String,
    pub notes: Option<String>,
    pub watered_today: bool,
}

pub fn build_views(records: &[PlantRecord], today: NaiveDate) -> Vec<PlantView> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| PlantView {
            index,
            name: record.name.clone(),
            last_watered: record.last_watered.to_string(),
            date_added: format_display_date(record.date_added),
            notes: record.has_notes().then(|| record.notes.clone()),
            watered_today: record.last_watered.is_on(today),
        })
        .collect()
}

/// Receives the view model at startup and after every committed change
pub trait Presenter {
    fn render(&mut self, views: &[PlantView]);
}

/// Keeps the latest views around for a renderer that draws on its own schedule
#[derive(Debug, Default, Clone)]
pub struct ViewCache {
    views: Vec<PlantView>,
    renders: usize,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> &[PlantView] {
        &self.views
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl Presenter for ViewCache {
    fn render(&mut self, views: &[PlantView]) {
        self.views = views.to_vec();
        self.renders += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Watered;

    #[test]
    fn views_derive_display_strings_and_watered_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let added = NaiveDate::from_ymd_opt(2026, 10, 2).unwrap();

        let mut watered = PlantRecord::new("Fern".to_string(), added);
        watered.last_watered = Watered::On(today);
        watered.notes = "mist daily".to_string();
        let mut stale = PlantRecord::new("Basil".to_string(), added);
        stale.last_watered = Watered::On(added);
        let never = PlantRecord::new("Cactus".to_string(), added);

        let views = build_views(&[watered, stale, never], today);
        assert_eq!(views.len(), 3);

        assert!(views[0].watered_today);
        assert_eq!(views[0].last_watered, "10/16/2026");
        assert_eq!(views[0].notes.as_deref(), Some("mist daily"));

        assert!(!views[1].watered_today);
        assert_eq!(views[1].date_added, "10/2/2026");
        assert_eq!(views[1].notes, None);

        assert_eq!(views[2].index, 2);
        assert_eq!(views[2].last_watered, "Never");
        assert!(!views[2].watered_today);
    }

    #[test]
    fn view_cache_keeps_latest_render() {
        let mut cache = ViewCache::new();
        cache.render(&[]);
        assert_eq!(cache.render_count(), 1);
        assert!(cache.views().is_empty());
    }
}
