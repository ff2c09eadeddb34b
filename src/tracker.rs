//! Application context: the plant collection, the species catalog and the
//! collaborators every committed change is reported to.
//!
//! Operations that need a human answer return a [`Step::Ask`] holding the
//! [`Request`] to show and the [`Pending`] continuation. Nothing is mutated
//! until [`PlantTracker::resume`] receives the reply that decides whether the
//! change is committed.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::catalog::SpeciesCatalog;
use crate::collection::{CollectionError, PlantCollection};
use crate::models::PlantRecord;
use crate::store::PlantStore;
use crate::utils::Clock;
use crate::view::{build_views, PlantView, Presenter};

pub const NOVEL_SPECIES_MESSAGE: &str =
    "This plant is not in our suggestions, but we will add it manually!";

/// A dialog the user has to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Alert { title: String, message: String },
    Confirm { title: String, message: String },
    PromptText { title: String, message: String, default: String },
    PromptNotes { title: String, message: String, default: String },
}

impl Request {
    pub fn title(&self) -> &str {
        match self {
            Request::Alert { title, .. }
            | Request::Confirm { title, .. }
            | Request::PromptText { title, .. }
            | Request::PromptNotes { title, .. } => title,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Request::Alert { message, .. }
            | Request::Confirm { message, .. }
            | Request::PromptText { message, .. }
            | Request::PromptNotes { message, .. } => message,
        }
    }
}

/// The user's answer to a [`Request`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Acknowledged,
    Confirmed(bool),
    /// `None` when the prompt was dismissed
    Text(Option<String>),
}

impl Reply {
    fn confirmed(&self) -> bool {
        matches!(self, Reply::Confirmed(true))
    }

    fn into_text(self) -> Option<String> {
        match self {
            Reply::Text(text) => text,
            _ => None,
        }
    }
}

/// What is left to do once the open request is answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    /// An add was refused; the alert only has to be acknowledged
    Rejected(CollectionError),
    /// Novel species notice is showing; add once it is acknowledged
    AddNovel { name: String },
    Rename { index: usize },
    Annotate { index: usize },
    Remove { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added { index: usize, novel: bool },
    Watered { index: usize },
    Renamed { index: usize },
    Annotated { index: usize },
    Removed { index: usize, record: PlantRecord },
    /// Declined or dismissed; nothing changed
    Cancelled,
    Rejected(CollectionError),
}

impl Outcome {
    /// True when the collection changed and was persisted
    pub fn is_committed(&self) -> bool {
        !matches!(self, Outcome::Cancelled | Outcome::Rejected(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Done(Outcome),
    Ask { request: Request, pending: Pending },
}

pub struct PlantTracker<S: PlantStore, P: Presenter> {
    collection: PlantCollection,
    catalog: SpeciesCatalog,
    store: S,
    presenter: P,
    clock: Box<dyn Clock>,
}

impl<S: PlantStore, P: Presenter> PlantTracker<S, P> {
    /// Rehydrate from the store, seed the catalog and render once
    pub fn new(store: S, presenter: P, clock: impl Clock + 'static) -> Self {
        let collection = store.load();
        let mut tracker = Self {
            collection,
            catalog: SpeciesCatalog::seeded(),
            store,
            presenter,
            clock: Box::new(clock),
        };
        info!(plants = tracker.collection.len(), "plant tracker ready");
        tracker.refresh();
        tracker
    }

    pub fn collection(&self) -> &PlantCollection {
        &self.collection
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn views(&self) -> Vec<PlantView> {
        build_views(self.collection.records(), self.today())
    }

    pub fn suggest(&self, query: &str) -> Vec<&str> {
        self.catalog.suggest(query)
    }

    /// Start adding a plant by name
    pub fn begin_add(&mut self, raw_name: &str) -> Step {
        match self.collection.check_new_name(raw_name) {
            Err(e) => {
                debug!(error = %e, "add refused");
                let title = match e {
                    CollectionError::Duplicate(_) => "Duplicate Plant",
                    _ => "Error",
                };
                Step::Ask {
                    request: Request::Alert {
                        title: title.to_string(),
                        message: e.to_string(),
                    },
                    pending: Pending::Rejected(e),
                }
            }
            Ok(name) if !self.catalog.contains(&name) => Step::Ask {
                request: Request::Alert {
                    title: "New Plant".to_string(),
                    message: NOVEL_SPECIES_MESSAGE.to_string(),
                },
                pending: Pending::AddNovel { name },
            },
            Ok(name) => Step::Done(self.commit_add(&name, false)),
        }
    }

    pub fn water(&mut self, index: usize) -> Outcome {
        let today = self.today();
        match self.collection.water(index, today) {
            Ok(()) => self.commit(Outcome::Watered { index }),
            Err(e) => self.reject(e),
        }
    }

    pub fn begin_rename(&mut self, index: usize) -> Step {
        match self.collection.get(index) {
            Some(record) => Step::Ask {
                request: Request::PromptText {
                    title: "Edit Plant".to_string(),
                    message: "Enter new plant name:".to_string(),
                    default: record.name.clone(),
                },
                pending: Pending::Rename { index },
            },
            None => Step::Done(self.reject_index(index)),
        }
    }

    pub fn begin_annotate(&mut self, index: usize) -> Step {
        match self.collection.get(index) {
            Some(record) => Step::Ask {
                request: Request::PromptNotes {
                    title: format!("Notes for {}", record.name),
                    message: "Enter notes for this plant:".to_string(),
                    default: record.notes.clone(),
                },
                pending: Pending::Annotate { index },
            },
            None => Step::Done(self.reject_index(index)),
        }
    }

    pub fn begin_remove(&mut self, index: usize) -> Step {
        match self.collection.get(index) {
            Some(record) => Step::Ask {
                request: Request::Confirm {
                    title: "Confirm Delete".to_string(),
                    message: format!("Are you sure you want to delete \"{}\"?", record.name),
                },
                pending: Pending::Remove { index },
            },
            None => Step::Done(self.reject_index(index)),
        }
    }

    /// Continue a pending operation with the user's reply
    pub fn resume(&mut self, pending: Pending, reply: Reply) -> Step {
        let outcome = match pending {
            Pending::Rejected(e) => Outcome::Rejected(e),
            Pending::AddNovel { name } => {
                let outcome = self.commit_add(&name, true);
                if matches!(outcome, Outcome::Added { .. }) && self.catalog.append(&name) {
                    debug!(species = %name, "added species to catalog");
                }
                outcome
            }
            Pending::Rename { index } => match reply.into_text() {
                None => self.cancel("rename"),
                Some(text) => match self.collection.rename(index, &text) {
                    Ok(()) => self.commit(Outcome::Renamed { index }),
                    Err(CollectionError::EmptyName) => self.cancel("rename"),
                    Err(e) => self.reject(e),
                },
            },
            Pending::Annotate { index } => match reply.into_text() {
                None => self.cancel("notes"),
                Some(text) => match self.collection.annotate(index, &text) {
                    Ok(()) => self.commit(Outcome::Annotated { index }),
                    Err(e) => self.reject(e),
                },
            },
            Pending::Remove { index } => {
                if !reply.confirmed() {
                    self.cancel("delete")
                } else {
                    match self.collection.remove(index) {
                        Ok(record) => self.commit(Outcome::Removed { index, record }),
                        Err(e) => self.reject(e),
                    }
                }
            }
        };
        Step::Done(outcome)
    }

    fn commit_add(&mut self, name: &str, novel: bool) -> Outcome {
        let today = self.today();
        match self.collection.add(name, today) {
            Ok(index) => self.commit(Outcome::Added { index, novel }),
            Err(e) => self.reject(e),
        }
    }

    fn commit(&mut self, outcome: Outcome) -> Outcome {
        info!(?outcome, plants = self.collection.len(), "plants changed");
        self.store.save(self.collection.records());
        self.refresh();
        outcome
    }

    fn cancel(&self, operation: &str) -> Outcome {
        debug!(operation, "cancelled by user");
        Outcome::Cancelled
    }

    fn reject(&self, error: CollectionError) -> Outcome {
        match error {
            CollectionError::IndexOutOfRange { index, len } => {
                warn!(index, len, "stale plant index")
            }
            _ => debug!(error = %error, "change refused"),
        }
        Outcome::Rejected(error)
    }

    fn reject_index(&self, index: usize) -> Outcome {
        self.reject(CollectionError::IndexOutOfRange {
            index,
            len: self.collection.len(),
        })
    }

    fn refresh(&mut self) {
        let views = self.views();
        self.presenter.render(&views);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Watered;
    use crate::store::MemoryStore;
    use crate::utils::FixedClock;
    use crate::view::ViewCache;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn tracker() -> PlantTracker<MemoryStore, ViewCache> {
        PlantTracker::new(MemoryStore::new(), ViewCache::new(), FixedClock(today()))
    }

    fn add_known(tracker: &mut PlantTracker<MemoryStore, ViewCache>, name: &str) -> usize {
        match tracker.begin_add(name) {
            Step::Done(Outcome::Added { index, novel: false }) => index,
            other => panic!("expected direct add, got {other:?}"),
        }
    }

    #[test]
    fn startup_renders_once_without_saving() {
        let tracker = tracker();
        assert_eq!(tracker.presenter().render_count(), 1);
        assert_eq!(tracker.store().save_count(), 0);
    }

    #[test]
    fn known_species_is_added_without_asking() {
        let mut tracker = tracker();
        assert_eq!(add_known(&mut tracker, "rose"), 0);
        let record = tracker.collection().get(0).unwrap();
        assert_eq!(record.name, "rose");
        assert_eq!(record.date_added, today());
        assert_eq!(tracker.store().save_count(), 1);
        assert_eq!(tracker.presenter().render_count(), 2);
        assert_eq!(tracker.catalog().len(), 6);
    }

    #[test]
    fn novel_species_waits_for_the_notice_then_joins_catalog() {
        let mut tracker = tracker();
        let step = tracker.begin_add("  Zinnia ");
        let Step::Ask { request, pending } = step else {
            panic!("expected notice");
        };
        assert_eq!(request.title(), "New Plant");
        assert_eq!(request.message(), NOVEL_SPECIES_MESSAGE);
        assert!(tracker.collection().is_empty());
        assert!(tracker.suggest("zin").is_empty());

        let done = tracker.resume(pending, Reply::Acknowledged);
        assert_eq!(done, Step::Done(Outcome::Added { index: 0, novel: true }));
        assert_eq!(tracker.suggest("zin"), vec!["Zinnia"]);
        assert_eq!(tracker.store().save_count(), 1);
    }

    #[test]
    fn stale_novel_add_leaves_catalog_alone() {
        let mut tracker = tracker();
        let Step::Ask { pending: novel, .. } = tracker.begin_add("Yucca") else {
            panic!("expected notice");
        };
        // The name gets taken while the notice is still showing
        add_known(&mut tracker, "Fern");
        let Step::Ask { pending: rename, .. } = tracker.begin_rename(0) else {
            panic!("expected prompt");
        };
        tracker.resume(rename, Reply::Text(Some("yucca".to_string())));
        let saves = tracker.store().save_count();

        let done = tracker.resume(novel, Reply::Acknowledged);
        assert!(matches!(done, Step::Done(Outcome::Rejected(CollectionError::Duplicate(_)))));
        assert!(!tracker.catalog().contains("Yucca"));
        assert!(tracker.suggest("yuc").is_empty());
        assert_eq!(tracker.collection().len(), 1);
        assert_eq!(tracker.store().save_count(), saves);
    }

    #[test]
    fn blank_and_duplicate_adds_alert_and_change_nothing() {
        let mut tracker = tracker();
        add_known(&mut tracker, "Rose");

        for raw in ["", "   "] {
            let Step::Ask { request, pending } = tracker.begin_add(raw) else {
                panic!("expected alert");
            };
            assert_eq!(request.title(), "Error");
            assert_eq!(
                tracker.resume(pending, Reply::Acknowledged),
                Step::Done(Outcome::Rejected(CollectionError::EmptyName))
            );
        }

        let Step::Ask { request, pending } = tracker.begin_add("ROSE") else {
            panic!("expected alert");
        };
        assert!(matches!(request, Request::Alert { .. }));
        assert!(matches!(
            tracker.resume(pending, Reply::Acknowledged),
            Step::Done(Outcome::Rejected(CollectionError::Duplicate(_)))
        ));

        let Step::Ask { pending, .. } = tracker.begin_add("Rosa rugosa") else {
            panic!("expected novelty notice");
        };
        tracker.resume(pending, Reply::Acknowledged);
        assert!(!matches!(tracker.begin_add("rosa RUGOSA"), Step::Done(Outcome::Added { .. })));

        assert_eq!(tracker.collection().len(), 2);
        assert_eq!(tracker.store().save_count(), 2);
        assert_eq!(tracker.catalog().len(), 7);
    }

    #[test]
    fn water_saves_and_marks_today() {
        let mut tracker = tracker();
        add_known(&mut tracker, "Fern");
        assert_eq!(tracker.water(0), Outcome::Watered { index: 0 });
        assert_eq!(tracker.collection().get(0).unwrap().last_watered, Watered::On(today()));
        assert!(tracker.views()[0].watered_today);
        assert!(matches!(
            tracker.water(1),
            Outcome::Rejected(CollectionError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(tracker.store().save_count(), 2);
    }

    #[test]
    fn rename_prompt_is_seeded_and_blank_or_dismissed_is_a_no_op() {
        let mut tracker = tracker();
        add_known(&mut tracker, "Fern");

        let Step::Ask { request, pending } = tracker.begin_rename(0) else {
            panic!("expected prompt");
        };
        assert_eq!(
            request,
            Request::PromptText {
                title: "Edit Plant".to_string(),
                message: "Enter new plant name:".to_string(),
                default: "Fern".to_string(),
            }
        );
        assert_eq!(tracker.resume(pending.clone(), Reply::Text(None)), Step::Done(Outcome::Cancelled));
        assert_eq!(
            tracker.resume(pending.clone(), Reply::Text(Some("  ".into()))),
            Step::Done(Outcome::Cancelled)
        );
        assert_eq!(tracker.collection().get(0).unwrap().name, "Fern");
        assert_eq!(tracker.store().save_count(), 1);

        assert_eq!(
            tracker.resume(pending, Reply::Text(Some(" Boston Fern ".into()))),
            Step::Done(Outcome::Renamed { index: 0 })
        );
        assert_eq!(tracker.collection().get(0).unwrap().name, "Boston Fern");
        assert_eq!(tracker.store().save_count(), 2);
    }

    #[test]
    fn notes_prompt_accepts_empty_text_but_not_dismissal() {
        let mut tracker = tracker();
        add_known(&mut tracker, "Basil");

        let Step::Ask { request, pending } = tracker.begin_annotate(0) else {
            panic!("expected prompt");
        };
        assert_eq!(request.title(), "Notes for Basil");
        tracker.resume(pending.clone(), Reply::Text(Some("pinch flowers\n".into())));
        assert_eq!(tracker.collection().get(0).unwrap().notes, "pinch flowers");

        assert_eq!(tracker.resume(pending.clone(), Reply::Text(None)), Step::Done(Outcome::Cancelled));
        assert_eq!(tracker.collection().get(0).unwrap().notes, "pinch flowers");

        tracker.resume(pending, Reply::Text(Some(String::new())));
        assert!(tracker.collection().get(0).unwrap().notes.is_empty());
    }

    #[test]
    fn declined_delete_leaves_store_untouched() {
        let mut tracker = tracker();
        add_known(&mut tracker, "Fern");
        add_known(&mut tracker, "Tulip");

        let Step::Ask { request, pending } = tracker.begin_remove(1) else {
            panic!("expected confirm");
        };
        assert_eq!(request.message(), "Are you sure you want to delete \"Tulip\"?");
        assert_eq!(tracker.resume(pending.clone(), Reply::Confirmed(false)), Step::Done(Outcome::Cancelled));
        assert_eq!(tracker.collection().len(), 2);
        assert_eq!(tracker.store().save_count(), 2);

        let Step::Done(Outcome::Removed { index, record }) = tracker.resume(pending, Reply::Confirmed(true)) else {
            panic!("expected removal");
        };
        assert_eq!((index, record.name.as_str()), (1, "Tulip"));
        assert_eq!(tracker.store().save_count(), 3);
    }

    #[test]
    fn stale_indices_are_rejected_up_front_and_on_resume() {
        let mut tracker = tracker();
        add_known(&mut tracker, "Fern");
        assert!(matches!(
            tracker.begin_remove(3),
            Step::Done(Outcome::Rejected(CollectionError::IndexOutOfRange { .. }))
        ));

        let stale = Pending::Remove { index: 1 };
        assert!(matches!(
            tracker.resume(stale, Reply::Confirmed(true)),
            Step::Done(Outcome::Rejected(CollectionError::IndexOutOfRange { .. }))
        ));
        assert_eq!(tracker.collection().len(), 1);
    }

    #[test]
    fn rehydrates_from_the_store() {
        let mut first = tracker();
        add_known(&mut first, "Cactus");
        let slot = first.store().slot().unwrap();

        let second = PlantTracker::new(MemoryStore::with_slot(slot), ViewCache::new(), FixedClock(today()));
        assert_eq!(second.collection(), first.collection());
        assert_eq!(second.presenter().views().len(), 1);
    }
}
