pub mod catalog;
pub mod cli;
pub mod collection;
pub mod config;
pub mod database;
pub mod interaction;
pub mod logging;
pub mod models;
pub mod store;
pub mod tracker;
pub mod tui;
pub mod utils;
pub mod view;

pub use catalog::SpeciesCatalog;
pub use collection::{CollectionError, PlantCollection};
pub use config::Config;
pub use database::Database;
pub use models::{PlantRecord, Watered};
pub use store::{MemoryStore, PlantStore};
pub use tracker::{Outcome, Pending, PlantTracker, Reply, Request, Step};
pub use utils::Profile;
pub use view::{PlantView, Presenter, ViewCache};
