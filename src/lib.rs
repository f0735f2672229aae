pub mod cache;
pub mod config;
pub mod core;
pub mod hover;
pub mod lookup;
pub mod persistence;
pub mod populate;
pub mod store;

pub use cache::KanjiCache;
pub use config::Config;
pub use self::core::KanjiFillError;
pub use hover::HoverLookup;
pub use lookup::{DeckResolver, MeaningEngine, SourceResolver};
pub use store::{Record, RecordId, RecordStore};
