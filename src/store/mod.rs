use std::collections::HashMap;

use crate::core::KanjiFillError;

pub mod memory;

pub use memory::MemoryStore;

pub type RecordId = u64;

/// A flashcard-style record owned by the host store: a note-type name and a
/// set of named string fields. The core never creates or destroys records,
/// it only reads fields and overwrites the destination field in memory.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub id: RecordId,
    pub note_type: String,
    pub fields: HashMap<String, String>,
}

impl Record {
    pub fn new(id: RecordId, note_type: &str) -> Self {
        Self { id, note_type: note_type.to_string(), fields: HashMap::new() }
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Field value by name, `None` when the field is absent on this record.
    /// Callers must handle the absent case explicitly; there is no silent
    /// fallback.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn set_field(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_string(), value);
    }
}

/// The host record-store query surface consumed by the core. Failures on a
/// single record or query degrade to "skip this candidate", never a crash.
pub trait RecordStore {
    /// Ids of records in `deck` whose content matches `text`.
    fn find_records(&self, deck: &str, text: &str) -> Result<Vec<RecordId>, KanjiFillError>;

    fn get_record(&self, id: RecordId) -> Result<Record, KanjiFillError>;

    /// Persists an in-memory record change back to the host store.
    fn update_record(&mut self, record: &Record) -> Result<(), KanjiFillError>;
}
