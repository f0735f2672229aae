use std::collections::BTreeMap;

use super::{
    Record,
    RecordId,
    RecordStore,
};
use crate::core::KanjiFillError;

/// In-process record store for tests and embedders running without a live
/// host. Records are scoped to a deck; `find_records` matches any field value
/// containing the query text, like the host's `deck:"X" "text"` search.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<RecordId, (String, Record)>,
    next_id: RecordId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { records: BTreeMap::new(), next_id: 1 }
    }

    /// Adds a record to `deck` and returns its id.
    pub fn add_record(&mut self, deck: &str, mut record: Record) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        record.id = id;
        self.records.insert(id, (deck.to_string(), record));
        id
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id).map(|(_, record)| record)
    }
}

impl RecordStore for MemoryStore {
    fn find_records(&self, deck: &str, text: &str) -> Result<Vec<RecordId>, KanjiFillError> {
        let ids = self
            .records
            .iter()
            .filter(|(_, (record_deck, record))| {
                record_deck == deck && record.fields.values().any(|v| v.contains(text))
            })
            .map(|(&id, _)| id)
            .collect();
        Ok(ids)
    }

    fn get_record(&self, id: RecordId) -> Result<Record, KanjiFillError> {
        self.records
            .get(&id)
            .map(|(_, record)| record.clone())
            .ok_or(KanjiFillError::RecordNotFound(id))
    }

    fn update_record(&mut self, record: &Record) -> Result<(), KanjiFillError> {
        match self.records.get_mut(&record.id) {
            Some((_, stored)) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(KanjiFillError::RecordNotFound(record.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_scoped_to_the_deck() {
        let mut store = MemoryStore::new();
        store.add_record("Kanji_Deck", Record::new(0, "Kanji").with_field("Expression", "木"));
        store.add_record("Other", Record::new(0, "Kanji").with_field("Expression", "木"));

        let ids = store.find_records("Kanji_Deck", "木").unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.get_record(ids[0]).unwrap().field("Expression"), Some("木"));

        assert!(store.find_records("Kanji_Deck", "火").unwrap().is_empty());
    }

    #[test]
    fn update_round_trips_and_missing_ids_error() {
        let mut store = MemoryStore::new();
        let id = store.add_record("Deck", Record::new(0, "Vocab").with_field("A", "1"));

        let mut record = store.get_record(id).unwrap();
        record.set_field("A", "2".to_string());
        store.update_record(&record).unwrap();
        assert_eq!(store.record(id).unwrap().field("A"), Some("2"));

        assert!(store.get_record(999).is_err());
        assert!(store.update_record(&Record::new(999, "Vocab")).is_err());
    }
}
