use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
};

use crate::persistence;

const CACHE_FILE: &str = "kanji_cache.json";

/// Persisted kanji -> meaning table.
///
/// Every key present has been resolved at least once; an empty meaning is a
/// final "known absent" resolution, not a placeholder to retry. The file on
/// disk is always a complete snapshot of the in-memory table at the last
/// successful write.
#[derive(Debug)]
pub struct KanjiCache {
    entries: HashMap<char, String>,
    path: PathBuf,
}

impl KanjiCache {
    /// Loads the cache from the app data directory, starting empty on first
    /// run or when the file fails to parse.
    pub fn load() -> Self {
        Self::load_from(persistence::get_data_file_path(CACHE_FILE))
    }

    /// Loads the cache from an explicit path. A missing file starts the cache
    /// empty; an unreadable or unparsable file is reported and also starts it
    /// empty, never an error.
    pub fn load_from(path: PathBuf) -> Self {
        let entries = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str::<HashMap<char, String>>(&json) {
                    Ok(entries) => entries,
                    Err(e) => {
                        eprintln!("[kanjifill] Cache load failed: {}", e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    eprintln!("[kanjifill] Cache load failed: {}", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Self { entries, path }
    }

    /// Cached meaning for `kanji`, or `None` on a cache miss. A stored empty
    /// string is a hit.
    pub fn get(&self, kanji: char) -> Option<&str> {
        self.entries.get(&kanji).map(String::as_str)
    }

    pub fn contains(&self, kanji: char) -> bool {
        self.entries.contains_key(&kanji)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges freshly resolved entries into the table and rewrites the full
    /// snapshot on disk. A no-op for an empty batch.
    pub fn put_many(&mut self, entries: HashMap<char, String>) {
        if entries.is_empty() {
            return;
        }
        self.entries.extend(entries);
        self.save();
    }

    /// Full-snapshot rewrite. A write failure is reported but non-fatal; the
    /// in-memory table stays authoritative for the rest of the process.
    fn save(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("[kanjifill] Cache write failed: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            eprintln!("[kanjifill] Cache write failed: {}", e);
        }
    }
}
