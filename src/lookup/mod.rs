use std::collections::HashMap;

use crate::{
    cache::KanjiCache,
    config::{
        debug_log,
        Config,
    },
    core::{
        extract_unique_kanji,
        strip_media,
    },
    store::RecordStore,
};

/// Source of truth consulted on cache misses. Kanji with no answer are
/// absent from the result, which is distinct from an answered-but-empty
/// meaning: absence means "no source truth available, retry later", an empty
/// string means "known absent" and gets cached.
pub trait SourceResolver {
    fn resolve(&self, kanji: &[char]) -> HashMap<char, String>;
}

/// Resolves kanji against single-kanji records in the configured deck of a
/// host record store.
pub struct DeckResolver<'a, S: RecordStore> {
    store: &'a S,
    config: &'a Config,
}

impl<'a, S: RecordStore> DeckResolver<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self { store, config }
    }
}

impl<S: RecordStore> SourceResolver for DeckResolver<'_, S> {
    fn resolve(&self, kanji: &[char]) -> HashMap<char, String> {
        let deck = &self.config.target_deck;
        debug_log(self.config, &format!("Searching deck: {}", deck));

        let mut result: HashMap<char, String> = HashMap::new();
        for &k in kanji {
            let needle = k.to_string();
            let ids = match self.store.find_records(deck, &needle) {
                Ok(ids) => ids,
                Err(e) => {
                    debug_log(self.config, &format!("Query failed for {}: {}", k, e));
                    continue;
                }
            };
            debug_log(self.config, &format!(" ├─ {} → ids {:?}", k, ids));

            for id in ids {
                let record = match self.store.get_record(id) {
                    Ok(record) => record,
                    Err(_) => continue,
                };
                // First candidate whose search field is exactly this kanji
                // wins; a missing meaning field is recorded as known-absent.
                let Some(value) = record.field(&self.config.search_field) else {
                    continue;
                };
                if strip_media(value) == needle {
                    let meaning = record
                        .field(&self.config.additional_field)
                        .map(|m| m.trim().to_string())
                        .unwrap_or_default();
                    result.insert(k, meaning);
                    break;
                }
            }
        }

        debug_log(self.config, &format!("Lookup result: {:?}", result));
        result
    }
}

/// Two-tier resolution: consult the cache first, batch the misses to the
/// source resolver, fix source answers in the cache permanently, and return
/// the non-empty meanings in first-occurrence order.
pub struct MeaningEngine<'a, R: SourceResolver> {
    cache: &'a mut KanjiCache,
    resolver: &'a R,
}

impl<'a, R: SourceResolver> MeaningEngine<'a, R> {
    pub fn new(cache: &'a mut KanjiCache, resolver: &'a R) -> Self {
        Self { cache, resolver }
    }

    /// Resolves every distinct kanji in `text`. Empty meanings are retained
    /// in the cache but suppressed from the returned mapping; kanji the
    /// source never answered stay uncached and are re-queried next call.
    pub fn resolve(&mut self, text: &str) -> Vec<(char, String)> {
        let kanji = extract_unique_kanji(text);

        let misses: Vec<char> = kanji.iter().copied().filter(|&k| !self.cache.contains(k)).collect();
        if !misses.is_empty() {
            let fresh = self.resolver.resolve(&misses);
            self.cache.put_many(fresh);
        }

        kanji
            .into_iter()
            .filter_map(|k| match self.cache.get(k) {
                Some(meaning) if !meaning.is_empty() => Some((k, meaning.to_string())),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::HashMap,
        fs,
        path::PathBuf,
    };

    use super::*;
    use crate::store::{
        MemoryStore,
        Record,
    };

    /// Canned resolver that records every batch it is asked for.
    struct FakeResolver {
        answers: HashMap<char, String>,
        queries: RefCell<Vec<Vec<char>>>,
    }

    impl FakeResolver {
        fn new(answers: Vec<(char, &str)>) -> Self {
            Self {
                answers: answers.into_iter().map(|(k, v)| (k, v.to_string())).collect(),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl SourceResolver for FakeResolver {
        fn resolve(&self, kanji: &[char]) -> HashMap<char, String> {
            self.queries.borrow_mut().push(kanji.to_vec());
            kanji.iter().filter_map(|k| self.answers.get(k).map(|m| (*k, m.clone()))).collect()
        }
    }

    fn temp_cache(name: &str) -> KanjiCache {
        let path: PathBuf =
            std::env::temp_dir().join(format!("kanjifill_lookup_{}_{}.json", name, std::process::id()));
        let _ = fs::remove_file(&path);
        KanjiCache::load_from(path)
    }

    #[test]
    fn merges_cache_hits_with_source_answers() {
        let mut cache = temp_cache("merge");
        cache.put_many(HashMap::from([('木', "tree".to_string())]));

        let resolver = FakeResolver::new(vec![('林', "woods")]);
        let mut engine = MeaningEngine::new(&mut cache, &resolver);

        let result = engine.resolve("木林");
        assert_eq!(result, vec![('木', "tree".to_string()), ('林', "woods".to_string())]);

        // Only the miss went to the source, and it is now cached.
        assert_eq!(*resolver.queries.borrow(), vec![vec!['林']]);
        assert_eq!(cache.get('林'), Some("woods"));
    }

    #[test]
    fn empty_meanings_are_cached_but_suppressed() {
        let mut cache = temp_cache("empty");
        let resolver = FakeResolver::new(vec![('畫', "")]);
        let mut engine = MeaningEngine::new(&mut cache, &resolver);

        assert!(engine.resolve("畫").is_empty());
        assert_eq!(cache.get('畫'), Some(""));

        // Second call is a cache hit, not a re-query.
        let mut engine = MeaningEngine::new(&mut cache, &resolver);
        assert!(engine.resolve("畫").is_empty());
        assert_eq!(resolver.queries.borrow().len(), 1);
    }

    #[test]
    fn unanswered_kanji_stay_uncached_and_are_retried() {
        let mut cache = temp_cache("retry");
        let resolver = FakeResolver::new(vec![]);
        let mut engine = MeaningEngine::new(&mut cache, &resolver);

        assert!(engine.resolve("龜").is_empty());
        assert!(!cache.contains('龜'));

        let mut engine = MeaningEngine::new(&mut cache, &resolver);
        assert!(engine.resolve("龜").is_empty());
        assert_eq!(*resolver.queries.borrow(), vec![vec!['龜'], vec!['龜']]);
    }

    #[test]
    fn no_kanji_means_nothing_to_do() {
        let mut cache = temp_cache("nothing");
        let resolver = FakeResolver::new(vec![]);
        let mut engine = MeaningEngine::new(&mut cache, &resolver);

        assert!(engine.resolve("").is_empty());
        assert!(engine.resolve("かな only").is_empty());
        assert!(resolver.queries.borrow().is_empty());
    }

    fn kanji_record(expression: &str, keyword: Option<&str>) -> Record {
        let record = Record::new(0, "Kanji").with_field("Expression", expression);
        match keyword {
            Some(keyword) => record.with_field("keyword", keyword),
            None => record,
        }
    }

    #[test]
    fn deck_resolver_requires_an_exact_search_field_match() {
        let mut store = MemoryStore::new();
        store.add_record("Kanji_Deck", kanji_record("木村", Some("surname")));
        store.add_record("Kanji_Deck", kanji_record("木", Some(" tree ")));

        let config = Config::default();
        let resolver = DeckResolver::new(&store, &config);
        let result = resolver.resolve(&['木', '火']);

        // The multi-kanji candidate is skipped, the exact match wins, and the
        // meaning comes back trimmed. 火 has no record at all.
        assert_eq!(result, HashMap::from([('木', "tree".to_string())]));
    }

    #[test]
    fn deck_resolver_strips_markup_before_comparing() {
        let mut store = MemoryStore::new();
        store.add_record("Kanji_Deck", kanji_record("<b>日</b>[sound:hi.mp3]", Some("sun/day")));

        let config = Config::default();
        let resolver = DeckResolver::new(&store, &config);
        assert_eq!(resolver.resolve(&['日']), HashMap::from([('日', "sun/day".to_string())]));
    }

    #[test]
    fn deck_resolver_records_missing_meaning_field_as_empty() {
        let mut store = MemoryStore::new();
        store.add_record("Kanji_Deck", kanji_record("畫", None));

        let config = Config::default();
        let resolver = DeckResolver::new(&store, &config);
        assert_eq!(resolver.resolve(&['畫']), HashMap::from([('畫', String::new())]));
    }

    #[test]
    fn deck_resolver_only_searches_the_configured_deck() {
        let mut store = MemoryStore::new();
        store.add_record("Other_Deck", kanji_record("木", Some("tree")));

        let config = Config::default();
        let resolver = DeckResolver::new(&store, &config);
        assert!(resolver.resolve(&['木']).is_empty());
    }
}
