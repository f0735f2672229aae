use crate::{
    cache::KanjiCache,
    config::{
        debug_log,
        Config,
    },
    core::{
        extract_unique_kanji,
        join_pairs,
        strip_media,
    },
    lookup::{
        DeckResolver,
        MeaningEngine,
        SourceResolver,
    },
    store::{
        Record,
        RecordId,
        RecordStore,
    },
};

/// Fills the destination field of one record with its kanji constituents.
/// Returns true iff the field was written; every skip condition leaves the
/// record untouched. Persisting the change is the caller's responsibility.
pub fn populate<R: SourceResolver>(
    record: &mut Record,
    config: &Config,
    cache: &mut KanjiCache,
    resolver: &R,
) -> bool {
    let filters = config.note_type_filters();
    if !filters.is_empty() {
        let note_type = record.note_type.to_lowercase();
        if !filters.iter().any(|f| note_type.contains(f)) {
            debug_log(config, &format!("Skip – note-type filtered: {}", record.note_type));
            return false;
        }
    }

    if !record.has_field(&config.source_field) || !record.has_field(&config.destination_field) {
        debug_log(config, "Skip – missing src/dst fields");
        return false;
    }

    let expression = strip_media(record.field(&config.source_field).unwrap_or_default());
    if expression.is_empty() {
        debug_log(config, "Skip – empty expression");
        return false;
    }

    if extract_unique_kanji(&expression).is_empty() {
        debug_log(config, &format!("Skip – no kanji in {}", expression));
        return false;
    }

    let mapping = MeaningEngine::new(cache, resolver).resolve(&expression);
    if mapping.is_empty() {
        debug_log(config, "Skip – no mapping found");
        return false;
    }

    let summary = join_pairs(&mapping);
    debug_log(config, &format!("Populated → {}", summary));
    record.set_field(&config.destination_field, summary);
    true
}

/// Auto-fill entry point for the field-defocus event: populates only when
/// enabled and the field the user left is the configured source field.
pub fn on_field_left<R: SourceResolver>(
    record: &mut Record,
    field: &str,
    config: &Config,
    cache: &mut KanjiCache,
    resolver: &R,
) -> bool {
    if !config.lookup_on_add || field != config.source_field {
        return false;
    }
    populate(record, config, cache, resolver)
}

/// Bulk entry point: populates the given records strictly sequentially,
/// persisting each changed record back to the store. Returns how many records
/// changed; records that fail to load or persist are skipped.
pub fn bulk_populate<S: RecordStore>(
    store: &mut S,
    ids: &[RecordId],
    config: &Config,
    cache: &mut KanjiCache,
) -> usize {
    let mut changed = 0;
    for &id in ids {
        let mut record = match store.get_record(id) {
            Ok(record) => record,
            Err(e) => {
                debug_log(config, &format!("Skip – record {} unavailable: {}", id, e));
                continue;
            }
        };

        let populated = {
            let resolver = DeckResolver::new(&*store, config);
            populate(&mut record, config, cache, &resolver)
        };

        if populated {
            match store.update_record(&record) {
                Ok(()) => changed += 1,
                Err(e) => debug_log(config, &format!("Skip – record {} not saved: {}", id, e)),
            }
        }
    }
    debug_log(config, &format!("Bulk finished – {} of {}", changed, ids.len()));
    changed
}
