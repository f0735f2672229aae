use serde::{
    Deserialize,
    Serialize,
};

use crate::persistence;

const CONFIG_FILE: &str = "config.json";

/// Flat add-on configuration. Unknown keys in the stored file are ignored and
/// missing keys fall back to the defaults, so a partial user override always
/// merges into a complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Deck holding the single-kanji records that act as the source of truth.
    pub target_deck: String,
    /// Field on a source record compared against the kanji itself.
    pub search_field: String,
    /// Field on a source record holding the catalogued meaning.
    pub additional_field: String,
    /// Field on the record being populated that contains the expression.
    pub source_field: String,
    /// Field on the record being populated that receives the summary.
    pub destination_field: String,
    /// Populate automatically when the user leaves the source field.
    pub lookup_on_add: bool,
    /// Comma-separated note-type filter; empty means no filtering.
    pub note_types: String,
    /// Label the host shows for the bulk action menu entry.
    pub bulk_action_label: String,
    pub debug: bool,
    /// Overlay font size in pixels, or "auto" to use the size detected at the
    /// selection point by the rendering surface.
    pub hover_font_size: String,
    /// Overlay vertical offset in pixels, passed through to the surface.
    pub hover_offset: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_deck: "Kanji_Deck".to_string(),
            search_field: "Expression".to_string(),
            additional_field: "keyword".to_string(),
            source_field: "Expression".to_string(),
            destination_field: "Constituents".to_string(),
            lookup_on_add: true,
            note_types: String::new(),
            bulk_action_label: "Bulk-add Constituents".to_string(),
            debug: false,
            hover_font_size: "auto".to_string(),
            hover_offset: "0".to_string(),
        }
    }
}

/// On-disk wrapper: the configuration lives under a `config` key alongside
/// the host's own settings store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    config: Config,
}

impl Config {
    /// Loads the stored configuration merged over the defaults. A missing or
    /// unreadable file yields the defaults.
    pub fn load() -> Self {
        persistence::load_json_or_default::<ConfigFile>(CONFIG_FILE).config
    }

    /// Writes the full configuration back to the settings store. Failure is
    /// reported but not fatal; the in-memory value stays authoritative.
    pub fn save(&self) {
        let file = ConfigFile { config: self.clone() };
        if let Err(e) = persistence::save_json(&file, CONFIG_FILE) {
            eprintln!("[kanjifill] Couldn't write {}: {}", CONFIG_FILE, e);
        }
    }

    /// Lower-cased, trimmed note-type filter entries. Empty when no filter is
    /// configured.
    pub fn note_type_filters(&self) -> Vec<String> {
        self.note_types
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Debug trace output, printed only when enabled in the configuration.
pub fn debug_log(config: &Config, message: &str) {
    if config.debug {
        println!("[kanjifill] {}", message);
    }
}
