use std::{
    collections::HashSet,
    sync::OnceLock,
};

use regex::Regex;

/// Pairs are joined with an ideographic space so the destination field reads
/// naturally in Japanese layouts.
const PAIR_SEPARATOR: char = '\u{3000}';

/// True for code points in the CJK Unified Ideographs block (U+4E00-U+9FFF),
/// the atomic unit of lookup. Kana, punctuation and everything else is not a
/// lookup target.
pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Distinct kanji of `text` in first-occurrence order.
pub fn extract_unique_kanji(text: &str) -> Vec<char> {
    let mut seen: HashSet<char> = HashSet::new();
    let mut out: Vec<char> = Vec::new();
    for c in text.chars() {
        if is_kanji(c) && seen.insert(c) {
            out.push(c);
        }
    }
    out
}

/// Strips embedded media references (`[sound:...]`) and HTML markup from a
/// field value, then trims surrounding whitespace.
pub fn strip_media(text: &str) -> String {
    static MEDIA_RE: OnceLock<Regex> = OnceLock::new();
    let re = MEDIA_RE.get_or_init(|| Regex::new(r"\[sound:[^\]]*\]|<[^>]+>").unwrap());
    re.replace_all(text, "").trim().to_string()
}

/// Formats resolved pairs as `kanji: meaning` joined by a full-width space.
/// Pairs with an empty meaning are dropped.
pub fn join_pairs(pairs: &[(char, String)]) -> String {
    pairs
        .iter()
        .filter(|(_, meaning)| !meaning.is_empty())
        .map(|(kanji, meaning)| format!("{}: {}", kanji, meaning))
        .collect::<Vec<String>>()
        .join(&PAIR_SEPARATOR.to_string())
}
