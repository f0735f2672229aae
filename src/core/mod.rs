pub mod errors;
pub mod kanji;

pub use errors::KanjiFillError;
pub use kanji::{extract_unique_kanji, is_kanji, join_pairs, strip_media};
