//! Word catalog seeding.

use std::path::Path;

use crate::store::{Store, StoreError};

/// 内置词表，未配置 WORDS_FILE 时使用
pub const DEFAULT_WORDS: &[&str] = &[
    "serendipity",
    "melancholy",
    "euphoria",
    "nostalgia",
    "tranquil",
    "wanderlust",
    "ephemeral",
    "solitude",
    "whimsy",
    "reverie",
    "petrichor",
    "luminous",
    "velvet",
    "thunder",
    "harvest",
    "midnight",
    "ember",
    "glacier",
    "lullaby",
    "rebellion",
    "courage",
    "jealousy",
    "sunrise",
    "ocean",
    "forest",
    "desire",
    "calm",
    "chaos",
    "mystery",
    "joy",
];

/// One word per line; blank lines and `#` comments are skipped.
pub fn parse_word_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_word_list(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_word_list(&contents))
}

impl Store {
    pub fn seed_catalog(&self, words: &[String]) -> Result<usize, StoreError> {
        let inserted = if words.is_empty() {
            self.seed_words(DEFAULT_WORDS)?
        } else {
            self.seed_words(words)?
        };
        tracing::info!(
            inserted,
            total = self.count_words()?,
            "Word catalog seeded"
        );
        Ok(inserted)
    }
}
