use crate::rotation::RotationError;
use crate::store::operations::words::Word;
use crate::store::Store;

/// Catalog position for a period. Always in `0..total_words`, including for
/// negative `days_elapsed`.
pub fn word_index(days_elapsed: i64, total_words: u64) -> Result<u64, RotationError> {
    if total_words == 0 {
        return Err(RotationError::NoWords);
    }
    let modulus = i128::from(total_words);
    let index = i128::from(days_elapsed).rem_euclid(modulus);
    // rem_euclid 结果落在 [0, modulus) 内，必然可以放回 u64
    Ok(index as u64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedWord {
    pub word: Word,
    pub index: u64,
    pub total_words: u64,
}

/// Resolves the word active `days_elapsed` periods after the start.
pub fn select_word(store: &Store, days_elapsed: i64) -> Result<SelectedWord, RotationError> {
    let total_words = store.count_words()?;
    let index = word_index(days_elapsed, total_words)?;
    let word = store
        .get_word_at(index)?
        .ok_or(RotationError::NoWords)?;
    Ok(SelectedWord {
        word,
        index,
        total_words,
    })
}
