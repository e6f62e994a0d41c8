use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::Transactional;

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// 追加一个新单词，文本重复时返回 Conflict。
    ///
    /// id 由 sled 单调生成，保证新词总是排在已有单词之后，
    /// 已有单词的轮换位置不会因为追加而改变。
    pub fn insert_word(&self, text: &str) -> Result<Word, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::Validation("word text must not be empty".to_string()));
        }

        let id = self.raw_db().generate_id()? + 1;
        let text_key = keys::word_text_key(text);
        let key = keys::word_key(id);
        let word = Word {
            id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        let word_bytes = Self::serialize(&word)?;

        // 文本索引与单词本体同一事务提交，不会留下只有索引的半条记录
        (&self.word_texts, &self.words)
            .transaction(|(tx_texts, tx_words)| {
                if tx_texts.get(text_key.as_bytes())?.is_some() {
                    return Err(sled::transaction::ConflictableTransactionError::Abort(
                        StoreError::Conflict {
                            entity: "word_text".to_string(),
                            key: text.to_string(),
                        },
                    ));
                }
                tx_texts.insert(text_key.as_bytes(), key.as_bytes())?;
                tx_words.insert(key.as_bytes(), word_bytes.as_slice())?;
                Ok(())
            })
            .map_err(
                |error: sled::transaction::TransactionError<StoreError>| match error {
                    sled::transaction::TransactionError::Abort(store_error) => store_error,
                    sled::transaction::TransactionError::Storage(storage_error) => {
                        tracing::error!(error = %storage_error, word = text, "Word insert transaction failed");
                        StoreError::Sled(storage_error)
                    }
                },
            )?;

        Ok(word)
    }

    /// Appends every text not already in the catalog, preserving input order.
    pub fn seed_words<S: AsRef<str>>(&self, texts: &[S]) -> Result<usize, StoreError> {
        let mut inserted = 0usize;
        for text in texts {
            match self.insert_word(text.as_ref()) {
                Ok(_) => inserted += 1,
                Err(StoreError::Conflict { .. }) | Err(StoreError::Validation(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(inserted)
    }

    pub fn get_word(&self, word_id: u64) -> Result<Option<Word>, StoreError> {
        let key = keys::word_key(word_id);
        match self.words.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_word_by_text(&self, text: &str) -> Result<Option<Word>, StoreError> {
        let text_key = keys::word_text_key(text);
        let Some(raw_id) = self.word_texts.get(text_key.as_bytes())? else {
            return Ok(None);
        };
        match keys::word_id_from_key(&raw_id) {
            Some(id) => self.get_word(id),
            None => Ok(None),
        }
    }

    /// Word at a zero-based position in id order.
    pub fn get_word_at(&self, index: u64) -> Result<Option<Word>, StoreError> {
        let offset = usize::try_from(index)
            .map_err(|_| StoreError::Validation(format!("word index {index} out of range")))?;
        match self.words.iter().nth(offset) {
            Some(item) => {
                let (_, value) = item?;
                Ok(Some(Self::deserialize(&value)?))
            }
            None => Ok(None),
        }
    }

    pub fn count_words(&self) -> Result<u64, StoreError> {
        Ok(self.words.len() as u64)
    }

    pub fn list_words(&self) -> Result<Vec<Word>, StoreError> {
        let mut words = Vec::new();
        for item in self.words.iter() {
            let (_, value) = item?;
            words.push(Self::deserialize::<Word>(&value)?);
        }
        Ok(words)
    }
}
