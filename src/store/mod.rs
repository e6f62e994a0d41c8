pub mod keys;
pub mod migrate;
pub mod operations;
pub mod seed;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub words: sled::Tree,
    pub word_texts: sled::Tree,
    pub votes: sled::Tree,
    pub votes_by_period: sled::Tree,
    pub vote_guards: sled::Tree,
    pub meta: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let words = db.open_tree(trees::WORDS)?;
        let word_texts = db.open_tree(trees::WORD_TEXTS)?;
        let votes = db.open_tree(trees::VOTES)?;
        let votes_by_period = db.open_tree(trees::VOTES_BY_PERIOD)?;
        let vote_guards = db.open_tree(trees::VOTE_GUARDS)?;
        let meta = db.open_tree(trees::META)?;

        Ok(Self {
            db,
            words,
            word_texts,
            votes,
            votes_by_period,
            vote_guards,
            meta,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
