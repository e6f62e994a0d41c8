use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::Transactional;

use crate::config::VoteScopeMode;
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub fingerprint: String,
    pub word_id: u64,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub color_name: Option<String>,
    pub period_date: String,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// The key a visitor's single vote is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteScope {
    Word(u64),
    Period(String),
}

impl VoteScope {
    pub fn resolve(mode: VoteScopeMode, word_id: u64, period_date: &str) -> Self {
        match mode {
            VoteScopeMode::PerWord => VoteScope::Word(word_id),
            VoteScopeMode::PerPeriod => VoteScope::Period(period_date.to_string()),
        }
    }

    fn guard_key(&self, fingerprint: &str) -> String {
        match self {
            VoteScope::Word(word_id) => keys::word_vote_guard_key(*word_id, fingerprint),
            VoteScope::Period(date) => keys::period_vote_guard_key(date, fingerprint),
        }
    }
}

impl fmt::Display for VoteScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteScope::Word(word_id) => write!(f, "word:{word_id}"),
            VoteScope::Period(date) => write!(f, "period:{date}"),
        }
    }
}

impl Store {
    /// Fast-path check; `insert_vote` is the authoritative guard.
    ///
    /// 与 `get_vote` 判定一致：索引存在但指向的投票不存在时视为未投票。
    pub fn has_voted(&self, fingerprint: &str, scope: &VoteScope) -> Result<bool, StoreError> {
        let guard_key = scope.guard_key(fingerprint);
        let Some(vote_key) = self.vote_guards.get(guard_key.as_bytes())? else {
            return Ok(false);
        };
        Ok(self.votes.contains_key(&vote_key)?)
    }

    pub fn get_vote(&self, fingerprint: &str, scope: &VoteScope) -> Result<Option<Vote>, StoreError> {
        let guard_key = scope.guard_key(fingerprint);
        let Some(vote_key) = self.vote_guards.get(guard_key.as_bytes())? else {
            return Ok(None);
        };
        match self.votes.get(&vote_key)? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => {
                tracing::warn!(scope = %scope, "Vote guard points at a missing vote");
                Ok(None)
            }
        }
    }

    /// 写入投票。唯一索引、投票本体和周期索引在同一个事务里提交，
    /// 并发重复提交中只有一个能成功，其余返回 Conflict。
    /// 索引指向不存在的投票时直接覆盖该索引。
    pub fn insert_vote(&self, vote: &Vote, scope: &VoteScope) -> Result<(), StoreError> {
        let guard_key = scope.guard_key(&vote.fingerprint);
        let ts = vote.created_at.timestamp_millis();
        let vote_key = keys::vote_key(vote.word_id, ts, &vote.id);
        let period_key = keys::vote_period_key(&vote.period_date, ts, &vote.id);
        let vote_bytes = Self::serialize(vote)?;

        (&self.vote_guards, &self.votes, &self.votes_by_period)
            .transaction(|(tx_guards, tx_votes, tx_period)| {
                if let Some(existing) = tx_guards.get(guard_key.as_bytes())? {
                    if tx_votes.get(&existing)?.is_some() {
                        return Err(sled::transaction::ConflictableTransactionError::Abort(
                            StoreError::Conflict {
                                entity: "vote".to_string(),
                                key: scope.to_string(),
                            },
                        ));
                    }
                }
                tx_guards.insert(guard_key.as_bytes(), vote_key.as_bytes())?;
                tx_votes.insert(vote_key.as_bytes(), vote_bytes.as_slice())?;
                tx_period.insert(period_key.as_bytes(), vote_key.as_bytes())?;
                Ok(())
            })
            .map_err(
                |error: sled::transaction::TransactionError<StoreError>| match error {
                    sled::transaction::TransactionError::Abort(store_error) => store_error,
                    sled::transaction::TransactionError::Storage(storage_error) => {
                        tracing::error!(error = %storage_error, scope = %scope, "Vote transaction failed");
                        StoreError::Sled(storage_error)
                    }
                },
            )
    }

    /// All votes for a word, oldest first.
    pub fn get_votes_for_word(&self, word_id: u64) -> Result<Vec<Vote>, StoreError> {
        let prefix = keys::vote_word_prefix(word_id);
        let mut votes = Vec::new();
        for item in self.votes.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            votes.push(Self::deserialize::<Vote>(&value)?);
        }
        Ok(votes)
    }

    /// All votes cast during a period, oldest first.
    pub fn get_votes_for_period(&self, period_date: &str) -> Result<Vec<Vote>, StoreError> {
        let prefix = keys::vote_period_prefix(period_date);
        let mut votes = Vec::new();
        for item in self.votes_by_period.scan_prefix(prefix.as_bytes()) {
            let (_, vote_key) = item?;
            match self.votes.get(&vote_key)? {
                Some(raw) => votes.push(Self::deserialize::<Vote>(&raw)?),
                None => {
                    tracing::warn!(
                        period_date,
                        key = %String::from_utf8_lossy(&vote_key),
                        "Dangling period index entry"
                    );
                }
            }
        }
        Ok(votes)
    }

    pub fn count_votes(&self) -> Result<u64, StoreError> {
        Ok(self.votes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    use super::*;

    fn open_store(name: &str) -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join(name).to_str().unwrap()).unwrap();
        (dir, store)
    }

    fn sample_vote(fingerprint: &str, word_id: u64, period_date: &str, offset_secs: i64) -> Vote {
        let base = Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap();
        Vote {
            id: uuid::Uuid::new_v4().to_string(),
            fingerprint: fingerprint.to_string(),
            word_id,
            r: 10,
            g: 20,
            b: 30,
            color_name: None,
            period_date: period_date.to_string(),
            created_at: base + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn second_vote_for_same_word_conflicts() {
        let (_dir, store) = open_store("votes-dup");
        let scope = VoteScope::Word(1);
        let first = sample_vote("fp-1", 1, "2025-08-01", 0);
        store.insert_vote(&first, &scope).unwrap();

        let mut second = sample_vote("fp-1", 1, "2025-08-01", 5);
        second.r = 200;
        let err = store.insert_vote(&second, &scope).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        assert!(store.has_voted("fp-1", &scope).unwrap());
        assert_eq!(store.get_vote("fp-1", &scope).unwrap(), Some(first));
        assert_eq!(store.get_votes_for_word(1).unwrap().len(), 1);
    }

    #[test]
    fn period_scope_allows_same_word_on_another_day() {
        let (_dir, store) = open_store("votes-period");
        store
            .insert_vote(
                &sample_vote("fp-1", 1, "2025-08-01", 0),
                &VoteScope::Period("2025-08-01".to_string()),
            )
            .unwrap();
        store
            .insert_vote(
                &sample_vote("fp-1", 1, "2025-08-05", 0),
                &VoteScope::Period("2025-08-05".to_string()),
            )
            .unwrap();

        assert_eq!(store.get_votes_for_word(1).unwrap().len(), 2);
        assert!(!store.has_voted("fp-1", &VoteScope::Period("2025-08-02".to_string())).unwrap());
    }

    #[test]
    fn votes_are_grouped_by_word_and_period() {
        let (_dir, store) = open_store("votes-group");
        store.insert_vote(&sample_vote("a", 1, "2025-08-01", 30), &VoteScope::Word(1)).unwrap();
        store.insert_vote(&sample_vote("b", 1, "2025-08-01", 10), &VoteScope::Word(1)).unwrap();
        store.insert_vote(&sample_vote("a", 2, "2025-08-02", 0), &VoteScope::Word(2)).unwrap();

        let word_votes = store.get_votes_for_word(1).unwrap();
        let fingerprints: Vec<&str> = word_votes.iter().map(|v| v.fingerprint.as_str()).collect();
        assert_eq!(fingerprints, vec!["b", "a"]);

        assert_eq!(store.get_votes_for_period("2025-08-01").unwrap().len(), 2);
        assert_eq!(store.get_votes_for_period("2025-08-02").unwrap().len(), 1);
        assert!(store.get_votes_for_period("2025-08-03").unwrap().is_empty());
        assert_eq!(store.count_votes().unwrap(), 3);
    }

    #[test]
    fn dangling_guard_does_not_lock_out_voter() {
        let (_dir, store) = open_store("votes-dangling");
        let scope = VoteScope::Word(3);
        let guard_key = scope.guard_key("fp-lost");
        store
            .vote_guards
            .insert(guard_key.as_bytes(), keys::vote_key(3, 0, "never-written").as_bytes())
            .unwrap();

        assert!(!store.has_voted("fp-lost", &scope).unwrap());
        assert_eq!(store.get_vote("fp-lost", &scope).unwrap(), None);

        let vote = sample_vote("fp-lost", 3, "2025-08-01", 0);
        store.insert_vote(&vote, &scope).unwrap();
        assert!(store.has_voted("fp-lost", &scope).unwrap());
        assert_eq!(store.get_vote("fp-lost", &scope).unwrap(), Some(vote));

        let again = sample_vote("fp-lost", 3, "2025-08-01", 9);
        assert!(matches!(
            store.insert_vote(&again, &scope),
            Err(StoreError::Conflict { .. })
        ));
    }

    #[test]
    fn concurrent_duplicates_only_store_one_vote() {
        let (_dir, store) = open_store("votes-race");
        let store = std::sync::Arc::new(store);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .insert_vote(&sample_vote("same-fp", 7, "2025-08-01", i), &VoteScope::Word(7))
                        .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.get_votes_for_word(7).unwrap().len(), 1);
    }
}
