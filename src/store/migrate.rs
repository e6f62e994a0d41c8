use crate::store::keys;
use crate::store::operations::votes::Vote;
use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_votes_by_period_index", m002_votes_by_period_index),
    ]
}

/// 执行所有未应用的数据库迁移。
///
/// - 每个迁移函数必须幂等：迁移可能在执行成功但 set_version 之前中断，重启后会重跑。
/// - 版本号在每个迁移成功后立即持久化。
/// - 仅向前：set_version 拒绝降级。
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    let all = migrations();

    for (index, (name, func)) in all.iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.meta.get(VERSION_KEY.as_bytes())? {
        Some(raw) => {
            let bytes: [u8; 4] = raw.as_ref().try_into().map_err(|_| StoreError::Migration {
                version: 0,
                message: format!("corrupt schema version ({} bytes)", raw.len()),
            })?;
            Ok(u32::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .meta
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

fn m002_votes_by_period_index(store: &Store) -> Result<(), StoreError> {
    for item in store.votes.iter() {
        let (vote_key, value) = item?;
        let vote: Vote = Store::deserialize(&value)?;
        let period_key = keys::vote_period_key(
            &vote.period_date,
            vote.created_at.timestamp_millis(),
            &vote.id,
        );
        store
            .votes_by_period
            .insert(period_key.as_bytes(), vote_key.to_vec())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn migration_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let store = Store::open(path.to_str().unwrap()).unwrap();

        run(&store).unwrap();
        let first = get_current_version(&store).unwrap();
        run(&store).unwrap();
        let second = get_current_version(&store).unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 2);
    }

    #[test]
    fn downgrade_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db2");
        let store = Store::open(path.to_str().unwrap()).unwrap();

        set_version(&store, 3).unwrap();
        let err = set_version(&store, 2).unwrap_err();
        assert!(matches!(err, StoreError::Migration { .. }));
    }

    #[test]
    fn period_index_is_backfilled_from_votes() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db3").to_str().unwrap()).unwrap();

        // 模拟只写了主表的旧数据
        let vote = Vote {
            id: "legacy-1".to_string(),
            fingerprint: "fp".to_string(),
            word_id: 4,
            r: 1,
            g: 2,
            b: 3,
            color_name: Some("Black".to_string()),
            period_date: "2025-08-03".to_string(),
            created_at: Utc::now(),
        };
        let key = keys::vote_key(vote.word_id, vote.created_at.timestamp_millis(), &vote.id);
        store
            .votes
            .insert(key.as_bytes(), Store::serialize(&vote).unwrap())
            .unwrap();
        assert!(store.get_votes_for_period("2025-08-03").unwrap().is_empty());

        run(&store).unwrap();
        assert_eq!(store.get_votes_for_period("2025-08-03").unwrap(), vec![vote]);
    }
}
