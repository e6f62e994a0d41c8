use sha2::{Digest, Sha256};

/// Zero-padded so lexicographic tree order matches numeric id order.
pub fn word_key(word_id: u64) -> String {
    format!("{:020}", word_id)
}

pub fn word_id_from_key(key: &[u8]) -> Option<u64> {
    std::str::from_utf8(key).ok()?.parse().ok()
}

pub fn word_text_key(text: &str) -> String {
    text.to_string()
}

pub fn vote_key(word_id: u64, timestamp_ms: i64, vote_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    format!("{:020}:{:020}:{}", word_id, ts, vote_id)
}

pub fn vote_word_prefix(word_id: u64) -> String {
    format!("{:020}:", word_id)
}

pub fn vote_period_key(period_date: &str, timestamp_ms: i64, vote_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    format!("{}:{:020}:{}", period_date, ts, vote_id)
}

pub fn vote_period_prefix(period_date: &str) -> String {
    format!("{}:", period_date)
}

/// 指纹为不透明字符串，哈希后作为键的一部分，避免分隔符冲突与超长键
pub fn fingerprint_hash(fingerprint: &str) -> String {
    hex::encode(Sha256::digest(fingerprint.as_bytes()))
}

pub fn word_vote_guard_key(word_id: u64, fingerprint: &str) -> String {
    format!("word:{:020}:{}", word_id, fingerprint_hash(fingerprint))
}

pub fn period_vote_guard_key(period_date: &str, fingerprint: &str) -> String {
    format!("period:{}:{}", period_date, fingerprint_hash(fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_keys_sort_numerically() {
        assert!(word_key(9) < word_key(10));
        assert!(word_key(99) < word_key(100));
        assert_eq!(word_id_from_key(word_key(42).as_bytes()), Some(42));
    }

    #[test]
    fn vote_key_orders_by_time_asc_within_word() {
        let k_old = vote_key(3, 1_000, "b");
        let k_new = vote_key(3, 2_000, "a");
        assert!(k_old < k_new);
        assert!(k_old.starts_with(&vote_word_prefix(3)));
        assert!(!vote_key(30, 0, "x").starts_with(&vote_word_prefix(3)));
    }

    #[test]
    fn guard_keys_hide_raw_fingerprint() {
        let key = word_vote_guard_key(1, "visitor:with:colons");
        assert!(!key.contains("visitor"));
        assert_eq!(key, word_vote_guard_key(1, "visitor:with:colons"));
        assert_ne!(key, word_vote_guard_key(2, "visitor:with:colons"));
        assert_ne!(
            period_vote_guard_key("2025-08-01", "fp"),
            period_vote_guard_key("2025-08-02", "fp")
        );
    }
}
