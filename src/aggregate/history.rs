use std::collections::HashSet;

use serde::Serialize;

use crate::aggregate::color::average_color;
use crate::config::{RotationConfig, VoteScopeMode};
use crate::rotation::{word_index, Period, RotationError};
use crate::store::operations::votes::{Rgb, Vote};
use crate::store::operations::words::Word;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub word: String,
    pub word_id: u64,
    pub vote_count: usize,
    pub average_color: Option<Rgb>,
    pub date: String,
    pub day: usize,
}

/// 汇总当前周期之前所有周期的投票，按日期升序编号后倒序返回（最近的在前）。
///
/// 按单词计票时，同一单词只出现一次，日期取其最早一票的周期，
/// 且当前周期的单词整体排除；按周期计票时，每个有投票的历史周期一条。
pub fn build_history(
    store: &Store,
    config: &RotationConfig,
    current: &Period,
) -> Result<Vec<HistoryEntry>, RotationError> {
    let catalog = store.list_words()?;
    let current_word = word_for(&catalog, current.days_elapsed)?;
    let mut entries = Vec::new();

    match config.vote_scope {
        VoteScopeMode::PerWord => {
            let mut seen = HashSet::from([current_word.id]);
            for days_elapsed in 0..current.days_elapsed {
                if seen.len() == catalog.len() {
                    break;
                }
                let word = word_for(&catalog, days_elapsed)?;
                if !seen.insert(word.id) {
                    continue;
                }
                let votes = store.get_votes_for_word(word.id)?;
                // 日期取该单词最早一票所在的周期
                let Some(first_date) = votes.iter().map(|v| v.period_date.as_str()).min() else {
                    continue;
                };
                let first_date = first_date.to_string();
                push_entry(&mut entries, word, &votes, first_date);
            }
        }
        VoteScopeMode::PerPeriod => {
            for days_elapsed in 0..current.days_elapsed {
                let period = Period::from_days_elapsed(days_elapsed, config)?;
                let word = word_for(&catalog, days_elapsed)?;
                let votes: Vec<Vote> = store
                    .get_votes_for_period(&period.date)?
                    .into_iter()
                    .filter(|v| v.word_id == word.id)
                    .collect();
                push_entry(&mut entries, word, &votes, period.date);
            }
        }
    }

    entries.sort_by(|a, b| a.date.cmp(&b.date));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.day = i + 1;
    }
    entries.reverse();

    tracing::debug!(
        entries = entries.len(),
        current = %current.date,
        "History rollup built"
    );
    Ok(entries)
}

fn word_for(catalog: &[Word], days_elapsed: i64) -> Result<&Word, RotationError> {
    let index = word_index(days_elapsed, catalog.len() as u64)?;
    usize::try_from(index)
        .ok()
        .and_then(|i| catalog.get(i))
        .ok_or(RotationError::NoWords)
}

fn push_entry(entries: &mut Vec<HistoryEntry>, word: &Word, votes: &[Vote], date: String) {
    if votes.is_empty() {
        return;
    }
    entries.push(HistoryEntry {
        word: word.text.clone(),
        word_id: word.id,
        vote_count: votes.len(),
        average_color: average_color(votes),
        date,
        day: 0,
    });
}
