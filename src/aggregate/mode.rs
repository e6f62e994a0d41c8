//! 最受欢迎颜色：按颜色名称取众数，并处理并列情况。

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::store::operations::votes::Vote;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub color_name: Option<String>,
    /// Votes sharing the winning name (1 when no name repeats).
    pub count: usize,
}

impl PopularColor {
    fn from_vote(vote: &Vote, count: usize) -> Self {
        Self {
            r: vote.r,
            g: vote.g,
            b: vote.b,
            color_name: vote.color_name.clone(),
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTally {
    /// Ordered by name so tie candidates are stable before the random pick.
    pub named: BTreeMap<String, usize>,
    pub unnamed: usize,
    pub total: usize,
}

impl NameTally {
    pub fn max_count(&self) -> usize {
        self.named.values().copied().max().unwrap_or(0)
    }
}

pub fn tally_names(votes: &[Vote]) -> NameTally {
    let mut tally = NameTally {
        total: votes.len(),
        ..NameTally::default()
    };
    for vote in votes {
        match &vote.color_name {
            Some(name) => *tally.named.entry(name.clone()).or_insert(0) += 1,
            None => tally.unnamed += 1,
        }
    }
    tally
}

/// Picks the mode color by name.
///
/// - No name repeats (all distinct or all unnamed): a uniformly random vote.
/// - Several names tie at the top: a uniformly random name among them, then
///   the requester's own vote with that name, else the earliest one.
pub fn most_popular<R: Rng + ?Sized>(
    votes: &[Vote],
    requester: Option<&str>,
    rng: &mut R,
) -> Option<PopularColor> {
    if votes.is_empty() {
        return None;
    }

    let tally = tally_names(votes);
    let max = tally.max_count();
    if max <= 1 {
        return votes.choose(rng).map(|vote| PopularColor::from_vote(vote, 1));
    }

    let tied: Vec<&String> = tally
        .named
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(name, _)| name)
        .collect();
    let name = *tied.choose(rng)?;

    let with_name = || {
        votes
            .iter()
            .filter(move |vote| vote.color_name.as_deref() == Some(name.as_str()))
    };
    let own = requester.and_then(|fingerprint| {
        with_name().find(|vote| vote.fingerprint == fingerprint)
    });
    let chosen = match own {
        Some(vote) => vote,
        None => with_name().min_by_key(|vote| vote.created_at)?,
    };

    Some(PopularColor::from_vote(chosen, max))
}
