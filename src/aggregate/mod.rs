//! Vote aggregation: mean color, mode color and the history rollup.

pub mod color;
pub mod history;
pub mod mode;

use rand::Rng;

use crate::store::operations::votes::{Rgb, Vote};

pub use color::{average_color, average_rgb};
pub use history::{build_history, HistoryEntry};
pub use mode::{most_popular, tally_names, NameTally, PopularColor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSummary {
    pub vote_count: usize,
    pub average_color: Option<Rgb>,
    pub most_popular: Option<PopularColor>,
}

pub fn summarize<R: Rng + ?Sized>(votes: &[Vote], requester: Option<&str>, rng: &mut R) -> VoteSummary {
    VoteSummary {
        vote_count: votes.len(),
        average_color: average_color(votes),
        most_popular: most_popular(votes, requester, rng),
    }
}
