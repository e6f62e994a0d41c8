pub const WORDS: &str = "words";
pub const WORD_TEXTS: &str = "word_texts";
pub const VOTES: &str = "votes";

// Secondary index trees
pub const VOTES_BY_PERIOD: &str = "votes_by_period";
pub const VOTE_GUARDS: &str = "vote_guards";

pub const META: &str = "meta";
