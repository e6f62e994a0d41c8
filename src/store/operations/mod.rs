pub mod votes;
pub mod words;
