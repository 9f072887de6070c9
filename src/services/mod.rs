pub mod leaderboard;
pub mod question_source;
pub mod score_store;

pub use leaderboard::{rank_records, LeaderboardEngine};
pub use question_source::{QuestionSource, TriviaRepository};
pub use score_store::{JsonFileScoreStore, MemoryScoreStore, ScoreStore};
