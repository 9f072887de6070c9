pub mod category;
pub mod question;
pub mod score;

pub use category::{category_label, Category, CategoryResponse, ANY_CATEGORY_LABEL};
pub use question::{AnsweredQuestion, Difficulty, Question, QuestionResponse, ANY_DIFFICULTY_LABEL};
pub use score::{percentage, score_text, Performance, QuizResult, ScoreEntry, ScoreRecord};
