pub mod quiz_ctx;
pub mod session;

pub use quiz_ctx::QuizCtx;
pub use session::{InvalidTransition, QuizSession, SessionEvent, SessionState, Transition, TIMER_SECONDS};
