pub mod runner;

pub use runner::{answer_questions, AnswerLayout, RunSummary, Runner};
