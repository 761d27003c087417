pub mod log_entry;
pub mod quiz;

pub use log_entry::LogEntry;
pub use quiz::{QuizRecord, QuizRequest, QuizResponse, RequestEcho};
