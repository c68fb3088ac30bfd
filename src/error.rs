use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogstatError>;

#[derive(Error, Debug)]
pub enum LogstatError {
    #[error("No logs have been entered.")]
    NoInput,
    #[error("No valid logs have been entered.")]
    NoValidEntries,
    #[error("Git error: {0}")]
    Git(String),
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
