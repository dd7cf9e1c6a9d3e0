use engine::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("http client error: {0}")]
    Backend(#[from] engine::TransportError),
    #[error("transaction {0} not found")]
    NotFound(String),
}

impl AppError {
    /// What gets printed for the user. Store failures use the generic
    /// per-operation notice, details only go to the log.
    pub fn notice(&self) -> String {
        match self {
            Self::Store(err) => err.notice(),
            other => other.to_string(),
        }
    }
}
