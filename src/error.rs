/// Error kinds surfaced to the popup, options page and background handler
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StashError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} was not present in the Stash")]
    NotFound(String),

    #[error("found no URLs to open")]
    NothingToOpen,

    #[error("import was empty")]
    EmptyImport,

    #[error("bump delta is missing a bump amount")]
    MissingBumpAmount,

    #[error("unsupported delta type: {0}")]
    UnsupportedDelta(String),

    #[error("stash data was modified by another writer, try again")]
    Conflict,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StashError>;

/// Notification text for a failed user action, e.g. "Remove failed: ..."
pub fn failure_message(action: &str, error: &StashError) -> String {
    format!("{} failed: {}", action, error)
}
