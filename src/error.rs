//! Errors that can be returned by this crate

use thiserror::Error;

use crate::task::TaskId;

/// Errors returned by the task store and the [`Agenda`](crate::Agenda)
#[derive(Debug, Error)]
pub enum AgendaError {
    /// A required field is missing or malformed. The mutation has not been applied.
    #[error("invalid task: {0}")]
    Validation(#[from] ValidationError),

    /// No task has this ID
    #[error("no task with ID {0}")]
    NotFound(TaskId),

    /// The stored snapshot could not be decoded
    #[error("stored snapshot is unreadable: {0}")]
    PersistenceCorrupt(#[from] serde_json::Error),

    /// The persistence slot could not be read or written
    #[error("unable to access the persistence slot: {0}")]
    Persistence(#[from] std::io::Error),
}

/// Reasons why a task (or an action on the agenda) has been rejected
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("the title must not be empty")]
    EmptyTitle,
    #[error("the location must not be empty")]
    EmptyLocation,
    #[error("{0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("{0:?} is not a HH:MM time")]
    InvalidTime(String),
    #[error("a task with ID {0} already exists")]
    DuplicateId(TaskId),
    #[error("at least {required} tasks are needed, found {found}")]
    NotEnoughTasks { required: usize, found: usize },
}

/// Errors that an [`Assistant`](crate::traits::Assistant) may hit.
///
/// These are never propagated to the task-management flow: they are logged and replaced by fallback values.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unable to decode the answer: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("the answer contains no text")]
    EmptyResponse,
    #[error("no API key is configured")]
    MissingApiKey,
    #[error("no assistant is available")]
    Unavailable,
    #[error("{0}")]
    Scripted(String),
}
