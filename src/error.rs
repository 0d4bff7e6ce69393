use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("policy violation: {0}")]
    Policy(String),

    #[error("illegal state transition: {0}")]
    State(String),

    #[error("no volunteer capacity left on post {0}")]
    Capacity(String),

    #[error("compensation failed: {0}")]
    Compensation(String),

    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}
