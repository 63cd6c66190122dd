// errors.rs
use crate::domain::flow::FlowError;
use crate::wizard::WizardError;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, wizard rules) or downstream layers (DB, config).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        ServerError::DbError(format!("stored JSON could not be read: {e}"))
    }
}

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) | ServerError::Flow(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::Wizard(err) if err.is_conflict() => 409,
            ServerError::Wizard(_) => 422,
            ServerError::DbError(_) | ServerError::Config(_) | ServerError::InternalError => 500,
        }
    }
}
