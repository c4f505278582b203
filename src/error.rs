use lambda_http::{Body, Response, tracing};
use thiserror::Error;

use crate::http::error_response;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum TicketError {
    #[error("invalid input")]
    InvalidInput,

    #[error("could not {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: StorageError,
    },
}

impl TicketError {
    /// Wraps a store failure with the operation that was attempted.
    pub fn storage(action: &'static str) -> impl FnOnce(StorageError) -> TicketError {
        move |source| TicketError::Storage { action, source }
    }

    pub fn status(&self) -> u16 {
        match self {
            TicketError::InvalidInput => 400,
            TicketError::Storage { .. } => 503,
        }
    }

    pub fn into_response(self) -> Response<Body> {
        let status = self.status();
        match self {
            TicketError::InvalidInput => {
                tracing::warn!("rejected request with invalid input");
                error_response(status, "Invalid input", None)
            }
            TicketError::Storage { action, source } => {
                tracing::error!(action, error = %source, "storage call failed");
                error_response(status, &format!("Could not {}", action), Some(&format!("{:?}", source)))
            }
        }
    }
}
