//! Error types.
//!
//! [`ApiError`] is what a product handler fails with; it maps to exactly one
//! status code and a plain-text body. [`Error`] surfaces infrastructure
//! failures: a bad listen address, or binding the port.

use thiserror::Error;
use tracing::{debug, error};

use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::storage::StoreError;

/// The error type returned by shelf's fallible server operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid listen address `{0}`")]
    Addr(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single product request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error reading database")]
    StorageRead(#[source] StoreError),

    #[error("Error writing to database")]
    StorageWrite(#[source] StoreError),

    #[error("Product not found")]
    NotFound,

    #[error("{0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::StorageRead(_) | Self::StorageWrite(_) => Status::InternalServerError,
            Self::NotFound => Status::NotFound,
            Self::InvalidRequest(_) => Status::BadRequest,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Write { .. } | StoreError::Encode(_) => Self::StorageWrite(e),
            _ => Self::StorageRead(e),
        }
    }
}

/// Clients only ever see the generic message; the cause goes to the log.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::StorageRead(cause) | Self::StorageWrite(cause) => {
                error!(error = %cause, "{self}");
            }
            _ => debug!("{self}"),
        }
        Response::builder().status(self.status()).text(self.to_string())
    }
}
