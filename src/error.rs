use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Item location vanished between the scan and the access.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Archive could not be opened or an entry could not be decompressed.
    #[error("Corrupt archive {}: {reason}", .path.display())]
    CorruptArchive {
        /// Archive location.
        path: PathBuf,
        /// Underlying zip or decompression failure.
        reason: String,
    },

    /// Requested item is not in the catalog.
    #[error("Chapter not found: {0}")]
    UnknownItem(String),

    /// Requested page is not part of the item.
    #[error("Page not found: {item}/{page}")]
    UnknownPage {
        /// Item name.
        item: String,
        /// Page name.
        page: String,
    },

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build a [`AppError::CorruptArchive`] from any displayable failure.
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        AppError::CorruptArchive {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Map an I/O error on `path`, turning "not found" into [`AppError::NotFound`].
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(path.into())
        } else {
            AppError::Io(err)
        }
    }

    /// HTTP status code reported to clients.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownItem(_) | AppError::UnknownPage { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, self.to_string()).into_response()
    }
}

/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, AppError>;
