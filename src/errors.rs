use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode store: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The document could not be parsed or lacks the expected structure.
    /// Nothing was written.
    #[error("Invalid backup file")]
    InvalidDocument,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::internal(err)
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        let message = err.to_string();
        match err {
            ImportError::InvalidDocument => Self::bad_request(message),
            ImportError::Store(err) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        (self.status, self.message).into_response()
    }
}
