use thiserror::Error;

/// Failure taxonomy for data API operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport-level failure. Retryable by re-invoking the operation.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success response that is not caller-correctable. Not retried
    /// automatically.
    #[error("server error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// Caller-input problem, surfaced to the user for correction.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Classifies a non-2xx status together with the server's detail message.
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            404 => ApiError::NotFound(detail),
            400 | 422 => ApiError::Validation(detail),
            _ => ApiError::Server { status, message: detail },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            ApiError::from_status(404, "gone".into()),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(400, "bad".into()),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from_status(422, "empty content".into()),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from_status(500, "boom".into()),
            ApiError::Server { status: 500, .. }
        ));
        assert!(matches!(
            ApiError::from_status(503, "busy".into()),
            ApiError::Server { status: 503, .. }
        ));
    }
}
