use thiserror::Error;

use super::transport::Method;

/// Error returned by the API client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {path} failed: {message}")]
    Transport {
        method: Method,
        path: String,
        message: String,
    },
    #[error("{method} {path} returned unexpected status code {status}: {body}")]
    UnexpectedStatus {
        method: Method,
        path: String,
        status: u16,
        body: String,
    },
    #[error("{method} {path} returned an invalid body: {source}")]
    Decode {
        method: Method,
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode the request body for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status of the response, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
