use hyper::header::InvalidHeaderValue;
use hyper::StatusCode;
use std::fmt::Display;
use tracing::debug;

#[derive(Debug, PartialEq)]
pub enum Error {
    ManifestUnknown(String),
    DigestInvalid(String),
    Unauthorized(String),
    Denied(String),
    UnexpectedStatus(StatusCode),
    Timeout,
    Internal(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ManifestUnknown(s) => write!(f, "manifest unknown to registry: {s}"),
            Error::DigestInvalid(s) => write!(f, "registry returned an invalid digest: {s}"),
            Error::Unauthorized(s) => write!(f, "unauthorized: {s}"),
            Error::Denied(s) => write!(f, "requested access to the resource is denied: {s}"),
            Error::UnexpectedStatus(status) => {
                write!(f, "unexpected status from registry: {status}")
            }
            Error::Timeout => write!(f, "registry request timed out"),
            Error::Internal(s) => write!(f, "internal error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<hyper::http::Error> for Error {
    fn from(error: hyper::http::Error) -> Self {
        debug!("HTTP error: {error}");
        Error::Internal(format!("invalid request: {error}"))
    }
}

impl From<hyper::Error> for Error {
    fn from(error: hyper::Error) -> Self {
        debug!("Hyper error: {error}");
        Error::Internal(format!("failed to read response: {error}"))
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(error: InvalidHeaderValue) -> Self {
        Error::Internal(format!("invalid header value: {error}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Internal(format!("failed to parse response: {error}"))
    }
}
