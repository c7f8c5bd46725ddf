use std::fmt;

#[derive(Debug, PartialEq)]
pub enum Error {
    UnknownAttachmentKind(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownAttachmentKind(kind) => write!(f, "unknown attachment type {kind}"),
        }
    }
}

impl std::error::Error for Error {}
