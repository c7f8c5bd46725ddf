use crate::oci;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum Error {
    InvalidOverride(String, oci::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidOverride(value, err) => {
                write!(f, "invalid target repository '{value}': {err}")
            }
        }
    }
}

impl std::error::Error for Error {}
