use crate::{attachment, configuration, oci, registry, target};
use std::{fmt, io};

#[derive(Debug)]
pub enum Error {
    IO(io::Error),
    Configuration(configuration::Error),
    ReferenceParse(oci::Error),
    DigestResolution(registry::Error),
    RepositoryComputation(target::Error),
    Attachment(attachment::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(err) => write!(f, "IO error: {err}"),
            Error::Configuration(err) => write!(f, "Configuration error: {err}"),
            Error::ReferenceParse(err) => write!(f, "{err}"),
            Error::DigestResolution(err) => write!(f, "{err}"),
            Error::RepositoryComputation(err) => write!(f, "{err}"),
            Error::Attachment(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IO(err)
    }
}

impl From<configuration::Error> for Error {
    fn from(err: configuration::Error) -> Self {
        Error::Configuration(err)
    }
}

impl From<oci::Error> for Error {
    fn from(err: oci::Error) -> Self {
        Error::ReferenceParse(err)
    }
}

impl From<registry::Error> for Error {
    fn from(err: registry::Error) -> Self {
        Error::DigestResolution(err)
    }
}

impl From<target::Error> for Error {
    fn from(err: target::Error) -> Self {
        Error::RepositoryComputation(err)
    }
}

impl From<attachment::Error> for Error {
    fn from(err: attachment::Error) -> Self {
        Error::Attachment(err)
    }
}
