use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::oci::Error;

/// Registry used when a reference does not name one.
pub const DEFAULT_REGISTRY: &str = "index.docker.io";
const DOCKER_HUB_ALIAS: &str = "docker.io";
const OFFICIAL_REPOSITORY_PREFIX: &str = "library";
const MAX_PATH_LENGTH: usize = 255;

static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:[._-][a-z0-9]+)*(?:/[a-z0-9]+(?:[._-][a-z0-9]+)*)*$").unwrap()
});

static REGISTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\[[0-9a-fA-F:]+\]|[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*)(?::[0-9]+)?$",
    )
    .unwrap()
});

/// A repository within a registry, e.g. `ghcr.io/org/app`.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Repository {
    registry: String,
    path: String,
}

impl Repository {
    pub fn new(registry: &str, path: &str) -> Result<Self, Error> {
        let registry = if registry == DOCKER_HUB_ALIAS {
            DEFAULT_REGISTRY
        } else {
            registry
        };

        if !REGISTRY_RE.is_match(registry) {
            return Err(Error::InvalidFormat(format!(
                "invalid registry: '{registry}'"
            )));
        }

        let path = if registry == DEFAULT_REGISTRY && !path.contains('/') {
            format!("{OFFICIAL_REPOSITORY_PREFIX}/{path}")
        } else {
            path.to_string()
        };

        if path.len() > MAX_PATH_LENGTH || !PATH_RE.is_match(&path) {
            return Err(Error::InvalidFormat(format!(
                "invalid repository path: '{path}'"
            )));
        }

        Ok(Self {
            registry: registry.to_string(),
            path,
        })
    }

    /// Parses `[registry/]path`. The first component is taken as a registry
    /// when it contains a `.` or a `:`, or is `localhost`.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() {
            return Err(Error::InvalidFormat(
                "repository cannot be empty".to_string(),
            ));
        }

        match s.split_once('/') {
            Some((first, rest)) if is_registry(first) => Self::new(first, rest),
            _ => Self::new(DEFAULT_REGISTRY, s),
        }
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_registry(s: &str) -> bool {
    s.contains('.') || s.contains(':') || s == "localhost"
}

impl FromStr for Repository {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Repository {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.registry, self.path)
    }
}
