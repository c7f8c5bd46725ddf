use regex::Regex;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::oci::{Digest, Error, Repository};

const DEFAULT_TAG: &str = "latest";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").unwrap());

/// A parsed image reference: `[registry/]path[:tag][@digest]`.
///
/// Tag and digest may both be present; the digest takes precedence when
/// addressing the image. A reference with neither is tagged `latest`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageReference {
    repository: Repository,
    tag: Option<String>,
    digest: Option<Digest>,
}

impl ImageReference {
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() {
            return Err(Error::InvalidFormat(
                "could not parse reference: ''".to_string(),
            ));
        }

        let (name, digest) = match s.split_once('@') {
            Some((name, digest)) => (name, Some(Digest::try_from(digest)?)),
            None => (s, None),
        };

        // A colon after the last slash separates the tag; earlier ones belong
        // to a registry port.
        let (name, tag) = match name.rfind(':') {
            Some(i) if !name[i..].contains('/') => (&name[..i], Some(&name[i + 1..])),
            _ => (name, None),
        };

        let tag = match tag {
            Some(tag) if TAG_RE.is_match(tag) => Some(tag.to_string()),
            Some(tag) => {
                return Err(Error::InvalidFormat(format!("invalid tag: '{tag}'")));
            }
            None if digest.is_none() => Some(DEFAULT_TAG.to_string()),
            None => None,
        };

        Ok(Self {
            repository: Repository::parse(name)?,
            tag,
            digest,
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }

    /// The tag or digest used to address the manifest, digest first.
    pub fn identifier(&self) -> String {
        match (&self.digest, &self.tag) {
            (Some(digest), _) => digest.to_string(),
            (None, Some(tag)) => tag.clone(),
            (None, None) => DEFAULT_TAG.to_string(),
        }
    }
}

impl FromStr for ImageReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ImageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}
