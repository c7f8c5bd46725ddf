use regex::Regex;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::oci::Error;

static DIGEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<algorithm>[a-z0-9]+):(?P<hash>[a-f0-9]+)$").unwrap()
});

/// A content digest, `<algorithm>:<hex>`.
///
/// Only the syntax is checked: the hex length must match what the algorithm
/// produces.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum Digest {
    Sha256(String),
    Sha384(String),
    Sha512(String),
}

impl Digest {
    pub fn algorithm(&self) -> &str {
        match self {
            Digest::Sha256(_) => "sha256",
            Digest::Sha384(_) => "sha384",
            Digest::Sha512(_) => "sha512",
        }
    }

    pub fn hash(&self) -> &str {
        match self {
            Digest::Sha256(s) | Digest::Sha384(s) | Digest::Sha512(s) => s,
        }
    }
}

impl TryFrom<&str> for Digest {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let captures = DIGEST_RE
            .captures(s)
            .ok_or_else(|| Error::InvalidFormat(format!("invalid digest: '{s}'")))?;

        let hash = captures["hash"].to_string();
        let (digest, expected_len) = match &captures["algorithm"] {
            "sha256" => (Digest::Sha256(hash), 64),
            "sha384" => (Digest::Sha384(hash), 96),
            "sha512" => (Digest::Sha512(hash), 128),
            algorithm => {
                return Err(Error::InvalidFormat(format!(
                    "unsupported digest algorithm: '{algorithm}'"
                )))
            }
        };

        if digest.hash().len() != expected_len {
            return Err(Error::InvalidFormat(format!(
                "invalid {} digest length: '{s}'",
                digest.algorithm()
            )));
        }

        Ok(digest)
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm(), self.hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA256_HEX: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_parse_sha256() {
        let digest = Digest::try_from(format!("sha256:{SHA256_HEX}").as_str()).unwrap();
        assert_eq!(digest, Digest::Sha256(SHA256_HEX.to_string()));
        assert_eq!(digest.algorithm(), "sha256");
        assert_eq!(digest.hash(), SHA256_HEX);
        assert_eq!(digest.to_string(), format!("sha256:{SHA256_HEX}"));
    }

    #[test]
    fn test_parse_sha512() {
        let hex = "ab".repeat(64);
        let digest = Digest::from_str(&format!("sha512:{hex}")).unwrap();
        assert_eq!(digest, Digest::Sha512(hex));
    }

    #[test]
    fn test_parse_wrong_length() {
        let result = Digest::try_from("sha256:abc123");
        assert_eq!(
            result,
            Err(Error::InvalidFormat(
                "invalid sha256 digest length: 'sha256:abc123'".to_string()
            ))
        );

        let hex = "ab".repeat(48);
        assert!(Digest::try_from(format!("sha256:{hex}").as_str()).is_err());
        assert!(Digest::try_from(format!("sha384:{hex}").as_str()).is_ok());
    }

    #[test]
    fn test_parse_unsupported_algorithm() {
        let result = Digest::try_from(format!("md5:{SHA256_HEX}").as_str());
        assert_eq!(
            result,
            Err(Error::InvalidFormat(
                "unsupported digest algorithm: 'md5'".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(Digest::try_from("").is_err());
        assert!(Digest::try_from(SHA256_HEX).is_err());
        assert!(Digest::try_from(format!("sha256:{}", SHA256_HEX.to_uppercase()).as_str()).is_err());
        assert!(Digest::try_from(format!("sha256-{SHA256_HEX}").as_str()).is_err());
    }
}
