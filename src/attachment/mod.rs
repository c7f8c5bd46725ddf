//! Naming scheme for artifacts attached to an image.
//!
//! Signatures, attestations and SBOMs are stored under a tag derived from
//! the digest of the image they describe:
//! `<repository>:<algorithm>-<hex>.<suffix>`. Other tools locate them by
//! recomputing that tag, so the output must stay byte-for-byte stable.

mod error;

use crate::oci::{Digest, Repository};
pub use error::Error;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const SIGNATURE_TAG_SUFFIX: &str = "sig";
pub const ATTESTATION_TAG_SUFFIX: &str = "att";
pub const SBOM_TAG_SUFFIX: &str = "sbom";

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AttachmentKind {
    #[default]
    Signature,
    Attestation,
    Sbom,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 3] = [
        AttachmentKind::Signature,
        AttachmentKind::Attestation,
        AttachmentKind::Sbom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AttachmentKind::Signature => "signature",
            AttachmentKind::Attestation => "attestation",
            AttachmentKind::Sbom => "sbom",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            AttachmentKind::Signature => SIGNATURE_TAG_SUFFIX,
            AttachmentKind::Attestation => ATTESTATION_TAG_SUFFIX,
            AttachmentKind::Sbom => SBOM_TAG_SUFFIX,
        }
    }
}

impl FromStr for AttachmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttachmentKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownAttachmentKind(s.to_string()))
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A tag in the target repository designating one attachment of an image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttachedTag {
    repository: Repository,
    tag: String,
}

impl AttachedTag {
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Fully qualified name, `<registry>/<path>:<tag>`.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttachedTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

/// Derives the tag under which `kind` is stored for the image `digest`.
///
/// `:` is not allowed in tags, so the digest separator becomes `-`.
pub fn derive_attachment_tag(
    repository: &Repository,
    digest: &Digest,
    kind: AttachmentKind,
) -> AttachedTag {
    let tag = format!("{}.{}", digest.to_string().replace(':', "-"), kind.suffix());
    debug!("Derived {kind} tag {tag} in {repository}");

    AttachedTag {
        repository: repository.clone(),
        tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "abc1230000000000000000000000000000000000000000000000000000000000";

    fn demo() -> (Repository, Digest) {
        let repository = Repository::parse("registry.example.com/demo").unwrap();
        let digest = Digest::try_from(format!("sha256:{HEX}").as_str()).unwrap();
        (repository, digest)
    }

    #[test]
    fn test_signature_tag() {
        let (repository, digest) = demo();
        let tag = derive_attachment_tag(&repository, &digest, AttachmentKind::Signature);

        assert_eq!(tag.tag(), format!("sha256-{HEX}.sig"));
        assert_eq!(
            tag.name(),
            format!("registry.example.com/demo:sha256-{HEX}.sig")
        );
        assert_eq!(tag.repository(), &repository);
    }

    #[test]
    fn test_sbom_tag_shares_digest_prefix() {
        let (repository, digest) = demo();
        let signature = derive_attachment_tag(&repository, &digest, AttachmentKind::Signature);
        let sbom = derive_attachment_tag(&repository, &digest, AttachmentKind::Sbom);

        assert!(sbom.name().ends_with(".sbom"));
        assert_eq!(
            sbom.tag().strip_suffix(".sbom"),
            signature.tag().strip_suffix(".sig")
        );
    }

    #[test]
    fn test_attestation_tag() {
        let (repository, digest) = demo();
        let tag = derive_attachment_tag(&repository, &digest, AttachmentKind::Attestation);
        assert_eq!(tag.tag(), format!("sha256-{HEX}.att"));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let (repository, digest) = demo();
        for kind in AttachmentKind::ALL {
            assert_eq!(
                derive_attachment_tag(&repository, &digest, kind),
                derive_attachment_tag(&repository, &digest, kind)
            );
        }
    }

    #[test]
    fn test_tag_has_no_digest_separator() {
        let repository = Repository::parse("localhost:5000/demo").unwrap();
        let digest = Digest::try_from(format!("sha512:{}", "e".repeat(128)).as_str()).unwrap();

        for kind in AttachmentKind::ALL {
            let tag = derive_attachment_tag(&repository, &digest, kind);
            assert!(!tag.tag().contains(':'));
            assert!(tag.tag().starts_with("sha512-"));
            assert!(tag.tag().ends_with(&format!(".{}", kind.suffix())));
        }
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("signature".parse::<AttachmentKind>(), Ok(AttachmentKind::Signature));
        assert_eq!("attestation".parse::<AttachmentKind>(), Ok(AttachmentKind::Attestation));
        assert_eq!("sbom".parse::<AttachmentKind>(), Ok(AttachmentKind::Sbom));
        assert_eq!(AttachmentKind::default(), AttachmentKind::Signature);
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            "bogus".parse::<AttachmentKind>(),
            Err(Error::UnknownAttachmentKind("bogus".to_string()))
        );
        assert!("Signature".parse::<AttachmentKind>().is_err());
        assert!("sig".parse::<AttachmentKind>().is_err());
    }
}
