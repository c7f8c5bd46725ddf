use crate::attachment::{derive_attachment_tag, AttachedTag, AttachmentKind};
use crate::command::Error;
use crate::oci::ImageReference;
use crate::registry::DigestResolver;
use crate::target::TargetRepository;
use argh::FromArgs;
use std::io::Write;
use tracing::info;

#[derive(FromArgs, PartialEq, Debug)]
/// Outputs the located attachment image reference. This is the location where
/// the specified artifact type is stored for the image.
pub struct Options {
    #[argh(option, short = 'c')]
    /// the path to an optional TOML configuration file
    pub config: Option<String>,

    #[argh(option, long = "type", default = "String::from(\"signature\")")]
    /// related attachment to triangulate (attestation|sbom|signature), defaults to signature
    pub attachment_type: String,

    #[argh(positional)]
    /// the image reference
    pub image: String,
}

pub struct Command {
    reference: ImageReference,
    kind: AttachmentKind,
}

impl Command {
    /// Validates the attachment type and the image reference. Nothing is sent
    /// to the registry until `locate` is called.
    pub fn new(options: &Options) -> Result<Self, Error> {
        let kind = options.attachment_type.parse::<AttachmentKind>()?;
        let reference = ImageReference::parse(&options.image)?;

        Ok(Self { reference, kind })
    }

    pub async fn locate(
        &self,
        resolver: &dyn DigestResolver,
        target: &dyn TargetRepository,
    ) -> Result<AttachedTag, Error> {
        let digest = resolver.resolve_digest(&self.reference).await?;
        let repository = target.target_repository(&self.reference)?;
        let tag = derive_attachment_tag(&repository, &digest, self.kind);

        info!(
            image = %self.reference,
            repository = %tag.repository(),
            tag = tag.tag(),
            "Located {} for {digest}",
            self.kind
        );
        Ok(tag)
    }

    /// Writes the located tag name as a single line to `out`.
    pub async fn run<W: Write>(
        &self,
        resolver: &dyn DigestResolver,
        target: &dyn TargetRepository,
        out: &mut W,
    ) -> Result<(), Error> {
        let tag = self.locate(resolver, target).await?;
        writeln!(out, "{}", tag.name())?;
        Ok(())
    }
}
