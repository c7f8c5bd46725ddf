
mod error;
mod http_client;
mod response_ext;

use crate::configuration;
use crate::oci::{Digest, ImageReference};
use async_trait::async_trait;
pub use error::Error;
use http_body_util::BodyExt;
pub use http_client::ClientConfig;
use http_client::HttpClient;
use hyper::{Method, StatusCode};
#[cfg(test)]
use mockall::automock;
use response_ext::ResponseExt;
use sha2::{Digest as _, Sha256};
use tracing::{debug, info, warn};

pub const DOCKER_CONTENT_DIGEST: &str = "Docker-Content-Digest";

pub const MANIFEST_MEDIA_TYPES: [&str; 4] = [
    "application/vnd.oci.image.index.v1+json",
    "application/vnd.oci.image.manifest.v1+json",
    "application/vnd.docker.distribution.manifest.list.v2+json",
    "application/vnd.docker.distribution.manifest.v2+json",
];

/// Resolves an image reference to the digest of its manifest.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DigestResolver: Send + Sync {
    async fn resolve_digest(&self, reference: &ImageReference) -> Result<Digest, Error>;
}

/// Resolves digests against the registry named by the reference, using the
/// OCI distribution API.
#[derive(Debug)]
pub struct RegistryResolver {
    client: HttpClient,
    insecure_registries: Vec<String>,
}

impl RegistryResolver {
    pub fn new(config: &ClientConfig) -> Result<Self, configuration::Error> {
        Ok(Self {
            client: HttpClient::new(config)?,
            insecure_registries: config.insecure_registries.clone(),
        })
    }

    fn scheme(&self, registry: &str) -> &'static str {
        let host = match registry.strip_prefix('[') {
            Some(rest) => rest.split(']').next().unwrap_or(rest),
            None => registry.split(':').next().unwrap_or(registry),
        };

        let is_local = matches!(host, "localhost" | "127.0.0.1" | "::1") || host.ends_with(".local");

        if is_local || self.insecure_registries.iter().any(|r| r == registry) {
            "http"
        } else {
            "https"
        }
    }

    fn manifest_url(&self, reference: &ImageReference) -> String {
        let repository = reference.repository();
        format!(
            "{}://{}/v2/{}/manifests/{}",
            self.scheme(repository.registry()),
            repository.registry(),
            repository.path(),
            reference.identifier()
        )
    }

    async fn fetch_manifest_digest(&self, location: &str) -> Result<Digest, Error> {
        let response = self
            .client
            .request(&Method::GET, location, &MANIFEST_MEDIA_TYPES)
            .await?;

        check_status(response.status(), location)?;

        let body = response.into_body().collect().await?.to_bytes();
        Ok(Digest::Sha256(hex::encode(Sha256::digest(&body))))
    }
}

#[async_trait]
impl DigestResolver for RegistryResolver {
    async fn resolve_digest(&self, reference: &ImageReference) -> Result<Digest, Error> {
        if let Some(digest) = reference.digest() {
            match reference.tag() {
                Some(tag) => debug!("Ignoring tag {tag}, {reference} pins {digest}"),
                None => debug!("Reference {reference} already pins {digest}"),
            }
            return Ok(digest.clone());
        }

        let location = self.manifest_url(reference);
        let header = {
            let response = self
                .client
                .request(&Method::HEAD, &location, &MANIFEST_MEDIA_TYPES)
                .await?;

            check_status(response.status(), &location)?;
            response.get_header(DOCKER_CONTENT_DIGEST)
        };

        let digest = match header {
            Some(header) => Digest::try_from(header.as_str())
                .map_err(|e| Error::DigestInvalid(e.to_string()))?,
            None => {
                warn!("No {DOCKER_CONTENT_DIGEST} header for {location}, fetching manifest");
                self.fetch_manifest_digest(&location).await?
            }
        };

        info!("Resolved {reference} to {digest}");
        Ok(digest)
    }
}

fn check_status(status: StatusCode, location: &str) -> Result<(), Error> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(Error::ManifestUnknown(location.to_string()))
    } else {
        Err(Error::UnexpectedStatus(status))
    }
}
