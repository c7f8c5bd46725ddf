mod error;

use crate::oci::{ImageReference, Repository};
pub use error::Error;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, info};

/// Environment variable overriding the attachment repository.
pub const REPOSITORY_ENV: &str = "TRIANGULATE_REPOSITORY";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TargetConfig {
    #[serde(default)]
    pub repository: Option<String>,
}

/// Computes the repository that holds the attachments of an image.
#[cfg_attr(test, automock)]
pub trait TargetRepository: Send + Sync {
    fn target_repository(&self, reference: &ImageReference) -> Result<Repository, Error>;
}

/// Stores attachments next to the image unless an override repository is
/// configured.
///
/// The override is kept raw and only parsed when a target is computed, so a
/// malformed value surfaces as a computation error.
#[derive(Clone, Debug, Default)]
pub struct RepositoryOverride {
    repository: Option<String>,
}

impl RepositoryOverride {
    pub fn new(repository: Option<String>) -> Self {
        Self { repository }
    }

    /// The environment variable wins over the configuration file.
    pub fn from_env(config: &TargetConfig) -> Self {
        let repository = std::env::var(REPOSITORY_ENV)
            .ok()
            .filter(|value| !value.is_empty());
        Self::resolve(repository, config)
    }

    fn resolve(env_value: Option<String>, config: &TargetConfig) -> Self {
        if let Some(repository) = env_value {
            info!("Using {REPOSITORY_ENV} override: {repository}");
            return Self::new(Some(repository));
        }
        Self::new(config.repository.clone())
    }
}

impl TargetRepository for RepositoryOverride {
    fn target_repository(&self, reference: &ImageReference) -> Result<Repository, Error> {
        match &self.repository {
            Some(repository) => {
                debug!("Attachments of {reference} are stored in {repository}");
                Repository::parse(repository)
                    .map_err(|err| Error::InvalidOverride(repository.clone(), err))
            }
            None => Ok(reference.repository().clone()),
        }
    }
}
