use crate::registry::Error;
use serde::Deserialize;

/// Token endpoint response. Registries answer with `token`, `access_token`
/// or both.
#[derive(Clone, Debug, Deserialize)]
pub struct BearerToken {
    token: Option<String>,
    access_token: Option<String>,
}

impl BearerToken {
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(slice)?)
    }

    pub fn token(&self) -> Result<&str, Error> {
        self.token
            .as_deref()
            .or(self.access_token.as_deref())
            .ok_or_else(|| Error::Unauthorized("missing token in token response".to_string()))
    }
}
