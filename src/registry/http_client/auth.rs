use crate::registry::Error;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static CHALLENGE_PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).unwrap());

/// A `WWW-Authenticate` challenge.
#[derive(Debug, PartialEq)]
pub enum AuthenticationScheme {
    Bearer {
        realm: String,
        parameters: BTreeMap<String, String>,
    },
    Basic,
}

impl AuthenticationScheme {
    pub fn from_www_authenticate_header(header: &str) -> Result<Self, Error> {
        if let Some(challenge) = header.strip_prefix("Bearer ") {
            let mut parameters = BTreeMap::new();

            for (_, [key, value]) in CHALLENGE_PARAMETER
                .captures_iter(challenge.trim())
                .map(|c| c.extract())
            {
                parameters.insert(key.to_string(), value.to_string());
            }

            let realm = parameters.remove("realm").ok_or_else(|| {
                Error::Unauthorized("missing realm in WWW-Authenticate header".to_string())
            })?;

            Ok(Self::Bearer { realm, parameters })
        } else if header.starts_with("Basic ") || header == "Basic" {
            Ok(Self::Basic)
        } else {
            Err(Error::Unauthorized(format!(
                "unsupported authentication scheme: {header}"
            )))
        }
    }

    /// Token endpoint for a bearer challenge, with the challenge parameters
    /// appended as query string.
    pub fn token_url(realm: &str, parameters: &BTreeMap<String, String>) -> Result<String, Error> {
        if parameters.is_empty() {
            return Ok(realm.to_string());
        }

        let query = serde_urlencoded::to_string(parameters)
            .map_err(|e| Error::Internal(format!("unable to encode token query: {e}")))?;
        let separator = if realm.contains('?') { '&' } else { '?' };

        Ok(format!("{realm}{separator}{query}"))
    }
}
