mod auth;
mod bearer_token;

use crate::configuration;
use crate::registry::response_ext::ResponseExt;
use crate::registry::Error;
use auth::AuthenticationScheme;
use bearer_token::BearerToken;
use http_body_util::{BodyExt, Empty};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, ACCEPT, AUTHORIZATION, LOCATION, WWW_AUTHENTICATE};
use hyper::{Method, Request, Response, StatusCode, Uri};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use rustls::RootCertStore;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::CertificateDer;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_max_redirect")]
    pub max_redirect: u8,
    /// Per-request timeout in seconds; no timeout when unset.
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub server_ca_bundle: Option<String>,
    /// Registries reached over plain HTTP, as `host[:port]`.
    #[serde(default)]
    pub insecure_registries: Vec<String>,
}

impl ClientConfig {
    fn default_max_redirect() -> u8 {
        5
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_redirect: Self::default_max_redirect(),
            timeout: None,
            server_ca_bundle: None,
            insecure_registries: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    max_redirect: u8,
    timeout: Option<Duration>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, configuration::Error> {
        let tls_config = build_tls_config(config.server_ca_bundle.as_deref())?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            max_redirect: config.max_redirect,
            timeout: config.timeout.map(Duration::from_secs),
        })
    }

    /// Sends a request, following redirects and answering one bearer
    /// challenge with an anonymous token.
    pub async fn request(
        &self,
        method: &Method,
        location: &str,
        accepted_types: &[&str],
    ) -> Result<Response<Incoming>, Error> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(
                timeout,
                self.request_inner(method, location, accepted_types),
            )
            .await
            .map_err(|_| Error::Timeout)?,
            None => self.request_inner(method, location, accepted_types).await,
        }
    }

    async fn request_inner(
        &self,
        method: &Method,
        location: &str,
        accepted_types: &[&str],
    ) -> Result<Response<Incoming>, Error> {
        let mut location = location.to_string();
        let mut authorization: Option<String> = None;
        let mut authenticated = false;
        let mut redirects = 0;

        loop {
            info!("Requesting {method} {location}");
            let response = self
                .send(method, &location, accepted_types, authorization.as_deref())
                .await?;

            if response.status().is_redirection() {
                if redirects >= self.max_redirect {
                    return Err(Error::Internal("too many redirects".to_string()));
                }

                let target = response
                    .get_header(LOCATION)
                    .ok_or_else(|| Error::Internal("missing Location header".to_string()))?;

                location = resolve_location(&location, &target)?;
                authorization = None;
                authenticated = false;
                redirects += 1;
                continue;
            }

            if response.status() == StatusCode::UNAUTHORIZED {
                if authenticated {
                    return Err(Error::Unauthorized(format!(
                        "anonymous token rejected for {location}"
                    )));
                }

                let challenge = response.get_header(WWW_AUTHENTICATE);
                drop(response);

                authorization = Some(self.authenticate(challenge).await?);
                authenticated = true;
                continue;
            }

            if response.status() == StatusCode::FORBIDDEN {
                return Err(Error::Denied(location));
            }

            return Ok(response);
        }
    }

    async fn send(
        &self,
        method: &Method,
        location: &str,
        accepted_types: &[&str],
        authorization: Option<&str>,
    ) -> Result<Response<Incoming>, Error> {
        let mut request = Request::builder().method(method.clone()).uri(location);

        for accepted_type in accepted_types {
            request = request.header(ACCEPT, *accepted_type);
        }

        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, HeaderValue::from_str(authorization)?);
        }

        self.client
            .request(request.body(Empty::new())?)
            .await
            .map_err(|e| Error::Internal(format!("HTTP request failed: {e}")))
    }

    async fn authenticate(&self, challenge: Option<String>) -> Result<String, Error> {
        let header = challenge.ok_or_else(|| Error::Unauthorized("missing WWW-Authenticate header".to_string()))?;

        match AuthenticationScheme::from_www_authenticate_header(&header)? {
            AuthenticationScheme::Bearer { realm, parameters } => {
                let token_url = AuthenticationScheme::token_url(&realm, &parameters)?;
                debug!("Requesting anonymous token from {token_url}");

                let response = self.send(&Method::GET, &token_url, &[], None).await?;
                if !response.status().is_success() {
                    return Err(Error::Unauthorized(format!(
                        "token acquisition failed: {}",
                        response.status()
                    )));
                }

                let body = response.into_body().collect().await?.to_bytes();
                let bearer = BearerToken::from_slice(&body)?;
                Ok(format!("Bearer {}", bearer.token()?))
            }
            AuthenticationScheme::Basic => Err(Error::Unauthorized(
                "registry requires credentials".to_string(),
            )),
        }
    }
}

/// Resolves a `Location` header against the request it answers.
fn resolve_location(current: &str, target: &str) -> Result<String, Error> {
    if !target.starts_with('/') {
        return Ok(target.to_string());
    }

    let uri: Uri = current
        .parse()
        .map_err(|e| Error::Internal(format!("invalid request location: {e}")))?;

    match (uri.scheme_str(), uri.authority()) {
        (Some(scheme), Some(authority)) => Ok(format!("{scheme}://{authority}{target}")),
        _ => Err(Error::Internal(format!(
            "cannot resolve redirect '{target}' from '{current}'"
        ))),
    }
}

fn build_tls_config(ca_bundle: Option<&str>) -> Result<rustls::ClientConfig, configuration::Error> {
    let mut root_store = RootCertStore::empty();

    let certs = if let Some(bundle) = ca_bundle {
        CertificateDer::pem_file_iter(bundle)?.collect::<Result<Vec<_>, _>>()?
    } else {
        let native = rustls_native_certs::load_native_certs();
        for error in &native.errors {
            warn!("Unable to load native certificate: {error}");
        }
        native.certs
    };

    let (added, ignored) = root_store.add_parsable_certificates(certs);
    debug!("Loaded {added} root certificates ({ignored} ignored)");

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(config)
}
