use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{CONTENT_TYPE, LOCATION};

use crate::auth::Credentials;
use crate::config::JenkinsConfig;
use crate::error::{JenkinsError, Result};

/// Raw HTTP response as seen by the node layer.
///
/// Status checking happens in [`crate::Requester`], so a transport returns
/// non-success responses as values rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// `Location` header, set by Jenkins when a build is queued
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP transport.
///
/// Implementations only move bytes; an `Err` means the request never got a
/// response (DNS, connection refused, timeout).
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse>;

    /// POST `form` as `application/x-www-form-urlencoded`. An empty form
    /// sends an empty body.
    fn post(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse>;

    /// POST `body` as-is with the given `Content-Type` (job config XML).
    fn post_body(&self, url: &str, content_type: &str, body: &[u8]) -> Result<HttpResponse>;
}

/// [`Transport`] backed by `reqwest::blocking`.
pub struct ReqwestTransport {
    client: Client,
    credentials: Option<Credentials>,
}

impl ReqwestTransport {
    pub fn new(config: &JenkinsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| JenkinsError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials: config.credentials(),
        })
    }

    /// Helper to build authenticated requests
    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(creds) = &self.credentials {
            request.basic_auth(&creds.username, Some(creds.token.as_str()))
        } else {
            request
        }
    }

    fn send(&self, url: &str, request: RequestBuilder) -> Result<HttpResponse> {
        let network_error = |e: reqwest::Error| JenkinsError::Network {
            url: url.to_owned(),
            message: e.to_string(),
        };

        let response = self.auth_request(request).send().map_err(network_error)?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().map_err(network_error)?.to_vec();

        Ok(HttpResponse {
            status,
            location,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(url, self.client.get(url))
    }

    fn post(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse> {
        let request = self.client.post(url);
        let request = if form.is_empty() {
            request
        } else {
            request.form(form)
        };
        self.send(url, request)
    }

    fn post_body(&self, url: &str, content_type: &str, body: &[u8]) -> Result<HttpResponse> {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body.to_vec());
        self.send(url, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let response = |status| HttpResponse {
            status,
            location: None,
            body: Vec::new(),
        };

        assert!(response(200).is_success());
        assert!(response(201).is_success());
        assert!(!response(302).is_success());
        assert!(!response(404).is_success());
    }

    #[test]
    fn test_transport_from_default_config() {
        assert!(ReqwestTransport::new(&JenkinsConfig::default()).is_ok());
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let config = JenkinsConfig {
            timeout_secs: 2,
            ..JenkinsConfig::default()
        };
        let transport = ReqwestTransport::new(&config).unwrap();

        // port 9 (discard) on loopback is never served in test environments
        let err = transport.get("http://127.0.0.1:9/api/json").unwrap_err();
        assert!(err.is_network());
    }
}
