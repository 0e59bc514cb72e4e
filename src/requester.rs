use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

use crate::error::{JenkinsError, Result};
use crate::links;
use crate::transport::{HttpResponse, Transport};

/// Shared request handle passed from parent nodes to the children they create.
///
/// Wraps a [`Transport`] (which carries the credentials) and turns raw
/// responses into typed results: non-success statuses become
/// [`JenkinsError::Status`], undecodable bodies become [`JenkinsError::Parse`].
/// Nothing is retried.
#[derive(Clone)]
pub struct Requester {
    transport: Arc<dyn Transport>,
}

impl Requester {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch and decode the JSON representation of the resource at `address`.
    pub fn get_data<T>(&self, address: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = links::api_json_url(address);
        let response = self.get_checked(&url)?;

        serde_json::from_slice(&response.body).map_err(|source| JenkinsError::Parse { url, source })
    }

    /// Fetch the raw body at `url` (artifacts, console output).
    pub fn get_raw(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self.get_checked(url)?.body)
    }

    pub fn post(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse> {
        debug!("POST {url}");
        let response = self.transport.post(url, form)?;
        check_status(url, response)
    }

    pub fn post_body(&self, url: &str, content_type: &str, body: &[u8]) -> Result<HttpResponse> {
        debug!("POST {url} ({content_type}, {} bytes)", body.len());
        let response = self.transport.post_body(url, content_type, body)?;
        check_status(url, response)
    }

    fn get_checked(&self, url: &str) -> Result<HttpResponse> {
        debug!("GET {url}");
        let response = self.transport.get(url)?;
        check_status(url, response)
    }
}

impl fmt::Debug for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requester").finish_non_exhaustive()
    }
}

fn check_status(url: &str, response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }

    warn!("Jenkins returned status {} for {url}", response.status);
    Err(JenkinsError::Status {
        url: url.to_owned(),
        status: response.status,
    })
}
