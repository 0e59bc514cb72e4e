//! Address construction for Jenkins resources.
//!
//! Node addresses are kept without a trailing slash; the JSON endpoint of any
//! resource is its address plus `/api/json`.

use url::Url;

use crate::error::{JenkinsError, Result};

pub fn strip_trailing_slash(address: &str) -> &str {
    address.trim_end_matches('/')
}

/// Structured-data endpoint of a resource.
///
/// `http://ci/job/foo/` → `http://ci/job/foo/api/json`
pub fn api_json_url(address: &str) -> String {
    format!("{}/api/json", strip_trailing_slash(address))
}

/// Address of a job under the server root, with the name percent-encoded.
pub fn job_url(root: &str, name: &str) -> Result<String> {
    append_segments(root, ["job", name])
}

/// `createItem` endpoint for a new job called `name`.
///
/// `http://ci`, `my job` → `http://ci/createItem?name=my+job`
pub fn create_item_url(root: &str, name: &str) -> Result<String> {
    let mut url = parse(&append_segments(root, ["createItem"])?)?;
    url.query_pairs_mut().append_pair("name", name);
    Ok(url.to_string())
}

/// Address of build `number` of the job at `job_address`.
pub fn build_url(job_address: &str, number: u64) -> String {
    format!("{}/{number}", strip_trailing_slash(job_address))
}

/// Download address of an artifact. `relative_path` may contain `/`.
pub fn artifact_url(build_address: &str, relative_path: &str) -> Result<String> {
    let segments = std::iter::once("artifact").chain(relative_path.split('/'));
    append_segments(build_address, segments)
}

pub fn console_url(build_address: &str) -> String {
    format!("{}/consoleText", strip_trailing_slash(build_address))
}

pub fn queue_url(root: &str) -> String {
    format!("{}/queue", strip_trailing_slash(root))
}

pub fn queue_item_url(root: &str, id: u64) -> String {
    format!("{}/queue/item/{id}", strip_trailing_slash(root))
}

pub fn parse(address: &str) -> Result<Url> {
    Url::parse(address).map_err(|source| JenkinsError::InvalidUrl {
        url: address.to_owned(),
        source,
    })
}

fn append_segments<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let mut url = parse(base)?;
    url.path_segments_mut()
        .map_err(|()| JenkinsError::InvalidArgument(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url.to_string())
}
