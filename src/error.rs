use thiserror::Error;

#[derive(Error, Debug)]
pub enum JenkinsError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No build data: {0}")]
    NoBuildData(String),

    #[error("Build #{number} not found for job {job}")]
    BuildNotFound { job: String, number: u64 },

    #[error("Unknown job: {0}")]
    UnknownJob(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JenkinsError {
    /// True for transport failures and non-success HTTP statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }

    pub fn is_no_build_data(&self) -> bool {
        matches!(self, Self::NoBuildData(_))
    }
}

pub type Result<T> = std::result::Result<T, JenkinsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_kind_covers_status_errors() {
        let status = JenkinsError::Status {
            url: "http://ci/job/foo/api/json".to_string(),
            status: 503,
        };
        let network = JenkinsError::Network {
            url: "http://ci/".to_string(),
            message: "connection refused".to_string(),
        };

        assert!(status.is_network());
        assert!(network.is_network());
        assert!(!JenkinsError::NoBuildData("foo".into()).is_network());
    }

    #[test]
    fn test_error_messages() {
        let err = JenkinsError::BuildNotFound {
            job: "foo".to_string(),
            number: 7,
        };
        assert_eq!(err.to_string(), "Build #7 not found for job foo");
        assert!(JenkinsError::NoBuildData("lastFailedBuild".into()).is_no_build_data());
    }
}
