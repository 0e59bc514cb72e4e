//! Typed object model over the Jenkins remote JSON API.
//!
//! Every remote resource (server root, job, build, queue item) is a local
//! node holding its address and a snapshot that is fetched with a blocking
//! GET on first use and kept until the node is refreshed. Child nodes are
//! built from the references in their parent's snapshot and receive the
//! parent's [`Requester`] explicitly.
//!
//! ```no_run
//! use jenkins_nodes::{Config, Jenkins};
//!
//! # fn main() -> jenkins_nodes::Result<()> {
//! let config = Config::load(None)?;
//! let mut jenkins = Jenkins::from_config(&config.jenkins)?;
//!
//! let mut job = jenkins.get_job("nightly")?;
//! let mut build = job.get_last_good_build()?;
//! for artifact in build.get_artifacts()? {
//!     artifact.save_to_dir(std::path::Path::new("out"))?;
//! }
//! # Ok(())
//! # }
//! ```

mod artifact;
mod auth;
mod build;
mod config;
mod error;
mod jenkins;
mod job;
pub mod links;
mod node;
mod params;
mod queue;
mod requester;
mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use artifact::Artifact;
pub use auth::{Credentials, Token};
pub use build::Build;
pub use config::{Config, JenkinsConfig};
pub use error::{JenkinsError, Result};
pub use jenkins::Jenkins;
pub use job::{BuildType, Job};
pub use node::Node;
pub use params::mk_json_from_build_parameters;
pub use queue::QueueItem;
pub use requester::Requester;
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::BuildStatus;
