//! Snapshot records decoded from `api/json` responses.
//!
//! Nullable server values are `Option`s; Jenkins omits or nulls fields freely
//! depending on plugins and job type, so everything beyond identifiers is
//! optional or defaulted.

use serde::{Deserialize, Serialize};

/// Reference to a build embedded in another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRef {
    pub number: u64,
    pub url: String,
}

/// Job entry in the server root listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRef {
    pub name: String,
    pub url: String,
    pub color: Option<String>,
}

/// Server root (`/api/json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsData {
    #[serde(default)]
    pub jobs: Vec<JobRef>,
    pub description: Option<String>,
    pub node_name: Option<String>,
}

/// A job (`/job/<name>/api/json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    #[serde(default)]
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub buildable: Option<bool>,
    pub color: Option<String>,
    #[serde(default)]
    pub in_queue: bool,
    pub next_build_number: Option<u64>,
    /// Absent on some job types and when the caller restricted the tree
    pub builds: Option<Vec<BuildRef>>,
    pub first_build: Option<BuildRef>,
    pub last_build: Option<BuildRef>,
    pub last_completed_build: Option<BuildRef>,
    pub last_failed_build: Option<BuildRef>,
    pub last_stable_build: Option<BuildRef>,
    pub last_successful_build: Option<BuildRef>,
    pub last_unstable_build: Option<BuildRef>,
    pub last_unsuccessful_build: Option<BuildRef>,
    pub queue_item: Option<QueueItemRef>,
    #[serde(default)]
    pub health_report: Vec<HealthReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueItemRef {
    pub id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: u32,
}

/// A build (`/job/<name>/<number>/api/json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildData {
    pub number: u64,
    #[serde(default)]
    pub building: bool,
    /// `SUCCESS`, `FAILURE`, `UNSTABLE`, `ABORTED`, `NOT_BUILT`; null while running
    pub result: Option<String>,
    /// Milliseconds since the epoch
    #[serde(default)]
    pub timestamp: i64,
    /// Milliseconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub estimated_duration: i64,
    pub description: Option<String>,
    pub full_display_name: Option<String>,
    pub url: Option<String>,
    pub built_on: Option<String>,
    #[serde(default)]
    pub keep_log: bool,
    /// Plugins contribute actions; unknown shapes decode as empty and nulls
    /// are kept as `None`
    #[serde(default)]
    pub actions: Vec<Option<BuildAction>>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAction {
    #[serde(default)]
    pub causes: Vec<Cause>,
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    pub last_built_revision: Option<Revision>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    pub short_description: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParameterValue {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Revision {
    #[serde(rename = "SHA1")]
    pub sha1: String,
}

/// Artifact descriptor as listed by its build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    pub display_path: Option<String>,
    pub file_name: String,
    pub relative_path: String,
}

/// Queue item (`/queue/item/<id>/api/json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItemData {
    pub id: u64,
    pub why: Option<String>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub stuck: bool,
    #[serde(default)]
    pub cancelled: bool,
    /// Set once the item left the queue and a build started
    pub executable: Option<BuildRef>,
    pub task: Option<JobRef>,
}

/// The server's build queue (`/queue/api/json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueData {
    #[serde(default)]
    pub items: Vec<QueueItemData>,
}

/// Run status of a build.
///
/// `Queued → Running → {Success, Failure, Unstable, Aborted, NotBuilt}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStatus {
    Queued,
    Running,
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
}

impl BuildStatus {
    pub fn from_snapshot(data: &BuildData) -> Self {
        if data.building {
            return Self::Running;
        }

        match data.result.as_deref() {
            Some("SUCCESS") => Self::Success,
            Some("FAILURE") => Self::Failure,
            Some("UNSTABLE") => Self::Unstable,
            Some("ABORTED") => Self::Aborted,
            Some("NOT_BUILT") => Self::NotBuilt,
            // not building and no result: accepted but no executor yet
            _ => Self::Queued,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Queued | Self::Running)
    }
}
