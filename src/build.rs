use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::time::Duration;

use crate::artifact::Artifact;
use crate::error::Result;
use crate::links;
use crate::node::Node;
use crate::requester::Requester;
use crate::types::{BuildData, BuildStatus, Cause};

/// One execution record of a job.
#[derive(Debug, Clone)]
pub struct Build {
    number: u64,
    node: Node<BuildData>,
}

impl Build {
    pub fn new(address: &str, number: u64, requester: Requester) -> Self {
        Self {
            number,
            node: Node::new(address, requester),
        }
    }

    pub fn get_number(&self) -> u64 {
        self.number
    }

    pub fn baseurl(&self) -> &str {
        self.node.address()
    }

    /// Current snapshot, fetched on first use.
    pub fn data(&mut self) -> Result<&BuildData> {
        self.node.ensure_loaded()
    }

    pub fn refresh(&mut self) -> Result<&BuildData> {
        self.node.refresh()
    }

    pub fn get_status(&mut self) -> Result<BuildStatus> {
        Ok(BuildStatus::from_snapshot(self.data()?))
    }

    /// Poll the server and report whether the build is still executing.
    ///
    /// Always re-fetches, so it keeps answering `false` once the build has
    /// finished. Waiting for completion is left to the caller.
    pub fn is_running(&mut self) -> Result<bool> {
        Ok(self.refresh()?.building)
    }

    pub fn is_good(&mut self) -> Result<bool> {
        Ok(self.get_status()? == BuildStatus::Success)
    }

    /// Start time; `None` if the server sent an out-of-range value.
    pub fn get_timestamp(&mut self) -> Result<Option<DateTime<Utc>>> {
        Ok(DateTime::from_timestamp_millis(self.data()?.timestamp))
    }

    pub fn get_duration(&mut self) -> Result<Duration> {
        Ok(Duration::from_millis(self.data()?.duration))
    }

    pub fn get_description(&mut self) -> Result<Option<String>> {
        Ok(self.data()?.description.clone())
    }

    pub fn get_causes(&mut self) -> Result<Vec<Cause>> {
        Ok(self
            .data()?
            .actions
            .iter()
            .flatten()
            .flat_map(|action| action.causes.iter().cloned())
            .collect())
    }

    /// Parameters the build was started with, in server order.
    pub fn get_params(&mut self) -> Result<IndexMap<String, serde_json::Value>> {
        Ok(self
            .data()?
            .actions
            .iter()
            .flatten()
            .flat_map(|action| action.parameters.iter())
            .map(|param| (param.name.clone(), param.value.clone()))
            .collect())
    }

    /// SCM revision recorded by the git plugin, if any.
    pub fn get_revision(&mut self) -> Result<Option<String>> {
        Ok(self
            .data()?
            .actions
            .iter()
            .flatten()
            .find_map(|action| action.last_built_revision.as_ref())
            .map(|revision| revision.sha1.clone()))
    }

    pub fn get_artifacts(&mut self) -> Result<Vec<Artifact>> {
        let requester = self.node.requester().clone();
        let address = self.node.address().to_owned();

        self.data()?
            .artifacts
            .iter()
            .map(|record| Artifact::from_record(record, &address, requester.clone()))
            .collect()
    }

    /// Artifacts keyed by file name, in listing order.
    pub fn get_artifact_dict(&mut self) -> Result<IndexMap<String, Artifact>> {
        Ok(self
            .get_artifacts()?
            .into_iter()
            .map(|artifact| (artifact.filename().to_owned(), artifact))
            .collect())
    }

    /// Full console log as text.
    pub fn get_console(&self) -> Result<String> {
        let bytes = self
            .node
            .requester()
            .get_raw(&links::console_url(self.node.address()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use serde_json::{json, Value};
    use std::sync::Arc;

    const BUILD_URL: &str = "http://localhost:8080/job/foo/1";
    const BUILD_API: &str = "http://localhost:8080/job/foo/1/api/json";

    fn build_data() -> Value {
        json!({
            "actions": [
                {"causes": [{"shortDescription": "Started by user anonymous",
                             "userId": null,
                             "userName": "anonymous"}]},
                {"parameters": [{"name": "TARGET", "value": "staging"},
                                {"name": "DRY_RUN", "value": false}]},
                {"lastBuiltRevision": {"SHA1": "4e2b1f0", "branch": []}},
            ],
            "artifacts": [
                {"displayPath": "out.txt", "fileName": "out.txt", "relativePath": "out.txt"},
                {"displayPath": "out.gz", "fileName": "out.gz", "relativePath": "dist/out.gz"},
            ],
            "building": false,
            "builtOn": "",
            "description": null,
            "duration": 106,
            "estimatedDuration": 106,
            "fullDisplayName": "foo #1",
            "id": "2013-05-31_23-15-40",
            "keepLog": false,
            "number": 1,
            "result": "SUCCESS",
            "timestamp": 1370042140000i64,
            "url": "http://localhost:8080/job/foo/1/"
        })
    }

    fn build(fake: &Arc<FakeTransport>) -> Build {
        fake.with_json(BUILD_API, build_data());
        Build::new(BUILD_URL, 1, fake.requester())
    }

    #[test]
    fn test_snapshot_accessors() {
        let fake = FakeTransport::new();
        let mut build = build(&fake);

        assert_eq!(build.get_number(), 1);
        assert_eq!(build.get_status().unwrap(), BuildStatus::Success);
        assert!(build.is_good().unwrap());
        assert_eq!(build.get_duration().unwrap(), Duration::from_millis(106));
        assert_eq!(
            build.get_timestamp().unwrap().unwrap().timestamp(),
            1_370_042_140
        );
        assert_eq!(build.get_description().unwrap(), None);
        assert_eq!(build.get_revision().unwrap().as_deref(), Some("4e2b1f0"));

        // all of the above come from one fetch
        assert_eq!(fake.calls_to(BUILD_API), 1);
    }

    #[test]
    fn test_causes_and_params() {
        let fake = FakeTransport::new();
        let mut build = build(&fake);

        let causes = build.get_causes().unwrap();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].user_name.as_deref(), Some("anonymous"));

        let params = build.get_params().unwrap();
        assert_eq!(params.keys().collect::<Vec<_>>(), ["TARGET", "DRY_RUN"]);
        assert_eq!(params["TARGET"], json!("staging"));
    }

    #[test]
    fn test_artifact_dict() {
        let fake = FakeTransport::new();
        let mut build = build(&fake);

        let artifacts = build.get_artifact_dict().unwrap();

        assert_eq!(artifacts.keys().collect::<Vec<_>>(), ["out.txt", "out.gz"]);
        assert_eq!(
            artifacts["out.gz"].url(),
            "http://localhost:8080/job/foo/1/artifact/dist/out.gz"
        );
    }

    #[test]
    fn test_is_running_polls_every_time() {
        let fake = FakeTransport::new();
        let mut running = build_data();
        running["building"] = json!(true);
        running["result"] = Value::Null;
        fake.with_json(BUILD_API, running);

        let mut build = Build::new(BUILD_URL, 1, fake.requester());
        assert!(build.is_running().unwrap());
        assert_eq!(build.get_status().unwrap(), BuildStatus::Running);

        fake.with_json(BUILD_API, build_data());
        assert!(!build.is_running().unwrap());
        assert!(!build.is_running().unwrap());

        assert_eq!(fake.calls_to(BUILD_API), 3);
        assert!(build.get_status().unwrap().is_terminal());
    }

    #[test]
    fn test_console() {
        let fake = FakeTransport::new();
        fake.with_body(
            "http://localhost:8080/job/foo/1/consoleText",
            b"Started by user anonymous\nFinished: SUCCESS\n".to_vec(),
        );
        let build = Build::new(BUILD_URL, 1, fake.requester());

        let console = build.get_console().unwrap();
        assert!(console.ends_with("Finished: SUCCESS\n"));
    }
}
