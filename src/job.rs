use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::build::Build;
use crate::error::{JenkinsError, Result};
use crate::links;
use crate::node::Node;
use crate::params::mk_json_from_build_parameters;
use crate::queue::QueueItem;
use crate::requester::Requester;
use crate::types::{BuildRef, JobData};

/// Named build references carried by a job snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    First,
    Last,
    LastCompleted,
    LastFailed,
    LastStable,
    LastSuccessful,
    LastUnstable,
    LastUnsuccessful,
}

impl BuildType {
    /// Field name in the job's JSON.
    pub fn field(self) -> &'static str {
        match self {
            Self::First => "firstBuild",
            Self::Last => "lastBuild",
            Self::LastCompleted => "lastCompletedBuild",
            Self::LastFailed => "lastFailedBuild",
            Self::LastStable => "lastStableBuild",
            Self::LastSuccessful => "lastSuccessfulBuild",
            Self::LastUnstable => "lastUnstableBuild",
            Self::LastUnsuccessful => "lastUnsuccessfulBuild",
        }
    }

    fn select(self, data: &JobData) -> Option<&BuildRef> {
        match self {
            Self::First => data.first_build.as_ref(),
            Self::Last => data.last_build.as_ref(),
            Self::LastCompleted => data.last_completed_build.as_ref(),
            Self::LastFailed => data.last_failed_build.as_ref(),
            Self::LastStable => data.last_stable_build.as_ref(),
            Self::LastSuccessful => data.last_successful_build.as_ref(),
            Self::LastUnstable => data.last_unstable_build.as_ref(),
            Self::LastUnsuccessful => data.last_unsuccessful_build.as_ref(),
        }
    }
}

/// A job on the server.
///
/// Builds are not stored on the job; they are created on request from the
/// references in the job's current snapshot.
#[derive(Debug, Clone)]
pub struct Job {
    name: String,
    /// Address of the owning server, for queue addresses.
    root: String,
    node: Node<JobData>,
}

impl Job {
    /// Job at `address` on the server rooted at `root`.
    pub fn new(root: &str, address: &str, name: &str, requester: Requester) -> Self {
        Self {
            name: name.to_owned(),
            root: links::strip_trailing_slash(root).to_owned(),
            node: Node::new(address, requester),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Job address without trailing slash.
    pub fn baseurl(&self) -> &str {
        self.node.address()
    }

    /// Current snapshot, fetched on first use.
    pub fn data(&mut self) -> Result<&JobData> {
        self.node.ensure_loaded()
    }

    pub fn refresh(&mut self) -> Result<&JobData> {
        self.node.refresh()
    }

    pub fn get_build_triggerurl(&self) -> String {
        format!("{}/build", self.baseurl())
    }

    pub fn get_delete_url(&self) -> String {
        format!("{}/doDelete", self.baseurl())
    }

    pub fn get_rename_url(&self) -> String {
        format!("{}/doRename", self.baseurl())
    }

    pub fn get_description(&mut self) -> Result<String> {
        Ok(self.data()?.description.clone().unwrap_or_default())
    }

    pub fn get_next_build_number(&mut self) -> Result<u64> {
        let name = self.name.clone();
        self.data()?
            .next_build_number
            .ok_or_else(|| JenkinsError::NoBuildData(format!("{name}: nextBuildNumber")))
    }

    /// Polls the server.
    pub fn is_queued(&mut self) -> Result<bool> {
        Ok(self.refresh()?.in_queue)
    }

    /// Polls the server.
    pub fn is_enabled(&mut self) -> Result<bool> {
        Ok(self.refresh()?.color.as_deref() != Some("disabled"))
    }

    /// Polls the server, then the last build if there is one.
    pub fn is_running(&mut self) -> Result<bool> {
        self.refresh()?;
        match self.get_last_build_or_none()? {
            Some(mut build) => build.is_running(),
            None => Ok(false),
        }
    }

    /// Number of the build referenced by `kind`, or [`JenkinsError::NoBuildData`]
    /// when that reference is null or missing.
    pub fn get_buildnumber_for_type(&mut self, kind: BuildType) -> Result<u64> {
        let name = self.name.clone();
        kind.select(self.data()?)
            .map(|build| build.number)
            .ok_or_else(|| JenkinsError::NoBuildData(format!("{name}: {}", kind.field())))
    }

    pub fn get_first_buildnumber(&mut self) -> Result<u64> {
        self.get_buildnumber_for_type(BuildType::First)
    }

    pub fn get_last_buildnumber(&mut self) -> Result<u64> {
        self.get_buildnumber_for_type(BuildType::Last)
    }

    pub fn get_last_good_buildnumber(&mut self) -> Result<u64> {
        self.get_buildnumber_for_type(BuildType::LastSuccessful)
    }

    pub fn get_last_stable_buildnumber(&mut self) -> Result<u64> {
        self.get_buildnumber_for_type(BuildType::LastStable)
    }

    pub fn get_last_failed_buildnumber(&mut self) -> Result<u64> {
        self.get_buildnumber_for_type(BuildType::LastFailed)
    }

    pub fn get_last_completed_buildnumber(&mut self) -> Result<u64> {
        self.get_buildnumber_for_type(BuildType::LastCompleted)
    }

    /// Build number → build address for every build the job lists.
    ///
    /// A job that has never run gives an empty map. Fails with
    /// [`JenkinsError::NoBuildData`] only when the snapshot has no `builds`
    /// field at all.
    pub fn get_build_dict(&mut self) -> Result<BTreeMap<u64, String>> {
        let name = self.name.clone();
        match &self.data()?.builds {
            Some(builds) => Ok(builds
                .iter()
                .map(|build| (build.number, build.url.clone()))
                .collect()),
            None => Err(JenkinsError::NoBuildData(format!("{name}: builds"))),
        }
    }

    /// Build numbers, most recent first.
    ///
    /// Derived from the current snapshot on every call; refresh the job to
    /// see new builds.
    pub fn get_build_ids(&mut self) -> Result<impl Iterator<Item = u64>> {
        Ok(self.get_build_dict()?.into_keys().rev())
    }

    /// Build `number` as listed by the job. A job with no builds reports
    /// [`JenkinsError::NoBuildData`]; an unlisted number on a job that has
    /// builds is [`JenkinsError::BuildNotFound`].
    pub fn get_build(&mut self, number: u64) -> Result<Build> {
        let requester = self.node.requester().clone();
        let mut builds = self.get_build_dict()?;
        if builds.is_empty() {
            return Err(JenkinsError::NoBuildData(format!("{}: builds", self.name)));
        }
        let address = builds
            .remove(&number)
            .ok_or_else(|| JenkinsError::BuildNotFound {
                job: self.name.clone(),
                number,
            })?;

        Ok(Build::new(&address, number, requester))
    }

    /// Build referenced by `kind`. A reference to a build the job does not
    /// list is reported as [`JenkinsError::NoBuildData`], like a null one.
    pub fn get_build_for_type(&mut self, kind: BuildType) -> Result<Build> {
        let number = self.get_buildnumber_for_type(kind)?;
        self.get_build(number).map_err(|err| match err {
            JenkinsError::BuildNotFound { job, number } => {
                JenkinsError::NoBuildData(format!("{job}: {} #{number}", kind.field()))
            }
            other => other,
        })
    }

    pub fn get_last_build(&mut self) -> Result<Build> {
        self.get_build_for_type(BuildType::Last)
    }

    pub fn get_last_good_build(&mut self) -> Result<Build> {
        self.get_build_for_type(BuildType::LastSuccessful)
    }

    pub fn get_last_stable_build(&mut self) -> Result<Build> {
        self.get_build_for_type(BuildType::LastStable)
    }

    pub fn get_last_failed_build(&mut self) -> Result<Build> {
        self.get_build_for_type(BuildType::LastFailed)
    }

    pub fn get_last_completed_build(&mut self) -> Result<Build> {
        self.get_build_for_type(BuildType::LastCompleted)
    }

    /// Like [`Job::get_last_build`], with a job that has never run as `None`.
    pub fn get_last_build_or_none(&mut self) -> Result<Option<Build>> {
        match self.get_last_build() {
            Ok(build) => Ok(Some(build)),
            Err(JenkinsError::NoBuildData(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// SCM revision → numbers of the builds made from it, most recent first.
    ///
    /// Fetches every listed build.
    pub fn get_revision_dict(&mut self) -> Result<IndexMap<String, Vec<u64>>> {
        let requester = self.node.requester().clone();
        let mut revisions: IndexMap<String, Vec<u64>> = IndexMap::new();

        for (number, address) in self.get_build_dict()?.into_iter().rev() {
            let mut build = Build::new(&address, number, requester.clone());
            if let Some(revision) = build.get_revision()? {
                revisions.entry(revision).or_default().push(number);
            }
        }

        Ok(revisions)
    }

    /// The queue item of a pending build, if the job is waiting in the queue.
    pub fn get_queue_item(&mut self) -> Result<Option<QueueItem>> {
        let requester = self.node.requester().clone();
        let root = self.root.clone();

        let Some(item) = &self.refresh()?.queue_item else {
            return Ok(None);
        };

        Ok(Some(QueueItem::new(
            &links::queue_item_url(&root, item.id),
            requester,
        )))
    }

    /// Trigger a build without parameters.
    ///
    /// Returns the queue item Jenkins created, when it reports one.
    pub fn invoke(&self) -> Result<Option<QueueItem>> {
        self.trigger(&[])
    }

    /// Trigger a build with `params`, which must serialise to a mapping.
    /// Invalid parameters are rejected before any request is made.
    pub fn invoke_with_parameters<P>(&self, params: &P) -> Result<Option<QueueItem>>
    where
        P: Serialize + ?Sized,
    {
        let encoded = mk_json_from_build_parameters(params)?;
        debug!("Build parameters for {}: {encoded}", self.name);
        self.trigger(&[("json".to_string(), encoded)])
    }

    fn trigger(&self, form: &[(String, String)]) -> Result<Option<QueueItem>> {
        let url = self.get_build_triggerurl();
        info!("Triggering build of {}", self.name);

        let response = self.node.requester().post(&url, form)?;

        Ok(response
            .location
            .map(|location| QueueItem::new(&location, self.node.requester().clone())))
    }
}
