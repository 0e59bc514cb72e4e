use log::info;
use std::sync::Arc;

use crate::config::JenkinsConfig;
use crate::error::{JenkinsError, Result};
use crate::job::Job;
use crate::links;
use crate::node::Node;
use crate::queue::QueueItem;
use crate::requester::Requester;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{JenkinsData, JobRef, QueueData};

/// Server root: entry point for navigating jobs and the queue.
///
/// Holds the server address and the requester every child node is created
/// with; no connection state is global.
#[derive(Debug, Clone)]
pub struct Jenkins {
    node: Node<JenkinsData>,
}

impl Jenkins {
    /// Connect to the server described by `config` over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built. No request is made.
    pub fn from_config(config: &JenkinsConfig) -> Result<Self> {
        info!("Using Jenkins at {}", config.base_url);
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(&config.base_url, Arc::new(transport))
    }

    /// Root node over a caller-provided transport.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        links::parse(base_url)?;

        Ok(Self {
            node: Node::new(base_url, Requester::new(transport)),
        })
    }

    pub fn baseurl(&self) -> &str {
        self.node.address()
    }

    pub fn data(&mut self) -> Result<&JenkinsData> {
        self.node.ensure_loaded()
    }

    pub fn refresh(&mut self) -> Result<&JenkinsData> {
        self.node.refresh()
    }

    pub fn get_jobs(&mut self) -> Result<Vec<JobRef>> {
        Ok(self.data()?.jobs.clone())
    }

    pub fn get_job_names(&mut self) -> Result<Vec<String>> {
        Ok(self.data()?.jobs.iter().map(|job| job.name.clone()).collect())
    }

    pub fn has_job(&mut self, name: &str) -> Result<bool> {
        Ok(self.data()?.jobs.iter().any(|job| job.name == name))
    }

    /// Job listed under `name` in the root snapshot.
    pub fn get_job(&mut self, name: &str) -> Result<Job> {
        let requester = self.node.requester().clone();
        let root = self.baseurl().to_owned();
        let job = self
            .data()?
            .jobs
            .iter()
            .find(|job| job.name == name)
            .ok_or_else(|| JenkinsError::UnknownJob(name.to_owned()))?;

        Ok(Job::new(&root, &job.url, &job.name, requester))
    }

    /// Create a job named `name` from its `config.xml` and return it.
    ///
    /// The root snapshot is dropped so the next listing includes the new
    /// job. A rejected request (name taken, bad XML, no permission) is
    /// [`JenkinsError::Status`].
    pub fn create_job(&mut self, name: &str, config_xml: &str) -> Result<Job> {
        if name.is_empty() {
            return Err(JenkinsError::InvalidArgument(
                "Job name must not be empty".to_string(),
            ));
        }

        let url = links::create_item_url(self.baseurl(), name)?;
        info!("Creating job {name}");
        self.node
            .requester()
            .post_body(&url, "application/xml", config_xml.as_bytes())?;
        self.node.invalidate();

        let address = links::job_url(self.baseurl(), name)?;
        Ok(Job::new(
            self.baseurl(),
            &address,
            name,
            self.node.requester().clone(),
        ))
    }

    /// Conventional address of a job, whether or not it exists.
    pub fn get_job_url(&self, name: &str) -> Result<String> {
        links::job_url(self.baseurl(), name)
    }

    /// Items currently waiting in the build queue. Always fetched fresh.
    pub fn get_queue_items(&self) -> Result<Vec<QueueItem>> {
        let requester = self.node.requester();
        let queue: QueueData = requester.get_data(&links::queue_url(self.baseurl()))?;

        Ok(queue
            .items
            .into_iter()
            .map(|item| {
                let address = links::queue_item_url(self.baseurl(), item.id);
                QueueItem::with_snapshot(&address, requester.clone(), item)
            })
            .collect())
    }

    pub fn get_queue_item(&self, id: u64) -> QueueItem {
        QueueItem::new(
            &links::queue_item_url(self.baseurl(), id),
            self.node.requester().clone(),
        )
    }
}
