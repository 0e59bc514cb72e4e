use crate::build::Build;
use crate::error::{JenkinsError, Result};
use crate::node::Node;
use crate::requester::Requester;
use crate::types::QueueItemData;

/// A triggered build waiting for an executor.
///
/// Once the server starts the build, the item's `executable` points at it
/// and [`QueueItem::get_build`] succeeds.
#[derive(Debug, Clone)]
pub struct QueueItem {
    node: Node<QueueItemData>,
}

impl QueueItem {
    pub fn new(address: &str, requester: Requester) -> Self {
        Self {
            node: Node::new(address, requester),
        }
    }

    pub(crate) fn with_snapshot(address: &str, requester: Requester, data: QueueItemData) -> Self {
        Self {
            node: Node::with_snapshot(address, requester, data),
        }
    }

    pub fn baseurl(&self) -> &str {
        self.node.address()
    }

    pub fn data(&mut self) -> Result<&QueueItemData> {
        self.node.ensure_loaded()
    }

    pub fn refresh(&mut self) -> Result<&QueueItemData> {
        self.node.refresh()
    }

    pub fn get_id(&mut self) -> Result<u64> {
        Ok(self.data()?.id)
    }

    /// Name of the job this item will build, when the server reports it.
    pub fn get_job_name(&mut self) -> Result<Option<String>> {
        Ok(self.data()?.task.as_ref().map(|task| task.name.clone()))
    }

    /// Polls the server. False once the build started or the item was
    /// cancelled.
    pub fn is_queued(&mut self) -> Result<bool> {
        let data = self.refresh()?;
        Ok(data.executable.is_none() && !data.cancelled)
    }

    pub fn is_cancelled(&mut self) -> Result<bool> {
        Ok(self.data()?.cancelled)
    }

    /// Human-readable reason the item is still waiting.
    pub fn why(&mut self) -> Result<Option<String>> {
        Ok(self.data()?.why.clone())
    }

    /// The started build, from the current snapshot. Fails with
    /// [`JenkinsError::NoBuildData`] while the item is still queued.
    pub fn get_build(&mut self) -> Result<Build> {
        let requester = self.node.requester().clone();
        let data = self.data()?;

        let executable = data.executable.as_ref().ok_or_else(|| {
            JenkinsError::NoBuildData(format!("queue item {} has not started", data.id))
        })?;

        Ok(Build::new(&executable.url, executable.number, requester))
    }
}
