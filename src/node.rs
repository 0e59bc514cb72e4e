use log::debug;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::links;
use crate::requester::Requester;

/// Local proxy for one remote resource.
///
/// The snapshot is fetched on the first [`Node::ensure_loaded`] call and kept
/// unchanged until [`Node::refresh`]. There is no expiry: a node never
/// re-fetches on its own.
#[derive(Debug, Clone)]
pub struct Node<T> {
    address: String,
    requester: Requester,
    /// `None` until loaded.
    snapshot: Option<T>,
}

impl<T> Node<T>
where
    T: DeserializeOwned,
{
    pub fn new(address: &str, requester: Requester) -> Self {
        Self {
            address: links::strip_trailing_slash(address).to_owned(),
            requester,
            snapshot: None,
        }
    }

    /// Node whose snapshot came embedded in a parent's response.
    pub fn with_snapshot(address: &str, requester: Requester, snapshot: T) -> Self {
        Self {
            address: links::strip_trailing_slash(address).to_owned(),
            requester,
            snapshot: Some(snapshot),
        }
    }

    /// Base address, without trailing slash.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Return the snapshot, fetching it if this node has never been loaded.
    pub fn ensure_loaded(&mut self) -> Result<&T> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => snapshot,
            None => self.fetch()?,
        };
        Ok(self.snapshot.insert(snapshot))
    }

    /// Drop the snapshot and fetch it again. On failure the node is left
    /// unloaded.
    pub fn refresh(&mut self) -> Result<&T> {
        self.snapshot = None;
        let snapshot = self.fetch()?;
        Ok(self.snapshot.insert(snapshot))
    }

    /// Forget the snapshot; the next access fetches again.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    fn fetch(&self) -> Result<T> {
        debug!("Polling {}", self.address);
        self.requester.get_data(&self.address)
    }
}
