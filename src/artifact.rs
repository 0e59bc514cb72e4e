use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{JenkinsError, Result};
use crate::links;
use crate::requester::Requester;
use crate::types::ArtifactRecord;

/// A file produced by a build.
///
/// Has no identity beyond its owning build: the download address is the
/// build address plus `artifact/<relative path>`.
#[derive(Debug, Clone)]
pub struct Artifact {
    filename: String,
    relative_path: String,
    url: String,
    requester: Requester,
}

impl Artifact {
    pub fn new(
        filename: &str,
        relative_path: &str,
        build_address: &str,
        requester: Requester,
    ) -> Result<Self> {
        Ok(Self {
            filename: filename.to_owned(),
            relative_path: relative_path.to_owned(),
            url: links::artifact_url(build_address, relative_path)?,
            requester,
        })
    }

    pub(crate) fn from_record(
        record: &ArtifactRecord,
        build_address: &str,
        requester: Requester,
    ) -> Result<Self> {
        Self::new(
            &record.file_name,
            &record.relative_path,
            build_address,
            requester,
        )
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the raw payload. Text and binary artifacts are returned
    /// byte-for-byte.
    pub fn get_data(&self) -> Result<Vec<u8>> {
        self.requester.get_raw(&self.url)
    }

    /// Download to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = self.get_data()?;
        fs::write(path, &data)?;
        info!(
            "Saved artifact {} ({} bytes) to {}",
            self.relative_path,
            data.len(),
            path.display()
        );
        Ok(())
    }

    /// Download to `directory/<filename>`, replacing any existing file, and
    /// return the written path.
    pub fn save_to_dir(&self, directory: &Path) -> Result<PathBuf> {
        // only the final component, so a crafted name cannot leave `directory`
        let name = Path::new(&self.filename).file_name().ok_or_else(|| {
            JenkinsError::InvalidArgument(format!("Invalid artifact file name: {}", self.filename))
        })?;

        let path = directory.join(name);
        self.save(&path)?;
        Ok(path)
    }
}
