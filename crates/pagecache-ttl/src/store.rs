//! Probe file storage
//!
//! Owns the working directory. A probe is a file named by its epoch-second
//! creation timestamp, containing that same timestamp as text, small
//! enough to occupy a single memory page.

use crate::error::{MonitorError, Result};
use crate::types::ProbeTimestamp;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Creates, lists, and deletes probe files in the working directory
pub struct ProbeStore {
    probe_dir: PathBuf,
}

impl ProbeStore {
    pub fn new(probe_dir: PathBuf) -> Self {
        Self { probe_dir }
    }

    /// Validate the working directory before the run loop starts.
    ///
    /// A missing or unwritable directory is startup-fatal; the store never
    /// creates the directory itself since it exclusively owns whatever is
    /// already in it.
    pub async fn init(&self) -> Result<()> {
        let meta = fs::metadata(&self.probe_dir).await.map_err(|e| {
            MonitorError::Config(format!(
                "Probe directory {:?} is not accessible: {}",
                self.probe_dir, e
            ))
        })?;
        if !meta.is_dir() {
            return Err(MonitorError::Config(format!(
                "Probe path {:?} is not a directory",
                self.probe_dir
            )));
        }
        if meta.permissions().readonly() {
            return Err(MonitorError::Config(format!(
                "Probe directory {:?} is not writable",
                self.probe_dir
            )));
        }
        info!(probe_dir = ?self.probe_dir, "Probe store initialized");
        Ok(())
    }

    /// Path of the probe named by `timestamp`.
    pub fn path_for(&self, timestamp: ProbeTimestamp) -> PathBuf {
        self.probe_dir.join(timestamp.to_string())
    }

    /// Write a new probe named with the current timestamp and force it to
    /// stable storage, so later residency checks are never confused with
    /// "not yet durable".
    ///
    /// Two creates within the same second overwrite each other; the cycle
    /// interval is clamped to >= 1s so this does not happen in practice.
    pub async fn create(&self) -> Result<ProbeTimestamp> {
        let timestamp = Utc::now().timestamp();
        let path = self.path_for(timestamp);

        let result = async {
            let mut file = fs::File::create(&path).await?;
            file.write_all(timestamp.to_string().as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await?;
            Ok::<(), std::io::Error>(())
        }
        .await;

        match result {
            Ok(()) => {
                debug!(probe = timestamp, "Created probe file");
                Ok(timestamp)
            }
            Err(e) => Err(MonitorError::ProbeCreate(Box::new(e))),
        }
    }

    /// Delete the probe named by `timestamp`.
    ///
    /// A probe that already vanished is treated as already-evicted, not an
    /// error.
    pub async fn delete(&self, timestamp: ProbeTimestamp) -> Result<()> {
        match fs::remove_file(self.path_for(timestamp)).await {
            Ok(()) => {
                debug!(probe = timestamp, "Deleted probe file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(probe = timestamp, "Probe file already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Raw filenames currently present, in directory order.
    ///
    /// Parsing and ordering are the inventory scanner's job.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.probe_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}
