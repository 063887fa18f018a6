//! File intake: the selected file list and the picker that feeds a session.
//!
//! A selection may hold several files; only the first file of each new
//! selection is analyzed. The rest stay in the displayed list.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::UploadedFile;
use crate::session::SessionCommand;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session is no longer accepting files")]
    SessionClosed,
}

/// Files currently selected in the session.
#[derive(Debug, Clone, Default)]
pub struct FileIntake {
    files: Vec<UploadedFile>,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a selection and return the file to analyze (its first entry).
    ///
    /// Files are accepted regardless of type or size. An empty selection is
    /// ignored.
    pub fn accept(&mut self, batch: Vec<UploadedFile>) -> Option<UploadedFile> {
        let first = batch.first().cloned()?;
        if batch.len() > 1 {
            debug!(
                "Selection of {} files, analyzing only {}",
                batch.len(),
                first.name
            );
        }
        self.files.extend(batch);
        Some(first)
    }

    /// Remove the file at `index`.
    pub fn remove(&mut self, index: usize) -> Option<UploadedFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Read a selection of files from disk.
pub async fn load_files(paths: &[PathBuf]) -> Result<Vec<UploadedFile>, IntakeError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_file(path).await?);
    }
    Ok(files)
}

async fn load_file(path: &Path) -> Result<UploadedFile, IntakeError> {
    let file = UploadedFile::from_path(path)
        .await
        .map_err(|source| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "Loaded {} ({} bytes, {})",
        file.name,
        file.size(),
        file.mime_type
    );
    Ok(file)
}

/// Loads selected files and hands them to one specific session.
#[derive(Debug, Clone)]
pub struct FilePicker {
    commands: mpsc::Sender<SessionCommand>,
}

impl FilePicker {
    pub fn new(commands: mpsc::Sender<SessionCommand>) -> Self {
        Self { commands }
    }

    /// Read `paths` and submit them as one selection. Returns the number of
    /// files submitted; an empty selection submits nothing.
    pub async fn pick(&self, paths: &[PathBuf]) -> Result<usize, IntakeError> {
        if paths.is_empty() {
            return Ok(0);
        }
        let files = load_files(paths).await?;
        self.submit(files).await
    }

    /// Submit files that are already in memory.
    pub async fn submit(&self, files: Vec<UploadedFile>) -> Result<usize, IntakeError> {
        let count = files.len();
        if count == 0 {
            return Ok(0);
        }
        info!("Selected {} file(s)", count);
        self.commands
            .send(SessionCommand::Select(files))
            .await
            .map_err(|_| IntakeError::SessionClosed)?;
        Ok(count)
    }
}
