//! Drives a [`Session`] from a command channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use super::state::{Session, SessionError, Snapshot};
use crate::client::{Analyzer, ClientError};
use crate::models::{AnalysisResult, UploadedFile};

/// Messages accepted by a [`SessionDriver`].
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// A new selection; its first file is analyzed.
    Select(Vec<UploadedFile>),
    /// Remove the file at this position.
    Remove(usize),
    /// Back to the upload prompt.
    Reset,
}

/// Owns one session and its analyzer. Every state change is published on
/// a watch channel.
pub struct SessionDriver {
    session: Session,
    analyzer: Arc<dyn Analyzer>,
    min_loading: Duration,
    updates: watch::Sender<Snapshot>,
}

impl SessionDriver {
    /// Create a driver and the receiver that observes its snapshots.
    ///
    /// `min_loading` is the shortest time a request stays in `Analyzing`.
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        min_loading: Duration,
    ) -> (Self, watch::Receiver<Snapshot>) {
        let (updates, rx) = watch::channel(Snapshot::default());
        let driver = Self {
            session: Session::new(),
            analyzer,
            min_loading,
            updates,
        };
        (driver, rx)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Apply one command. A selection runs its analysis to completion
    /// before returning.
    pub async fn handle(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        match command {
            SessionCommand::Select(files) => {
                let target = self.session.select(files)?;
                self.publish();

                let outcome = self.analyze(&target).await;
                self.session.complete(outcome)?;
            }
            SessionCommand::Remove(index) => {
                let removed = self.session.remove_file(index)?;
                debug!("Removed {}", removed.name);
            }
            SessionCommand::Reset => self.session.reset(),
        }
        self.publish();
        Ok(())
    }

    /// Process commands until every sender is dropped. Returns the final
    /// snapshot.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> Snapshot {
        while let Some(command) = commands.recv().await {
            if let Err(e) = self.handle(command).await {
                warn!("Ignored session command: {}", e);
            }
        }
        self.session.snapshot()
    }

    async fn analyze(&self, file: &UploadedFile) -> Result<AnalysisResult, ClientError> {
        let text = file.text();
        let (outcome, ()) = tokio::join!(
            self.analyzer.analyze(&text),
            tokio::time::sleep(self.min_loading)
        );
        outcome
    }

    fn publish(&self) {
        self.updates.send_replace(self.session.snapshot());
    }
}
