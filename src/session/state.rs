//! Request state machine for one user session.
//!
//! ```text
//! Idle ──select──▶ Analyzing ──complete(Ok)──▶ Succeeded ──reset──▶ Idle
//!                      │
//!                      └──complete(Err)──▶ Failed ──select──▶ Analyzing
//! ```
//!
//! The analysis result lives inside `Succeeded`, so a result can never be
//! present in any other state.

use thiserror::Error;
use tracing::{info, warn};

use crate::client::ClientError;
use crate::intake::FileIntake;
use crate::models::{AnalysisResult, UploadedFile};

/// State of the current analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Analyzing {
        file: String,
    },
    Succeeded(AnalysisResult),
    Failed(String),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing { .. } => "analyzing",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing { .. })
    }

    /// The analysis, present only in `Succeeded`.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("An analysis is already in progress")]
    Busy,
    #[error("No files were selected")]
    EmptySelection,
    #[error("No analysis is in progress")]
    NotAnalyzing,
    #[error("No file at position {0}")]
    NoSuchFile(usize),
}

/// Point-in-time view of a session, published to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub state: RequestState,
    pub files: Vec<String>,
}

/// The selected files plus the request state.
#[derive(Debug, Default)]
pub struct Session {
    intake: FileIntake,
    state: RequestState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn intake(&self) -> &FileIntake {
        &self.intake
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            files: self.intake.names(),
        }
    }

    /// Accept a selection and start analyzing its first file.
    ///
    /// A previous result or failure is discarded.
    pub fn select(&mut self, files: Vec<UploadedFile>) -> Result<UploadedFile, SessionError> {
        if self.state.is_analyzing() {
            return Err(SessionError::Busy);
        }
        let target = self
            .intake
            .accept(files)
            .ok_or(SessionError::EmptySelection)?;

        info!("Analyzing {}", target.name);
        self.state = RequestState::Analyzing {
            file: target.name.clone(),
        };
        Ok(target)
    }

    /// Finish the in-flight request. On failure the file list is cleared so
    /// the user starts over.
    pub fn complete(
        &mut self,
        outcome: Result<AnalysisResult, ClientError>,
    ) -> Result<(), SessionError> {
        if !self.state.is_analyzing() {
            return Err(SessionError::NotAnalyzing);
        }
        self.state = match outcome {
            Ok(result) => RequestState::Succeeded(result),
            Err(e) => {
                warn!("Analysis failed: {}", e);
                self.intake.clear();
                RequestState::Failed(e.user_message().to_string())
            }
        };
        Ok(())
    }

    /// Return to the upload prompt, discarding files and any result.
    pub fn reset(&mut self) {
        self.intake.clear();
        self.state = RequestState::Idle;
    }

    /// Remove one file from the list. A displayed result is cleared.
    pub fn remove_file(&mut self, index: usize) -> Result<UploadedFile, SessionError> {
        if self.state.is_analyzing() {
            return Err(SessionError::Busy);
        }
        let removed = self
            .intake
            .remove(index)
            .ok_or(SessionError::NoSuchFile(index))?;
        if matches!(self.state, RequestState::Succeeded(_)) {
            self.state = RequestState::Idle;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GENERIC_FAILURE;

    fn file(name: &str) -> UploadedFile {
        UploadedFile::new(name, "Mediation brief")
    }

    #[test]
    fn test_select_moves_to_analyzing() {
        let mut session = Session::new();
        let target = session.select(vec![file("a.txt"), file("b.txt")]).unwrap();

        assert_eq!(target.name, "a.txt");
        assert_eq!(
            session.state(),
            &RequestState::Analyzing {
                file: "a.txt".to_string()
            }
        );
        assert_eq!(session.snapshot().files, vec!["a.txt", "b.txt"]);
        assert!(session.state().result().is_none());
    }

    #[test]
    fn test_success_then_reset() {
        let mut session = Session::new();
        session.select(vec![file("a.txt")]).unwrap();
        session.complete(Ok(AnalysisResult::sample())).unwrap();

        assert_eq!(session.state().name(), "succeeded");
        assert_eq!(session.state().result(), Some(&AnalysisResult::sample()));

        session.reset();
        assert_eq!(session.snapshot(), Snapshot::default());
    }

    #[test]
    fn test_failure_clears_files() {
        let mut session = Session::new();
        session.select(vec![file("a.txt")]).unwrap();
        session
            .complete(Err(ClientError::NetworkOrServerError("HTTP 500".into())))
            .unwrap();

        assert_eq!(
            session.state(),
            &RequestState::Failed(GENERIC_FAILURE.to_string())
        );
        assert!(session.intake().is_empty());
        assert!(session.state().result().is_none());
    }

    #[test]
    fn test_busy_while_analyzing() {
        let mut session = Session::new();
        session.select(vec![file("a.txt")]).unwrap();
        assert_eq!(session.select(vec![file("b.txt")]), Err(SessionError::Busy));
        assert_eq!(session.remove_file(0), Err(SessionError::Busy));
        assert_eq!(session.snapshot().files, vec!["a.txt"]);
    }

    #[test]
    fn test_complete_requires_analyzing() {
        let mut session = Session::new();
        assert_eq!(
            session.complete(Ok(AnalysisResult::sample())),
            Err(SessionError::NotAnalyzing)
        );
    }

    #[test]
    fn test_empty_selection() {
        let mut session = Session::new();
        assert_eq!(session.select(Vec::new()), Err(SessionError::EmptySelection));
        assert_eq!(session.state(), &RequestState::Idle);
    }

    #[test]
    fn test_remove_file_clears_result() {
        let mut session = Session::new();
        session.select(vec![file("a.txt"), file("b.txt")]).unwrap();
        session.complete(Ok(AnalysisResult::sample())).unwrap();

        let removed = session.remove_file(1).unwrap();
        assert_eq!(removed.name, "b.txt");
        assert_eq!(session.state(), &RequestState::Idle);
        assert_eq!(session.snapshot().files, vec!["a.txt"]);
        assert_eq!(session.remove_file(3), Err(SessionError::NoSuchFile(3)));
    }

    #[test]
    fn test_select_after_failure() {
        let mut session = Session::new();
        session.select(vec![file("a.txt")]).unwrap();
        session.complete(Err(ClientError::EmptyDocument)).unwrap();

        session.select(vec![file("b.txt")]).unwrap();
        assert!(session.state().is_analyzing());
        assert_eq!(session.snapshot().files, vec!["b.txt"]);
    }
}
