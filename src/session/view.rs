//! What to show for a given session snapshot.

use std::time::Duration;

use console::style;

use super::state::{RequestState, Snapshot};
use crate::models::AnalysisResult;

/// The three screens of the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    /// File picker, with an error notice after a failed attempt.
    UploadPrompt {
        files: &'a [String],
        notice: Option<&'a str>,
    },
    /// Loading indicator while a file is analyzed.
    Progress { file: &'a str },
    /// The four analysis cards.
    Analysis(&'a AnalysisResult),
}

/// Map a snapshot to its view. Pure.
pub fn render(snapshot: &Snapshot) -> View<'_> {
    match &snapshot.state {
        RequestState::Idle => View::UploadPrompt {
            files: &snapshot.files,
            notice: None,
        },
        RequestState::Failed(reason) => View::UploadPrompt {
            files: &snapshot.files,
            notice: Some(reason.as_str()),
        },
        RequestState::Analyzing { file } => View::Progress { file },
        RequestState::Succeeded(result) => View::Analysis(result),
    }
}

/// Rotating status lines shown while a request is in flight.
#[derive(Debug, Clone, Copy)]
pub struct LoadingPhrases {
    interval: Duration,
}

impl LoadingPhrases {
    pub const PHRASES: [&'static str; 6] = [
        "Analyzing Case Documents...",
        "Identifying Key Arguments...",
        "Evaluating Settlement Potential...",
        "Processing Legal Context...",
        "Assessing Resolution Paths...",
        "Calculating Settlement Range...",
    ];

    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2500);

    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Phrase after `elapsed`; holds on the last one.
    pub fn phrase_at(&self, elapsed: Duration) -> &'static str {
        let step = if self.interval.is_zero() {
            Self::PHRASES.len() - 1
        } else {
            (elapsed.as_millis() / self.interval.as_millis()) as usize
        };
        Self::PHRASES[step.min(Self::PHRASES.len() - 1)]
    }
}

impl Default for LoadingPhrases {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

/// Format a view for the terminal.
pub fn format_view(view: &View<'_>) -> String {
    match view {
        View::UploadPrompt { files, notice } => {
            let mut out = String::new();
            if let Some(notice) = notice {
                out.push_str(&format!("{} {}\n", style("✗").red(), notice));
            }
            out.push_str(&format!(
                "{}\n",
                style("Upload case documents to analyze").bold()
            ));
            if files.is_empty() {
                out.push_str(&format!("  {}\n", style("No files selected").dim()));
            }
            for (i, name) in files.iter().enumerate() {
                out.push_str(&format!("  {} {}\n", style(format!("[{}]", i)).dim(), name));
            }
            out
        }
        View::Progress { file } => format!(
            "{} {} ({})\n",
            style("→").cyan(),
            LoadingPhrases::PHRASES[0],
            file
        ),
        View::Analysis(result) => format_analysis(result),
    }
}

fn format_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();
    for (key, section) in result.sections() {
        if key.index() > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}\n", style(&section.title).bold()));
        for bullet in &section.content {
            out.push_str(&format!("  {} {}\n", style("•").green(), bullet));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_states() {
        let idle = Snapshot::default();
        assert_eq!(
            render(&idle),
            View::UploadPrompt {
                files: &[],
                notice: None
            }
        );

        let failed = Snapshot {
            state: RequestState::Failed("Failed to analyze document. Please try again.".into()),
            files: Vec::new(),
        };
        assert!(matches!(
            render(&failed),
            View::UploadPrompt {
                notice: Some(_),
                ..
            }
        ));

        let analyzing = Snapshot {
            state: RequestState::Analyzing {
                file: "brief.txt".into(),
            },
            files: vec!["brief.txt".into()],
        };
        assert_eq!(render(&analyzing), View::Progress { file: "brief.txt" });

        let result = AnalysisResult::sample();
        let done = Snapshot {
            state: RequestState::Succeeded(result.clone()),
            files: vec!["brief.txt".into()],
        };
        assert_eq!(render(&done), View::Analysis(&result));
    }

    #[test]
    fn test_phrase_progression() {
        let phrases = LoadingPhrases::default();
        assert_eq!(phrases.phrase_at(Duration::ZERO), "Analyzing Case Documents...");
        assert_eq!(
            phrases.phrase_at(Duration::from_millis(2499)),
            "Analyzing Case Documents..."
        );
        assert_eq!(
            phrases.phrase_at(Duration::from_millis(2500)),
            "Identifying Key Arguments..."
        );
        assert_eq!(
            phrases.phrase_at(Duration::from_secs(12)),
            "Assessing Resolution Paths..."
        );
        // Holds on the last phrase
        assert_eq!(
            phrases.phrase_at(Duration::from_secs(600)),
            "Calculating Settlement Range..."
        );
    }

    #[test]
    fn test_format_analysis_lists_every_section() {
        console::set_colors_enabled(false);
        let result = AnalysisResult::sample();
        let text = format_view(&View::Analysis(&result));

        for (_, section) in result.sections() {
            assert!(text.contains(&section.title));
            for bullet in &section.content {
                assert!(text.contains(bullet.as_str()));
            }
        }
    }

    #[test]
    fn test_format_upload_prompt_with_notice() {
        console::set_colors_enabled(false);
        let files = vec!["complaint.pdf".to_string()];
        let text = format_view(&View::UploadPrompt {
            files: &files,
            notice: Some("Failed to analyze document. Please try again."),
        });

        assert!(text.starts_with("✗ Failed to analyze document."));
        assert!(text.contains("[0] complaint.pdf"));
    }
}
