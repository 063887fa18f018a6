//! Mediation analysis models.
//!
//! An analysis is always four sections, one per [`SectionKey`]. The JSON
//! shape is `{ overview, risks, settlement, strategy }` with each value a
//! `{ title, content }` object, which is what the endpoint returns and what
//! the client expects back.

use serde::{Deserialize, Serialize};

/// Fixed semantic role of an analysis section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Overview,
    Risks,
    Settlement,
    Strategy,
}

impl SectionKey {
    /// All keys in canonical (display and positional) order.
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Overview,
        SectionKey::Risks,
        SectionKey::Settlement,
        SectionKey::Strategy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Risks => "risks",
            Self::Settlement => "settlement",
            Self::Strategy => "strategy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "overview" => Some(Self::Overview),
            "risks" => Some(Self::Risks),
            "settlement" => Some(Self::Settlement),
            "strategy" => Some(Self::Strategy),
            _ => None,
        }
    }

    /// Position of this key in canonical order.
    pub fn index(&self) -> usize {
        match self {
            Self::Overview => 0,
            Self::Risks => 1,
            Self::Settlement => 2,
            Self::Strategy => 3,
        }
    }

    /// Title used when the model's header is missing or unusable.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Overview => "Case Overview & Dynamics",
            Self::Risks => "Risk Assessment & Leverage Points",
            Self::Settlement => "Settlement Framework & Valuation",
            Self::Strategy => "Strategic Recommendations",
        }
    }

    /// Lowercase keywords that identify this section in a header title.
    pub(crate) fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Overview => &["overview", "dynamics", "background", "summary"],
            Self::Risks => &["risk", "leverage"],
            Self::Settlement => &["settlement", "valuation"],
            Self::Strategy => &["strateg", "recommendation", "next step"],
        }
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One titled list of bullet points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub title: String,
    pub content: Vec<String>,
}

impl AnalysisSection {
    pub fn new(title: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }
}

/// A complete four-section mediation analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overview: AnalysisSection,
    pub risks: AnalysisSection,
    pub settlement: AnalysisSection,
    pub strategy: AnalysisSection,
}

impl AnalysisResult {
    /// Build from sections already arranged in canonical key order.
    pub fn from_ordered([overview, risks, settlement, strategy]: [AnalysisSection; 4]) -> Self {
        Self {
            overview,
            risks,
            settlement,
            strategy,
        }
    }

    pub fn get(&self, key: SectionKey) -> &AnalysisSection {
        match key {
            SectionKey::Overview => &self.overview,
            SectionKey::Risks => &self.risks,
            SectionKey::Settlement => &self.settlement,
            SectionKey::Strategy => &self.strategy,
        }
    }

    /// Sections paired with their keys, in canonical order.
    pub fn sections(&self) -> impl Iterator<Item = (SectionKey, &AnalysisSection)> {
        SectionKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    /// Total number of bullets across all sections.
    pub fn bullet_count(&self) -> usize {
        self.sections().map(|(_, s)| s.content.len()).sum()
    }

    /// Render back into the numbered, dash-bulleted completion format the
    /// parser consumes.
    pub fn to_completion_text(&self) -> String {
        let mut out = String::new();
        for (i, (_, section)) in self.sections().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("{}. {}\n", i + 1, section.title));
            for bullet in &section.content {
                out.push_str(&format!("- {}\n", bullet));
            }
        }
        out
    }

    /// Fixed sample analysis served by the simulated provider.
    pub fn sample() -> Self {
        fn section(key: SectionKey, bullets: &[&str]) -> AnalysisSection {
            AnalysisSection::new(
                key.default_title(),
                bullets.iter().map(|b| b.to_string()).collect(),
            )
        }

        Self {
            overview: section(
                SectionKey::Overview,
                &[
                    "Parties involved: Smith Manufacturing vs. Jones Distribution Corp",
                    "Core dispute centers on breach of supply contract worth $2.5M",
                    "High emotional tension due to 15-year business relationship",
                    "Case is in pre-litigation phase with formal demands exchanged",
                ],
            ),
            risks: section(
                SectionKey::Risks,
                &[
                    "Smith has strong documentary evidence of contract terms",
                    "Jones claims force majeure due to supply chain disruptions",
                    "Potential precedent from similar cases favors plaintiff",
                    "Estimated litigation costs exceed $300,000 for each party",
                ],
            ),
            settlement: section(
                SectionKey::Settlement,
                &[
                    "Comparable cases settled in $1.2M to $1.8M range",
                    "Potential for structured payment plan over 24 months",
                    "Tax implications favor immediate settlement",
                    "Early resolution could preserve business relationship",
                ],
            ),
            strategy: section(
                SectionKey::Strategy,
                &[
                    "Start with interest-based negotiation approach",
                    "Focus on future business opportunities as leverage",
                    "Consider third-party neutral evaluation",
                    "Set 90-day timeline for resolution before litigation",
                ],
            ),
        }
    }
}
