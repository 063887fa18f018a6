//! Parse an LLM completion into a four-section analysis.
//!
//! The model is prompted to answer with four numbered sections, each a
//! header line (`1. Case Overview`) followed by dash bullets (`- ...`).
//! There is no recovery: any deviation from that shape fails the whole
//! request.
//!
//! By default ([`SectionMapping::Auto`]) sections are assigned to keys by the
//! keywords in their headers, so a reordered answer still lands in the right
//! place. When the headers do not name four distinct sections, position
//! decides.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{AnalysisResult, AnalysisSection, SectionKey};

/// Number of sections every completion must contain.
pub const SECTION_COUNT: usize = 4;

/// Numbered section header: optional indentation and markdown markers, then
/// digits, a period, and whitespace (or end of line).
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[#*]*[ \t]*\d+\.(?:[ \t]+|\r?$)").unwrap());

/// How parsed sections are assigned to [`SectionKey`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SectionMapping {
    /// Section i becomes key i, whatever its header says.
    Positional,
    /// Every header must name its section.
    Headers,
    /// Use headers when all four resolve to distinct keys, else positional.
    #[default]
    Auto,
}

impl SectionMapping {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "positional" => Some(Self::Positional),
            "headers" => Some(Self::Headers),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Errors produced while parsing a completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Expected {} sections in analysis, found {found}", SECTION_COUNT)]
    SectionCountMismatch { found: usize },

    #[error("Section {} has no bullet points", .index + 1)]
    EmptySection { index: usize },

    #[error("Section {} header '{title}' does not name a known section", .index + 1)]
    UnlabeledSection { index: usize, title: String },
}

/// A section as it appears in the completion, before key assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawSection {
    title: String,
    bullets: Vec<String>,
}

/// Parse a completion using [`SectionMapping::Auto`].
pub fn parse_completion(text: &str) -> Result<AnalysisResult, ParseError> {
    parse_completion_with(text, SectionMapping::Auto)
}

/// Parse a completion with an explicit mapping strategy.
pub fn parse_completion_with(
    text: &str,
    mapping: SectionMapping,
) -> Result<AnalysisResult, ParseError> {
    let chunks = split_sections(text);
    if chunks.len() != SECTION_COUNT {
        return Err(ParseError::SectionCountMismatch {
            found: chunks.len(),
        });
    }

    let mut raw = Vec::with_capacity(SECTION_COUNT);
    for (index, chunk) in chunks.iter().enumerate() {
        let section = parse_chunk(chunk);
        if section.bullets.is_empty() {
            return Err(ParseError::EmptySection { index });
        }
        raw.push(section);
    }

    let keys = assign_keys(&raw, mapping)?;

    let mut ordered: [Option<AnalysisSection>; SECTION_COUNT] = Default::default();
    for (section, key) in raw.into_iter().zip(keys) {
        let title = if section.title.is_empty() {
            key.default_title().to_string()
        } else {
            section.title
        };
        ordered[key.index()] = Some(AnalysisSection::new(title, section.bullets));
    }

    // assign_keys yields a permutation, so every slot is filled.
    let [Some(overview), Some(risks), Some(settlement), Some(strategy)] = ordered else {
        unreachable!("section keys must be a permutation");
    };
    Ok(AnalysisResult::from_ordered([
        overview, risks, settlement, strategy,
    ]))
}

/// Split on numbered headers. Text before the first header is preamble and
/// is discarded; chunks that are blank are dropped.
fn split_sections(text: &str) -> Vec<&str> {
    let starts: Vec<(usize, usize)> = SECTION_HEADER
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    if let Some(&(first, _)) = starts.first() {
        let preamble = text[..first].trim();
        if !preamble.is_empty() {
            debug!("Discarding {} chars of completion preamble", preamble.len());
        }
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &(_, body_start))| {
            let end = starts.get(i + 1).map(|&(s, _)| s).unwrap_or(text.len());
            &text[body_start..end]
        })
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}

/// Extract the header title and dash bullets of one chunk.
fn parse_chunk(chunk: &str) -> RawSection {
    let mut lines = chunk.lines();
    let header = lines.next().unwrap_or("");

    let (title, header_bullet) = match strip_bullet(header) {
        Some(bullet) => (String::new(), Some(bullet)),
        None => (clean_title(header), None),
    };

    let bullets = header_bullet
        .into_iter()
        .chain(lines.filter_map(strip_bullet))
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect();

    RawSection { title, bullets }
}

fn strip_bullet(line: &str) -> Option<&str> {
    line.trim().strip_prefix('-').map(str::trim)
}

fn clean_title(header: &str) -> String {
    header
        .trim()
        .trim_matches(|c: char| c == '*' || c == '#' || c == '_')
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

/// Resolve a header title to a key by keyword. Titles matching more than one
/// key do not resolve.
fn key_for_title(title: &str) -> Option<SectionKey> {
    let lower = title.to_lowercase();
    let mut matches = SectionKey::ALL
        .into_iter()
        .filter(|key| key.keywords().iter().any(|kw| lower.contains(kw)));
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

fn assign_keys(
    raw: &[RawSection],
    mapping: SectionMapping,
) -> Result<Vec<SectionKey>, ParseError> {
    let positional = || SectionKey::ALL.to_vec();

    if mapping == SectionMapping::Positional {
        return Ok(positional());
    }

    let resolved: Vec<Option<SectionKey>> =
        raw.iter().map(|s| key_for_title(&s.title)).collect();

    let mut seen = [false; SECTION_COUNT];
    let mut keyed = Vec::with_capacity(SECTION_COUNT);
    for (index, key) in resolved.iter().enumerate() {
        match key {
            Some(key) if !seen[key.index()] => {
                seen[key.index()] = true;
                keyed.push(*key);
            }
            _ => {
                if mapping == SectionMapping::Headers {
                    return Err(ParseError::UnlabeledSection {
                        index,
                        title: raw[index].title.clone(),
                    });
                }
                warn!(
                    "Section {} header '{}' did not resolve to a unique section, using positional order",
                    index + 1,
                    raw[index].title
                );
                return Ok(positional());
            }
        }
    }

    if keyed != positional() {
        debug!("Reordered sections by header: {:?}", keyed);
    }
    Ok(keyed)
}
