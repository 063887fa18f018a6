//! casebrief - case document intake and mediation analysis.
//!
//! A front end that reads case documents and requests an analysis, and an
//! HTTP endpoint that turns document text into four analysis sections with
//! an LLM.

pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod intake;
pub mod llm;
pub mod models;
pub mod server;
pub mod session;
