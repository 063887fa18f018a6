//! Offline parsing of a saved completion.

use std::path::Path;

use console::style;
use tokio::io::AsyncReadExt;

use crate::analysis::{parse_completion_with, SectionMapping};
use crate::session::{format_view, View};

/// Parse a completion from `input` (`-` reads stdin) and print the sections.
pub async fn cmd_parse(input: &Path, mapping: SectionMapping, json: bool) -> anyhow::Result<()> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(input)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input.display(), e))?
    };

    let result = match parse_completion_with(&text, mapping) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_view(&View::Analysis(&result)));
        eprintln!(
            "\n{} {} bullets in 4 sections",
            style("✓").green(),
            result.bullet_count()
        );
    }
    Ok(())
}
