//! Configuration display command.

use console::style;

use crate::config::Config;

const REDACTED: &str = "********";

/// Print the effective configuration with secrets masked.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults (no config file found)".to_string());
    eprintln!("{} Source: {}", style("→").dim(), source);

    println!("{}", redacted(config).to_pretty_json());
    Ok(())
}

fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.client.api_key.is_some() {
        shown.client.api_key = Some(REDACTED.to_string());
    }
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some(REDACTED.to_string());
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_masks_keys() {
        let mut config = Config::default();
        config.client.api_key = Some("anon-key".to_string());
        config.llm.api_key = Some("gsk_secret".to_string());

        let json = redacted(&config).to_pretty_json();
        assert!(!json.contains("anon-key"));
        assert!(!json.contains("gsk_secret"));
        assert!(json.contains(REDACTED));
    }
}
