//! Configuration loading from constexprify.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::ast::Standard;

/// Main configuration structure for constexprify.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ConstexprifyConfig {
    /// Function names to never suggest for.
    pub ignore: Option<Vec<String>>,
    /// Language standard to analyze under ("c++11" or "c++14").
    pub standard: Option<Standard>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from constexprify.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<ConstexprifyConfig>> {
    let path = root.join("constexprify.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid constexprify.toml")?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg: ConstexprifyConfig = toml::from_str(
            r#"
            ignore = ["legacy_init", "main_loop"]
            standard = "c++11"

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ignore.unwrap().len(), 2);
        assert_eq!(cfg.standard, Some(Standard::Cxx11));
        assert_eq!(cfg.output.unwrap().format.as_deref(), Some("json"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let loaded = load_config(Path::new("/nonexistent/dir")).unwrap();
        assert!(loaded.is_none());
    }
}
