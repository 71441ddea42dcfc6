use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::reviews::SearchQuery;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Search term sent to the catalog, e.g. `"dewalt"` or `"Black+and+Decker"`.
    pub keyword: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsFile {
    pub keywords: Vec<KeywordConfig>,
}

impl KeywordsFile {
    /// Seeds for a crawl run, in file order.
    #[must_use]
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.keywords
            .iter()
            .map(|k| SearchQuery::new(k.keyword.trim()))
            .collect()
    }
}

/// Load and validate the keyword set from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keywords(path: &Path) -> Result<KeywordsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let keywords_file: KeywordsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::KeywordsFileParse)?;

    validate_keywords(&keywords_file)?;

    Ok(keywords_file)
}

fn validate_keywords(keywords_file: &KeywordsFile) -> Result<(), ConfigError> {
    if keywords_file.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "at least one keyword must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in &keywords_file.keywords {
        let keyword = entry.keyword.trim();
        if keyword.is_empty() {
            return Err(ConfigError::Validation(
                "keyword must be non-empty".to_string(),
            ));
        }

        if !seen.insert(keyword.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate keyword: '{keyword}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "keywords_test.rs"]
mod tests;
