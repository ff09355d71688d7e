//! Path filtering and size/count aggregation

use crate::component::Component;
use crate::error::{Error, Result};
use regex::Regex;

/// Regular expression that must match a component's whole path
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: String,
    regex: Regex,
}

impl PathFilter {
    /// Compile `pattern`, anchored at both ends
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as given by the user
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whole-string match against `path`
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Counts and sizes over a record set, plus the records that matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub matched: Vec<Component>,
    pub total_count: usize,
    pub match_count: usize,
    pub total_size: u64,
    pub matched_size: u64,
}

/// Aggregate `records`, keeping those whose path matches `filter`.
///
/// Without a filter every record matches.
pub fn aggregate(records: &[Component], filter: Option<&PathFilter>) -> Aggregate {
    let matched: Vec<Component> = records
        .iter()
        .filter(|record| filter.map_or(true, |f| f.matches(&record.path)))
        .cloned()
        .collect();

    Aggregate {
        total_count: records.len(),
        match_count: matched.len(),
        total_size: records.iter().map(|r| r.file_size).sum(),
        matched_size: matched.iter().map(|r| r.file_size).sum(),
        matched,
    }
}
