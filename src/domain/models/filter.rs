use regex::Regex;

use crate::domain::errors::ValidationError;

/// Predicate deciding whether an object key is included in a batch
/// operation. Implementations are stateless and pure.
pub trait KeyFilter: Send + Sync {
    fn matches(&self, key: &str) -> bool;
}

/// Excludes keys whose text matches a compiled pattern; every other key
/// is included. Pattern syntax errors fail here, at construction, never
/// per call.
#[derive(Debug, Clone)]
pub struct ExcludePattern {
    pattern: Regex,
}

impl ExcludePattern {
    pub fn new(pattern: &str) -> Result<Self, ValidationError> {
        let pattern =
            Regex::new(pattern).map_err(|e| ValidationError::InvalidFilterPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl KeyFilter for ExcludePattern {
    fn matches(&self, key: &str) -> bool {
        !self.pattern.is_match(key)
    }
}

/// Admits every key
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeAll;

impl KeyFilter for IncludeAll {
    fn matches(&self, _key: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_pattern_marks_matching_keys_excluded() {
        let filter = ExcludePattern::new("(dt=__HIVE_DEFAULT_PARTITION__)").unwrap();

        assert!(!filter.matches("a/(dt=__HIVE_DEFAULT_PARTITION__)/x"));
        assert!(filter.matches("a/dt=2013-01-01/x"));
    }

    #[test]
    fn test_exclude_pattern_is_a_real_regex() {
        let filter = ExcludePattern::new(r"part-\d{5}\.bak$").unwrap();

        assert!(!filter.matches("in/part-00000.bak"));
        assert!(filter.matches("in/part-00000"));
    }

    #[test]
    fn test_invalid_pattern_fails_at_construction() {
        let err = ExcludePattern::new("(unclosed").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFilterPattern { .. }
        ));
    }

    #[test]
    fn test_include_all() {
        assert!(IncludeAll.matches("anything"));
        assert!(IncludeAll.matches(""));
    }
}
