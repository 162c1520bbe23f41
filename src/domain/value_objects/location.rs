use std::str::FromStr;

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{BucketName, ObjectKey};

/// A root for enumeration within the object store: a bucket plus an
/// optional key prefix. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    bucket: BucketName,
    prefix: Option<String>,
}

impl Location {
    /// A location covering a whole bucket
    pub fn new(bucket: BucketName) -> Self {
        Self {
            bucket,
            prefix: None,
        }
    }

    /// A location rooted at a key prefix within a bucket. The prefix is
    /// validated with the same rules as object keys; trailing slashes are
    /// normalized away.
    pub fn with_prefix(bucket: BucketName, prefix: &str) -> Result<Self, ValidationError> {
        let trimmed = prefix.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::new(bucket));
        }
        ObjectKey::new(trimmed.to_string())?;
        Ok(Self {
            bucket,
            prefix: Some(trimmed.to_string()),
        })
    }

    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Full key for a path relative to this location's prefix
    pub fn resolve(&self, relative: &str) -> Result<ObjectKey, ValidationError> {
        match &self.prefix {
            Some(prefix) => ObjectKey::new(format!("{}/{}", prefix, relative)),
            None => ObjectKey::new(relative.to_string()),
        }
    }

    /// The part of `key` below this location's prefix. Keys outside the
    /// prefix are returned whole.
    pub fn relative_part_of<'a>(&self, key: &'a ObjectKey) -> &'a str {
        match &self.prefix {
            Some(prefix) => key
                .as_str()
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(key.as_str()),
            None => key.as_str(),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}/{}", self.bucket, prefix),
            None => write!(f, "{}", self.bucket),
        }
    }
}

impl FromStr for Location {
    type Err = ValidationError;

    /// Parse `[s3://]bucket[/prefix[/]]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("s3://").unwrap_or(s);
        let stripped = stripped.trim_end_matches('/');
        if stripped.is_empty() {
            return Err(ValidationError::EmptyLocation);
        }
        match stripped.split_once('/') {
            Some((bucket, prefix)) => {
                Location::with_prefix(BucketName::new(bucket.to_string())?, prefix)
            }
            None => Ok(Location::new(BucketName::new(stripped.to_string())?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(name: &str) -> BucketName {
        BucketName::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_parse_bucket_only() {
        let location: Location = "events-in".parse().unwrap();
        assert_eq!(location.bucket().as_str(), "events-in");
        assert_eq!(location.prefix(), None);
    }

    #[test]
    fn test_parse_with_prefix_and_scheme() {
        let location: Location = "s3://events-in/raw/2013/".parse().unwrap();
        assert_eq!(location.bucket().as_str(), "events-in");
        assert_eq!(location.prefix(), Some("raw/2013"));
    }

    #[test]
    fn test_parse_rejects_empty_and_invalid() {
        assert!("".parse::<Location>().is_err());
        assert!("s3://".parse::<Location>().is_err());
        assert!("Bad_Bucket/prefix".parse::<Location>().is_err());
    }

    #[test]
    fn test_resolve_rebases_under_prefix() {
        let location = Location::with_prefix(bucket("events-archive"), "archive").unwrap();
        let key = location.resolve("2013/part-00000").unwrap();
        assert_eq!(key.as_str(), "archive/2013/part-00000");

        let bare = Location::new(bucket("events-archive"));
        assert_eq!(bare.resolve("part-00000").unwrap().as_str(), "part-00000");
    }

    #[test]
    fn test_relative_part_strips_whole_segments_only() {
        let location = Location::with_prefix(bucket("events-in"), "in").unwrap();

        let under = ObjectKey::new("in/2013/part-00000".to_string()).unwrap();
        assert_eq!(location.relative_part_of(&under), "2013/part-00000");

        // "inbox" shares leading characters with "in" but is not under it
        let sibling = ObjectKey::new("inbox/part-00000".to_string()).unwrap();
        assert_eq!(location.relative_part_of(&sibling), "inbox/part-00000");
    }
}
