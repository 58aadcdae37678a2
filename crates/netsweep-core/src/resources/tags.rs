//! Tag evaluation: from raw provider tags to TTL and protection metadata.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::provider::types::Tag;

/// Expiration metadata extracted from a resource's tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssentialTags {
    pub creation_date: Option<DateTime<Utc>>,
    /// TTL in seconds, zero when absent or unparsable.
    pub ttl: i64,
    /// Raw value of the TTL tag, if the tag is present.
    pub tag: Option<String>,
    pub is_protected: bool,
}

/// Converts raw provider tags into expiration metadata.
pub trait TagEvaluator: Send + Sync {
    fn evaluate(&self, tags: &[Tag], ttl_tag_name: &str) -> EssentialTags;
}

/// Default tag convention: TTL in seconds, RFC 3339 or unix creation date,
/// and a boolean protection tag.
#[derive(Debug, Clone)]
pub struct StandardTagEvaluator {
    pub protection_tag: String,
    pub creation_date_tag: String,
}

impl Default for StandardTagEvaluator {
    fn default() -> Self {
        Self {
            protection_tag: "do_not_delete".to_string(),
            creation_date_tag: "creationDate".to_string(),
        }
    }
}

impl StandardTagEvaluator {
    pub fn new(protection_tag: &str, creation_date_tag: &str) -> Self {
        Self {
            protection_tag: protection_tag.to_string(),
            creation_date_tag: creation_date_tag.to_string(),
        }
    }
}

fn find_tag<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|t| t.key == key)
        .map(|t| t.value.trim())
}

fn parse_ttl(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}

fn parse_creation_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

impl TagEvaluator for StandardTagEvaluator {
    fn evaluate(&self, tags: &[Tag], ttl_tag_name: &str) -> EssentialTags {
        let tag = find_tag(tags, ttl_tag_name).map(str::to_string);

        let ttl = match tag.as_deref() {
            Some(value) => parse_ttl(value).unwrap_or_else(|| {
                warn!(
                    event = "core.tags.ttl_parse_failed",
                    tag = ttl_tag_name,
                    value = value
                );
                0
            }),
            None => 0,
        };

        let creation_date = find_tag(tags, &self.creation_date_tag).and_then(|value| {
            let parsed = parse_creation_date(value);
            if parsed.is_none() {
                warn!(
                    event = "core.tags.creation_date_parse_failed",
                    tag = %self.creation_date_tag,
                    value = value
                );
            }
            parsed
        });

        let is_protected = find_tag(tags, &self.protection_tag).is_some_and(is_truthy);

        EssentialTags {
            creation_date,
            ttl,
            tag,
            is_protected,
        }
    }
}
