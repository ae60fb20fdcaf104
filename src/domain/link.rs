// src/domain/link.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::remote::RawPost;
use crate::domain::tag::extract_pseudo_tags;
use crate::domain::via;
use chrono::{Local, NaiveDate, TimeZone};

/// A normalized bookmark record.
///
/// `hash` is the stable identity assigned by the remote service and is the
/// store's dedup key; it is never regenerated locally. `ts` is "saved at"
/// unless a `date:` pseudo-tag overrode it, in which case it carries the
/// tag's semantic date. `tags` never contains pseudo-tags once normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: Option<i32>,
    pub hash: String,
    pub ts: i64,
    pub url: String,
    pub title: String,
    pub body: String,
    pub via: Option<String>,
    pub tags: Vec<String>,
}

impl Link {
    /// Normalize a raw fetched post into a `Link`.
    ///
    /// Pure and deterministic: splits the tag string, consumes the first
    /// `via:` and `date:` pseudo-tags, recomputes `via` from scratch (an
    /// incoming via value is never trusted), and replaces `ts` with the
    /// date-tag's local-midnight epoch when one is present. A malformed
    /// date value fails the whole record.
    pub fn normalize(raw: RawPost) -> DomainResult<Self> {
        let extracted = extract_pseudo_tags(raw.tags.split_whitespace());

        let via = extracted.via_code.as_deref().map(via::expand);

        let ts = match extracted.date_value {
            Some(value) => parse_date_tag(&value)?,
            None => raw.ts,
        };

        Ok(Self {
            id: None,
            hash: raw.hash,
            ts,
            url: raw.url,
            title: raw.title,
            body: raw.body,
            via,
            tags: extracted.remaining,
        })
    }

    /// Reconstruct a link from its storage representation.
    pub fn from_storage(
        id: i32,
        hash: String,
        ts: i64,
        url: String,
        title: String,
        body: String,
        via: Option<String>,
        tag_string: &str,
    ) -> Self {
        Self {
            id: Some(id),
            hash,
            ts,
            url,
            title,
            body,
            via,
            tags: tag_string.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Space-joined tag string, the external and stored representation.
    pub fn formatted_tags(&self) -> String {
        self.tags.join(" ")
    }
}

/// Parse a `date:` pseudo-tag value (`YYYY-MM-DD`) as local midnight.
fn parse_date_tag(value: &str) -> DomainResult<i64> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DomainError::InvalidDateTag(format!("{}: {}", value, e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DomainError::InvalidDateTag(value.to_string()))?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| {
            DomainError::InvalidDateTag(format!("{}: no valid local time", value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tags: &str) -> RawPost {
        RawPost {
            ts: 1234567890,
            url: "https://example.com/post".to_string(),
            title: "A post".to_string(),
            body: "Worth reading".to_string(),
            tags: tags.to_string(),
            hash: "abc123".to_string(),
        }
    }

    #[test]
    fn given_via_shorthand_when_normalize_then_via_expanded_and_tag_removed() {
        let link = Link::normalize(raw("python via:tbray coding")).unwrap();
        assert_eq!(link.formatted_tags(), "python coding");
        assert_eq!(link.via.as_deref(), Some("https://www.tbray.org/ongoing/"));
    }

    #[test]
    fn given_no_via_tag_when_normalize_then_via_is_none() {
        let link = Link::normalize(raw("python coding")).unwrap();
        assert_eq!(link.via, None);
        assert_eq!(link.tags, vec!["python", "coding"]);
    }

    #[test]
    fn given_date_tag_when_normalize_then_ts_replaced_with_local_midnight() {
        let link = Link::normalize(raw("python date:2024-01-15 coding")).unwrap();
        let expected = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
            .earliest()
            .unwrap()
            .timestamp();
        assert_eq!(link.ts, expected);
        assert_eq!(link.formatted_tags(), "python coding");
    }

    #[test]
    fn given_no_date_tag_when_normalize_then_ts_kept() {
        let link = Link::normalize(raw("python")).unwrap();
        assert_eq!(link.ts, 1234567890);
    }

    #[test]
    fn given_malformed_date_tag_when_normalize_then_hard_error() {
        let result = Link::normalize(raw("python date:not-a-date"));
        assert!(matches!(result, Err(DomainError::InvalidDateTag(_))));
    }

    #[test]
    fn given_future_date_tag_when_normalize_then_not_rejected_here() {
        // Future-timestamp rejection is the sync controller's job, not the
        // normalizer's.
        let link = Link::normalize(raw("date:2099-01-01")).unwrap();
        assert!(link.ts > 4_000_000_000);
    }

    #[test]
    fn given_multi_space_tag_string_when_normalize_then_single_spaced() {
        let link = Link::normalize(raw("  python   coding ")).unwrap();
        assert_eq!(link.formatted_tags(), "python coding");
    }

    #[test]
    fn given_unknown_via_code_when_normalize_then_code_kept_verbatim() {
        let link = Link::normalize(raw("via:somebody.new misc")).unwrap();
        assert_eq!(link.via.as_deref(), Some("somebody.new"));
    }

    #[test]
    fn given_storage_row_when_from_storage_then_tags_split() {
        let link = Link::from_storage(
            7,
            "abc123".to_string(),
            1234567890,
            "https://example.com".to_string(),
            "t".to_string(),
            "b".to_string(),
            None,
            "python coding",
        );
        assert_eq!(link.id, Some(7));
        assert_eq!(link.tags, vec!["python", "coding"]);
    }
}
