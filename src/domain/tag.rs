// src/domain/tag.rs
//! Extraction of `via:` and `date:` pseudo-tags from a tag token list.

const VIA_PREFIX: &str = "via:";
const DATE_PREFIX: &str = "date:";

/// Result of scanning a tag list for pseudo-tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedTags {
    /// Non-consumed tokens, original order preserved.
    pub remaining: Vec<String>,
    /// Suffix of the first `via:` token, if any.
    pub via_code: Option<String>,
    /// Suffix of the first `date:` token, if any.
    pub date_value: Option<String>,
}

/// Scan tokens once, consuming the first `via:` and the first `date:` token.
///
/// Only the first token of each prefix is consumed; later duplicates stay in
/// `remaining` untouched. That is how the tag data has always been read and
/// existing bookmarks rely on it, so the policy is preserved rather than
/// corrected.
pub fn extract_pseudo_tags<I, S>(tokens: I) -> ExtractedTags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extracted = ExtractedTags::default();

    for token in tokens {
        let token = token.as_ref();
        if extracted.via_code.is_none() {
            if let Some(code) = token.strip_prefix(VIA_PREFIX) {
                extracted.via_code = Some(code.to_string());
                continue;
            }
        }
        if extracted.date_value.is_none() {
            if let Some(value) = token.strip_prefix(DATE_PREFIX) {
                extracted.date_value = Some(value.to_string());
                continue;
            }
        }
        extracted.remaining.push(token.to_string());
    }

    extracted
}
