//! Project field validation and child-item URL rules.
//!
//! Everything a write request must satisfy before it is allowed near the
//! store lives here, so the mutation services and the HTTP layer share one
//! definition of "valid".

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Stored tag for crochet projects.
pub const CATEGORY_CROCHET: &str = "かぎ針";

/// Stored tag for knitting-needle projects.
pub const CATEGORY_KNITTING: &str = "ぼう針";

/// All valid stored category tags.
pub const VALID_CATEGORIES: &[&str] = &[CATEGORY_CROCHET, CATEGORY_KNITTING];

/// Canonicalize a submitted category into its stored tag.
///
/// Accepts the stored tags themselves plus the ASCII aliases `crochet` and
/// `knitting` (case-insensitive). An absent or blank value means "unset".
pub fn normalize_category(category: Option<String>) -> Result<Option<String>, CoreError> {
    let Some(raw) = normalize_optional(category) else {
        return Ok(None);
    };
    let trimmed = raw.trim();

    if VALID_CATEGORIES.contains(&trimmed) {
        return Ok(Some(trimmed.to_string()));
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "crochet" => Ok(Some(CATEGORY_CROCHET.to_string())),
        "knitting" => Ok(Some(CATEGORY_KNITTING.to_string())),
        _ => Err(CoreError::Validation(format!(
            "Invalid category '{trimmed}'. Must be one of: {}",
            VALID_CATEGORIES.join(", ")
        ))),
    }
}

// ---------------------------------------------------------------------------
// Scalar fields
// ---------------------------------------------------------------------------

/// Require a title that is present and not blank.
///
/// The title is returned exactly as submitted.
pub fn validate_title(title: Option<String>) -> Result<String, CoreError> {
    match title {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(CoreError::Validation("title is required".into())),
    }
}

/// Require a yarn colour count that is present, non-negative, and fits the
/// `INTEGER` column.
pub fn validate_yarn_color_count(count: Option<i64>) -> Result<i32, CoreError> {
    let count =
        count.ok_or_else(|| CoreError::Validation("yarn_color_count is required".into()))?;
    if count < 0 {
        return Err(CoreError::Validation(format!(
            "yarn_color_count must be zero or greater, got {count}"
        )));
    }
    i32::try_from(count).map_err(|_| {
        CoreError::Validation(format!("yarn_color_count {count} is out of range"))
    })
}

/// Collapse empty or whitespace-only optional strings to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a path identifier. Anything that is not a positive integer is
/// rejected without consulting the store.
pub fn parse_id(raw: &str) -> Result<DbId, CoreError> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::Validation(format!("Invalid project ID '{raw}'"))),
    }
}

// ---------------------------------------------------------------------------
// Child item URLs
// ---------------------------------------------------------------------------

/// What a child item's `image_url` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildUrlKind {
    /// `data:image/...` embedded image.
    DataImage,
    /// `data:application/pdf` embedded document.
    DataPdf,
    /// Plain `http(s)://` link.
    External,
}

/// Drop empty and whitespace-only entries, keeping the relative order of the
/// rest. The position of an entry in the returned list is its display order.
pub fn filter_child_urls(urls: Vec<String>) -> Vec<String> {
    urls.into_iter().filter(|u| !u.trim().is_empty()).collect()
}

/// Classify a child item URL, rejecting anything that is neither a data URI
/// with an image or PDF media type nor an `http(s)` link.
pub fn classify_child_url(url: &str) -> Result<ChildUrlKind, CoreError> {
    if let Some(rest) = strip_prefix_ignore_case(url, "data:") {
        return classify_data_uri(rest);
    }

    let remainder = strip_prefix_ignore_case(url, "https://")
        .or_else(|| strip_prefix_ignore_case(url, "http://"));
    match remainder {
        Some(host_and_path) if !host_and_path.is_empty() && !url.contains(char::is_whitespace) => {
            Ok(ChildUrlKind::External)
        }
        _ => Err(CoreError::Validation(
            "Expected a data URI or an http(s) URL".into(),
        )),
    }
}

/// Validate every entry of an already-filtered child list.
///
/// `field` names the request field in error messages.
pub fn validate_child_urls(field: &str, urls: &[String]) -> Result<(), CoreError> {
    for (index, url) in urls.iter().enumerate() {
        classify_child_url(url).map_err(|e| match e {
            CoreError::Validation(msg) => {
                CoreError::Validation(format!("{field}[{index}]: {msg}"))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// `rest` is everything after `data:`, i.e. `<mime>[;params],<payload>`.
fn classify_data_uri(rest: &str) -> Result<ChildUrlKind, CoreError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::Validation("Data URI is missing its payload".into()))?;
    if payload.is_empty() {
        return Err(CoreError::Validation("Data URI payload is empty".into()));
    }

    let mime = header.split(';').next().unwrap_or_default().to_ascii_lowercase();
    let Some((kind, subtype)) = mime.split_once('/') else {
        return Err(CoreError::Validation(format!(
            "Data URI media type '{mime}' is malformed"
        )));
    };
    let token_ok = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
    };
    if !token_ok(kind) || !token_ok(subtype) {
        return Err(CoreError::Validation(format!(
            "Data URI media type '{mime}' is malformed"
        )));
    }

    match (kind, subtype) {
        ("image", _) => Ok(ChildUrlKind::DataImage),
        ("application", "pdf") => Ok(ChildUrlKind::DataPdf),
        _ => Err(CoreError::Validation(format!(
            "Unsupported media type '{mime}'. Only images and PDFs may be embedded"
        ))),
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

// ---------------------------------------------------------------------------
// Child write policy
// ---------------------------------------------------------------------------

/// How child-item insert failures are treated during a project write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildWritePolicy {
    /// A failed child insert is logged and skipped; the parent write and the
    /// remaining children still commit.
    #[default]
    BestEffort,
    /// Any child insert failure rolls back the whole write.
    Strict,
}

impl ChildWritePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BestEffort => "best_effort",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ChildWritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChildWritePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            "strict" => Ok(Self::Strict),
            other => Err(CoreError::Validation(format!(
                "Invalid child write policy '{other}'. Must be one of: best_effort, strict"
            ))),
        }
    }
}
