//! Source URL validation and normalization.
//!
//! URLs are untrusted input. A submission is rejected here, before any
//! job record exists, unless it parses as an absolute http(s) URL.
//! Normalization drops the fragment and known tracking query
//! parameters while keeping the canonical video reference.

use thiserror::Error;
use url::Url;

/// Errors produced while validating a submitted URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceUrlError {
    #[error("URL required")]
    Empty,

    #[error("not a valid absolute URL")]
    Invalid,

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Query parameters that carry tracking or playback position, not
/// identity of the referenced video.
const TRACKING_PARAMS: &[&str] = &[
    "t",
    "si",
    "feature",
    "fbclid",
    "gclid",
    "ref",
    "pp",
    "list",
    "index",
    "start_radio",
];

fn is_tracking_param(name: &str) -> bool {
    TRACKING_PARAMS.contains(&name) || name.starts_with("utm_")
}

/// Validate and normalize a raw submitted URL.
///
/// Returns the canonical string form: fragment removed, tracking
/// parameters stripped, remaining query preserved in original order.
pub fn normalize_source_url(raw: &str) -> Result<String, SourceUrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SourceUrlError::Empty);
    }

    let mut url = Url::parse(raw).map_err(|_| SourceUrlError::Invalid)?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(SourceUrlError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().is_none() {
        return Err(SourceUrlError::MissingHost);
    }

    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !is_tracking_param(name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (name, value) in &kept {
            pairs.append_pair(name, value);
        }
        drop(pairs);
    }

    Ok(url.to_string())
}
