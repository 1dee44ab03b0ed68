//! Front matter splitting and parsing.
//!
//! A document opens with a `---` line, YAML key/value pairs, and a closing
//! `---` line. Everything after the closing fence is the markdown body.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

/// Front matter exactly as written by the author.
///
/// Field names accept the camelCase spellings common in content collections
/// (`pubDate`, `updatedDate`, `heroImage`) as aliases.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawFrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "pubDate", alias = "date")]
    pub pub_date: Option<String>,
    #[serde(alias = "updatedDate")]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub draft: bool,
    pub layout: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub slug: Option<String>,
    #[serde(alias = "heroImage")]
    pub hero_image: Option<String>,
}

/// Split a document into its front matter block and body.
///
/// Returns `Ok((None, text))` when the document has no front matter.
///
/// # Errors
///
/// Returns the error message when an opening fence has no closing fence.
pub(crate) fn split_front_matter(text: &str) -> Result<(Option<&str>, &str), String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = strip_fence_line(text) else {
        return Ok((None, text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err("opening `---` has no closing `---`".to_owned())
}

/// Strip an opening `---` fence line, returning the remainder.
fn strip_fence_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    let (first_line, remainder) = rest.split_once('\n').unwrap_or((rest, ""));
    first_line.trim().is_empty().then_some(remainder)
}

/// Parse the YAML of a front matter block.
///
/// An empty block yields default (all fields absent) front matter.
pub(crate) fn parse_front_matter(yaml: &str) -> Result<RawFrontMatter, String> {
    if yaml.trim().is_empty() {
        return Ok(RawFrontMatter::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| e.to_string())
}

/// Parse a publication date.
///
/// Accepts `2024-03-01`, RFC 3339 timestamps (the date part is kept),
/// `Mar 01 2024` and `March 1, 2024`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| NaiveDate::parse_from_str(value, "%b %d %Y").ok())
        .or_else(|| NaiveDate::parse_from_str(value, "%B %d, %Y").ok())
}
