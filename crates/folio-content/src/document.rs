//! Document model.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::ContentError;
use crate::front_matter::{RawFrontMatter, parse_date, parse_front_matter, split_front_matter};

/// A content document: validated front matter plus markdown body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the content directory (e.g. `blog/arm64-calculator.md`).
    pub source_path: PathBuf,
    /// URL path without leading or trailing slash (e.g. `blog/arm64-calculator`).
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Publication date.
    pub pub_date: NaiveDate,
    /// Date of the last significant revision, if any.
    pub updated_date: Option<NaiveDate>,
    /// Drafts are skipped unless the build includes them.
    pub draft: bool,
    /// Layout reference as written (`post` or `../../layouts/post.html`).
    pub layout: String,
    pub tags: Vec<String>,
    pub hero_image: Option<String>,
    /// Markdown body following the front matter.
    pub body: String,
}

impl Document {
    /// Parse a document from its source text.
    ///
    /// `source_path` is relative to the content directory and determines the
    /// slug unless the front matter sets one.
    ///
    /// # Errors
    ///
    /// Returns every front matter problem found in this document.
    pub fn parse(source_path: &Path, text: &str) -> Result<Self, ContentError> {
        let path = source_path.to_path_buf();

        let (yaml, body) = split_front_matter(text).map_err(|message| {
            ContentError::FrontMatter {
                path: path.clone(),
                message,
            }
        })?;
        let raw = parse_front_matter(yaml.unwrap_or_default()).map_err(|message| {
            ContentError::FrontMatter {
                path: path.clone(),
                message,
            }
        })?;

        let mut errors = Vec::new();
        let title = required(raw.title.as_deref(), "title", &path, &mut errors);
        let description = required(raw.description.as_deref(), "description", &path, &mut errors);
        let layout = required(raw.layout.as_deref(), "layout", &path, &mut errors);
        let pub_date = required(raw.pub_date.as_deref(), "pub_date", &path, &mut errors)
            .and_then(|value| date_field(&value, "pub_date", &path, &mut errors));
        let updated_date = raw
            .updated_date
            .as_deref()
            .and_then(|value| date_field(value, "updated_date", &path, &mut errors));

        let slug = match raw.slug.as_deref() {
            Some(slug) => slug.trim_matches('/').to_owned(),
            None => slug_from_path(source_path),
        };
        if slug.is_empty() {
            errors.push(ContentError::EmptySlug { path: path.clone() });
        } else if let Some(reason) = invalid_slug_reason(&slug) {
            errors.push(ContentError::InvalidSlug {
                path: path.clone(),
                slug: slug.clone(),
                reason,
            });
        }

        let RawFrontMatter {
            draft,
            tags,
            hero_image,
            ..
        } = raw;

        match (title, description, layout, pub_date) {
            (Some(title), Some(description), Some(layout), Some(pub_date)) if errors.is_empty() => {
                Ok(Self {
                    source_path: path,
                    slug,
                    title,
                    description,
                    pub_date,
                    updated_date,
                    draft,
                    layout,
                    tags,
                    hero_image,
                    body: body.to_owned(),
                })
            }
            _ => Err(ContentError::from_many(errors)),
        }
    }

    /// Layout name the document refers to.
    ///
    /// Path-like references resolve to their file stem, so
    /// `../../layouts/post.html` and `post` both name `post`.
    #[must_use]
    pub fn layout_name(&self) -> &str {
        layout_name(&self.layout)
    }

    /// Site-relative URL path of the rendered page (e.g. `blog/post/`).
    #[must_use]
    pub fn url_path(&self) -> String {
        format!("{}/", self.slug)
    }

    /// Output file relative to the build directory, with `/` separators
    /// (e.g. `blog/post/index.html`).
    #[must_use]
    pub fn output_path(&self) -> String {
        format!("{}/index.html", self.slug)
    }
}

/// Resolve a layout reference to a layout name.
#[must_use]
pub fn layout_name(reference: &str) -> &str {
    let file = reference.rsplit(['/', '\\']).next().unwrap_or(reference);
    match file.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file,
    }
}

/// Convert a content-relative file path to a slug.
///
/// - `post.md` -> `post`
/// - `blog/post.md` -> `blog/post`
/// - `blog/index.md` -> `blog`
/// - `index.md` -> `` (rejected by [`Document::parse`])
pub(crate) fn slug_from_path(rel_path: &Path) -> String {
    let path_str = rel_path.to_string_lossy().replace('\\', "/");
    let without_ext = path_str
        .strip_suffix(".md")
        .or_else(|| path_str.strip_suffix(".markdown"))
        .unwrap_or(&path_str);

    let slug = if without_ext == "index" {
        ""
    } else if let Some(without_index) = without_ext.strip_suffix("/index") {
        without_index
    } else {
        without_ext
    };
    slug.to_owned()
}

/// Why a slug cannot be used as an output path, if it cannot.
///
/// Every `/`-separated segment must be a plain name, so the page always
/// lands inside the output directory.
fn invalid_slug_reason(slug: &str) -> Option<&'static str> {
    if slug.contains('\\') {
        return Some("backslashes are not allowed");
    }
    slug.split('/').find_map(|segment| match segment {
        "" => Some("empty path segment"),
        "." | ".." => Some("relative path segments are not allowed"),
        _ => None,
    })
}

fn required(
    value: Option<&str>,
    field: &'static str,
    path: &Path,
    errors: &mut Vec<ContentError>,
) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_owned()),
        _ => {
            errors.push(ContentError::MissingField {
                path: path.to_path_buf(),
                field,
            });
            None
        }
    }
}

fn date_field(
    value: &str,
    field: &'static str,
    path: &Path,
    errors: &mut Vec<ContentError>,
) -> Option<NaiveDate> {
    let date = parse_date(value);
    if date.is_none() {
        errors.push(ContentError::InvalidDate {
            path: path.to_path_buf(),
            field,
            value: value.to_owned(),
        });
    }
    date
}
