//! Content error types.

use std::path::PathBuf;

/// Error raised while loading or validating content.
///
/// Paths are relative to the content directory.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The content directory does not exist.
    #[error("Content directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A document could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The front matter block is malformed.
    #[error("{}: malformed front matter: {message}", path.display())]
    FrontMatter { path: PathBuf, message: String },

    /// A required front matter field is absent or empty.
    #[error("{}: missing required front matter field `{field}`", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    /// A date field could not be parsed.
    #[error("{}: invalid date in `{field}`: {value:?}", path.display())]
    InvalidDate {
        path: PathBuf,
        field: &'static str,
        value: String,
    },

    /// The document would be written over the listing page.
    #[error("{}: slug cannot be empty, the site root is the listing page", path.display())]
    EmptySlug { path: PathBuf },

    /// A slug segment would leave the output directory or is not a plain
    /// path segment.
    #[error("{}: invalid slug `{slug}`: {reason}", path.display())]
    InvalidSlug {
        path: PathBuf,
        slug: String,
        reason: &'static str,
    },

    /// Two documents map to the same URL.
    #[error(
        "duplicate slug `{slug}` used by {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Several documents failed; every failure is reported.
    #[error("{} invalid document(s):\n{}", .0.len(), join_errors(.0))]
    Invalid(Vec<ContentError>),
}

impl ContentError {
    /// Collapse a list of errors: a single error is returned as-is.
    pub(crate) fn from_many(mut errors: Vec<ContentError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Self::Invalid(errors)
        }
    }
}

fn join_errors(errors: &[ContentError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
