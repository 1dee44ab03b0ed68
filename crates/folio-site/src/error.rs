//! Site build error types.

use std::path::PathBuf;

use folio_content::ContentError;
use folio_renderer::HighlightError;

/// A link in emitted HTML that does not resolve to an emitted file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokenLink {
    /// Output file containing the link (e.g. `blog/post/index.html`).
    pub page: String,
    /// The link as written.
    pub href: String,
}

/// Error raised while assembling or writing the site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Highlight(#[from] HighlightError),

    /// A document names a layout that does not exist.
    #[error(
        "{}: unknown layout `{layout}` (available: {})",
        path.display(),
        available.join(", ")
    )]
    UnknownLayout {
        path: PathBuf,
        layout: String,
        available: Vec<String>,
    },

    /// A layout failed to parse or render.
    #[error("layout `{name}`: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// Rendering one document failed.
    #[error("{}: {source}", path.display())]
    Page {
        path: PathBuf,
        #[source]
        source: Box<SiteError>,
    },

    /// Writing the RSS feed or sitemap failed.
    #[error("failed to write {file}: {message}")]
    Xml { file: &'static str, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory would be cleaned over site sources.
    #[error("output directory {} contains site sources ({})", output.display(), source_dir.display())]
    UnsafeOutputDir { output: PathBuf, source_dir: PathBuf },

    /// Internal links that do not resolve.
    #[error("{} broken link(s):\n{}", .0.len(), join_links(.0))]
    BrokenLinks(Vec<BrokenLink>),

    /// Several documents failed; every failure is reported.
    #[error("{} error(s):\n{}", .0.len(), join_errors(.0))]
    Invalid(Vec<SiteError>),
}

impl SiteError {
    /// Collapse a list of errors: a single error is returned as-is.
    pub(crate) fn from_many(mut errors: Vec<SiteError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Self::Invalid(errors)
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

fn join_links(links: &[BrokenLink]) -> String {
    links
        .iter()
        .map(|l| format!("  - {}: {}", l.page, l.href))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_errors(errors: &[SiteError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_links_lists_every_page() {
        let err = SiteError::BrokenLinks(vec![
            BrokenLink {
                page: "blog/a/index.html".to_owned(),
                href: "/blog/missing/".to_owned(),
            },
            BrokenLink {
                page: "index.html".to_owned(),
                href: "/nope.css".to_owned(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 broken link(s)"));
        assert!(msg.contains("  - blog/a/index.html: /blog/missing/"));
        assert!(msg.contains("  - index.html: /nope.css"));
    }

    #[test]
    fn test_unknown_layout_message() {
        let err = SiteError::UnknownLayout {
            path: PathBuf::from("blog/a.md"),
            layout: "fancy".to_owned(),
            available: vec!["index".to_owned(), "post".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "blog/a.md: unknown layout `fancy` (available: index, post)"
        );
    }

    #[test]
    fn test_from_many_single_is_unwrapped() {
        let err = SiteError::from_many(vec![SiteError::BrokenLinks(Vec::new())]);
        assert!(matches!(err, SiteError::BrokenLinks(_)));
    }
}
