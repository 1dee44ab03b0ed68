//! The content store: every document of the site, parsed and validated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::scanner::{Scanner, SourceRef};
use crate::{ContentError, Document};

/// All documents found under the content directory.
///
/// Documents are ordered newest first, ties broken by slug, which is the
/// order listings and feeds present them in.
#[derive(Debug)]
pub struct ContentStore {
    root: PathBuf,
    documents: Vec<Document>,
}

impl ContentStore {
    /// Scan `root` and parse every markdown document in parallel.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` if `root` does not exist. Otherwise
    /// every unreadable or invalid document is reported in one error.
    pub fn scan(root: &Path) -> Result<Self, ContentError> {
        if !root.is_dir() {
            return Err(ContentError::NotFound(root.to_path_buf()));
        }

        let refs = Scanner::new(root.to_path_buf())
            .scan()
            .map_err(|source| ContentError::Io {
                path: root.to_path_buf(),
                source,
            })?;

        let results: Vec<Result<Document, ContentError>> = refs.par_iter().map(load).collect();

        let mut documents = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(doc) => documents.push(doc),
                Err(ContentError::Invalid(nested)) => errors.extend(nested),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(ContentError::from_many(errors));
        }

        tracing::debug!(
            root = %root.display(),
            document_count = documents.len(),
            "Content scan completed"
        );

        Self::from_documents(root.to_path_buf(), documents)
    }

    /// Build a store from already parsed documents.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::DuplicateSlug` if two documents share a URL.
    pub fn from_documents(root: PathBuf, mut documents: Vec<Document>) -> Result<Self, ContentError> {
        let mut seen: HashMap<&str, &Path> = HashMap::new();
        let mut errors = Vec::new();
        for doc in &documents {
            if let Some(first) = seen.insert(doc.slug.as_str(), doc.source_path.as_path()) {
                errors.push(ContentError::DuplicateSlug {
                    slug: doc.slug.clone(),
                    first: first.to_path_buf(),
                    second: doc.source_path.clone(),
                });
            }
        }
        if !errors.is_empty() {
            return Err(ContentError::from_many(errors));
        }

        documents.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then_with(|| a.slug.cmp(&b.slug)));
        Ok(Self { root, documents })
    }

    /// Content directory this store was loaded from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All documents, drafts included.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Documents that appear in the built site.
    ///
    /// Drafts are excluded unless `include_drafts` is set.
    pub fn published(&self, include_drafts: bool) -> impl Iterator<Item = &Document> {
        self.documents
            .iter()
            .filter(move |doc| include_drafts || !doc.draft)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn load(source: &SourceRef) -> Result<Document, ContentError> {
    let text = std::fs::read_to_string(&source.abs_path).map_err(|e| ContentError::Io {
        path: source.rel_path.clone(),
        source: e,
    })?;
    Document::parse(&source.rel_path, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    static_assertions::assert_impl_all!(super::ContentStore: Send, Sync);

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: &str, draft: bool) -> String {
        format!(
            "---\ntitle: {title}\ndescription: About {title}\npubDate: {date}\ndraft: {draft}\nlayout: post\n---\n\nBody of {title}.\n"
        )
    }

    #[test]
    fn test_scan_orders_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blog/old.md", &post("Old", "2023-01-01", false));
        write(dir.path(), "blog/new.md", &post("New", "2024-06-01", false));
        write(dir.path(), "blog/same-b.md", &post("B", "2023-05-05", false));
        write(dir.path(), "blog/same-a.md", &post("A", "2023-05-05", false));

        let store = ContentStore::scan(dir.path()).unwrap();
        let slugs: Vec<_> = store.documents().iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec!["blog/new", "blog/same-a", "blog/same-b", "blog/old"]
        );
        assert_eq!(store.root(), dir.path());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_published_excludes_drafts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blog/live.md", &post("Live", "2024-01-01", false));
        write(dir.path(), "blog/wip.md", &post("Wip", "2024-02-01", true));

        let store = ContentStore::scan(dir.path()).unwrap();

        let published: Vec<_> = store.published(false).map(|d| d.slug.as_str()).collect();
        assert_eq!(published, vec!["blog/live"]);

        let with_drafts: Vec<_> = store.published(true).map(|d| d.slug.as_str()).collect();
        assert_eq!(with_drafts, vec!["blog/wip", "blog/live"]);
    }

    #[test]
    fn test_scan_reports_every_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.md", &post("Good", "2024-01-01", false));
        write(dir.path(), "no-title.md", "---\ndescription: d\nlayout: post\ndate: 2024-01-01\n---\n");
        write(dir.path(), "broken.md", "---\ntitle: [\n---\n");

        let err = ContentStore::scan(dir.path()).unwrap_err();
        let ContentError::Invalid(errors) = &err else {
            panic!("expected aggregated errors, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        let msg = err.to_string();
        assert!(msg.contains("no-title.md"));
        assert!(msg.contains("broken.md"));
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentStore::scan(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_slugs_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blog.md", &post("One", "2024-01-01", false));
        write(dir.path(), "blog/index.md", &post("Two", "2024-01-02", false));

        let err = ContentStore::scan(dir.path()).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateSlug { ref slug, .. } if slug == "blog"));
    }

    #[test]
    fn test_empty_content_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::scan(dir.path()).unwrap();
        assert!(store.is_empty());
    }
}
