//! Markdown rendering of a single document.

use std::sync::Arc;

use folio_content::Document;
use folio_renderer::{Highlighter, MarkdownRenderer, RenderResult, SyntaxHighlighting};

/// Renders document bodies with the site's highlighter and link settings.
///
/// Shared by reference across render threads; each call builds its own
/// [`MarkdownRenderer`].
pub(crate) struct PageRenderer {
    highlighter: Arc<Highlighter>,
    site_root: String,
    gfm: bool,
}

impl PageRenderer {
    pub(crate) fn new(highlighter: Arc<Highlighter>, site_root: &str, gfm: bool) -> Self {
        Self {
            highlighter,
            site_root: site_root.to_owned(),
            gfm,
        }
    }

    pub(crate) fn render(&self, doc: &Document) -> RenderResult {
        self.create_renderer(doc).render_markdown(&doc.body)
    }

    fn create_renderer(&self, doc: &Document) -> MarkdownRenderer {
        let base_dir = doc
            .source_path
            .parent()
            .map(|dir| dir.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        MarkdownRenderer::new()
            .with_gfm(self.gfm)
            .with_base_dir(base_dir)
            .with_site_root(self.site_root.as_str())
            .with_processor(SyntaxHighlighting::new(Arc::clone(&self.highlighter)))
    }
}
