//! Markdown renderer for the folio static blog.
//!
//! [`MarkdownRenderer`] walks pulldown-cmark events and writes semantic
//! HTML5: headings with unique ids, a table of contents, GFM tables, task
//! lists and alerts, and relative `.md` links rewritten to clean page URLs.
//!
//! Fenced code blocks go through [`CodeBlockProcessor`]s. The
//! [`SyntaxHighlighting`] processor colors them with syntect using a
//! [`Highlighter`] loaded once per site.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use folio_renderer::{Highlighter, MarkdownRenderer, SyntaxHighlighting};
//!
//! # fn main() -> Result<(), folio_renderer::HighlightError> {
//! let highlighter = Arc::new(Highlighter::new("base16-ocean.dark")?);
//! let result = MarkdownRenderer::new()
//!     .with_base_dir("blog")
//!     .with_processor(SyntaxHighlighting::new(highlighter))
//!     .render_markdown("## Registers\n\n```rust\nlet x = 1;\n```");
//! assert_eq!(result.toc[0].id, "registers");
//! # Ok(())
//! # }
//! ```

mod code_block;
mod highlight;
mod html;
mod renderer;
mod state;

pub use code_block::{CodeBlockProcessor, ProcessResult};
pub use highlight::{HighlightError, Highlighter, SyntaxHighlighting};
pub use html::{AlertKind, resolve_link};
pub use renderer::{MarkdownRenderer, RenderResult, WORDS_PER_MINUTE};
pub use state::{TocEntry, escape_html, slugify};
