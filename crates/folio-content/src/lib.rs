//! Content store for the folio static blog.
//!
//! Documents are markdown files with a YAML front matter block:
//!
//! ```text
//! ---
//! title: Building a Calculator in ARM64
//! description: Registers, branches and syscalls by example
//! pubDate: 2024-03-01
//! draft: false
//! layout: ../../layouts/post.html
//! ---
//!
//! Body text...
//! ```
//!
//! [`ContentStore::scan`] walks the content directory, parses every document
//! and reports all invalid ones at once.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), folio_content::ContentError> {
//! use std::path::Path;
//! use folio_content::ContentStore;
//!
//! let store = ContentStore::scan(Path::new("site/content"))?;
//! for doc in store.published(false) {
//!     println!("{} {}", doc.pub_date, doc.title);
//! }
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod front_matter;
mod scanner;
mod store;

pub use chrono::NaiveDate;
pub use document::{Document, layout_name};
pub use error::ContentError;
pub use front_matter::parse_date;
pub use store::ContentStore;
