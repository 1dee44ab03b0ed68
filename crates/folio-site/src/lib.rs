//! Static site assembly for the folio blog.
//!
//! [`SiteBuilder`] ties the pipeline together: it loads the highlighting
//! theme, the content store and the layouts, renders every published
//! document through its layout, adds the post listing, RSS feed and
//! sitemap, checks every internal link, and writes the result together with
//! the public assets.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use folio_config::Config;
//! use folio_site::SiteBuilder;
//!
//! let config = Config::load(None, None)?;
//! let report = SiteBuilder::new(&config)?.build(&config.build_resolved.output_dir)?;
//! println!("{} pages", report.pages);
//! # Ok(())
//! # }
//! ```

mod assets;
mod builder;
mod context;
mod error;
mod feed;
mod layouts;
mod links;
mod page;

pub use assets::Asset;
pub use builder::{BuildReport, CheckReport, SiteBuilder};
pub use context::{ListingContext, PageContext, SiteContext, display_date};
pub use error::{BrokenLink, SiteError};
pub use feed::{RSS_FILE, SITEMAP_FILE, rss, sitemap};
pub use layouts::Layouts;
pub use links::LinkChecker;
