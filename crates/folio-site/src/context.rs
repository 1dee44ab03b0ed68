//! Values exposed to layouts.
//!
//! Every field is always serialized (absent values as `none`) so layouts can
//! test them with `{% if %}` under strict undefined handling.

use chrono::NaiveDate;
use folio_config::SiteConfig;
use folio_content::Document;
use serde::Serialize;

/// `site` in every layout.
#[derive(Clone, Debug, Serialize)]
pub struct SiteContext {
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub url: Option<String>,
    pub author: Option<String>,
    /// Site-relative URL of the RSS feed, when one is written.
    pub feed_url: Option<String>,
}

impl SiteContext {
    pub fn new(site: &SiteConfig, has_feed: bool) -> Self {
        Self {
            title: site.title.clone(),
            description: site.description.clone(),
            base_url: site.base_url.clone(),
            url: site.url.clone(),
            author: site.author.clone(),
            feed_url: has_feed.then(|| format!("{}{}", site.base_url, crate::feed::RSS_FILE)),
        }
    }
}

/// `page` in post layouts, and each entry of `posts` in the listing.
#[derive(Clone, Debug, Serialize)]
pub struct PageContext {
    pub title: String,
    pub description: String,
    pub slug: String,
    /// Site-relative URL (e.g. `/blog/post/`).
    pub url: String,
    /// Absolute URL, when `site.url` is set.
    pub permalink: Option<String>,
    /// ISO 8601 date.
    pub pub_date: String,
    /// Human readable date (e.g. `Mar 1, 2024`).
    pub pub_date_display: String,
    pub updated_date: Option<String>,
    pub updated_date_display: Option<String>,
    pub draft: bool,
    pub tags: Vec<String>,
    pub hero_image: Option<String>,
    /// Estimated reading time in minutes.
    pub reading_time: usize,
    pub word_count: usize,
}

impl PageContext {
    pub fn new(doc: &Document, site: &SiteConfig, word_count: usize, reading_time: usize) -> Self {
        let url_path = doc.url_path();
        Self {
            title: doc.title.clone(),
            description: doc.description.clone(),
            slug: doc.slug.clone(),
            url: format!("{}{url_path}", site.base_url),
            permalink: site.absolute_url(&url_path),
            pub_date: doc.pub_date.to_string(),
            pub_date_display: display_date(doc.pub_date),
            updated_date: doc.updated_date.map(|d| d.to_string()),
            updated_date_display: doc.updated_date.map(display_date),
            draft: doc.draft,
            tags: doc.tags.clone(),
            hero_image: doc.hero_image.clone(),
            reading_time,
            word_count,
        }
    }
}

/// `page` in the listing layout.
#[derive(Clone, Debug, Serialize)]
pub struct ListingContext {
    pub title: String,
    pub description: String,
    pub url: String,
    pub permalink: Option<String>,
}

impl ListingContext {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            title: site.title.clone(),
            description: site.description.clone(),
            url: site.base_url.clone(),
            permalink: site.absolute_url(""),
        }
    }
}

/// Format a date the way posts display it (`Mar 1, 2024`).
pub fn display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
