//! RSS feed and sitemap.

use chrono::{NaiveDate, NaiveTime};
use folio_config::SiteConfig;
use folio_content::Document;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::SiteError;

pub const RSS_FILE: &str = "rss.xml";
pub const SITEMAP_FILE: &str = "sitemap.xml";

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

struct XmlDoc {
    file: &'static str,
    writer: Writer<Vec<u8>>,
}

impl XmlDoc {
    fn new(file: &'static str) -> Result<Self, SiteError> {
        let mut doc = Self {
            file,
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        };
        doc.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(doc)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), SiteError> {
        self.writer
            .write_event(event)
            .map_err(|e| SiteError::Xml {
                file: self.file,
                message: e.to_string(),
            })
    }

    fn start(&mut self, tag: BytesStart<'_>) -> Result<(), SiteError> {
        self.event(Event::Start(tag))
    }

    fn end(&mut self, name: &str) -> Result<(), SiteError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), SiteError> {
        self.start(BytesStart::new(name))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String, SiteError> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| SiteError::Xml {
            file: self.file,
            message: e.to_string(),
        })
    }
}

/// RFC 2822 date at midnight UTC, as RSS expects.
fn rfc2822(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).and_utc().to_rfc2822()
}

/// Render an RSS 2.0 feed. Returns `None` when `site.url` is not set, since
/// feed links must be absolute.
pub fn rss<'a>(
    site: &SiteConfig,
    posts: impl IntoIterator<Item = &'a Document>,
) -> Result<Option<String>, SiteError> {
    let (Some(home), Some(self_link)) = (site.absolute_url(""), site.absolute_url(RSS_FILE)) else {
        return Ok(None);
    };

    let mut doc = XmlDoc::new(RSS_FILE)?;
    doc.start(BytesStart::new("rss").with_attributes([("version", "2.0"), ("xmlns:atom", ATOM_NS)]))?;
    doc.start(BytesStart::new("channel"))?;
    doc.text_element("title", &site.title)?;
    doc.text_element("link", &home)?;
    doc.text_element("description", &site.description)?;
    doc.event(Event::Empty(BytesStart::new("atom:link").with_attributes([
        ("href", self_link.as_str()),
        ("rel", "self"),
        ("type", "application/rss+xml"),
    ])))?;

    for post in posts {
        let link = site
            .absolute_url(&post.url_path())
            .unwrap_or_else(|| home.clone());
        doc.start(BytesStart::new("item"))?;
        doc.text_element("title", &post.title)?;
        doc.text_element("link", &link)?;
        doc.start(BytesStart::new("guid").with_attributes([("isPermaLink", "true")]))?;
        doc.event(Event::Text(BytesText::new(&link)))?;
        doc.end("guid")?;
        doc.text_element("description", &post.description)?;
        doc.text_element("pubDate", &rfc2822(post.pub_date))?;
        for tag in &post.tags {
            doc.text_element("category", tag)?;
        }
        doc.end("item")?;
    }

    doc.end("channel")?;
    doc.end("rss")?;
    doc.finish().map(Some)
}

/// Render a sitemap of the listing page and every post.
///
/// Locations are absolute when `site.url` is set, site-relative otherwise.
pub fn sitemap<'a>(
    site: &SiteConfig,
    posts: impl IntoIterator<Item = &'a Document>,
) -> Result<String, SiteError> {
    let location =
        |path: &str| site.absolute_url(path).unwrap_or_else(|| format!("{}{path}", site.base_url));

    let mut doc = XmlDoc::new(SITEMAP_FILE)?;
    doc.start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]))?;

    doc.start(BytesStart::new("url"))?;
    doc.text_element("loc", &location(""))?;
    doc.end("url")?;

    for post in posts {
        let lastmod = post.updated_date.unwrap_or(post.pub_date);
        doc.start(BytesStart::new("url"))?;
        doc.text_element("loc", &location(&post.url_path()))?;
        doc.text_element("lastmod", &lastmod.to_string())?;
        doc.end("url")?;
    }

    doc.end("urlset")?;
    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn post(rel: &str, title: &str, date: &str) -> Document {
        let text = format!(
            "---\ntitle: {title}\ndescription: About <{title}>\nlayout: post\ndate: {date}\ntags: [asm]\n---\n"
        );
        Document::parse(Path::new(rel), &text).unwrap()
    }

    fn site(url: Option<&str>) -> SiteConfig {
        SiteConfig {
            title: "Low Level".to_owned(),
            description: "Assembly notes".to_owned(),
            url: url.map(str::to_owned),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_rss_requires_site_url() {
        let posts = [post("blog/a.md", "A", "2024-01-02")];
        assert!(rss(&site(None), &posts).unwrap().is_none());
    }

    #[test]
    fn test_rss_items() {
        let posts = [
            post("blog/b.md", "B", "2024-02-03"),
            post("blog/a.md", "A", "2024-01-02"),
        ];
        let xml = rss(&site(Some("https://example.com/")), &posts)
            .unwrap()
            .unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#));
        assert!(xml.contains("<link>https://example.com/</link>"));
        assert!(xml.contains(r#"<atom:link href="https://example.com/rss.xml" rel="self" type="application/rss+xml"/>"#));
        assert!(xml.contains("<link>https://example.com/blog/b/</link>"));
        assert!(xml.contains("<pubDate>Sat, "));
        assert!(xml.contains("Feb 2024 00:00:00 +0000</pubDate>"));
        assert!(xml.contains("<description>About &lt;A&gt;</description>"));
        assert!(xml.contains("<category>asm</category>"));
        assert!(xml.find("blog/b/").unwrap() < xml.find("blog/a/").unwrap());
    }

    #[test]
    fn test_sitemap_relative_without_site_url() {
        let posts = [post("blog/a.md", "A", "2024-01-02")];
        let xml = sitemap(&site(None), &posts).unwrap();
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>/</loc>"));
        assert!(xml.contains("<loc>/blog/a/</loc>"));
        assert!(xml.contains("<lastmod>2024-01-02</lastmod>"));
    }

    #[test]
    fn test_sitemap_absolute_with_site_url() {
        let posts = [post("blog/a.md", "A", "2024-01-02")];
        let xml = sitemap(&site(Some("https://example.com")), &posts).unwrap();
        assert!(xml.contains("<loc>https://example.com/blog/a/</loc>"));
    }
}
