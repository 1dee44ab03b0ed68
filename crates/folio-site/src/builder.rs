//! Static site builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_config::Config;
use folio_content::{ContentStore, Document};
use folio_renderer::Highlighter;
use minijinja::{Value, context};
use rayon::prelude::*;

use crate::assets::{self, Asset};
use crate::context::{ListingContext, PageContext, SiteContext};
use crate::error::BrokenLink;
use crate::feed::{self, RSS_FILE, SITEMAP_FILE};
use crate::layouts::Layouts;
use crate::links::LinkChecker;
use crate::page::PageRenderer;
use crate::SiteError;

/// Summary of a completed build.
#[derive(Debug)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// Documents rendered to pages.
    pub pages: usize,
    /// Drafts left out of the build.
    pub skipped_drafts: usize,
    /// Files copied from the public directory.
    pub assets: usize,
    /// Whether `rss.xml` was written.
    pub feed: bool,
    pub links_checked: usize,
    /// Non-fatal problems, such as code blocks in unknown languages.
    pub warnings: Vec<String>,
}

/// Summary of a successful check.
#[derive(Debug)]
pub struct CheckReport {
    /// Documents in the content directory, drafts included.
    pub documents: usize,
    /// Documents that would be rendered.
    pub pages: usize,
    pub links_checked: usize,
    pub warnings: Vec<String>,
}

/// The site rendered in memory, keyed by output path.
struct RenderedSite {
    files: BTreeMap<String, String>,
    pages: usize,
    feed: bool,
    warnings: Vec<String>,
}

struct RenderedPage {
    output_path: String,
    html: String,
    context: PageContext,
    warnings: Vec<String>,
}

/// Builds the static site described by a [`Config`].
///
/// Construction loads everything that can fail before rendering starts: the
/// highlighting theme, the content store and the layouts.
pub struct SiteBuilder<'a> {
    config: &'a Config,
    store: ContentStore,
    layouts: Layouts,
    pages: PageRenderer,
}

impl<'a> SiteBuilder<'a> {
    /// Load the theme, content and layouts named by `config`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown theme, any invalid document, or a layout that
    /// does not parse.
    pub fn new(config: &'a Config) -> Result<Self, SiteError> {
        let markdown = &config.markdown_resolved;
        let highlighter = Highlighter::with_extras(
            &markdown.theme,
            markdown.theme_dir.as_deref(),
            markdown.syntax_dir.as_deref(),
        )?;
        let store = ContentStore::scan(&config.build_resolved.content_dir)?;
        let layouts = Layouts::load(&config.build_resolved.layouts_dir)?;
        tracing::debug!(
            theme = highlighter.theme_name(),
            content_dir = %store.root().display(),
            documents = store.len(),
            layouts = layouts.names().count(),
            "Site loaded"
        );
        let pages = PageRenderer::new(Arc::new(highlighter), &config.site.base_url, markdown.gfm);

        Ok(Self {
            config,
            store,
            layouts,
            pages,
        })
    }

    /// Documents included in this build, newest first.
    fn published(&self) -> impl Iterator<Item = &Document> {
        self.store.published(self.config.build_resolved.drafts)
    }

    /// Validate and render the whole site without writing anything.
    ///
    /// # Errors
    ///
    /// Fails on unresolved layouts, template errors or broken internal links.
    pub fn check(&self) -> Result<CheckReport, SiteError> {
        let site = self.render_site()?;
        let assets = assets::collect(&self.config.build_resolved.public_dir)?;
        let links_checked = self.check_links(&site, &assets)?;

        Ok(CheckReport {
            documents: self.store.len(),
            pages: site.pages,
            links_checked,
            warnings: site.warnings,
        })
    }

    /// Render the site and write it to `output_dir`.
    ///
    /// An existing output directory is replaced. Nothing is written if
    /// rendering or the link check fails.
    ///
    /// # Errors
    ///
    /// Fails on unresolved layouts, template errors, broken internal links,
    /// an output directory that contains site sources, or I/O errors.
    pub fn build(&self, output_dir: &Path) -> Result<BuildReport, SiteError> {
        let site = self.render_site()?;
        let assets = assets::collect(&self.config.build_resolved.public_dir)?;
        let links_checked = self.check_links(&site, &assets)?;

        self.prepare_output_dir(output_dir)?;
        for (rel_path, contents) in &site.files {
            let path = output_dir.join(rel_path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(SiteError::io(parent))?;
            }
            fs::write(&path, contents).map_err(SiteError::io(&path))?;
        }
        for asset in &assets {
            if site.files.contains_key(&asset.rel_path) {
                tracing::warn!(path = %asset.rel_path, "Public file replaces a generated file");
            }
        }
        assets::copy(&assets, output_dir)?;

        tracing::info!(
            output_dir = %output_dir.display(),
            pages = site.pages,
            assets = assets.len(),
            "Site written"
        );

        Ok(BuildReport {
            output_dir: output_dir.to_path_buf(),
            pages: site.pages,
            skipped_drafts: self.store.len() - site.pages,
            assets: assets.len(),
            feed: site.feed,
            links_checked,
            warnings: site.warnings,
        })
    }

    /// Every document and the listing must name a known layout, drafts
    /// included, so a draft cannot break the build on publication.
    fn validate_layouts(&self) -> Result<(), SiteError> {
        let mut errors: Vec<SiteError> = self
            .store
            .documents()
            .iter()
            .filter_map(|doc| self.layouts.resolve(&doc.source_path, &doc.layout).err())
            .collect();

        let listing = &self.config.build_resolved.listing_layout;
        if !self.layouts.contains(listing) {
            errors.push(SiteError::UnknownLayout {
                path: self
                    .config
                    .config_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("folio.toml")),
                layout: listing.clone(),
                available: self.layouts.names().map(str::to_owned).collect(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SiteError::from_many(errors))
        }
    }

    fn render_site(&self) -> Result<RenderedSite, SiteError> {
        self.validate_layouts()?;

        let published: Vec<&Document> = self.published().collect();
        let feed_posts: Vec<&Document> = self.store.published(false).collect();
        let rss = feed::rss(&self.config.site, feed_posts.iter().copied())?;
        let site_ctx = SiteContext::new(&self.config.site, rss.is_some());

        let results: Vec<Result<RenderedPage, SiteError>> = published
            .par_iter()
            .map(|doc| self.render_document(doc, &site_ctx))
            .collect();

        let mut pages = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(page) => pages.push(page),
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            return Err(SiteError::from_many(errors));
        }

        let mut files = BTreeMap::new();
        let mut warnings = Vec::new();
        let mut posts = Vec::with_capacity(pages.len());
        for page in pages {
            files.insert(page.output_path, page.html);
            warnings.extend(page.warnings);
            posts.push(page.context);
        }
        let page_count = posts.len();

        let listing = self.layouts.render(
            &self.config.build_resolved.listing_layout,
            context! {
                site => &site_ctx,
                page => ListingContext::new(&self.config.site),
                posts => posts,
            },
        )?;
        files.insert("index.html".to_owned(), listing);

        let feed = rss.is_some();
        if let Some(rss) = rss {
            files.insert(RSS_FILE.to_owned(), rss);
        }
        files.insert(
            SITEMAP_FILE.to_owned(),
            feed::sitemap(&self.config.site, feed_posts.iter().copied())?,
        );

        tracing::debug!(pages = page_count, feed, "Site rendered");

        Ok(RenderedSite {
            files,
            pages: page_count,
            feed,
            warnings,
        })
    }

    fn render_document(
        &self,
        doc: &Document,
        site_ctx: &SiteContext,
    ) -> Result<RenderedPage, SiteError> {
        let layout = self.layouts.resolve(&doc.source_path, &doc.layout)?;
        let result = self.pages.render(doc);
        let page = PageContext::new(
            doc,
            &self.config.site,
            result.word_count,
            result.reading_time_minutes(),
        );

        let html = self
            .layouts
            .render(
                layout,
                context! {
                    site => site_ctx,
                    page => &page,
                    toc => &result.toc,
                    content => Value::from_safe_string(result.html),
                },
            )
            .map_err(|e| SiteError::Page {
                path: doc.source_path.clone(),
                source: Box::new(e),
            })?;

        tracing::debug!(slug = %doc.slug, layout, "Rendered page");

        Ok(RenderedPage {
            output_path: doc.output_path(),
            html,
            context: page,
            warnings: result
                .warnings
                .into_iter()
                .map(|w| format!("{}: {w}", doc.source_path.display()))
                .collect(),
        })
    }

    fn check_links(&self, site: &RenderedSite, assets: &[Asset]) -> Result<usize, SiteError> {
        let targets = site
            .files
            .keys()
            .cloned()
            .chain(assets.iter().map(|a| a.rel_path.clone()));
        let checker = LinkChecker::new(&self.config.site.base_url, targets);

        let mut broken: Vec<BrokenLink> = Vec::new();
        let mut checked = 0;
        for (rel_path, contents) in &site.files {
            if rel_path.ends_with(".html") {
                checked += checker.check_page(rel_path, contents, &mut broken);
            }
        }

        if broken.is_empty() {
            Ok(checked)
        } else {
            Err(SiteError::BrokenLinks(broken))
        }
    }

    /// Remove a previous build, refusing to delete a directory that holds
    /// the content, layouts, public files or the config file.
    fn prepare_output_dir(&self, output_dir: &Path) -> Result<(), SiteError> {
        if !output_dir.exists() {
            return Ok(());
        }

        let output = output_dir
            .canonicalize()
            .map_err(SiteError::io(output_dir))?;
        let build = &self.config.build_resolved;
        let sources = [
            Some(build.content_dir.as_path()),
            Some(build.layouts_dir.as_path()),
            Some(build.public_dir.as_path()),
            self.config.config_path.as_deref(),
        ];
        for source in sources.into_iter().flatten() {
            if let Ok(source) = source.canonicalize()
                && source.starts_with(&output)
            {
                return Err(SiteError::UnsafeOutputDir {
                    output: output_dir.to_path_buf(),
                    source_dir: source,
                });
            }
        }

        fs::remove_dir_all(output_dir).map_err(SiteError::io(output_dir))
    }
}
