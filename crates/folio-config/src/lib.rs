//! Configuration management for folio.
//!
//! Parses `folio.toml` with serde and auto-discovers it in parent
//! directories. Relative paths in the file resolve against the directory
//! that contains it.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.title`
//! - `site.base_url`
//! - `site.url`
//! - `site.author`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the content directory.
    pub content_dir: Option<PathBuf>,
    /// Override whether drafts are published.
    pub drafts: Option<bool>,
    /// Override the syntax highlighting theme.
    pub theme: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Theme used when `markdown.theme` is not set.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site-wide metadata exposed to layouts.
    pub site: SiteConfig,
    content: ContentConfigRaw,
    layouts: LayoutsConfigRaw,
    build: BuildConfigRaw,
    markdown: MarkdownConfigRaw,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Resolved markdown configuration (set after loading).
    #[serde(skip)]
    pub markdown_resolved: MarkdownConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// Site description, used by the listing page and the feed.
    pub description: String,
    /// Path prefix every page URL starts with. Always begins and ends with `/`.
    pub base_url: String,
    /// Absolute origin of the deployed site (e.g. `https://blog.example.com`).
    /// Required for the RSS feed and absolute sitemap URLs.
    pub url: Option<String>,
    /// Default author name.
    pub author: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_owned(),
            description: String::new(),
            base_url: "/".to_owned(),
            url: None,
            author: None,
        }
    }
}

impl SiteConfig {
    /// Absolute URL for a site path (e.g. `blog/post/`), if `url` is set.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> Option<String> {
        let origin = self.url.as_deref()?.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Some(format!("{origin}{}{path}", self.base_url))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LayoutsConfigRaw {
    dir: Option<String>,
    listing: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    output_dir: Option<String>,
    public_dir: Option<String>,
    drafts: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct MarkdownConfigRaw {
    theme: Option<String>,
    theme_dir: Option<String>,
    syntax_dir: Option<String>,
    gfm: Option<bool>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory scanned for markdown documents.
    pub content_dir: PathBuf,
    /// Directory holding `*.html` layouts.
    pub layouts_dir: PathBuf,
    /// Directory copied verbatim into the output.
    pub public_dir: PathBuf,
    /// Directory the static site is written to.
    pub output_dir: PathBuf,
    /// Whether drafts are rendered and listed.
    pub drafts: bool,
    /// Layout used for the generated listing page.
    pub listing_layout: String,
}

/// Resolved markdown rendering configuration.
#[derive(Debug)]
pub struct MarkdownConfig {
    /// Syntax highlighting theme name.
    pub theme: String,
    /// Extra `.tmTheme` files.
    pub theme_dir: Option<PathBuf>,
    /// Extra `.sublime-syntax` definitions.
    pub syntax_dir: Option<PathBuf>,
    /// Whether GitHub Flavored Markdown extensions are enabled.
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            theme_dir: None,
            syntax_dir: None,
            gfm: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in the current directory and parents.
    ///
    /// CLI settings are applied after path resolution so they take precedence.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(content_dir) = &settings.content_dir {
            self.build_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(drafts) = settings.drafts {
            self.build_resolved.drafts = drafts;
        }
        if let Some(theme) = &settings.theme {
            self.markdown_resolved.theme.clone_from(theme);
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            content: ContentConfigRaw::default(),
            layouts: LayoutsConfigRaw::default(),
            build: BuildConfigRaw::default(),
            markdown: MarkdownConfigRaw::default(),
            build_resolved: BuildConfig {
                content_dir: base.join("content"),
                layouts_dir: base.join("layouts"),
                public_dir: base.join("public"),
                output_dir: base.join("dist"),
                drafts: false,
                listing_layout: "index".to_owned(),
            },
            markdown_resolved: MarkdownConfig::default(),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        require_non_empty(&self.markdown_resolved.theme, "markdown.theme")?;
        require_non_empty(&self.build_resolved.listing_layout, "layouts.listing")?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;

        let base = &self.site.base_url;
        if !base.starts_with('/') || !base.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must start and end with '/'".to_owned(),
            ));
        }

        if let Some(url) = &self.site.url {
            require_non_empty(url, "site.url")?;
            require_http_url(url, "site.url")?;
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.title = expand::expand_env(&self.site.title, "site.title")?;
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;

        if let Some(ref url) = self.site.url {
            self.site.url = Some(expand::expand_env(url, "site.url")?);
        }
        if let Some(ref author) = self.site.author {
            self.site.author = Some(expand::expand_env(author, "site.author")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            content_dir: resolve(self.content.dir.as_deref(), "content"),
            layouts_dir: resolve(self.layouts.dir.as_deref(), "layouts"),
            public_dir: resolve(self.build.public_dir.as_deref(), "public"),
            output_dir: resolve(self.build.output_dir.as_deref(), "dist"),
            drafts: self.build.drafts.unwrap_or(false),
            listing_layout: self
                .layouts
                .listing
                .clone()
                .unwrap_or_else(|| "index".to_owned()),
        };

        self.markdown_resolved = MarkdownConfig {
            theme: self
                .markdown
                .theme
                .clone()
                .unwrap_or_else(|| DEFAULT_THEME.to_owned()),
            theme_dir: self.markdown.theme_dir.as_deref().map(|d| config_dir.join(d)),
            syntax_dir: self
                .markdown
                .syntax_dir
                .as_deref()
                .map(|d| config_dir.join(d)),
            gfm: self.markdown.gfm.unwrap_or(true),
        };
    }
}
