//! CLI command implementations.

mod build;
mod check;
mod list;

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use list::ListArgs;

use crate::error::CliError;

/// Options shared by every command that loads the site.
#[derive(Args, Debug, Default)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Include drafts.
    #[arg(long)]
    drafts: bool,

    /// Syntax highlighting theme (overrides config).
    #[arg(long)]
    theme: Option<String>,
}

impl SiteArgs {
    fn settings(&self, output_dir: Option<PathBuf>) -> CliSettings {
        CliSettings {
            output_dir,
            content_dir: self.content_dir.clone(),
            drafts: self.drafts.then_some(true),
            theme: self.theme.clone(),
        }
    }

    /// Load the configuration with command line overrides applied.
    pub(crate) fn load(&self, output_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let settings = self.settings(output_dir);
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settings_only_override_given_flags() {
        let args = SiteArgs::default();
        let settings = args.settings(None);
        assert_eq!(settings.drafts, None);
        assert_eq!(settings.theme, None);
        assert_eq!(settings.content_dir, None);
    }

    #[test]
    fn test_load_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("folio.toml");
        std::fs::write(&config_path, "[site]\ntitle = \"T\"\n").unwrap();

        let args = SiteArgs {
            config: Some(config_path),
            content_dir: None,
            drafts: true,
            theme: Some("InspiredGitHub".to_owned()),
        };
        let config = args.load(Some(PathBuf::from("out"))).unwrap();
        assert!(config.build_resolved.drafts);
        assert_eq!(config.markdown_resolved.theme, "InspiredGitHub");
        assert_eq!(config.build_resolved.output_dir, PathBuf::from("out"));
        assert_eq!(config.build_resolved.content_dir, dir.path().join("content"));
    }
}
