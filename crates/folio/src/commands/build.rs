//! `folio build` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_site::SiteBuilder;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for the generated site (default: dist/ next to folio.toml).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    site: SiteArgs,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load(self.output_dir)?;
        let output_dir = &config.build_resolved.output_dir;

        output.info(&format!(
            "Content: {}",
            config.build_resolved.content_dir.display()
        ));
        output.info(&format!("Output: {}", output_dir.display()));

        let report = SiteBuilder::new(&config)?.build(output_dir)?;

        output.warnings(&report.warnings);
        if report.skipped_drafts > 0 {
            output.detail(&format!("Skipped {} draft(s)", report.skipped_drafts));
        }
        output.detail(&format!(
            "{} asset(s) copied, {} internal link(s) checked{}",
            report.assets,
            report.links_checked,
            if report.feed { ", RSS feed written" } else { "" }
        ));
        output.success(&format!(
            "Built {} page(s) to {}",
            report.pages,
            report.output_dir.display()
        ));
        Ok(())
    }
}
