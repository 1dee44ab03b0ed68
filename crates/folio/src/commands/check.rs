//! `folio check` command implementation.

use clap::Args;
use folio_site::SiteBuilder;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    site: SiteArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load(None)?;

        let report = SiteBuilder::new(&config)?.check()?;

        output.warnings(&report.warnings);
        output.success(&format!(
            "{} document(s), {} page(s), {} internal link(s): ok",
            report.documents, report.pages, report.links_checked
        ));
        Ok(())
    }
}
