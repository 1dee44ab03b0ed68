//! `folio list` command implementation.

use clap::Args;
use console::Term;
use folio_content::{ContentStore, Document};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    site: SiteArgs,
}

impl ListArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.site.load(None)?;
        let store = ContentStore::scan(&config.build_resolved.content_dir)?;

        let term = Term::stdout();
        let mut count = 0;
        for doc in store.published(config.build_resolved.drafts) {
            term.write_line(&format_entry(doc, &config.site.base_url))?;
            count += 1;
        }

        Output::new().detail(&format!("{count} of {} document(s)", store.len()));
        Ok(())
    }
}

/// One listing line: date, site path under `base_url`, title, and a marker
/// for drafts.
fn format_entry(doc: &Document, base_url: &str) -> String {
    let marker = if doc.draft { " [draft]" } else { "" };
    let path = format!("{base_url}{}", doc.url_path());
    format!("{}  {path:<41} {}{marker}", doc.pub_date, doc.title)
}
