use bookport::{Properties, RawBook};

use clap::Subcommand;
use eyre::Context;
use log::{trace, warn};
use serde::Serialize;

use crate::app::Credentials;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Import a book into the Notion database by ISBN
    ///
    /// Prints the scraped book, the properties sent to Notion and the created page as JSON.
    #[clap(arg_required_else_help = true)]
    Import {
        /// The ISBN of the book, hyphens are ignored
        isbn: String,
    },
    /// Show what would be imported for an ISBN without writing anything to Notion
    #[clap(arg_required_else_help = true)]
    Preview {
        /// The ISBN of the book, hyphens are ignored
        isbn: String,
    },
}

#[derive(Serialize)]
struct Preview {
    record: RawBook,
    payload: Properties,
}

impl Commands {
    pub fn execute(self, credentials: Credentials, interact: bool) -> eyre::Result<String> {
        match self {
            Commands::Import { isbn } => {
                // credentials are checked before anything is fetched
                let (token, database) = credentials.resolve(interact)?;
                trace!("import subcommand called with the value of '{isbn}'");

                let import = bookport::run_import(&token, &database, &isbn).map_err(report)?;
                serde_json::to_string_pretty(&import).wrap_err("Cannot print the imported page")
            }
            Commands::Preview { isbn } => {
                trace!("preview subcommand called with the value of '{isbn}'");

                let (record, payload) = bookport::preview(&isbn).map_err(report)?;
                serde_json::to_string_pretty(&Preview { record, payload })
                    .wrap_err("Cannot print the preview")
            }
        }
    }
}

fn report(err: bookport::Error) -> eyre::Report {
    if err.kind().is_transient() {
        warn!("This looks like a network problem, trying again later may work");
    }
    eyre::Report::new(err)
}
