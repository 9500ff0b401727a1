#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::process;

mod app;
mod commands;
mod interact;

use app::Credentials;
use commands::Commands;

use clap::{Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("Error: {err:#}");
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                token,
                database,
                interact,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(usize::from(verbosity), quiet)?;

    // `quiet` wins over `interact`, prompting without output makes no sense
    let interact = interact && !quiet;

    if interact {
        trace!("Interact mode enabled");
    }

    let credentials = Credentials::new(token, database);
    let output = command.execute(credentials, interact)?;

    if !quiet {
        println!("{output}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "bookport")]
#[clap(about = "Import books into a Notion database by ISBN, using the book details from Douban")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Args)]
struct GlobalOpts {
    /// The Notion integration token
    #[clap(short, long, env = "NOTION_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// The id of the Notion database that books are imported into
    #[clap(short, long, env = "NOTION_DATABASE_ID", global = true)]
    database: Option<String>,

    /// Enables interactive mode, which prompts for a missing token or database id.
    #[clap(short, long, global = true)]
    interact: bool,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,
}
