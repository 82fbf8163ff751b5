//! Mediacat CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Define a multi-valued property and tag two records
//! mediacat property define genre --multiple
//! mediacat tag genre drama war -i 1 -i 2
//!
//! # Group by genre, largest groups first, second page
//! mediacat view --group-tag genre --group-sort count --reverse -p 1
//!
//! # Drill into a genre and list the sizes of what is left
//! mediacat column size --group-tag genre -c drama
//!
//! # Records whose files moved
//! mediacat moves
//! mediacat moves --from 2 --to 1
//! ```
//!
//! # Configuration
//!
//! Configuration is stored in the user's config directory
//! (`~/.config/mediacat/config.toml` on Linux) and created with one default
//! database on first run. Set `MEDIACAT_LOG` (e.g. `debug`) for diagnostics.

use colored::Colorize;
use mediacat::{
    Result,
    cli::{Cli, Commands},
    commands::{self, Context},
    config::MediacatConfig,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("MEDIACAT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = MediacatConfig::load()?;
    let ctx = Context {
        quiet: cli.quiet || config.quiet,
        json: cli.json,
        config,
    };
    let mut library = ctx.open_library(cli.db.as_deref())?;

    match &cli.command {
        Commands::View(command) => commands::view(&mut library, command, &ctx)?,
        Commands::Import { file } => commands::import(&mut library, file, &ctx)?,
        Commands::Property { command } => commands::property(&mut library, command, &ctx)?,
        Commands::Tag {
            property,
            values,
            ids,
        } => commands::tag(&mut library, property, values, ids, &ctx)?,
        Commands::Moves { from, to } => {
            commands::moves(&mut library, from.zip(*to), &ctx)?;
        }
        Commands::Column { field, view } => commands::column(&mut library, field, view, &ctx)?,
    }

    library.db().flush()?;
    Ok(())
}

fn main() {
    init_logging();
    if let Err(e) = run(Cli::parse_args()) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
