//! Point d'entrée CLI pour green-rating

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod report;

use cli::Commands;

/// Rendre les résultats d'analyse green rating hors navigateur
#[derive(Parser)]
#[command(name = "green-rating")]
#[command(author, version)]
#[command(about = "Rendre les résultats d'analyse green rating en couches GeoJSON stylées")]
#[command(
    long_about = "Exécute le moteur de visualisation greenmap sur un payload d'analyse sauvegardé.\n\n'export' écrit une FeatureCollection stylée par couche présente; 'inspect' simule la sélection d'un bâtiment et affiche son popup et son ensemble de surbrillance."
)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Export {
            payload,
            polygon,
            output,
            json,
        } => {
            info!(payload = %payload.display(), output = %output.display(), "Export des couches stylées");
            cli::cmd_export(&payload, polygon.as_deref(), &output, json)?;
        }
        Commands::Inspect {
            payload,
            polygon,
            building,
        } => {
            info!(payload = %payload.display(), building = %building, "Inspection d'un bâtiment");
            cli::cmd_inspect(&payload, polygon.as_deref(), &building)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
