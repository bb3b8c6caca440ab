use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::show::ShowArgs;
use commands::InputArgs;

#[derive(Parser)]
#[command(name = "srk")]
#[command(about = "Stock replay / reconciliation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the movement journal against the stock snapshot and write results
    Replay {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory (overrides output.dir)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Exit non-zero when the critical flag is set (outputs are still written)
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Replay in memory and print the stock table, errors or one key's history
    Show {
        #[command(flatten)]
        input: InputArgs,

        /// Case-insensitive text filter over key, item, quantity, location,
        /// handling unit and batch
        #[arg(long)]
        filter: Option<String>,

        /// Print the error log
        #[arg(long, default_value_t = false)]
        errors: bool,

        /// Print the movements applied to this stock key
        #[arg(long)]
        history: Option<i64>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // dev-time .env.local bootstrap (RUST_LOG etc.); absent file is fine
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Replay { input, out, strict } => commands::replay::replay(input, out, strict)?,

        Commands::Show {
            input,
            filter,
            errors,
            history,
        } => commands::show::show(
            input,
            ShowArgs {
                filter,
                errors,
                history,
            },
        )?,

        Commands::ConfigHash { paths } => {
            let loaded = srk_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

// Logs go to stderr so stdout stays machine-readable key=value output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
