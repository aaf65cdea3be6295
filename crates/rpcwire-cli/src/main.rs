//! rpcwire CLI - JSON-RPC framing tools and stdio peer
//!
//! Commands:
//! - `rpcwire encode` - Print one framed request
//! - `rpcwire decode` - Pretty-print framed messages read from stdin
//! - `rpcwire serve` - Answer JSON-RPC requests over stdin/stdout

use clap::{Parser, Subcommand};
use rpcwire::DEFAULT_SEPARATOR;
use std::path::PathBuf;

mod config;
mod decode;
mod encode;
mod serve;

#[derive(Parser)]
#[command(name = "rpcwire")]
#[command(author, version, about = "JSON-RPC 2.0 framing tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one framed request
    Encode {
        /// Method name
        #[arg(short, long)]
        method: String,

        /// Params as a JSON array or object
        #[arg(short, long)]
        params: Option<String>,

        /// Request id (omit for a notification)
        #[arg(short, long)]
        id: Option<String>,

        /// Frame separator
        #[arg(short, long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
    },

    /// Decode framed messages from stdin
    Decode {
        /// Frame separator
        #[arg(short, long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
    },

    /// Serve the built-in methods over stdin/stdout
    Serve {
        /// Frame separator (overrides the config file)
        #[arg(short, long)]
        separator: Option<String>,

        /// Method name prefix (overrides the config file)
        #[arg(short, long)]
        prefix: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            method,
            params,
            id,
            separator,
        } => {
            anyhow::ensure!(!separator.is_empty(), "Separator cannot be empty");
            encode::run(&method, params.as_deref(), id.as_deref(), &separator)?;
        }
        Commands::Decode { separator } => {
            anyhow::ensure!(!separator.is_empty(), "Separator cannot be empty");
            decode::run(&separator)?;
        }
        Commands::Serve {
            separator,
            prefix,
            config: config_path,
        } => {
            let loaded = config::load(config_path.as_deref())?;
            let settings = config::apply_overrides(loaded, separator, prefix);
            config::validate(&settings)?;
            rpcwire::init_logging_with_level(settings.level());
            serve::run(&settings).await?;
        }
    }

    Ok(())
}
