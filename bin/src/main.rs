//! brickline CLI - Renko blocks, RSI and order book summaries from a trade feed.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod display;
mod logging;

use commands::replay::ReplayArgs;
use config::Config;
use display::{Format, SinkArg};

#[derive(Parser)]
#[command(name = "brickline")]
#[command(about = "Renko blocks, RSI and order book summaries from a trade feed", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file. Defaults to brickline.toml in the user config directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded trade feed through the engine and append the blocks
    Replay(ReplayArgs),

    /// Convert a block file to another format
    Export {
        /// Block file written by `replay`
        input: PathBuf,

        /// Format of the input file. Inferred from its extension when omitted.
        #[arg(long, value_enum)]
        input_format: Option<SinkArg>,

        /// Output file path. Defaults to <input>.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Keep only the most recent N blocks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List supported instruments
    List {
        /// Search pattern
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show instrument details and block presets
    Info {
        /// Instrument symbol (e.g., btcusdt)
        instrument: String,
    },

    /// Validate the config file and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let (config, source) = Config::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose, cli.quiet)?;

    match command {
        Commands::Replay(args) => commands::replay::replay(config, args, cli.quiet).await,
        Commands::Export {
            input,
            input_format,
            output,
            format,
            limit,
        } => commands::export::export(&input, input_format, output, format, limit).await,
        Commands::List { search } => commands::list::list_instruments(search.as_deref()),
        Commands::Info { instrument } => commands::info::show_info(&instrument),
        Commands::CheckConfig => commands::check_config::check_config(&config, source.as_deref()),
    }
}
