mod calc;
mod cmd;
mod data;
mod error;
mod logging;
mod ui;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rangepick", about = "calendar date and date-range picker")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    range: RangeArgs,

    /// Dates to preselect in the interactive picker (at most two)
    #[arg(long = "select", value_name = "DATE", num_args = 1..=2)]
    select: Vec<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Selectable range `[from, to)`. Missing bounds come from config.yaml.
#[derive(Args, Clone, Debug)]
struct RangeArgs {
    /// First selectable date (default: today)
    #[arg(long, value_name = "DATE")]
    from: Option<NaiveDate>,
    /// Exclusive upper bound (default: from + span_months)
    #[arg(long, value_name = "DATE")]
    to: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize data files with defaults
    Init,
    /// Print the month grids for a range
    Grid {
        #[command(flatten)]
        range: RangeArgs,
        /// Emit the grids as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply one or two selections to a range and print the result
    Select {
        #[command(flatten)]
        range: RangeArgs,
        /// One date, or two dates forming a range
        #[arg(value_name = "DATE", num_args = 1..=2, required = true)]
        dates: Vec<NaiveDate>,
    },
    /// List all highlighted dates
    Highlights,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        log::warn!(
            "data directory '{}' is missing or empty, running init",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    match cli.command {
        None => cmd::root::run(cli.range.from, cli.range.to, &cli.select),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Grid { range, json }) => cmd::grid::run(range.from, range.to, json),
        Some(Commands::Select { range, dates }) => cmd::select::run(range.from, range.to, &dates),
        Some(Commands::Highlights) => cmd::highlights::run(),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
