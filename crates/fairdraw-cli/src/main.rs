//! Command-line front end for fairdraw: reproducible draws and selections from a committed seed.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::SeedArgs;
use commands::read::ReadKind;
use commands::seed::SeedAction;

#[derive(Parser)]
#[command(name = "fairdraw")]
#[command(about = "fairdraw: reproducible draws and selections from a committed seed")]
#[command(version = fairdraw_core::VERSION)]
struct Cli {
    /// Log debug detail to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    verbose: bool,

    /// Print {"value": ..., "err": ...} JSON envelopes instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Typed reads straight from the stream
    Read {
        #[command(flatten)]
        seed: SeedArgs,

        /// What to read
        #[arg(value_enum)]
        kind: ReadKind,

        /// Length of each read for bits and bytes
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        count: i64,

        /// Number of reads
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        repeat: i64,
    },

    /// Bias-free bounded integers from one extractor
    Numbers {
        #[command(flatten)]
        seed: SeedArgs,

        /// Number of values to draw
        #[arg(long, allow_negative_numbers = true)]
        count: i64,

        /// Extractor magnitude: values fall in [0, magnitude)
        #[arg(long)]
        magnitude: u64,

        /// Read each value in [0, K) instead; K must not exceed --magnitude
        #[arg(long)]
        read_magnitude: Option<u64>,
    },

    /// Integers in [0, magnitude), with or without replacement
    Pick {
        #[command(flatten)]
        seed: SeedArgs,

        #[arg(long, allow_negative_numbers = true)]
        count: i64,

        #[arg(long)]
        magnitude: u64,

        /// No value is drawn twice
        #[arg(long)]
        distinct: bool,
    },

    /// Weighted, supply-aware selection from a JSON items file
    Select {
        #[command(flatten)]
        seed: SeedArgs,

        /// JSON array of {"value": ..., "weight": 1.0, "supply": -1}
        #[arg(long)]
        items: PathBuf,

        /// Items selected per round
        #[arg(long)]
        count: usize,

        /// Rounds drawn from the same stream
        #[arg(long, default_value = "1")]
        rounds: usize,

        /// Restore every supply before each round after the first
        #[arg(long)]
        reset_between: bool,
    },

    /// Build seeds: encode typed values, commit to them, or encode a fraction
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },

    /// Uniformity audit of bounded draws over many derived seeds
    Audit {
        #[arg(long)]
        magnitude: u64,

        /// Number of derived seeds
        #[arg(long, default_value = "100")]
        seeds: u64,

        /// Draws per seed
        #[arg(long, default_value = "100")]
        draws: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match &cli.command {
        Commands::Read {
            seed,
            kind,
            count,
            repeat,
        } => commands::read::execute(seed, *kind, *count, *repeat),
        Commands::Numbers {
            seed,
            count,
            magnitude,
            read_magnitude,
        } => commands::numbers::execute(seed, *count, *magnitude, *read_magnitude),
        Commands::Pick {
            seed,
            count,
            magnitude,
            distinct,
        } => commands::pick::execute(seed, *count, *magnitude, *distinct),
        Commands::Select {
            seed,
            items,
            count,
            rounds,
            reset_between,
        } => commands::select::execute(commands::select::SelectCommandConfig {
            seed,
            items_path: items,
            count: *count,
            rounds: *rounds,
            reset_between: *reset_between,
        }),
        Commands::Seed { action } => commands::seed::execute(action),
        Commands::Audit {
            magnitude,
            seeds,
            draws,
        } => commands::audit::execute(*magnitude, *seeds, *draws),
    };

    let code = commands::emit(result, cli.json);
    if code != 0 {
        std::process::exit(code);
    }
}
