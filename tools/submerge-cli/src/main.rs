//! submerge CLI: merge subtitle tracks into one styled ASS script.
//!
//! Usage:
//!   submerge merge [OPTIONS] --template <T> --track <TRACK>...  Merge tracks
//!   submerge batch <JOB>                                        Run a batch job
//!   submerge styles <TEMPLATE>                                  List template styles
//!   submerge info <FILE>                                        Show file information
//!   submerge config [--init [--force]]                          Show or create the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use submerge_common::config::AppConfig;

mod commands;

use commands::merge::TrackArg;

#[derive(Parser)]
#[command(
    name = "submerge",
    about = "Merge and synchronize subtitle tracks into a single ASS script",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge subtitle tracks using a template's styles
    Merge {
        /// Template ASS/SSA script supplying metadata and styles
        #[arg(short, long)]
        template: PathBuf,

        /// Output file path
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Directory for a derived output file name
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Snapping threshold in milliseconds (defaults to the configured value)
        #[arg(long)]
        threshold: Option<u64>,

        /// Let every track snap against all origin timestamps
        #[arg(long)]
        per_track_sync: bool,

        /// Track as PATH[,style=NAME][,offset=MS][,origin]
        #[arg(long = "track", required = true)]
        tracks: Vec<TrackArg>,
    },

    /// Run a batch merge job file
    Batch {
        /// Path to the job JSON file
        job: PathBuf,

        /// Let every track snap against all origin timestamps
        #[arg(long)]
        per_track_sync: bool,
    },

    /// List the styles defined by a template
    Styles {
        /// Template ASS/SSA script
        template: PathBuf,
    },

    /// Show information about a subtitle file
    Info {
        /// Path to an .ass, .ssa, or .srt file
        path: PathBuf,
    },

    /// Show the config file location and effective settings
    Config {
        /// Write the default settings to the config file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing config file
        #[arg(long, requires = "init")]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    submerge_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Merge {
            template,
            output,
            output_dir,
            threshold,
            per_track_sync,
            tracks,
        } => commands::merge::run(
            &config,
            template,
            output,
            output_dir,
            threshold,
            per_track_sync,
            tracks,
        ),
        Commands::Batch {
            job,
            per_track_sync,
        } => commands::batch::run(&config, job, per_track_sync),
        Commands::Styles { template } => commands::styles::run(template),
        Commands::Info { path } => commands::info::run(path),
        Commands::Config { init, force } => commands::config::run(&config, init, force),
    }
}
