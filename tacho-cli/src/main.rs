mod export;
mod info;
mod load;
mod menu;
mod show;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tacho_model::{DISPLAY_INDENT, EXPORT_INDENT};
use tacho_nav::EngineOptions;

#[derive(Parser)]
#[command(name = "tacho-view", about = "Browse and export parsed tachograph records")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// ERCA public key for first generation cards (144 bytes)
    #[arg(long, global = true, value_name = "PATH")]
    erca_gen1: Option<PathBuf>,

    /// ERCA public key for second generation cards (205 bytes)
    #[arg(long, global = true, value_name = "PATH")]
    erca_gen2: Option<PathBuf>,

    /// JSON indent for printed content
    #[arg(long, global = true, default_value_t = DISPLAY_INDENT)]
    display_indent: usize,

    /// JSON indent for exported files
    #[arg(long, global = true, default_value_t = EXPORT_INDENT)]
    export_indent: usize,
}

#[derive(Subcommand)]
enum Command {
    /// List the selectable parts of a record
    Menu {
        /// Parsed record (.json)
        input: PathBuf,
    },

    /// Print one part of a record
    Show {
        /// Parsed record (.json)
        input: PathBuf,

        /// Part key, e.g. eventsData or EF_Events
        #[arg(short, long)]
        key: String,

        /// Generation tag, e.g. Gen1, Gen2 or VUGen1
        #[arg(short, long = "gen")]
        generation: String,
    },

    /// Write a record, or one part of it, as JSON
    Export {
        /// Parsed record (.json)
        input: PathBuf,

        /// Part key; exports the whole record when omitted
        #[arg(short, long, requires = "generation")]
        key: Option<String>,

        /// Generation tag of the part
        #[arg(short, long = "gen", requires = "key")]
        generation: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Display information about a record
    Info {
        /// Parsed record (.json)
        input: PathBuf,
    },
}

/// Settings shared by every subcommand.
pub struct Options {
    pub engine: EngineOptions,
    pub erca_gen1: Option<PathBuf>,
    pub erca_gen2: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let options = Options {
        engine: EngineOptions {
            display_indent: cli.display_indent,
            export_indent: cli.export_indent,
        },
        erca_gen1: cli.erca_gen1,
        erca_gen2: cli.erca_gen2,
    };

    match cli.command {
        Command::Menu { input } => menu::run_menu(&input, &options),
        Command::Show {
            input,
            key,
            generation,
        } => show::run_show(&input, &key, &generation, &options),
        Command::Export {
            input,
            key,
            generation,
            output,
        } => {
            let part = key.as_deref().zip(generation.as_deref());
            export::run_export(&input, part, &output, &options)
        }
        Command::Info { input } => info::run_info(&input, &options),
    }
}
