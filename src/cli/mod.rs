pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::error::ExitCondition;

use self::commands::{analyze, cycles, graph, score};

#[derive(Parser)]
#[command(name = "depscope")]
#[command(
    about = "Analyze .NET project dependencies, detect cycles and score extraction difficulty",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write DOT + CSV artefacts plus a JSON report
    Analyze {
        /// A .sln file, a .csproj file, or a directory containing either
        #[arg(required = true)]
        input: PathBuf,

        /// Optional analyzer config file (JSON/TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for artefacts (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Report format
        #[arg(long, value_parser = ["json", "pretty-json"], default_value = "pretty-json")]
        format: String,

        /// Label nodes with their rounded extraction score
        #[arg(long, default_value_t = false)]
        score_labels: bool,

        /// Also render the DOT file to SVG via Graphviz
        #[arg(long, default_value_t = false)]
        render: bool,

        /// Skip source scanning; metrics use their documented fallbacks
        #[arg(long, default_value_t = false)]
        no_semantic: bool,
    },

    /// Emit only the DOT rendering of the filtered graph with cycle overlays
    Graph {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for the DOT file
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// List dependency cycles, weak edges and break recommendations
    Cycles {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_parser = ["json", "pretty-json"], default_value = "pretty-json")]
        format: String,
    },

    /// Print extraction scores and ranked candidates
    Score {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_parser = ["json", "pretty-json"], default_value = "pretty-json")]
        format: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            config,
            out,
            format,
            score_labels,
            render,
            no_semantic,
        } => analyze::execute(input, config, out, format, score_labels, render, no_semantic),

        Commands::Graph { input, config, out } => graph::execute(input, config, out),

        Commands::Cycles {
            input,
            config,
            format,
        } => cycles::execute(input, config, format),

        Commands::Score {
            input,
            config,
            format,
        } => score::execute(input, config, format),
    };

    match result {
        Ok(condition) => ExitCode::from(condition.code()),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(ExitCondition::from_error(&err).code())
        }
    }
}
