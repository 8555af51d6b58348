mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lpipe")]
#[command(version, about = "Listings data preparation pipeline CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root directory of the artifact store
    #[arg(short, long, global = true, default_value = "./artifacts")]
    store: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a CSV file into the artifact store
    Import {
        /// Path to the CSV file to import
        file: String,

        /// Artifact name to publish under
        #[arg(short, long)]
        name: String,

        /// Artifact type recorded in the metadata
        #[arg(short, long, default_value = "raw_data")]
        kind: String,

        /// Human-readable description recorded in the metadata
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Clean a dataset artifact: price filter, bounding box, date normalization
    Clean {
        /// Input artifact reference (e.g. raw_data:latest)
        input: String,

        /// Path to the pipeline configuration file (YAML or TOML)
        #[arg(short, long)]
        config: String,

        /// Artifact name for the cleaned output
        #[arg(short, long, default_value = "clean_sample")]
        output: String,
    },

    /// Validate a candidate dataset against the schema, domain rules, and a
    /// reference distribution
    Validate {
        /// Candidate artifact reference
        candidate: String,

        /// Reference artifact for the drift comparison
        #[arg(short, long)]
        reference: String,

        /// Path to the pipeline configuration file (YAML or TOML)
        #[arg(short, long)]
        config: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Split a dataset artifact into stratified train/validation/test artifacts
    Split {
        /// Input artifact reference
        input: String,

        /// Path to the pipeline configuration file (YAML or TOML)
        #[arg(short, long)]
        config: String,

        /// Name prefix for the published partitions
        #[arg(short, long, default_value = "data")]
        prefix: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Import {
            file,
            name,
            kind,
            description,
        } => commands::import::execute(&cli.store, &file, &name, &kind, &description),

        Commands::Clean {
            input,
            config,
            output,
        } => commands::clean::execute(&cli.store, &input, &config, &output),

        Commands::Validate {
            candidate,
            reference,
            config,
            format,
        } => commands::validate::execute(&cli.store, &candidate, &reference, &config, &format),

        Commands::Split {
            input,
            config,
            prefix,
        } => commands::split::execute(&cli.store, &input, &config, &prefix),
    }
}
