mod cache;
mod config;
mod error;
mod llm;
mod merge;
mod output;
mod pipeline;
mod review;
mod synthesize;
mod transcribe;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "podscribe")]
#[command(about = "Podcast voice generation and speaker-attributed transcription", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate voice audio for each line of a script file
    Synthesize {
        /// Script file with rows of (id, cue, text)
        script: PathBuf,

        /// Configuration file path (default: ~/.podscribe/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Transcribe an episode and attribute lines to speakers
    Transcribe {
        /// Input audio file
        input: PathBuf,

        /// Configuration file path (default: ~/.podscribe/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Synthesize { script, config } => {
            let app_config = config::load_app_config(config.as_deref())
                .context("Failed to load app config")?;

            let script_path = script.canonicalize().context("Failed to find script file")?;
            let out_dir = script_path.parent().unwrap_or_else(|| Path::new("."));

            let rows = synthesize::load_script(&script_path)?;
            println!("Synthesizing {} lines...", rows.len());
            let pb = ProgressBar::new(rows.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                    )
                    .unwrap()
                    .progress_chars("#>-"),
            );

            synthesize::run_synthesis(&app_config.synthesis, &rows, out_dir, &pb).await?;
            pb.finish_with_message("Synthesis complete");
        }
        Commands::Transcribe { input, config } => {
            let app_config = config::load_app_config(config.as_deref())
                .context("Failed to load app config")?;

            pipeline::process_transcription(&input, &app_config).await?;
            println!("Done!");
        }
    }

    Ok(())
}
