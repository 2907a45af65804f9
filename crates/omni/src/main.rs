//! Omni CLI binary.
//!
//! This binary provides command-line access to Omni's functionality:
//! - Generate story suggestions from local photos
//! - Serve the story API over HTTP
//! - Inspect layout plans and story types

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use cli::{Cli, Commands, list_types, print_layout, run_generate, run_mood, run_serve};

    // Credentials may come from a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    omni::init_tracing(cli.verbose)?;

    let config = omni::OmniConfig::load()?;

    match cli.command {
        Commands::Generate(options) => {
            run_generate(&config, options).await?;
        }

        Commands::Serve { addr } => {
            run_serve(&config, addr).await?;
        }

        Commands::Mood { image } => {
            run_mood(&config, &image).await?;
        }

        Commands::Layout { frames } => {
            print_layout(frames);
        }

        Commands::Types => {
            list_types();
        }
    }

    Ok(())
}
