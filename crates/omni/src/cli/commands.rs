//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use omni::StoryType;
use std::path::PathBuf;

/// Omni - turn ordered photos into comic-book story suggestions
#[derive(Parser, Debug)]
#[command(name = "omni")]
#[command(about = "Turn ordered photos into comic-book story suggestions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate story suggestions from local images
    Generate(GenerateArgs),

    /// Run the HTTP story service
    Serve {
        /// Listen address (defaults to [server] addr)
        #[arg(long)]
        addr: Option<String>,
    },

    /// Describe the color and mood of one image
    Mood {
        /// Image file
        #[arg(long)]
        image: PathBuf,
    },

    /// Print the layout plan for a frame count
    Layout {
        /// Number of frames
        frames: usize,
    },

    /// List story types
    Types,
}

/// Arguments for `omni generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Image files, in story order
    #[arg(long = "image", short = 'i', required = true, num_args = 1..)]
    pub images: Vec<PathBuf>,

    /// Story type
    #[arg(long = "type", short = 't', default_value_t = StoryType::Trip)]
    pub story_type: StoryType,

    /// Free-text context for the story
    #[arg(long, short)]
    pub context: Option<String>,

    /// Print suggestions as JSON
    #[arg(long)]
    pub json: bool,

    /// Export each suggestion as a PNG into the configured directory
    #[arg(long)]
    pub export: bool,

    /// Export each suggestion as a PNG into this directory
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

impl GenerateArgs {
    /// Destination directory when exporting is requested.
    pub fn export_target(&self, configured: &str) -> Option<PathBuf> {
        match (&self.export_dir, self.export) {
            (Some(dir), _) => Some(dir.clone()),
            (None, true) => Some(PathBuf::from(configured)),
            (None, false) => None,
        }
    }
}
