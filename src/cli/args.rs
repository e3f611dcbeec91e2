//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Pick or capture a photo and ask a vision model what is in it
#[derive(Parser, Debug)]
#[command(name = "snapsight")]
#[command(version, about = "Describe a photo with a vision model", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Interactive session (pick, analyze, repeat)
    snapsight

    # Describe an existing photo
    snapsight describe ~/Pictures/cat.jpg

    # Take a picture with the default camera and describe it
    snapsight capture

    # Use the second camera
    snapsight capture --camera 1

The API key is read from GROQ_API_KEY (a .env file in the working directory is loaded first).")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe an existing photo
    Describe {
        /// Path to the image file
        path: PathBuf,
    },
    /// Take a picture with the camera and describe it
    Capture {
        /// Camera index or name (from list-cameras)
        #[arg(long)]
        camera: Option<String>,
    },
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create default config file
    Init,
    /// Print the config file path
    Path,
}
