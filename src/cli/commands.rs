//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eqref")]
#[command(
    about = "Resolve custom equation tags and cross-references in markdown documents",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new eqref project
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Resolve equation tags and references in documents
    Resolve {
        /// Documents to resolve, relative to the project root (default: all)
        files: Vec<String>,

        /// Overwrite the source documents instead of writing to the output directory
        #[arg(short, long)]
        in_place: bool,

        /// Output directory (default: from config)
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Validate documents without writing output
    Check {
        /// Documents to check (default: all)
        files: Vec<String>,
    },

    /// List labeled equations and their resolved tags
    List {
        /// Document to list (default: all)
        file: Option<String>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}
