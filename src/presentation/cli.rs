//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--config, --registry, --json, --verbose) are inherited by all subcommands
//! - Every stage that writes supports `--dry-run`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::value_objects::LocatorStyle;

/// Sifter - container images for offline HPC clusters
#[derive(Parser, Debug)]
#[command(name = "sifter")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Stages: plan → (build) → export → (transfer) → convert; pull fills in upstream images."
)]
pub struct Cli {
    /// Configuration file (default: ./sifter.toml, then the user config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Registry document to read and update (overrides [registry].path)
    #[arg(long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the ordered tags file for a build
    Plan {
        /// Catalog targets, comma separated, or `all`
        #[arg(long, value_delimiter = ',', required = true)]
        targets: Vec<String>,

        /// Version as <date>-<release>
        #[arg(long, value_name = "VERSION")]
        tag: String,

        /// Short commit sha (default: git HEAD of the working directory)
        #[arg(long)]
        sha: Option<String>,

        /// Tags file to write
        #[arg(long, default_value = "tags.txt")]
        out: PathBuf,

        /// Record the planned references in the registry as local builds
        #[arg(long)]
        register: bool,
    },

    /// Save every image of a tags file into an archive
    Export {
        /// Tags file, one image reference per line
        tags_file: PathBuf,

        /// Directory for the archives and manifest.json
        #[arg(default_value = ".")]
        out_dir: PathBuf,

        /// Show what would be exported
        #[arg(long)]
        dry_run: bool,
    },

    /// Rebuild exported archives into runtime images and update the registry
    Convert {
        /// Directory holding the archives and manifest.json
        archive_dir: PathBuf,

        /// Directory for the images (default: next to the archives)
        #[arg(long)]
        image_dir: Option<PathBuf>,

        /// Registry locator style: path or stem
        #[arg(long)]
        locator: Option<LocatorStyle>,

        /// Show what would be converted and which keys would change
        #[arg(long)]
        dry_run: bool,
    },

    /// Pull images no catalog target builds and update the registry
    Pull {
        /// Directory for the pulled images (overrides [pull].out_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Registry locator style: path or stem
        #[arg(long)]
        locator: Option<LocatorStyle>,

        /// Show what would be pulled and which keys would change
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect or update the registry document
    Registry {
        #[command(subcommand)]
        action: RegistryAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryAction {
    /// Print every entry
    List,

    /// Merge entries from another registry document
    Merge {
        /// Document with the entries to merge
        file: PathBuf,
    },

    /// Check that image paths exist and required keys resolve
    Verify {
        /// Key that must be present (repeatable)
        #[arg(long = "require", value_name = "KEY")]
        require: Vec<String>,
    },
}
