//! Sifter CLI - container images for offline HPC clusters
//!
//! Usage: sifter <COMMAND>
//!
//! Commands:
//!   plan      Write the ordered tags file for a build
//!   export    Save every image of a tags file into an archive
//!   convert   Rebuild archives into runtime images and update the registry
//!   pull      Pull images no catalog target builds
//!   registry  List, merge or verify the registry document

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;

use sifter::application::CancelToken;
use sifter::config;
use sifter::error::{exit_code, SifterError};
use sifter::logging::{init_tracing, level_for_verbosity};
use sifter::presentation::{create_renderer, Cli, Commands, OutputFormat};

use commands::Context;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version come through here too
            let code = if err.use_stderr() {
                exit_code::USAGE
            } else {
                exit_code::SUCCESS
            };
            let _ = err.print();
            return to_exit_code(code);
        }
    };

    init_tracing(cli.json, level_for_verbosity(cli.verbose));

    let json = cli.json;
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            print_error(&err, json);
            err.downcast_ref::<SifterError>()
                .map(SifterError::exit_code)
                .unwrap_or(exit_code::USAGE)
        }
    };
    to_exit_code(code)
}

fn run(cli: Cli) -> Result<i32> {
    let cwd = std::env::current_dir()?;
    let loaded = config::resolve(cli.config.as_deref(), &cwd).map_err(SifterError::from)?;
    if let Some(source) = &loaded.source {
        tracing::debug!(config = %source.display(), "loaded configuration");
    }
    for warning in &loaded.warnings {
        tracing::warn!("{warning}");
    }

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
            tracing::warn!(error = %e, "could not install the interrupt handler");
        }
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let ctx = Context {
        config: loaded.config,
        registry: cli.registry,
        renderer: create_renderer(format, std::io::stdout().is_terminal(), cli.verbose),
        cancel,
        cwd,
    };

    match cli.command {
        Commands::Plan {
            targets,
            tag,
            sha,
            out,
            register,
        } => commands::plan::cmd_plan(&ctx, targets, tag, sha, out, register),
        Commands::Export {
            tags_file,
            out_dir,
            dry_run,
        } => commands::export::cmd_export(&ctx, tags_file, out_dir, dry_run),
        Commands::Convert {
            archive_dir,
            image_dir,
            locator,
            dry_run,
        } => commands::convert::cmd_convert(&ctx, archive_dir, image_dir, locator, dry_run),
        Commands::Pull {
            out_dir,
            locator,
            dry_run,
        } => commands::pull::cmd_pull(&ctx, out_dir, locator, dry_run),
        Commands::Registry { action } => commands::registry::cmd_registry(&ctx, action),
    }
}

fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let output = serde_json::json!({
            "event": "error",
            "message": format!("{err:#}"),
        });
        println!("{output}");
        return;
    }
    eprintln!("[ERROR] {err:#}");
}

fn to_exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
