//! # Equation Enhancer
//!
//! Converts inline LaTeX `\( ... \)` in Markdown to `$ ... $`. Each chunk of the
//! document goes through a hosted model with a fixed instruction, and a regex
//! rewriter runs over every reply so the result is correct even when the model
//! is not (or is unreachable).
//!
//! ## Modes
//! - Single file (`equation-enhancer notes.md`), stdin with `-`
//! - Batch over a directory (`batch`)
//! - Interactive two-pane TUI (default, or `tui`)

mod cli;
mod core;
mod run;
mod tui;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use crate::cli::{Args, Commands, ConfigSubcommand};
use crate::core::batch::OutputMode;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    // Commands that never convert run without a key
    match &args.command {
        Some(Commands::Config { subcommand }) => {
            match subcommand {
                Some(ConfigSubcommand::SetApiKey { key }) => {
                    core::cli::run_config_set_api_key(key.clone())
                }
                None => core::cli::run_config(),
            }
            return Ok(());
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            cli::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    // Missing credentials are reported here, before any conversion starts
    let engine = run::load_engine(&args.conversion).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match &args.command {
        Some(Commands::Batch {
            dir,
            glob,
            out_dir,
            in_place,
        }) => {
            let mode = match (out_dir, in_place) {
                (_, true) => OutputMode::InPlace,
                (Some(out), false) => OutputMode::Mirror(out.clone()),
                (None, false) => OutputMode::Sibling,
            };
            run::run_batch(&args, &engine, dir, glob, mode).await
        }
        Some(Commands::Tui { file, output }) => {
            let settings = tui::TuiSettings::load(
                file.as_deref(),
                output.clone(),
                args.conversion.options(),
            )?;
            run::launch_tui(engine, settings).await
        }
        Some(Commands::Config { .. }) | Some(Commands::Completions { .. }) => Ok(()),
        None => match &args.input {
            Some(input) => run::run_single(&args, input, &engine).await,
            None => {
                let settings =
                    tui::TuiSettings::load(None, args.output.clone(), args.conversion.options())?;
                run::launch_tui(engine, settings).await
            }
        },
    }
}
