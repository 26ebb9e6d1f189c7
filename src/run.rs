//! Application run modes: logger init, engine setup, single file, batch, TUI launch.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::{Args, ConversionArgs};
use crate::core;
use crate::core::batch::{self, OutputMode};
use crate::core::config::ConfigError;
use crate::core::convert::{ConvertCallbacks, ConvertOptions, Engine};
use crate::core::document::{self, DEFAULT_FILE_NAME};
use crate::core::llm::ChatModel;
use crate::tui::TuiSettings;

/// Initialize env_logger. In TUI mode, writes to file to avoid corrupting the display.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_tui() {
        let log_path = core::paths::cache_dir().and_then(|d| {
            std::fs::create_dir_all(&d).ok()?;
            Some(d.join(format!("{}.log", core::app::NAME)))
        });
        if let Some(path) = log_path
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Build the conversion engine. Loads the model config (and so fails on a
/// missing API key) unless `--regex-only` was given.
pub fn load_engine(conversion: &ConversionArgs) -> Result<Engine, ConfigError> {
    if conversion.regex_only {
        log::info!("Regex-only mode: no model calls");
        return Ok(Engine::RegexOnly);
    }
    let mut config = core::config::load()?;
    if let Some(model) = &conversion.model {
        config.model_id = model.clone();
    }
    if let Some(secs) = conversion.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    log::info!(
        "Using model {} at {} ({})",
        config.model_id,
        config.base_url,
        config.key_source
    );
    Ok(Engine::Model(ChatModel::new(&config)))
}

fn stderr_progress(quiet: bool) -> impl Fn(&str) + Send + Sync {
    move |s: &str| {
        if !quiet {
            let _ = writeln!(io::stderr(), "{}", s);
            let _ = io::stderr().flush();
        }
    }
}

/// Convert one document (file or stdin) and save or print it.
pub async fn run_single(
    args: &Args,
    input: &Path,
    engine: &Engine,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = document::read_input(input)?;
    let text = match document::validate_input(&text) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Warning: {}", e);
            std::process::exit(1);
        }
    };

    let options = args.conversion.options();
    let progress = stderr_progress(args.quiet || args.stdout);
    let conversion = engine
        .convert(
            text,
            &options,
            ConvertCallbacks {
                on_progress: Some(&progress),
                cancel_token: None,
            },
        )
        .await;

    if args.stdout {
        print!("{}", conversion.text);
        io::stdout().flush()?;
        return Ok(());
    }

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
    let saved = document::save(&target, &conversion.text)?;
    if !args.quiet {
        eprintln!("Saved to {} ({})", saved.display(), conversion.summary());
    }
    if args.open
        && let Err(e) = opener::open(&saved)
    {
        log::warn!("Could not open {}: {}", saved.display(), e);
        eprintln!("Warning: could not open {}: {}", saved.display(), e);
    }
    Ok(())
}

/// Convert every matching file under `dir`. One failing file does not stop the rest.
pub async fn run_batch(
    args: &Args,
    engine: &Engine,
    dir: &Path,
    pattern: &str,
    mode: OutputMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = batch::collect_inputs(dir, pattern, &mode)?;
    if files.is_empty() {
        eprintln!("No files matching {:?} under {}", pattern, dir.display());
        return Ok(());
    }
    let plan = batch::plan_outputs(dir, &files, &mode)?;

    let options = args.conversion.options();
    let total = plan.len();
    let mut failed = 0usize;
    for (i, (file, target)) in plan.iter().enumerate() {
        if !args.quiet {
            eprintln!("[{}/{}] {}", i + 1, total, file.display());
        }
        match convert_file(engine, file, target, &options).await {
            Ok(Some((saved, summary))) => {
                if !args.quiet {
                    eprintln!("  -> {} ({})", saved.display(), summary);
                }
            }
            Ok(None) => eprintln!("  skipped: {}", document::InputError::Empty),
            Err(e) => {
                failed += 1;
                log::error!("{}: {}", file.display(), e);
                eprintln!("  error: {}", e);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} file(s) failed", failed, total).into());
    }
    Ok(())
}

async fn convert_file(
    engine: &Engine,
    file: &Path,
    target: &Path,
    options: &ConvertOptions,
) -> io::Result<Option<(PathBuf, String)>> {
    let text = document::read_input(file)?;
    let Ok(text) = document::validate_input(&text) else {
        return Ok(None);
    };
    let conversion = engine
        .convert(text, options, ConvertCallbacks::default())
        .await;
    let saved = document::save(target, &conversion.text)?;
    Ok(Some((saved, conversion.summary())))
}

/// Launch the TUI in a blocking thread. Returns on panic or IO error.
pub async fn launch_tui(
    engine: Engine,
    settings: TuiSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Arc::new(engine);
    let join_result: Result<io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || crate::tui::run(engine, settings)).await;

    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(
                Box::new(io::Error::other("TUI thread panicked")) as Box<dyn std::error::Error>
            );
        }
    }
    Ok(())
}
