//! TUI (Text User Interface): paste Markdown on the left, converted output on the right.

mod app;
mod constants;
mod draw;
mod handlers;
mod shortcuts;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use tokio::runtime::Runtime;

use crate::core::convert::{ConvertOptions, Engine};
use crate::core::document::{self, DEFAULT_FILE_NAME};

use app::App;
use draw::draw;
use handlers::{HandleResult, PendingConversion};

/// What the TUI starts with: preloaded input, save target, chunking options.
#[derive(Debug, Clone)]
pub struct TuiSettings {
    pub initial_input: String,
    pub save_path: PathBuf,
    pub options: ConvertOptions,
}

impl TuiSettings {
    /// Read `file` into the input pane (if given). Ctrl+S saves to `output`,
    /// or `enhanced_equations.md` in the current directory.
    pub fn load(
        file: Option<&Path>,
        output: Option<PathBuf>,
        options: ConvertOptions,
    ) -> io::Result<Self> {
        let initial_input = match file {
            Some(path) => document::read_input(path)?,
            None => String::new(),
        };
        Ok(Self {
            initial_input,
            save_path: output.unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME)),
            options,
        })
    }
}

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = execute!(io::stdout(), event::DisableBracketedPaste);
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the TUI loop. Uses a dedicated Tokio runtime for the conversion worker.
pub fn run(engine: Arc<Engine>, settings: TuiSettings) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let _guard = TerminalGuard;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    execute!(stdout, Clear(ClearType::All))?;
    execute!(stdout, event::EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let rt = Arc::new(
        Runtime::new().map_err(|e| io::Error::other(format!("Failed to create runtime: {}", e)))?,
    );

    let TuiSettings {
        initial_input,
        save_path,
        options,
    } = settings;
    let mut app = App::new(engine.label().to_string(), save_path, initial_input);
    let mut pending: Option<PendingConversion> = None;

    loop {
        handlers::poll_pending(&mut app, &mut pending);

        terminal.draw(|f| draw(f, &mut app, f.area()))?;

        if event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let result = handlers::handle_key(
                        key,
                        handlers::HandleKeyContext {
                            app: &mut app,
                            engine: &engine,
                            options: &options,
                            pending: &mut pending,
                            rt: &rt,
                        },
                    );
                    if result == HandleResult::Break {
                        break;
                    }
                }
                Event::Paste(text) => handlers::handle_paste(&text, &mut app),
                _ => {}
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_empty_input_and_default_file() {
        let s = TuiSettings::load(None, None, ConvertOptions::default()).unwrap();
        assert!(s.initial_input.is_empty());
        assert_eq!(s.save_path, PathBuf::from(DEFAULT_FILE_NAME));
    }

    #[test]
    fn settings_preload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "see \\(x\\)").unwrap();
        let s = TuiSettings::load(
            Some(path.as_path()),
            Some(PathBuf::from("out.md")),
            ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(s.initial_input, "see \\(x\\)");
        assert_eq!(s.save_path, PathBuf::from("out.md"));
    }

    #[test]
    fn settings_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            TuiSettings::load(
                Some(dir.path().join("missing.md").as_path()),
                None,
                ConvertOptions::default()
            )
            .is_err()
        );
    }
}
