use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use tokio::runtime::Runtime;

use crate::core::convert::{ConvertOptions, Engine};

use super::super::app::{App, Focus, StatusKind};
use super::{HandleKeyContext, HandleResult, PendingConversion, handle_key, handle_paste, poll_pending};

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

struct Harness {
    app: App,
    engine: Arc<Engine>,
    options: ConvertOptions,
    pending: Option<PendingConversion>,
    rt: Arc<Runtime>,
}

impl Harness {
    fn new(input: &str, save_path: PathBuf) -> Self {
        Self {
            app: App::new("regex only".to_string(), save_path, input.to_string()),
            engine: Arc::new(Engine::RegexOnly),
            options: ConvertOptions::default(),
            pending: None,
            rt: Arc::new(Runtime::new().unwrap()),
        }
    }

    fn press(&mut self, code: KeyCode, modifiers: KeyModifiers) -> HandleResult {
        handle_key(
            key(code, modifiers),
            HandleKeyContext {
                app: &mut self.app,
                engine: &self.engine,
                options: &self.options,
                pending: &mut self.pending,
                rt: &self.rt,
            },
        )
    }

    fn wait_for_result(&mut self) {
        for _ in 0..200 {
            poll_pending(&mut self.app, &mut self.pending);
            if self.pending.is_none() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("conversion did not finish");
    }
}

#[test]
fn convert_on_empty_input_warns_and_does_not_start() {
    let mut h = Harness::new("   \n", PathBuf::from("unused.md"));
    h.press(KeyCode::Char('r'), KeyModifiers::CONTROL);
    assert!(h.pending.is_none());
    assert!(!h.app.converting);
    assert_eq!(h.app.status.kind, StatusKind::Warning);
    assert!(h.app.status.text.contains("Please enter some text to convert"));
}

#[test]
fn convert_then_save_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new("Energy \\(E=mc^2\\).", dir.path().join("result"));

    h.press(KeyCode::Char('r'), KeyModifiers::CONTROL);
    assert!(h.app.converting);
    h.wait_for_result();
    assert!(!h.app.converting);
    assert_eq!(h.app.output, "Energy $E=mc^2$.");
    assert_eq!(h.app.status.kind, StatusKind::Success);

    h.press(KeyCode::Char('s'), KeyModifiers::CONTROL);
    let saved = dir.path().join("result.md");
    assert_eq!(h.app.last_saved.as_deref(), Some(saved.as_path()));
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "Energy $E=mc^2$.");
}

#[test]
fn save_without_output_warns() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new("x", dir.path().join("out.md"));
    h.press(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert_eq!(h.app.status.kind, StatusKind::Warning);
    assert!(!dir.path().join("out.md").exists());
}

#[test]
fn typing_goes_to_input_pane_only() {
    let mut h = Harness::new("", PathBuf::from("unused.md"));
    h.press(KeyCode::Char('a'), KeyModifiers::empty());
    h.press(KeyCode::Enter, KeyModifiers::empty());
    h.press(KeyCode::Char('b'), KeyModifiers::SHIFT);
    assert_eq!(h.app.input, "a\nb");

    h.press(KeyCode::Tab, KeyModifiers::empty());
    assert_eq!(h.app.focus, Focus::Output);
    h.press(KeyCode::Char('z'), KeyModifiers::empty());
    assert_eq!(h.app.input, "a\nb");

    h.press(KeyCode::Esc, KeyModifiers::empty());
    assert_eq!(h.app.focus, Focus::Input);
}

#[test]
fn clear_and_paste() {
    let mut h = Harness::new("old text", PathBuf::from("unused.md"));
    h.press(KeyCode::Char('l'), KeyModifiers::CONTROL);
    assert!(h.app.input.is_empty());
    h.app.focus = Focus::Output;
    handle_paste("line\r\nnext", &mut h.app);
    assert_eq!(h.app.focus, Focus::Input);
    assert_eq!(h.app.input, "line\nnext");
}

#[test]
fn quit_keys_break_the_loop() {
    let mut h = Harness::new("", PathBuf::from("unused.md"));
    assert_eq!(
        h.press(KeyCode::Char('q'), KeyModifiers::CONTROL),
        HandleResult::Break
    );
    assert_eq!(
        h.press(KeyCode::Char('c'), KeyModifiers::CONTROL),
        HandleResult::Break
    );
    assert_eq!(
        h.press(KeyCode::Char('q'), KeyModifiers::empty()),
        HandleResult::Continue
    );
}

#[test]
fn open_before_save_warns() {
    let mut h = Harness::new("", PathBuf::from("unused.md"));
    h.press(KeyCode::Char('o'), KeyModifiers::CONTROL);
    assert_eq!(h.app.status.kind, StatusKind::Warning);
}
