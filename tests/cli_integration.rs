//! Integration tests that run the CLI binary.

use std::io::Write;
use std::process::Stdio;

use tempfile::TempDir;

/// Command for the binary with no credentials in reach: the API key variable
/// is removed and the config dir points at an empty temp dir.
fn bin(config_dir: &TempDir) -> std::process::Command {
    // CARGO_BIN_EXE_<name> uses the binary target name; hyphens require concat! for env!()
    let bin = env!(concat!("CARGO_BIN_EXE_equation", "-", "enhancer"));
    let mut cmd = std::process::Command::new(bin);
    cmd.env_remove("GOOGLE_API_KEY")
        .env_remove("GEMINI_BASE_URL")
        .env_remove("GEMINI_MODEL")
        .env("ENHANCER_CONFIG_DIR", config_dir.path());
    cmd
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let config = TempDir::new().expect("temp dir");
    let output = bin(&config)
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--regex-only"));
    assert!(stdout.contains("batch"));
}

#[test]
fn cli_version_succeeds() {
    let config = TempDir::new().expect("temp dir");
    let output = bin(&config)
        .arg("--version")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("equation-enhancer"));
}

#[test]
fn cli_convert_without_api_key_exits_with_error() {
    // Run from temp dir so dotenv() won't load .env from project root
    let cwd = TempDir::new().expect("temp dir");
    let config = TempDir::new().expect("temp dir");
    std::fs::write(cwd.path().join("notes.md"), "Energy \\(E=mc^2\\).").unwrap();

    let output = bin(&config)
        .arg("notes.md")
        .current_dir(cwd.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        !output.status.success(),
        "expected failure when GOOGLE_API_KEY is not set"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GOOGLE_API_KEY"), "stderr: {}", stderr);
    assert!(!cwd.path().join("enhanced_equations.md").exists());
}

#[test]
fn cli_regex_only_saves_default_file() {
    let cwd = TempDir::new().expect("temp dir");
    let config = TempDir::new().expect("temp dir");
    std::fs::write(
        cwd.path().join("notes.md"),
        "Energy \\(E=mc^2\\) and \\(a+b\\).\n$$x$$\n",
    )
    .unwrap();

    let output = bin(&config)
        .args(["notes.md", "--regex-only"])
        .current_dir(cwd.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let saved = std::fs::read_to_string(cwd.path().join("enhanced_equations.md")).unwrap();
    assert_eq!(saved, "Energy $E=mc^2$ and $a+b$.\n$$x$$\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Saved to"));
}

#[test]
fn cli_regex_only_output_gets_md_extension() {
    let cwd = TempDir::new().expect("temp dir");
    let config = TempDir::new().expect("temp dir");
    std::fs::write(cwd.path().join("in.md"), "\\(x\\)").unwrap();

    let output = bin(&config)
        .args(["in.md", "--regex-only", "-o", "out/result"])
        .current_dir(cwd.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let saved = std::fs::read_to_string(cwd.path().join("out/result.md")).unwrap();
    assert_eq!(saved, "$x$");
}

#[test]
fn cli_stdin_to_stdout() {
    let cwd = TempDir::new().expect("temp dir");
    let config = TempDir::new().expect("temp dir");
    let mut child = bin(&config)
        .args(["-", "--regex-only", "--stdout"])
        .current_dir(cwd.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary not found - run cargo build first");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Sum \\(\\sum_i x_i\\) here")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Sum $\\sum_i x_i$ here"
    );
    assert!(!cwd.path().join("enhanced_equations.md").exists());
}

#[test]
fn cli_empty_input_warns_and_fails() {
    let cwd = TempDir::new().expect("temp dir");
    let config = TempDir::new().expect("temp dir");
    std::fs::write(cwd.path().join("blank.md"), "  \n\n").unwrap();

    let output = bin(&config)
        .args(["blank.md", "--regex-only"])
        .current_dir(cwd.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Please enter some text to convert")
    );
}

#[test]
fn cli_batch_regex_only_writes_sibling_files() {
    let root = TempDir::new().expect("temp dir");
    let config = TempDir::new().expect("temp dir");
    std::fs::create_dir_all(root.path().join("sub")).unwrap();
    std::fs::write(root.path().join("a.md"), "\\(a\\)").unwrap();
    std::fs::write(root.path().join("sub/b.md"), "\\(b\\)").unwrap();

    let output = bin(&config)
        .arg("batch")
        .arg(root.path())
        .args(["--regex-only", "-q"])
        .current_dir(root.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        std::fs::read_to_string(root.path().join("a.enhanced.md")).unwrap(),
        "$a$"
    );
    assert_eq!(
        std::fs::read_to_string(root.path().join("sub/b.enhanced.md")).unwrap(),
        "$b$"
    );
}

#[test]
fn cli_config_runs_without_api_key() {
    let cwd = TempDir::new().expect("temp dir");
    let config = TempDir::new().expect("temp dir");
    let output = bin(&config)
        .arg("config")
        .current_dir(cwd.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gemini-2.0-flash"), "stdout: {}", stdout);
}
