//! Reading input documents and saving converted Markdown.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// File name used when the user does not pick one.
pub const DEFAULT_FILE_NAME: &str = "enhanced_equations.md";

/// Media type of the saved document.
pub const MIME_TYPE: &str = "text/markdown";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter some text to convert")]
    Empty,
}

/// Reject blank input before any conversion work. The text is returned untouched.
pub fn validate_input(text: &str) -> Result<&str, InputError> {
    if text.trim().is_empty() {
        Err(InputError::Empty)
    } else {
        Ok(text)
    }
}

/// Read a document from a path, or from stdin when the source is `-`.
pub fn read_input(source: &Path) -> io::Result<String> {
    if source.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(source).map_err(|e| io::Error::new(e.kind(), format!("{}: {}", source.display(), e)))
}

/// Give the path a Markdown extension: kept when already `.md`/`.markdown`,
/// added otherwise (`notes` -> `notes.md`, `notes.txt` -> `notes.txt.md`).
pub fn with_md_extension(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") => {
            path.to_path_buf()
        }
        Some(ext) => path.with_extension(format!("{}.md", ext)),
        None => path.with_extension("md"),
    }
}

/// Write the converted document, creating parent directories. Returns the final path.
pub fn save(path: &Path, text: &str) -> io::Result<PathBuf> {
    let path = with_md_extension(path);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, text)?;
    log::info!("Saved {} ({} bytes, {})", path.display(), text.len(), MIME_TYPE);
    Ok(path)
}
