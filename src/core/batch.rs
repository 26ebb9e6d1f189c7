//! Batch mode: find Markdown files under a directory and decide where each result goes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

use crate::core::document::with_md_extension;

/// Default pattern for `batch`.
pub const DEFAULT_PATTERN: &str = "**/*.md";

/// Suffix of outputs written next to their input (`notes.md` -> `notes.enhanced.md`,
/// `notes.markdown` -> `notes.markdown.enhanced.md`).
pub const OUTPUT_SUFFIX: &str = ".enhanced.md";

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Invalid glob pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} and {} would both be written to {}", .first.display(), .second.display(), .output.display())]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },
}

/// Where converted files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// `<stem>.enhanced.md` next to the input.
    Sibling,
    /// Same relative path under another directory.
    Mirror(PathBuf),
    /// Overwrite the input.
    InPlace,
}

/// Files under `root` whose path relative to `root` matches `pattern`, sorted.
/// Previous outputs are skipped so reruns do not chain: `*.enhanced.md`
/// siblings, and everything under a mirror directory placed inside `root`.
pub fn collect_inputs(
    root: &Path,
    pattern: &str,
    mode: &OutputMode,
) -> Result<Vec<PathBuf>, BatchError> {
    if !root.is_dir() {
        return Err(BatchError::NotADirectory(root.to_path_buf()));
    }
    let matcher = compile(pattern)?;
    let skip_dir = match mode {
        OutputMode::Mirror(out_dir) => nested_dir(root, out_dir),
        _ => None,
    };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            let under_skip = skip_dir.as_deref().is_some_and(|skip| {
                e.path()
                    .strip_prefix(root)
                    .is_ok_and(|rel| rel.starts_with(skip))
            });
            !under_skip
        })
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.strip_prefix(root)
                .map(|rel| matcher.is_match(rel))
                .unwrap_or(false)
        })
        .filter(|p| !is_previous_output(p))
        .collect();
    files.sort();
    Ok(files)
}

/// `*` stays within one path component; `**` crosses directories.
fn compile(pattern: &str) -> Result<GlobMatcher, BatchError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|source| BatchError::Glob {
            pattern: pattern.to_string(),
            source,
        })
}

/// `dir` relative to `root` when it is a strict subdirectory of it.
/// A directory that does not exist yet holds nothing to skip.
fn nested_dir(root: &Path, dir: &Path) -> Option<PathBuf> {
    let root = fs::canonicalize(root).ok()?;
    let dir = fs::canonicalize(dir).ok()?;
    dir.strip_prefix(&root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn is_previous_output(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(OUTPUT_SUFFIX))
}

/// Destination for `input` (found under `root`) in the given mode.
pub fn output_path(root: &Path, input: &Path, mode: &OutputMode) -> PathBuf {
    match mode {
        OutputMode::InPlace => input.to_path_buf(),
        OutputMode::Mirror(out_dir) => {
            let rel = input.strip_prefix(root).unwrap_or(input);
            out_dir.join(rel)
        }
        OutputMode::Sibling => {
            let is_md = input
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("md"));
            let base = if is_md {
                input.file_stem()
            } else {
                input.file_name()
            };
            let base = base
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            input.with_file_name(format!("{}{}", base, OUTPUT_SUFFIX))
        }
    }
}

/// Pair every input with the file it will be saved to. Two inputs landing on
/// the same output is an error, reported before anything is written.
pub fn plan_outputs(
    root: &Path,
    files: &[PathBuf],
    mode: &OutputMode,
) -> Result<Vec<(PathBuf, PathBuf)>, BatchError> {
    let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::new();
    let mut plan = Vec::with_capacity(files.len());
    for file in files {
        let output = with_md_extension(&output_path(root, file, mode));
        if let Some(first) = seen.insert(output.clone(), file) {
            return Err(BatchError::OutputCollision {
                first: first.clone(),
                second: file.clone(),
                output,
            });
        }
        plan.push((file.clone(), output));
    }
    Ok(plan)
}
