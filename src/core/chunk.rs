//! Splitting long documents into slices for one model call each.
//!
//! Sizes are counted in characters (Unicode scalar values); a slice never cuts
//! through a UTF-8 sequence. Slices are borrowed from the input and concatenate
//! back to it exactly.

/// Default slice length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 3000;

/// How a document is cut into slices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkStrategy {
    /// Every `size` characters, wherever that lands. A pair straddling a
    /// boundary is not recognised by either slice.
    #[default]
    Fixed,
    /// Whole lines packed up to `size` characters. Only a single line longer
    /// than `size` is cut mid-line.
    Lines,
}

/// Split `text` with the given strategy.
pub fn split(text: &str, size: usize, strategy: ChunkStrategy) -> Vec<&str> {
    match strategy {
        ChunkStrategy::Fixed => split_fixed(text, size),
        ChunkStrategy::Lines => split_lines(text, size),
    }
}

/// Consecutive slices of exactly `size` characters; the last may be shorter.
/// A size of 0 is treated as 1.
pub fn split_fixed(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Pack whole lines (terminators included) into slices of at most `size`
/// characters. A line longer than `size` gets slices of its own via
/// [`split_fixed`].
pub fn split_lines(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut end = 0;
    let mut count = 0;
    for line in text.split_inclusive('\n') {
        let len = line.chars().count();
        if count > 0 && count + len > size {
            chunks.push(&text[start..end]);
            start = end;
            count = 0;
        }
        if len > size {
            chunks.extend(split_fixed(line, size));
            end += line.len();
            start = end;
            continue;
        }
        end += line.len();
        count += len;
    }
    if start < end {
        chunks.push(&text[start..end]);
    }
    chunks
}
