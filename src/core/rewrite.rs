//! Delimiter rewriter: `\( ... \)` to `$ ... $`.
//!
//! The match is non-greedy and line-bound: the first `\)` after a `\(` on the
//! same line closes the pair. Nested or unbalanced delimiters are not balanced
//! out; they produce whatever the leftmost-shortest match gives.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn inline_pair() -> &'static Regex {
    static INLINE_PAIR: OnceLock<Regex> = OnceLock::new();
    INLINE_PAIR.get_or_init(|| Regex::new(r"\\\((.*?)\\\)").expect("inline pair pattern is valid"))
}

/// Replace every `\(content\)` with `$content$`, leaving everything else as is.
pub fn rewrite_delimiters(text: &str) -> String {
    inline_pair()
        .replace_all(text, |caps: &Captures| format!("${}$", &caps[1]))
        .into_owned()
}

/// Number of pairs `rewrite_delimiters` would convert.
pub fn count_inline_pairs(text: &str) -> usize {
    inline_pair().find_iter(text).count()
}
