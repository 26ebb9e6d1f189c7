//! Conversion pipeline: split, ask the model per chunk, regex safety net, join.
//!
//! Nothing here returns an error. A chunk whose model call fails (or comes back
//! blank) is converted by the regex rewriter alone, so the caller always gets
//! a best-effort document plus a per-chunk report of what happened.


use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::core::chunk::{self, ChunkStrategy, DEFAULT_CHUNK_SIZE};
use crate::core::llm::{ChatModel, EquationModel, INSTRUCTION};
use crate::core::rewrite::{count_inline_pairs, rewrite_delimiters};

/// How the input is split before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub chunk_size: usize,
    pub strategy: ChunkStrategy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            strategy: ChunkStrategy::Fixed,
        }
    }
}

/// Where a chunk's output text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkSource {
    /// Model reply, then the regex pass.
    Model,
    /// The model call failed or was blank; regex pass over the original chunk.
    Fallback { reason: String },
    /// No model involved (offline mode or whitespace-only chunk).
    RegexOnly,
    /// Conversion was cancelled before this chunk; regex pass only.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    /// Length of the input chunk in characters.
    pub chars: usize,
    /// `\(...\)` pairs still present after the model step, converted by the regex pass.
    pub regex_pairs: usize,
    pub source: ChunkSource,
}

/// Result of converting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    pub chunks: Vec<ChunkReport>,
}

impl Conversion {
    fn push(&mut self, chunk: ConvertedChunk) {
        self.text.push_str(&chunk.text);
        self.chunks.push(chunk.report);
    }

    /// Number of chunks that fell back to regex-only after a failed model call.
    pub fn fallback_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| matches!(c.source, ChunkSource::Fallback { .. }))
            .count()
    }

    /// Number of chunks skipped because the conversion was cancelled.
    pub fn skipped_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.source == ChunkSource::Skipped)
            .count()
    }

    /// One-line human summary, e.g. "3 chunks, 1 regex fallback".
    pub fn summary(&self) -> String {
        let total = self.chunks.len();
        let mut parts = vec![format!(
            "{} chunk{}",
            total,
            if total == 1 { "" } else { "s" }
        )];
        let fallbacks = self.fallback_count();
        if fallbacks > 0 {
            parts.push(format!(
                "{} regex fallback{}",
                fallbacks,
                if fallbacks == 1 { "" } else { "s" }
            ));
        }
        let skipped = self.skipped_count();
        if skipped > 0 {
            parts.push(format!("{} skipped", skipped));
        }
        parts.join(", ")
    }
}

/// Progress reporting and cancellation for a conversion.
#[derive(Default, Clone, Copy)]
pub struct ConvertCallbacks<'a> {
    pub on_progress: Option<&'a (dyn Fn(&str) + Send + Sync)>,
    pub cancel_token: Option<&'a CancellationToken>,
}

/// One converted chunk and its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedChunk {
    pub text: String,
    pub report: ChunkReport,
}

impl ConvertedChunk {
    /// Run the regex pass over `pre_regex` (model reply or original chunk).
    fn finish(input: &str, pre_regex: &str, source: ChunkSource) -> Self {
        Self {
            text: rewrite_delimiters(pre_regex),
            report: ChunkReport {
                chars: input.chars().count(),
                regex_pairs: count_inline_pairs(pre_regex),
                source,
            },
        }
    }
}

/// Convert a single chunk through the model, with the regex rewriter as safety net.
///
/// A failed or blank reply falls back to the original chunk; whitespace-only
/// chunks skip the model call.
pub async fn convert_chunk<M: EquationModel>(model: &M, chunk: &str) -> ConvertedChunk {
    if chunk.trim().is_empty() {
        return ConvertedChunk::finish(chunk, chunk, ChunkSource::RegexOnly);
    }
    match model.convert(INSTRUCTION, chunk).await {
        Ok(reply) if !reply.trim().is_empty() => {
            ConvertedChunk::finish(chunk, &tidy_reply(chunk, &reply), ChunkSource::Model)
        }
        Ok(_) => {
            warn!("Model returned an empty reply; using regex fallback for this chunk");
            let reason = "empty response".to_string();
            ConvertedChunk::finish(chunk, chunk, ChunkSource::Fallback { reason })
        }
        Err(e) => {
            warn!("Model call failed ({}); using regex fallback for this chunk", e);
            let reason = e.to_string();
            ConvertedChunk::finish(chunk, chunk, ChunkSource::Fallback { reason })
        }
    }
}

/// Split `text`, convert each chunk in order through `model`, and join the results.
pub async fn process_large_text<M: EquationModel>(
    model: &M,
    text: &str,
    options: &ConvertOptions,
    callbacks: ConvertCallbacks<'_>,
) -> Conversion {
    let chunks = chunk::split(text, options.chunk_size, options.strategy);
    let total = chunks.len();
    let mut conversion = Conversion {
        text: String::with_capacity(text.len()),
        chunks: Vec::with_capacity(total),
    };

    for (i, piece) in chunks.into_iter().enumerate() {
        let token = callbacks.cancel_token;
        if token.is_some_and(|t| t.is_cancelled()) {
            conversion.push(ConvertedChunk::finish(piece, piece, ChunkSource::Skipped));
            continue;
        }
        if let Some(progress) = callbacks.on_progress {
            progress(&format!("Converting chunk {}/{}", i + 1, total));
        }

        let converted = if let Some(token) = token {
            tokio::select! {
                biased;
                _ = token.cancelled() => ConvertedChunk::finish(piece, piece, ChunkSource::Skipped),
                converted = convert_chunk(model, piece) => converted,
            }
        } else {
            convert_chunk(model, piece).await
        };
        conversion.push(converted);
    }

    info!("Converted document: {}", conversion.summary());
    conversion
}

/// Regex-only conversion of the whole document (no model, no splitting).
pub fn regex_only(text: &str) -> Conversion {
    let mut conversion = Conversion::default();
    if !text.is_empty() {
        conversion.push(ConvertedChunk::finish(text, text, ChunkSource::RegexOnly));
    }
    conversion
}

/// Restore the chunk's own surrounding whitespace around the trimmed reply and
/// drop a code fence the model wrapped the whole reply in.
fn tidy_reply(chunk: &str, reply: &str) -> String {
    let body = strip_code_fence(chunk, reply.trim());
    let lead = &chunk[..chunk.len() - chunk.trim_start().len()];
    let trail = &chunk[chunk.trim_end().len()..];
    format!("{}{}{}", lead, body, trail)
}

fn strip_code_fence<'a>(chunk: &str, reply: &'a str) -> &'a str {
    if chunk.trim_start().starts_with("```") {
        return reply;
    }
    let Some(inner) = reply
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return reply;
    };
    match inner.split_once('\n') {
        Some((_lang, body)) => body.trim(),
        None => reply,
    }
}

/// What performs the conversion: a hosted model, or the regex rewriter alone.
#[derive(Debug, Clone)]
pub enum Engine {
    Model(ChatModel),
    RegexOnly,
}

impl Engine {
    /// Short label for status lines ("gemini-2.0-flash", "regex only").
    pub fn label(&self) -> &str {
        match self {
            Engine::Model(model) => model.model_id(),
            Engine::RegexOnly => "regex only",
        }
    }

    pub async fn convert(
        &self,
        text: &str,
        options: &ConvertOptions,
        callbacks: ConvertCallbacks<'_>,
    ) -> Conversion {
        match self {
            Engine::Model(model) => process_large_text(model, text, options, callbacks).await,
            Engine::RegexOnly => regex_only(text),
        }
    }
}
