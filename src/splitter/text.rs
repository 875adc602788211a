// Copyright (c) 2025-2026 the textshard contributors
// SPDX-License-Identifier: Apache-2.0

//! Plain-text splitting.
//!
//! Structure boundaries come from line-break runs: a run of `n`
//! consecutive line breaks is coarser than a run of `n - 1`, so triple
//! newlines split before double newlines, which split before single
//! ones. Below line breaks the engine falls back to Unicode sentence,
//! word, grapheme, and scalar-value boundaries.

use std::sync::LazyLock;

use regex::Regex;

use crate::sizer::Sizer;

use super::{Boundary, ChunkConfig, ChunkIter, normalize_boundaries};

/// One or more consecutive line breaks of any style.
static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    // The pattern is a known-valid literal, verified by tests.
    Regex::new(r"(?:\r\n|\r|\n)+").expect("line break pattern is invalid")
});

/// Splits plain text into capacity-bounded chunks.
///
/// # Example
///
/// ```
/// use textshard::{ChunkConfig, TextSplitter};
///
/// let splitter = TextSplitter::new(ChunkConfig::new(10));
/// let chunks: Vec<_> = splitter.chunks("some document\nto split").collect();
/// assert!(!chunks.is_empty());
/// ```
pub struct TextSplitter<S: Sizer> {
    config: ChunkConfig<S>,
}

impl<S: Sizer> TextSplitter<S> {
    /// Create a splitter using the plain-text boundary ladder.
    pub fn new(config: ChunkConfig<S>) -> Self {
        Self { config }
    }

    /// Split `text`, yielding each chunk.
    pub fn chunks<'text>(&self, text: &'text str) -> impl Iterator<Item = &'text str> {
        self.chunk_indices(text).map(|(_, chunk)| chunk)
    }

    /// Split `text`, yielding `(byte_offset, chunk)` pairs.
    pub fn chunk_indices<'text>(
        &self,
        text: &'text str,
    ) -> impl Iterator<Item = (usize, &'text str)> {
        ChunkIter::new(text, &self.config, line_break_boundaries(text, u32::MAX))
    }
}

/// Boundaries at the start and end of every line-break run, ranked by
/// run length (longer runs are coarser), capped at `max_rank`.
pub(crate) fn line_break_boundaries(text: &str, max_rank: u32) -> Vec<Boundary> {
    let mut boundaries = Vec::new();
    for run in LINE_BREAKS.find_iter(text) {
        let rank = line_break_count(run.as_str()).min(max_rank);
        boundaries.push(Boundary {
            offset: run.start(),
            rank,
        });
        boundaries.push(Boundary {
            offset: run.end(),
            rank,
        });
    }
    normalize_boundaries(boundaries, text.len())
}

/// Number of line breaks in a run, counting `\r\n` as one.
fn line_break_count(run: &str) -> u32 {
    let crlf = run.matches("\r\n").count();
    let lf = run.matches('\n').count();
    let cr = run.matches('\r').count();
    u32::try_from(lf + cr - crlf).unwrap_or(u32::MAX)
}
