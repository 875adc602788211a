// Copyright (c) 2025-2026 the textshard contributors
// SPDX-License-Identifier: Apache-2.0

//! The generic chunking engine shared by all splitter flavors.
//!
//! A splitter flavor contributes a *boundary table*: byte offsets where
//! the document's structure allows a split, each with a coarseness rank
//! (higher = coarser). Below the ranked structure the engine always has
//! the Unicode fallback ladder: sentence, word, grapheme cluster, and
//! finally individual scalar values.
//!
//! For each chunk the engine selects the coarsest level whose first
//! section still fits the maximum capacity, then binary searches the
//! cumulative sizes of the sections at that level for the span to emit.
//! Cumulative sizes are measured on the concatenated slice, never summed
//! per section, because tokenizers are not additive.

use std::collections::{BTreeSet, HashMap};

use once_cell::unsync::OnceCell;
use unicode_segmentation::UnicodeSegmentation;

use crate::capacity::{ChunkCapacity, Fit};
use crate::error::SplitError;
use crate::sizer::{Characters, Sizer};

#[cfg(feature = "code")]
pub mod code;
pub mod markdown;
pub mod text;

/// Configuration shared by every splitter flavor.
///
/// Holds the desired capacity range, the overlap budget, the trimming
/// flag, and the sizer used to measure candidate chunks.
pub struct ChunkConfig<S = Characters> {
    capacity: ChunkCapacity,
    overlap: usize,
    trim: bool,
    sizer: S,
}

impl ChunkConfig<Characters> {
    /// Create a configuration with the given capacity, counting Unicode
    /// scalar values, trimming chunk edges, and no overlap.
    pub fn new(capacity: impl Into<ChunkCapacity>) -> Self {
        Self {
            capacity: capacity.into(),
            overlap: 0,
            trim: true,
            sizer: Characters,
        }
    }
}

impl<S: Sizer> ChunkConfig<S> {
    /// Replace the sizer, keeping every other setting.
    pub fn with_sizer<S2: Sizer>(self, sizer: S2) -> ChunkConfig<S2> {
        ChunkConfig {
            capacity: self.capacity,
            overlap: self.overlap,
            trim: self.trim,
            sizer,
        }
    }

    /// Set how much of the previous chunk may be repeated at the start of
    /// the next one, measured by the sizer.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidOverlap`] if a non-zero overlap is not
    /// smaller than the minimum chunk capacity.
    pub fn with_overlap(mut self, overlap: usize) -> Result<Self, SplitError> {
        if overlap != 0 && overlap >= self.capacity.min() {
            return Err(SplitError::InvalidOverlap {
                overlap,
                min: self.capacity.min(),
            });
        }
        self.overlap = overlap;
        Ok(self)
    }

    /// Enable or disable stripping whitespace from chunk edges.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// The configured capacity range.
    pub fn capacity(&self) -> ChunkCapacity {
        self.capacity
    }

    /// The configured overlap budget.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Whether chunk edges are trimmed.
    pub fn trim(&self) -> bool {
        self.trim
    }

    /// The configured sizer.
    pub fn sizer(&self) -> &S {
        &self.sizer
    }
}

/// A byte offset where the document structure permits a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Boundary {
    pub offset: usize,
    /// Coarseness of the surrounding structure; higher is coarser.
    pub rank: u32,
}

/// Sort a boundary table, drop the document edges, and collapse
/// boundaries sharing an offset to the coarsest rank.
pub(crate) fn normalize_boundaries(mut boundaries: Vec<Boundary>, len: usize) -> Vec<Boundary> {
    boundaries.retain(|b| b.offset > 0 && b.offset < len);
    boundaries.sort_unstable_by_key(|b| (b.offset, std::cmp::Reverse(b.rank)));
    boundaries.dedup_by_key(|b| b.offset);
    boundaries
}

/// A rung of the boundary ladder, finest first so that the derived
/// ordering ranks coarser levels greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SemanticLevel {
    Char,
    Grapheme,
    Word,
    Sentence,
    Structure(u32),
}

/// Cumulative sizes measured from a fixed chunk start, memoized for the
/// duration of one packing pass. Sizers may cross an FFI boundary, so
/// each `(start, end)` slice is measured at most once.
struct SizeMemo<'text, 'sizer, S: Sizer> {
    text: &'text str,
    sizer: &'sizer S,
    start: usize,
    cache: HashMap<usize, usize>,
}

impl<'text, 'sizer, S: Sizer> SizeMemo<'text, 'sizer, S> {
    fn new(text: &'text str, sizer: &'sizer S, start: usize) -> Self {
        Self {
            text,
            sizer,
            start,
            cache: HashMap::new(),
        }
    }

    fn size_to(&mut self, end: usize) -> usize {
        if let Some(&size) = self.cache.get(&end) {
            return size;
        }
        let size = self.sizer.size(&self.text[self.start..end]);
        self.cache.insert(end, size);
        size
    }
}

/// Iterator over `(byte_offset, chunk)` pairs of a document.
pub(crate) struct ChunkIter<'text, 'cfg, S: Sizer> {
    text: &'text str,
    config: &'cfg ChunkConfig<S>,
    /// Structure boundaries from the flavor's ladder, normalized.
    boundaries: Vec<Boundary>,
    /// Unicode fallback levels, computed once per document on first use.
    sentences: OnceCell<Vec<usize>>,
    words: OnceCell<Vec<usize>>,
    graphemes: OnceCell<Vec<usize>>,
    cursor: usize,
}

impl<'text, 'cfg, S: Sizer> ChunkIter<'text, 'cfg, S> {
    pub(crate) fn new(
        text: &'text str,
        config: &'cfg ChunkConfig<S>,
        boundaries: Vec<Boundary>,
    ) -> Self {
        Self {
            text,
            config,
            boundaries,
            sentences: OnceCell::new(),
            words: OnceCell::new(),
            graphemes: OnceCell::new(),
            cursor: 0,
        }
    }

    fn sentence_offsets(&self) -> &[usize] {
        self.sentences.get_or_init(|| {
            self.text
                .split_sentence_bound_indices()
                .map(|(offset, _)| offset)
                .filter(|&offset| offset > 0)
                .collect()
        })
    }

    fn word_offsets(&self) -> &[usize] {
        self.words.get_or_init(|| {
            self.text
                .split_word_bound_indices()
                .map(|(offset, _)| offset)
                .filter(|&offset| offset > 0)
                .collect()
        })
    }

    fn grapheme_offsets(&self) -> &[usize] {
        self.graphemes.get_or_init(|| {
            self.text
                .grapheme_indices(true)
                .map(|(offset, _)| offset)
                .filter(|&offset| offset > 0)
                .collect()
        })
    }

    /// Structure boundaries with offsets in `(start, end)`.
    fn structure_window(&self, start: usize, end: usize) -> &[Boundary] {
        let lo = self.boundaries.partition_point(|b| b.offset <= start);
        let hi = self.boundaries.partition_point(|b| b.offset < end);
        &self.boundaries[lo..hi]
    }

    /// Candidate levels within `(start, end)`, coarsest first.
    fn levels_in(&self, start: usize, end: usize) -> Vec<SemanticLevel> {
        let ranks: BTreeSet<u32> = self
            .structure_window(start, end)
            .iter()
            .map(|b| b.rank)
            .collect();
        let mut levels: Vec<SemanticLevel> = ranks
            .into_iter()
            .rev()
            .map(SemanticLevel::Structure)
            .collect();
        levels.extend([
            SemanticLevel::Sentence,
            SemanticLevel::Word,
            SemanticLevel::Grapheme,
            SemanticLevel::Char,
        ]);
        levels
    }

    /// End of the first section after `start` at the given level, or the
    /// end of the document if the level has no further split point.
    fn first_split_after(&self, level: SemanticLevel, start: usize) -> usize {
        let len = self.text.len();
        let structure_first = |min_rank: u32| {
            self.structure_window(start, len)
                .iter()
                .find(|b| b.rank >= min_rank)
                .map(|b| b.offset)
        };
        let fallback_first = |offsets: &[usize]| {
            let idx = offsets.partition_point(|&offset| offset <= start);
            offsets.get(idx).copied()
        };
        let first = match level {
            SemanticLevel::Structure(rank) => structure_first(rank),
            SemanticLevel::Sentence => min_option(
                fallback_first(self.sentence_offsets()),
                structure_first(0),
            ),
            SemanticLevel::Word => {
                min_option(fallback_first(self.word_offsets()), structure_first(0))
            }
            SemanticLevel::Grapheme => {
                min_option(fallback_first(self.grapheme_offsets()), structure_first(0))
            }
            SemanticLevel::Char => self.text[start..]
                .chars()
                .next()
                .map(|c| start + c.len_utf8()),
        };
        first.unwrap_or(len)
    }

    /// Split points strictly inside `(start, end)` at the given level,
    /// including every coarser boundary, ascending and deduplicated.
    fn split_offsets_in(&self, level: SemanticLevel, start: usize, end: usize) -> Vec<usize> {
        let structure = |min_rank: u32| {
            self.structure_window(start, end)
                .iter()
                .filter(move |b| b.rank >= min_rank)
                .map(|b| b.offset)
        };
        let fallback = |offsets: &[usize]| {
            let lo = offsets.partition_point(|&offset| offset <= start);
            let hi = offsets.partition_point(|&offset| offset < end);
            offsets[lo..hi].to_vec()
        };
        let mut offsets = match level {
            SemanticLevel::Structure(rank) => structure(rank).collect(),
            SemanticLevel::Sentence => {
                let mut v = fallback(self.sentence_offsets());
                v.extend(structure(0));
                v
            }
            SemanticLevel::Word => {
                let mut v = fallback(self.word_offsets());
                v.extend(structure(0));
                v
            }
            SemanticLevel::Grapheme => {
                let mut v = fallback(self.grapheme_offsets());
                v.extend(structure(0));
                v
            }
            SemanticLevel::Char => self.text[start..end]
                .char_indices()
                .map(|(offset, _)| start + offset)
                .filter(|&offset| offset > start)
                .collect(),
        };
        offsets.sort_unstable();
        offsets.dedup();
        offsets
    }

    /// The coarsest level whose first section still fits the maximum
    /// capacity. Falls through to `Char` when nothing fits; the packer
    /// then emits a single scalar value as an overflow chunk.
    fn pick_level(&self, start: usize, memo: &mut SizeMemo<'_, '_, S>) -> SemanticLevel {
        let max = self.config.capacity.max();
        for level in self.levels_in(start, self.text.len()) {
            let first_end = self.first_split_after(level, start);
            if memo.size_to(first_end) <= max {
                tracing::trace!(?level, start, "selected semantic level");
                return level;
            }
        }
        tracing::trace!(start, "no level fits, emitting overflow chunk");
        SemanticLevel::Char
    }

    /// Select the end of the next chunk among the candidate section ends.
    ///
    /// With no minimum, takes the longest prefix fitting the maximum.
    /// Otherwise growth stops at the first prefix reaching the minimum;
    /// if that prefix overshoots the maximum, the longest prefix that
    /// still fits is taken instead, even though it is below minimum.
    fn pack(&self, ends: &[usize], memo: &mut SizeMemo<'_, '_, S>) -> usize {
        let capacity = self.config.capacity;
        debug_assert!(!ends.is_empty());

        if capacity.min() == 0 {
            // No minimum: take the longest prefix that fits the maximum.
            let fitting =
                ends.partition_point(|&end| capacity.fits(memo.size_to(end)) != Fit::Over);
            if fitting == 0 {
                // Even the first section is too big: overflow chunk.
                return ends[0];
            }
            return ends[self.repair_backward(ends, fitting - 1, memo)];
        }

        let reached =
            ends.partition_point(|&end| capacity.fits(memo.size_to(end)) == Fit::Under);
        if reached == ends.len() {
            // The whole window stays below the minimum; take all of it.
            return ends[ends.len() - 1];
        }
        if capacity.fits(memo.size_to(ends[reached])) == Fit::Within {
            return ends[self.extend_ties(ends, reached, memo)];
        }
        // Reaching the minimum overshoots the maximum; fall back to the
        // longest prefix that fits, below minimum though it is.
        if reached == 0 {
            return ends[0];
        }
        let idx = self.repair_backward(ends, reached - 1, memo);
        ends[self.extend_ties(ends, idx, memo)]
    }

    /// Walk back over any ends a non-monotonic sizer left above the
    /// maximum. With a well-behaved sizer this is a no-op.
    fn repair_backward(
        &self,
        ends: &[usize],
        mut idx: usize,
        memo: &mut SizeMemo<'_, '_, S>,
    ) -> usize {
        while idx > 0 && self.config.capacity.fits(memo.size_to(ends[idx])) == Fit::Over {
            idx -= 1;
        }
        idx
    }

    /// Absorb following sections that add nothing to the measured size,
    /// preferring more sections when candidate packings tie. This is what
    /// carries trailing separators a tokenizer counts as zero.
    fn extend_ties(&self, ends: &[usize], mut idx: usize, memo: &mut SizeMemo<'_, '_, S>) -> usize {
        let size = memo.size_to(ends[idx]);
        while idx + 1 < ends.len() && memo.size_to(ends[idx + 1]) == size {
            idx += 1;
        }
        idx
    }

    /// Produce the span of the next chunk starting at the cursor.
    fn next_span(&self) -> (usize, usize) {
        let start = self.cursor;
        let mut memo = SizeMemo::new(self.text, &self.config.sizer, start);
        let level = self.pick_level(start, &mut memo);
        let mut ends = self.split_offsets_in(level, start, self.text.len());
        ends.push(self.text.len());
        let end = self.pack(&ends, &mut memo);
        (start, end)
    }

    /// Where the next chunk starts when overlap is configured: the
    /// coarsest boundary inside the emitted span whose suffix fits the
    /// overlap budget, measured by the sizer.
    fn overlap_start(&self, start: usize, end: usize) -> usize {
        let budget = self.config.overlap;
        let mut suffix_cache: HashMap<usize, usize> = HashMap::new();
        let mut suffix_size = |text: &str, sizer: &S, offset: usize| -> usize {
            *suffix_cache
                .entry(offset)
                .or_insert_with(|| sizer.size(&text[offset..end]))
        };
        for level in self.levels_in(start, end) {
            let offsets = self.split_offsets_in(level, start, end);
            if offsets.is_empty() {
                continue;
            }
            // Suffix sizes shrink as the offset advances; take the
            // earliest offset whose suffix fits the budget.
            let idx = offsets
                .partition_point(|&offset| suffix_size(self.text, &self.config.sizer, offset) > budget);
            if let Some(&offset) = offsets.get(idx) {
                return offset;
            }
        }
        end
    }

    /// Strip Unicode whitespace from both edges, reporting the offset of
    /// the first retained byte. Never widens the span.
    fn trim_span(&self, start: usize, end: usize) -> (usize, &'text str) {
        let slice = &self.text[start..end];
        let leading = slice.len() - slice.trim_start().len();
        (start + leading, slice.trim())
    }
}

impl<'text, S: Sizer> Iterator for ChunkIter<'text, '_, S> {
    type Item = (usize, &'text str);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.text.len() {
            let (start, end) = self.next_span();
            debug_assert!(end > start, "every chunk must consume input");
            self.cursor = if self.config.overlap > 0 && end < self.text.len() {
                self.overlap_start(start, end)
            } else {
                end
            };
            let (offset, chunk) = if self.config.trim {
                self.trim_span(start, end)
            } else {
                (start, &self.text[start..end])
            };
            if chunk.is_empty() {
                continue;
            }
            tracing::trace!(offset, len = chunk.len(), "emitting chunk");
            return Some((offset, chunk));
        }
        None
    }
}

fn min_option(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
