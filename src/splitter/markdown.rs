// Copyright (c) 2025-2026 the textshard contributors
// SPDX-License-Identifier: Apache-2.0

//! CommonMark-aware splitting.
//!
//! The document is parsed with `pulldown-cmark`'s offset iterator; each
//! block-level event contributes boundaries ranked by how coarse the
//! block is: headings (H1 coarsest) above thematic breaks, code fences
//! and HTML blocks, above list items and block quotes, above paragraphs,
//! above soft and hard line breaks. Below the block structure the
//! Unicode fallback ladder applies.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::sizer::Sizer;

use super::{Boundary, ChunkConfig, ChunkIter, normalize_boundaries};

// Heading ranks occupy 41..=46 so every other block stays below them.
const RANK_BLOCK: u32 = 35;
const RANK_ITEM: u32 = 25;
const RANK_FLOW: u32 = 10;
const RANK_LINE: u32 = 5;

/// Splits CommonMark Markdown into capacity-bounded chunks.
///
/// # Example
///
/// ```
/// use textshard::{ChunkConfig, MarkdownSplitter};
///
/// let splitter = MarkdownSplitter::new(ChunkConfig::new(40));
/// let doc = "# Title\n\nFirst paragraph.\n\n## Section\n\nSecond paragraph.";
/// let chunks: Vec<_> = splitter.chunks(doc).collect();
/// assert!(chunks.len() >= 2);
/// ```
pub struct MarkdownSplitter<S: Sizer> {
    config: ChunkConfig<S>,
}

impl<S: Sizer> MarkdownSplitter<S> {
    /// Create a splitter using the CommonMark boundary ladder.
    pub fn new(config: ChunkConfig<S>) -> Self {
        Self { config }
    }

    /// Split `markdown`, yielding each chunk.
    pub fn chunks<'text>(&self, markdown: &'text str) -> impl Iterator<Item = &'text str> {
        self.chunk_indices(markdown).map(|(_, chunk)| chunk)
    }

    /// Split `markdown`, yielding `(byte_offset, chunk)` pairs.
    pub fn chunk_indices<'text>(
        &self,
        markdown: &'text str,
    ) -> impl Iterator<Item = (usize, &'text str)> {
        ChunkIter::new(markdown, &self.config, markdown_boundaries(markdown))
    }
}

/// Boundaries derived from ranked CommonMark events.
///
/// Placement differs by block kind: a heading boundary sits at the
/// heading's start so the heading stays glued to the content it titles;
/// paragraphs and line breaks contribute their end, so a paragraph keeps
/// its trailing line ending and any blank-line gap opens the following
/// section; self-contained blocks (thematic breaks, fences, HTML blocks,
/// list items, block quotes) contribute both edges and form their own
/// sections.
fn markdown_boundaries(markdown: &str) -> Vec<Boundary> {
    let mut boundaries = Vec::new();
    let mut push = |offset: usize, rank: u32| boundaries.push(Boundary { offset, rank });
    for (event, range) in Parser::new_ext(markdown, Options::empty()).into_offset_iter() {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => push(range.start, heading_rank(*level)),
            Event::Start(Tag::CodeBlock(_) | Tag::HtmlBlock) => {
                push(range.start, RANK_BLOCK);
                push(range.end, RANK_BLOCK);
            }
            Event::Start(
                Tag::List(_) | Tag::Item | Tag::BlockQuote(_) | Tag::FootnoteDefinition(_),
            ) => {
                push(range.start, RANK_ITEM);
                push(range.end, RANK_ITEM);
            }
            Event::End(TagEnd::Paragraph) => push(range.end, RANK_FLOW),
            Event::Rule => {
                push(range.start, RANK_BLOCK);
                push(range.end, RANK_BLOCK);
            }
            Event::SoftBreak | Event::HardBreak => push(range.end, RANK_LINE),
            _ => {}
        }
    }
    normalize_boundaries(boundaries, markdown.len())
}

fn heading_rank(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 46,
        HeadingLevel::H2 => 45,
        HeadingLevel::H3 => 44,
        HeadingLevel::H4 => 43,
        HeadingLevel::H5 => 42,
        HeadingLevel::H6 => 41,
    }
}
