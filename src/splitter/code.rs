// Copyright (c) 2025-2026 the textshard contributors
// SPDX-License-Identifier: Apache-2.0

//! Syntax-aware splitting over a tree-sitter grammar.
//!
//! Every node of the parsed syntax tree contributes boundaries at its
//! start and end byte. Shallower nodes are coarser: depth 0 is the
//! document itself, so splits prefer top-level items, then their
//! children, and so on. Below the deepest syntax level the ladder
//! continues with line-break runs and the Unicode fallback levels, which
//! handles oversized leaf tokens such as long string literals.

use tree_sitter::{Language, Parser};

use crate::error::SplitError;
use crate::sizer::Sizer;

use super::text::line_break_boundaries;
use super::{Boundary, ChunkConfig, ChunkIter, normalize_boundaries};

/// Syntax ranks start here; line-break runs stay below this value.
const SYNTAX_BASE: u32 = 1000;
/// Line-break runs of any length never outrank syntax boundaries.
const LINE_BREAK_CAP: u32 = SYNTAX_BASE - 1;

/// Splits source code into capacity-bounded chunks along syntax-tree
/// boundaries.
///
/// # Example
///
/// ```
/// use textshard::{ChunkConfig, CodeSplitter};
///
/// let splitter = CodeSplitter::new(
///     tree_sitter_rust::LANGUAGE,
///     ChunkConfig::new(60),
/// )?;
/// let source = "fn a() -> u8 { 1 }\n\nfn b() -> u8 { 2 }\n";
/// let chunks: Vec<_> = splitter.chunks(source).collect();
/// assert!(!chunks.is_empty());
/// # Ok::<(), textshard::SplitError>(())
/// ```
pub struct CodeSplitter<S: Sizer> {
    config: ChunkConfig<S>,
    language: Language,
}

impl<S: Sizer> CodeSplitter<S> {
    /// Create a splitter for the given tree-sitter language.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidLanguage`] if the language handle is
    /// incompatible with the linked tree-sitter runtime.
    pub fn new(language: impl Into<Language>, config: ChunkConfig<S>) -> Result<Self, SplitError> {
        let language = language.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        Ok(Self { config, language })
    }

    /// Split `source`, yielding each chunk.
    pub fn chunks<'text>(&self, source: &'text str) -> impl Iterator<Item = &'text str> {
        self.chunk_indices(source).map(|(_, chunk)| chunk)
    }

    /// Split `source`, yielding `(byte_offset, chunk)` pairs.
    pub fn chunk_indices<'text>(
        &self,
        source: &'text str,
    ) -> impl Iterator<Item = (usize, &'text str)> {
        ChunkIter::new(source, &self.config, self.boundaries(source))
    }

    /// Boundary table: syntax-node edges ranked by inverted depth, plus
    /// line-break runs underneath the whole syntax ladder.
    fn boundaries(&self, source: &str) -> Vec<Boundary> {
        let mut boundaries = line_break_boundaries(source, LINE_BREAK_CAP);

        let mut parser = Parser::new();
        let tree = parser
            .set_language(&self.language)
            .ok()
            .and_then(|()| parser.parse(source, None));
        let Some(tree) = tree else {
            // The language was validated at construction, so this only
            // happens under pathological conditions (e.g. cancellation).
            tracing::warn!("no syntax tree produced, splitting on text boundaries only");
            return boundaries;
        };

        let nodes = collect_nodes(&tree);
        let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        for node in nodes {
            let rank = SYNTAX_BASE + (max_depth - node.depth);
            boundaries.push(Boundary {
                offset: node.start,
                rank,
            });
            boundaries.push(Boundary {
                offset: node.end,
                rank,
            });
        }
        normalize_boundaries(boundaries, source.len())
    }
}

struct NodeSpan {
    start: usize,
    end: usize,
    depth: u32,
}

/// Walk the whole tree depth-first, recording every node's byte span.
fn collect_nodes(tree: &tree_sitter::Tree) -> Vec<NodeSpan> {
    let mut nodes = Vec::new();
    let mut cursor = tree.walk();
    let mut depth = 0u32;
    loop {
        let node = cursor.node();
        nodes.push(NodeSpan {
            start: node.start_byte(),
            end: node.end_byte(),
            depth,
        });
        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return nodes;
            }
            depth -= 1;
        }
    }
}
