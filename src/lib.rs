// Copyright (c) 2025-2026 the textshard contributors
// SPDX-License-Identifier: Apache-2.0

//! # textshard
//!
//! textshard partitions text into the largest possible contiguous chunks
//! whose measured size stays within a capacity range, splitting along the
//! most meaningful boundary available: paragraph breaks before line
//! breaks, line breaks before sentences, sentences before words, words
//! before grapheme clusters, grapheme clusters before raw scalar values.
//! Markdown documents additionally split along CommonMark block
//! structure, and source code along syntax-tree nodes.
//!
//! Chunk size is whatever you need it to be: Unicode scalar values by
//! default, BPE tokens via [`TiktokenSizer`], Hugging Face tokenizer
//! tokens via [`HuggingFaceSizer`], or any `Fn(&str) -> usize` callback.
//!
//! ## Architecture
//!
//! One generic engine drives every flavor. A flavor contributes a ranked
//! table of structural boundaries; the engine selects the coarsest level
//! whose next section fits the maximum capacity, then binary searches the
//! cumulative sizes of the sections at that level for the chunk to emit.
//! Sizes are always measured on the concatenated slice because
//! tokenizers are not additive.
//!
//! Chunks borrow from the input and are reported with their byte offset,
//! so with trimming disabled and no overlap, concatenating the chunks
//! reproduces the input byte-for-byte.
//!
//! ## Example
//!
//! ```
//! use textshard::{ChunkConfig, TextSplitter};
//!
//! let splitter = TextSplitter::new(ChunkConfig::new(20));
//! let text = "The first sentence. The second sentence, which is longer.";
//!
//! for (offset, chunk) in splitter.chunk_indices(text) {
//!     assert_eq!(&text[offset..offset + chunk.len()], chunk);
//! }
//! ```

pub mod capacity;
pub mod error;
pub mod sizer;
pub mod splitter;

pub use capacity::{ChunkCapacity, Fit};
pub use error::SplitError;
#[cfg(feature = "tokenizers")]
pub use sizer::HuggingFaceSizer;
#[cfg(feature = "tiktoken")]
pub use sizer::TiktokenSizer;
pub use sizer::{Characters, Sizer};
#[cfg(feature = "code")]
pub use splitter::code::CodeSplitter;
pub use splitter::markdown::MarkdownSplitter;
pub use splitter::text::TextSplitter;
pub use splitter::ChunkConfig;
