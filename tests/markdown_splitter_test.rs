//! Integration tests for the Markdown splitter.
//!
//! Verifies CommonMark-aware boundary selection across the sizer
//! families, plus the same structural invariants the text splitter
//! upholds.

use textshard::{ChunkCapacity, ChunkConfig, MarkdownSplitter};

fn splitter(capacity: impl Into<ChunkCapacity>) -> MarkdownSplitter<textshard::Characters> {
    MarkdownSplitter::new(ChunkConfig::new(capacity).with_trim(false))
}

#[test]
fn test_chunks() {
    let splitter = splitter(4);
    let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
    assert_eq!(chunks, vec!["123\n", "\n123"]);
}

#[test]
fn test_chunks_range() {
    let splitter = splitter(ChunkCapacity::range(3, 4).unwrap());
    let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
    assert_eq!(chunks, vec!["123\n", "\n123"]);
}

#[test]
fn test_chunks_trim() {
    let splitter = MarkdownSplitter::new(ChunkConfig::new(4));
    let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
    assert_eq!(chunks, vec!["123", "123"]);
}

#[test]
fn test_chunk_indices() {
    let splitter = MarkdownSplitter::new(ChunkConfig::new(4));
    let indices: Vec<_> = splitter.chunk_indices("123\n\n123").collect();
    assert_eq!(indices, vec![(0, "123"), (5, "123")]);
}

#[test]
fn test_custom_callback_sizer() {
    let config = ChunkConfig::new(3).with_sizer(|text: &str| text.chars().count());
    let splitter = MarkdownSplitter::new(config);
    let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
    assert_eq!(chunks, vec!["123", "123"]);
}

#[test]
fn test_headings_bind_to_their_sections() {
    let doc = "# One\n\nBody of the first section.\n\n# Two\n\nBody of the second section.";
    let splitter = MarkdownSplitter::new(ChunkConfig::new(ChunkCapacity::range(0, 40).unwrap()));
    let chunks: Vec<_> = splitter.chunks(doc).collect();
    assert_eq!(
        chunks,
        vec![
            "# One\n\nBody of the first section.",
            "# Two\n\nBody of the second section.",
        ]
    );
}

#[test]
fn test_h1_splits_before_h2() {
    let doc = "# Top\n\n## Sub A\n\ntext a\n\n# Next\n\n## Sub B\n\ntext b";
    let splitter = MarkdownSplitter::new(ChunkConfig::new(ChunkCapacity::range(0, 30).unwrap()));
    let chunks: Vec<_> = splitter.chunks(doc).collect();
    // The split lands on the H1, keeping each H2 with its parent
    assert!(chunks[0].contains("## Sub A"));
    assert!(chunks[1].starts_with("# Next"));
}

#[test]
fn test_list_items_split_individually() {
    let doc = "- first item in the list\n- second item in the list\n- third item in the list\n";
    let splitter = MarkdownSplitter::new(ChunkConfig::new(ChunkCapacity::range(0, 25).unwrap()));
    let chunks: Vec<_> = splitter.chunks(doc).collect();
    assert!(chunks.len() >= 3, "expected one chunk per item: {chunks:?}");
    assert!(chunks[0].contains("first item"));
    assert!(chunks[1].contains("second item"));
}

#[test]
fn test_fenced_code_block_stays_whole() {
    let doc = "Before.\n\n```\nfn main() {\n    body();\n}\n```\n\nAfter.";
    let splitter = MarkdownSplitter::new(ChunkConfig::new(ChunkCapacity::range(0, 40).unwrap()));
    let chunks: Vec<_> = splitter.chunks(doc).collect();
    assert!(
        chunks
            .iter()
            .any(|c| c.contains("fn main() {\n    body();\n}")),
        "fence split apart: {chunks:?}"
    );
}

#[test]
fn test_coverage_reconstructs_input() {
    let doc = "# Title\n\nA paragraph with some length to it.\n\n- item one\n- item two\n\n\
        ```\ncode();\n```\n\n> a quote\n\nFinal words.";
    for capacity in [1, 4, 12, 64, 500] {
        let splitter = splitter(capacity);
        let reconstructed: String = splitter.chunks(doc).collect();
        assert_eq!(reconstructed, doc, "capacity {capacity}");
    }
}

#[test]
fn test_offsets_address_the_input() {
    let doc = "## Heading\n\nSome **bold** text and a [link](https://example.com).\n\n1. one\n2. two\n";
    for capacity in [3, 10, 30] {
        let splitter = MarkdownSplitter::new(ChunkConfig::new(capacity));
        for (offset, chunk) in splitter.chunk_indices(doc) {
            assert_eq!(&doc[offset..offset + chunk.len()], chunk, "capacity {capacity}");
        }
    }
}

#[cfg(feature = "tokenizers")]
mod huggingface {
    use super::*;
    use textshard::HuggingFaceSizer;

    /// Whitespace word-level tokenizer: counts whitespace-separated words.
    const WORD_LEVEL_JSON: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": { "[UNK]": 0, "123": 1 },
            "unk_token": "[UNK]"
        }
    }"#;

    fn sizer() -> HuggingFaceSizer {
        HuggingFaceSizer::from_json(WORD_LEVEL_JSON).unwrap()
    }

    #[test]
    fn test_tokenizer_sizer() {
        let config = ChunkConfig::new(1).with_trim(false).with_sizer(sizer());
        let splitter = MarkdownSplitter::new(config);
        let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
        assert_eq!(chunks, vec!["123\n", "\n123"]);
    }

    #[test]
    fn test_tokenizer_sizer_range() {
        let capacity = ChunkCapacity::range(1, 2).unwrap();
        let config = ChunkConfig::new(capacity).with_trim(false).with_sizer(sizer());
        let splitter = MarkdownSplitter::new(config);
        let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
        assert_eq!(chunks, vec!["123\n", "\n123"]);
    }

    #[test]
    fn test_tokenizer_sizer_trim() {
        let config = ChunkConfig::new(1).with_sizer(sizer());
        let splitter = MarkdownSplitter::new(config);
        let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
        assert_eq!(chunks, vec!["123", "123"]);
    }
}

#[cfg(feature = "tiktoken")]
mod tiktoken {
    use super::*;
    use textshard::TiktokenSizer;

    #[test]
    fn test_model_sizer() {
        let sizer = TiktokenSizer::from_model("gpt-3.5-turbo").unwrap();
        let config = ChunkConfig::new(2).with_trim(false).with_sizer(sizer);
        let splitter = MarkdownSplitter::new(config);
        let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
        assert_eq!(chunks, vec!["123\n", "\n123"]);
    }

    #[test]
    fn test_model_sizer_trim() {
        let sizer = TiktokenSizer::from_model("gpt-3.5-turbo").unwrap();
        let splitter = MarkdownSplitter::new(ChunkConfig::new(1).with_sizer(sizer));
        let chunks: Vec<_> = splitter.chunks("123\n\n123").collect();
        assert_eq!(chunks, vec!["123", "123"]);
    }
}
