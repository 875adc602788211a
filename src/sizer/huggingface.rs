// Copyright (c) 2025-2026 the textshard contributors
// SPDX-License-Identifier: Apache-2.0

//! Sizer backed by Hugging Face tokenizers.

use std::path::Path;

use tokenizers::Tokenizer;

use crate::error::SplitError;

use super::Sizer;

/// Sizer that counts tokens produced by a Hugging Face tokenizer.
///
/// Special tokens are not added, so the count reflects only the content
/// of the measured slice.
pub struct HuggingFaceSizer {
    tokenizer: Tokenizer,
}

impl HuggingFaceSizer {
    /// Wrap an already-constructed tokenizer.
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Load a tokenizer from its serialized JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::TokenizerLoad`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, SplitError> {
        let tokenizer = Tokenizer::from_bytes(json.as_bytes())
            .map_err(|e| SplitError::TokenizerLoad(e.to_string()))?;
        Ok(Self { tokenizer })
    }

    /// Load a tokenizer from a `tokenizer.json` file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::TokenizerLoad`] if the file cannot be read or
    /// does not contain a valid tokenizer configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SplitError> {
        let tokenizer =
            Tokenizer::from_file(path).map_err(|e| SplitError::TokenizerLoad(e.to_string()))?;
        Ok(Self { tokenizer })
    }
}

impl Sizer for HuggingFaceSizer {
    fn size(&self, text: &str) -> usize {
        // The sizer contract is total; tokenization of arbitrary UTF-8
        // cannot fail for a well-formed tokenizer configuration.
        self.tokenizer
            .encode(text, false)
            .map(|encoding| encoding.get_ids().len())
            .expect("tokenizer failed to encode text")
    }
}

impl From<Tokenizer> for HuggingFaceSizer {
    fn from(tokenizer: Tokenizer) -> Self {
        Self::new(tokenizer)
    }
}
