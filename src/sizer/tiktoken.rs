// Copyright (c) 2025-2026 the textshard contributors
// SPDX-License-Identifier: Apache-2.0

//! Sizer backed by tiktoken-style BPE encodings.

use tiktoken_rs::CoreBPE;

use crate::error::SplitError;

use super::Sizer;

/// Sizer that counts BPE tokens for a named model.
///
/// The encoding is resolved through `tiktoken-rs`, so any model that
/// library knows (e.g. `gpt-4o`, `gpt-3.5-turbo`) is accepted. Special
/// tokens are excluded from the count.
pub struct TiktokenSizer {
    encoding: CoreBPE,
}

impl TiktokenSizer {
    /// Create a sizer for the given model name.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::UnknownModel`] if the model name does not map
    /// to a known encoding.
    pub fn from_model(model: &str) -> Result<Self, SplitError> {
        let encoding = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|_| SplitError::UnknownModel(model.to_string()))?;
        Ok(Self { encoding })
    }
}

impl Sizer for TiktokenSizer {
    fn size(&self, text: &str) -> usize {
        self.encoding.encode_ordinary(text).len()
    }
}

impl From<CoreBPE> for TiktokenSizer {
    fn from(encoding: CoreBPE) -> Self {
        Self { encoding }
    }
}
