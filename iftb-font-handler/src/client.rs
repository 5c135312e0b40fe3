// Copyright 2024-2025 Monotype Imaging Inc.
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! Client-side IFTB session.
//!
//! A [`Session`] owns one decoded IFTB font for the duration of a
//! rendering session: the parsed sfnt container, the decoded IFTB table,
//! and the cached code-point to chunk-index map. All operations are
//! synchronous over in-memory buffers; callers wanting parallelism run
//! one session per font. The only state that changes after construction
//! is the chunk-availability set, updated as fetched chunks are applied.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::{Read, Seek},
};

use crate::{
    error::FontIoError,
    sfnt::{font::SfntFont, table::iftb::TableIFTB},
    FontDataRead,
};

/// One font's client-side incremental-transfer state.
pub struct Session {
    font: SfntFont,
    uni_map: BTreeMap<u32, u32>,
}

impl Session {
    /// Decodes a font and builds the session around its IFTB table.
    ///
    /// `char_map` is the font's code-point to glyph-id mapping, produced
    /// by a cmap walker; combined with the table's gidMap it yields the
    /// cached code-point to chunk-index map. The cache lives as long as
    /// the session, which is sound because the font buffer never changes
    /// underneath it.
    pub fn new<T: Read + Seek + ?Sized>(
        reader: &mut T,
        char_map: &BTreeMap<u32, u16>,
    ) -> Result<Self, FontIoError> {
        let font = SfntFont::from_reader(reader)?;
        let iftb = font.iftb().ok_or(FontIoError::IftbTableMissing)?;
        let mut uni_map = BTreeMap::new();
        for (&cp, &gid) in char_map {
            if let Some(&chunk) = iftb.gid_map.get(gid as usize) {
                uni_map.insert(cp, chunk);
            }
        }
        tracing::trace!(
            chunk_count = iftb.chunk_count,
            mapped_code_points = uni_map.len(),
            "IFTB session ready"
        );
        Ok(Self { font, uni_map })
    }

    /// The decoded IFTB table.
    pub fn iftb(&self) -> &TableIFTB {
        // A session cannot be built without the table.
        self.font.iftb().expect("session always holds an IFTB font")
    }

    /// The parsed font container.
    pub fn font(&self) -> &SfntFont {
        &self.font
    }

    /// Computes the chunks that must be fetched to render `unicodes`
    /// with `features`, given what is already available locally.
    pub fn missing_chunks(
        &self,
        unicodes: &[u32],
        features: &[u32],
    ) -> BTreeSet<u32> {
        self.iftb().missing_chunks(&self.uni_map, unicodes, features)
    }

    /// Renders the fetch URI for a chunk.
    pub fn chunk_uri(&self, index: u32) -> Result<String, FontIoError> {
        self.iftb().chunk_uri(index)
    }

    /// The chunk's byte range within the CharStrings INDEX; `(0, 0)` for
    /// glyf-flavored fonts or out-of-range indices.
    pub fn chunk_range(&self, index: u32) -> (u32, u32) {
        self.iftb().chunk_range(index)
    }

    /// Whether a chunk is already available locally.
    pub fn is_chunk_available(&self, index: u32) -> bool {
        self.iftb().chunk_set.contains(index)
    }

    /// Records that a chunk has been fetched and applied. Returns false
    /// for out-of-range indices.
    pub fn mark_chunk_available(&mut self, index: u32) -> bool {
        let marked = self
            .font
            .iftb_mut()
            .map(|iftb| iftb.chunk_set.set(index, true))
            .unwrap_or(false);
        if marked {
            tracing::trace!(chunk = index, "chunk applied");
        }
        marked
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
