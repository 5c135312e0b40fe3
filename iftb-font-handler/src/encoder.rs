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

//! The partitioner.
//!
//! Takes a font, a [`ChunkingConfig`], and a [`GlyphSource`] describing
//! the font's glyph space, and splits the glyphs into chunks: chunk 0 is
//! the always-present base, ordered and unordered point groups become
//! runs of size-bounded primary chunks, and each sufficiently large
//! feature gets companion chunks recorded in the table's feature map.
//! The output is the input font with an IFTB table installed, plus one
//! opaque payload blob per fetchable chunk.
//!
//! Encoding is deterministic: the same font, config and source always
//! produce bit-identical output. Unordered groups are walked in
//! ascending code-point order to that end.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    config::ChunkingConfig,
    error::FontIoError,
    sfnt::{
        font::SfntFont,
        table::iftb::{FeatureRanges, TableIFTB},
    },
};

/// The encoder's view of a font's glyph space.
///
/// Implementations wrap whatever outline and cmap machinery the
/// packaging pipeline uses; the partitioner itself never parses glyph
/// data. Closure expansion covers composite components for glyf fonts
/// and dependent subrs/gsubrs for CFF/CFF2.
pub trait GlyphSource {
    /// The font's glyph count (maxp.numGlyphs).
    fn glyph_count(&self) -> u16;
    /// Looks up the glyph a code point maps to.
    fn gid_for_unicode(&self, cp: u32) -> Option<u16>;
    /// Expands a working set of glyphs in place with every glyph they
    /// depend on.
    fn expand_closure(&self, gids: &mut BTreeSet<u16>);
    /// The encoded bytes of one glyph.
    fn glyph_data(&self, gid: u16) -> &[u8];
    /// The feature tags the font supports beyond default shaping.
    fn features(&self) -> Vec<u32>;
    /// The glyphs `feature` can reach when applied over the given base
    /// glyphs.
    fn feature_glyphs(&self, feature: u32, base: &BTreeSet<u16>)
        -> BTreeSet<u16>;
    /// Byte offset of the CharStrings INDEX within the CFF/CFF2 table;
    /// 0 for glyf-flavored fonts.
    fn charstrings_offset(&self) -> u32 {
        0
    }
    /// Opaque font identity recorded in the IFTB table.
    fn font_id(&self) -> [u32; 4] {
        [0; 4]
    }
}

/// One fetchable chunk's payload.
#[derive(Clone, Debug)]
pub struct ChunkBlob {
    /// The chunk's index in the table's chunk space.
    pub index: u32,
    /// The payload bytes. Opaque to this crate; the patcher defines the
    /// structure, and compression is applied downstream.
    pub data: Vec<u8>,
}

/// The result of encoding: the IFTB-augmented font plus the chunk
/// payloads for every fetchable chunk (chunk 0 ships inside the font).
pub struct EncodedFont {
    /// The font, now carrying an IFTB table.
    pub font: SfntFont,
    /// Payload blobs for chunks `1..chunk_count`.
    pub chunks: Vec<ChunkBlob>,
}

/// Partitions a font's glyphs into IFTB chunks.
pub struct Encoder<'a, S: GlyphSource> {
    source: &'a S,
    config: &'a ChunkingConfig,
}

/// Partitioning state threaded through the group and feature passes.
struct Partition {
    /// Chunk assignment per gid; None means "still in the base".
    assignment: Vec<Option<u32>>,
    /// Member glyphs per chunk, kept for feature triggering.
    chunk_glyphs: Vec<BTreeSet<u16>>,
}

impl Partition {
    fn new(glyph_count: u16) -> Self {
        Self {
            assignment: vec![None; glyph_count as usize],
            chunk_glyphs: vec![BTreeSet::new()],
        }
    }

    fn next_chunk(&self) -> u32 {
        self.chunk_glyphs.len() as u32
    }

    fn is_assigned(&self, gid: u16) -> bool {
        self.assignment[gid as usize].is_some()
    }

    fn assign(&mut self, gids: &BTreeSet<u16>, chunk: u32) {
        while self.chunk_glyphs.len() <= chunk as usize {
            self.chunk_glyphs.push(BTreeSet::new());
        }
        for &gid in gids {
            self.assignment[gid as usize] = Some(chunk);
            self.chunk_glyphs[chunk as usize].insert(gid);
        }
    }
}

impl<'a, S: GlyphSource> Encoder<'a, S> {
    /// Creates an encoder over a glyph source and a configuration.
    pub fn new(source: &'a S, config: &'a ChunkingConfig) -> Self {
        Self { source, config }
    }

    /// Partitions the font and installs the IFTB table.
    ///
    /// `files_uri` and `range_file_uri` are the URI templates clients
    /// will fetch chunks through. The returned font still needs to be
    /// written out (which recomputes the head checksum adjustment).
    pub fn encode(
        &self,
        mut font: SfntFont,
        files_uri: &str,
        range_file_uri: &str,
    ) -> Result<EncodedFont, FontIoError> {
        self.config.validate()?;
        self.config.log_summary();
        let glyph_count = self.source.glyph_count();
        let mut partition = Partition::new(glyph_count);

        // Chunk 0: .notdef, the base points, and everything they pull in.
        let mut base = BTreeSet::new();
        base.insert(0_u16);
        for &cp in &self.config.base_points {
            if let Some(gid) = self.source.gid_for_unicode(cp) {
                base.insert(gid);
            }
        }
        self.source.expand_closure(&mut base);
        partition.assign(&base, 0);

        // Primary chunks from the point groups, ordered groups first.
        for group in &self.config.ordered_point_groups {
            self.chunk_points(group.iter().copied(), &mut partition);
        }
        for group in &self.config.unordered_point_groups {
            // BTreeSet iteration gives the deterministic ascending walk.
            self.chunk_points(group.iter().copied(), &mut partition);
        }
        let primary_count = partition.next_chunk();

        // Features: small ones fold into the primary chunks, large ones
        // get companion chunks and a feature-map entry.
        let mut feature_map = BTreeMap::new();
        let mut features = self.source.features();
        features.sort_unstable();
        for feature in features {
            let all_primary: BTreeSet<u16> = partition
                .chunk_glyphs
                .iter()
                .flat_map(|glyphs| glyphs.iter().copied())
                .collect();
            let reachable =
                self.source.feature_glyphs(feature, &all_primary);
            if (reachable.len() as u32) < self.config.feature_subset_cutoff {
                tracing::debug!(
                    feature = %format_feature(feature),
                    glyphs = reachable.len(),
                    "inlining feature below subset cutoff"
                );
                self.inline_feature(feature, primary_count, &mut partition);
            } else if let Some(ranges) =
                self.split_feature(feature, primary_count, &mut partition)
            {
                tracing::debug!(
                    feature = %format_feature(feature),
                    companion_chunks = ranges.ranges.len(),
                    "splitting feature into companion chunks"
                );
                feature_map.insert(feature, ranges);
            }
        }

        let chunk_count = partition.next_chunk();
        if chunk_count > u16::MAX as u32 {
            return Err(FontIoError::TooManyChunks(chunk_count));
        }

        // Whatever no group claimed stays in the base.
        let gid_map: Vec<u32> = partition
            .assignment
            .iter()
            .map(|chunk| chunk.unwrap_or(0))
            .collect();

        // Payload blobs, member glyphs in gid order. Chunk 0 has none;
        // it ships inside the font itself.
        let mut chunk_members: Vec<Vec<u16>> =
            vec![Vec::new(); chunk_count as usize];
        for (gid, &chunk) in gid_map.iter().enumerate() {
            chunk_members[chunk as usize].push(gid as u16);
        }
        let chunks: Vec<ChunkBlob> = (1..chunk_count)
            .map(|index| ChunkBlob {
                index,
                data: chunk_members[index as usize]
                    .iter()
                    .flat_map(|&gid| {
                        self.source.glyph_data(gid).iter().copied()
                    })
                    .collect(),
            })
            .collect();

        let mut table = TableIFTB::new(chunk_count as u16, glyph_count);
        table.id = self.source.font_id();
        table.cff_charstrings_offset = self.source.charstrings_offset();
        table.files_uri = files_uri.to_string();
        table.range_file_uri = range_file_uri.to_string();
        table.gid_map = gid_map;
        table.feature_map = feature_map;
        if table.cff_charstrings_offset != 0 {
            let mut running = 0_u32;
            table.chunk_offsets = chunk_members
                .iter()
                .map(|members| {
                    running += members
                        .iter()
                        .map(|&gid| self.source.glyph_data(gid).len() as u32)
                        .sum::<u32>();
                    running
                })
                .collect();
        }
        table.validate()?;
        tracing::debug!(
            chunk_count,
            glyph_count,
            features = table.feature_map.len(),
            "partitioning complete"
        );
        font.set_iftb_table(table);
        Ok(EncodedFont { font, chunks })
    }

    /// Walks one point group, closing a chunk whenever the accumulated
    /// payload reaches the target size.
    fn chunk_points<I: Iterator<Item = u32>>(
        &self,
        points: I,
        partition: &mut Partition,
    ) {
        let mut pending: BTreeSet<u16> = BTreeSet::new();
        let mut pending_size = 0_u32;
        for cp in points {
            let Some(gid) = self.source.gid_for_unicode(cp) else {
                continue;
            };
            let mut closure = BTreeSet::from([gid]);
            self.source.expand_closure(&mut closure);
            for gid in closure {
                if partition.is_assigned(gid) || !pending.insert(gid) {
                    continue;
                }
                pending_size += self.source.glyph_data(gid).len() as u32;
            }
            if pending_size >= self.config.target_chunk_size {
                partition.assign(&pending, partition.next_chunk());
                pending.clear();
                pending_size = 0;
            }
        }
        if !pending.is_empty() {
            partition.assign(&pending, partition.next_chunk());
        }
    }

    /// Folds a small feature's glyphs into the primary chunks that
    /// trigger them.
    fn inline_feature(
        &self,
        feature: u32,
        primary_count: u32,
        partition: &mut Partition,
    ) {
        for chunk in 0..primary_count {
            let triggers = partition.chunk_glyphs[chunk as usize].clone();
            let extra: BTreeSet<u16> = self
                .source
                .feature_glyphs(feature, &triggers)
                .into_iter()
                .filter(|&gid| !partition.is_assigned(gid))
                .collect();
            if !extra.is_empty() {
                partition.assign(&extra, chunk);
            }
        }
    }

    /// Splits a large feature into companion chunks, one per run of
    /// primary chunks whose glyphs trigger it, and returns the
    /// feature-map entry (None when nothing triggered).
    fn split_feature(
        &self,
        feature: u32,
        primary_count: u32,
        partition: &mut Partition,
    ) -> Option<FeatureRanges> {
        let start_index = partition.next_chunk();
        let mut ranges = Vec::new();
        let mut pending: BTreeSet<u16> = BTreeSet::new();
        let mut pending_size = 0_u32;
        let mut first_base = 0_u32;
        let mut last_base = 0_u32;
        for chunk in 1..primary_count {
            let triggers = partition.chunk_glyphs[chunk as usize].clone();
            let extra: Vec<u16> = self
                .source
                .feature_glyphs(feature, &triggers)
                .into_iter()
                .filter(|&gid| {
                    !partition.is_assigned(gid) && !pending.contains(&gid)
                })
                .collect();
            if extra.is_empty() {
                continue;
            }
            if pending.is_empty() {
                first_base = chunk;
            }
            last_base = chunk;
            for gid in extra {
                pending_size += self.source.glyph_data(gid).len() as u32;
                pending.insert(gid);
            }
            if pending_size >= self.config.target_chunk_size {
                partition.assign(&pending, partition.next_chunk());
                ranges.push((first_base, last_base));
                pending.clear();
                pending_size = 0;
            }
        }
        if !pending.is_empty() {
            partition.assign(&pending, partition.next_chunk());
            ranges.push((first_base, last_base));
        }
        if ranges.is_empty() {
            None
        } else {
            Some(FeatureRanges {
                start_index,
                ranges,
            })
        }
    }
}

/// Renders a feature tag for log output.
fn format_feature(feature: u32) -> String {
    String::from_utf8_lossy(&feature.to_be_bytes()).into_owned()
}

#[cfg(test)]
#[path = "encoder_test.rs"]
mod tests;
