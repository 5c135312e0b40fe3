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

//! Tests for the partitioner

use std::collections::BTreeMap;

use super::*;
use crate::{
    magic::Magic,
    sfnt::{
        directory::SfntDirectory,
        header::SfntHeader,
        table::{generic::TableGeneric, head::TableHead, named_table::NamedTable},
    },
    tag::FontTag,
};

/// A scripted glyph space: fixed per-glyph payloads, a literal cmap,
/// component edges for closure, and one variant glyph per base glyph
/// and feature.
struct FakeSource {
    glyphs: Vec<Vec<u8>>,
    cmap: BTreeMap<u32, u16>,
    components: BTreeMap<u16, Vec<u16>>,
    feature_variants: BTreeMap<u32, BTreeMap<u16, u16>>,
    charstrings: u32,
}

impl FakeSource {
    /// Ten glyphs of 10 bytes each, code points U+0041.. mapping to
    /// gids 1.., no components, no features.
    fn plain(glyph_count: u16) -> Self {
        Self {
            glyphs: (0..glyph_count).map(|gid| vec![gid as u8; 10]).collect(),
            cmap: (1..glyph_count)
                .map(|gid| (0x40_u32 + gid as u32, gid))
                .collect(),
            components: BTreeMap::new(),
            feature_variants: BTreeMap::new(),
            charstrings: 0,
        }
    }
}

impl GlyphSource for FakeSource {
    fn glyph_count(&self) -> u16 {
        self.glyphs.len() as u16
    }

    fn gid_for_unicode(&self, cp: u32) -> Option<u16> {
        self.cmap.get(&cp).copied()
    }

    fn expand_closure(&self, gids: &mut BTreeSet<u16>) {
        let mut stack: Vec<u16> = gids.iter().copied().collect();
        while let Some(gid) = stack.pop() {
            if let Some(deps) = self.components.get(&gid) {
                for &dep in deps {
                    if gids.insert(dep) {
                        stack.push(dep);
                    }
                }
            }
        }
    }

    fn glyph_data(&self, gid: u16) -> &[u8] {
        &self.glyphs[gid as usize]
    }

    fn features(&self) -> Vec<u32> {
        self.feature_variants.keys().copied().collect()
    }

    fn feature_glyphs(
        &self,
        feature: u32,
        base: &BTreeSet<u16>,
    ) -> BTreeSet<u16> {
        let Some(variants) = self.feature_variants.get(&feature) else {
            return BTreeSet::new();
        };
        base.iter()
            .filter_map(|gid| variants.get(gid).copied())
            .collect()
    }

    fn charstrings_offset(&self) -> u32 {
        self.charstrings
    }

    fn font_id(&self) -> [u32; 4] {
        [1, 2, 3, 4]
    }
}

fn starter_font() -> SfntFont {
    let mut tables = BTreeMap::new();
    tables.insert(
        FontTag::HEAD,
        NamedTable::Head(TableHead {
            majorVersion: 1,
            minorVersion: 0,
            fontRevision: 0x00010000,
            checksumAdjustment: 0,
            magicNumber: 0x5f0f3cf5,
            flags: 0,
            unitsPerEm: 1000,
            created: 0,
            modified: 0,
            xMin: 0,
            yMin: 0,
            xMax: 100,
            yMax: 100,
            macStyle: 0,
            lowestRecPPEM: 8,
            fontDirectionHint: 2,
            indexToLocFormat: 0,
            glyphDataFormat: 0,
        }),
    );
    tables.insert(
        FontTag::GLYF,
        NamedTable::Generic(TableGeneric {
            data: vec![0; 16],
        }),
    );
    SfntFont {
        header: SfntHeader::synthesize(Magic::TrueType, tables.len() as u16),
        directory: SfntDirectory::new(),
        tables,
    }
}

fn basic_config() -> ChunkingConfig {
    let mut config = ChunkingConfig::new();
    config.target_chunk_size = 20;
    config
}

fn encode_with(
    source: &FakeSource,
    config: &ChunkingConfig,
) -> EncodedFont {
    Encoder::new(source, config)
        .encode(starter_font(), "c/$2$1.br", "c/all.br")
        .unwrap()
}

#[test]
fn test_base_points_and_closure_land_in_chunk_zero() {
    let mut source = FakeSource::plain(6);
    source.components.insert(1, vec![4]);
    let mut config = basic_config();
    config.add_base_point(0x41); // gid 1, pulling in component gid 4
    config.push_ordered_group([0x42, 0x43]);

    let encoded = encode_with(&source, &config);
    let iftb = encoded.font.iftb().unwrap();
    assert_eq!(iftb.gid_map[0], 0); // .notdef
    assert_eq!(iftb.gid_map[1], 0);
    assert_eq!(iftb.gid_map[4], 0);
    // Group glyphs went elsewhere.
    assert_ne!(iftb.gid_map[2], 0);
    assert_ne!(iftb.gid_map[3], 0);
    // Unclaimed glyphs stay in the base.
    assert_eq!(iftb.gid_map[5], 0);
}

#[test]
fn test_ordered_group_splits_on_target_size() {
    let source = FakeSource::plain(8);
    let mut config = basic_config();
    // Gids 1..=5, 10 bytes each, 20-byte target: two per chunk.
    config.push_ordered_group([0x41, 0x42, 0x43, 0x44, 0x45]);

    let encoded = encode_with(&source, &config);
    let iftb = encoded.font.iftb().unwrap();
    assert_eq!(iftb.gid_map[1], 1);
    assert_eq!(iftb.gid_map[2], 1);
    assert_eq!(iftb.gid_map[3], 2);
    assert_eq!(iftb.gid_map[4], 2);
    assert_eq!(iftb.gid_map[5], 3);
    assert_eq!(iftb.chunk_count, 4);
}

#[test]
fn test_unordered_group_is_chunked_in_ascending_order() {
    let source = FakeSource::plain(8);
    let mut config = basic_config();
    config.push_unordered_group([0x45, 0x41, 0x43, 0x42, 0x44]);

    let encoded = encode_with(&source, &config);
    let iftb = encoded.font.iftb().unwrap();
    // Ascending walk: {A, B} then {C, D} then {E}.
    assert_eq!(iftb.gid_map[1], 1);
    assert_eq!(iftb.gid_map[2], 1);
    assert_eq!(iftb.gid_map[3], 2);
    assert_eq!(iftb.gid_map[4], 2);
    assert_eq!(iftb.gid_map[5], 3);
}

#[test]
fn test_encode_is_deterministic() {
    let mut source = FakeSource::plain(10);
    source
        .feature_variants
        .insert(u32::from_be_bytes(*b"liga"), BTreeMap::from([(1, 8), (3, 9)]));
    let mut config = basic_config();
    config.add_base_point(0x41);
    config.push_ordered_group([0x42, 0x43]);
    config.push_unordered_group([0x44, 0x45, 0x46]);
    config.feature_subset_cutoff = 1;

    let first = encode_with(&source, &config);
    let second = encode_with(&source, &config);
    let first_table = first.font.iftb().unwrap();
    let second_table = second.font.iftb().unwrap();
    assert_eq!(
        first_table.to_bytes().unwrap(),
        second_table.to_bytes().unwrap()
    );
    assert_eq!(first.chunks.len(), second.chunks.len());
    for (a, b) in first.chunks.iter().zip(second.chunks.iter()) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.data, b.data);
    }
}

#[test]
fn test_small_feature_is_inlined() {
    let mut source = FakeSource::plain(8);
    // A ligature variant for gid 1; only one reachable glyph, far below
    // the cutoff.
    source
        .feature_variants
        .insert(u32::from_be_bytes(*b"liga"), BTreeMap::from([(1, 7)]));
    let mut config = basic_config();
    config.push_ordered_group([0x41, 0x42]);

    let encoded = encode_with(&source, &config);
    let iftb = encoded.font.iftb().unwrap();
    assert!(iftb.feature_map.is_empty());
    // The variant rides along with its trigger's chunk.
    assert_eq!(iftb.gid_map[7], iftb.gid_map[1]);
}

#[test]
fn test_large_feature_is_split_with_ranges() {
    let liga = u32::from_be_bytes(*b"liga");
    let mut source = FakeSource::plain(12);
    source.feature_variants.insert(
        liga,
        BTreeMap::from([(1, 8), (2, 9), (3, 10), (4, 11)]),
    );
    let mut config = basic_config();
    config.feature_subset_cutoff = 2;
    config.push_ordered_group([0x41, 0x42, 0x43, 0x44]);

    let encoded = encode_with(&source, &config);
    let iftb = encoded.font.iftb().unwrap();
    let entry = iftb.feature_map.get(&liga).unwrap();
    // Primary chunks are 1 and 2; the feature chunks follow them.
    assert_eq!(entry.start_index, 3);
    assert_eq!(entry.ranges, vec![(1, 1), (2, 2)]);
    // Variant glyphs landed in the feature chunks, not the primaries.
    assert_eq!(iftb.gid_map[8], 3);
    assert_eq!(iftb.gid_map[9], 3);
    assert_eq!(iftb.gid_map[10], 4);
    assert_eq!(iftb.gid_map[11], 4);
    iftb.validate().unwrap();
}

#[test]
fn test_chunk_blobs_cover_all_fetchable_chunks() {
    let source = FakeSource::plain(8);
    let mut config = basic_config();
    config.push_ordered_group([0x41, 0x42, 0x43]);

    let encoded = encode_with(&source, &config);
    let iftb = encoded.font.iftb().unwrap();
    assert_eq!(encoded.chunks.len(), iftb.chunk_count as usize - 1);
    // Chunk 1 holds gids 1 and 2; the blob is their payloads in gid
    // order.
    let blob = &encoded.chunks[0];
    assert_eq!(blob.index, 1);
    let mut expected = vec![1_u8; 10];
    expected.extend(vec![2_u8; 10]);
    assert_eq!(blob.data, expected);
}

#[test]
fn test_cff_source_gets_chunk_offsets() {
    let mut source = FakeSource::plain(6);
    source.charstrings = 0x400;
    let mut config = basic_config();
    config.push_ordered_group([0x41, 0x42, 0x43]);

    let encoded = encode_with(&source, &config);
    let iftb = encoded.font.iftb().unwrap();
    assert_eq!(iftb.cff_charstrings_offset, 0x400);
    assert_eq!(iftb.chunk_offsets.len(), iftb.chunk_count as usize);
    // Cumulative end offsets: chunk 0 holds gids 0, 4, 5 (30 bytes),
    // chunk 1 holds gids 1, 2 (20 bytes), chunk 2 holds gid 3.
    assert_eq!(iftb.chunk_offsets, vec![30, 50, 60]);
    assert_eq!(iftb.chunk_range(1), (30, 50));
}

#[test]
fn test_glyf_source_gets_no_chunk_offsets() {
    let source = FakeSource::plain(4);
    let mut config = basic_config();
    config.push_ordered_group([0x41]);
    let encoded = encode_with(&source, &config);
    assert!(encoded.font.iftb().unwrap().chunk_offsets.is_empty());
}

#[test]
fn test_font_id_and_chunk_set_initial_state() {
    let source = FakeSource::plain(4);
    let config = basic_config();
    let encoded = encode_with(&source, &config);
    let iftb = encoded.font.iftb().unwrap();
    assert_eq!(iftb.id, [1, 2, 3, 4]);
    // Only the base chunk ships with the font.
    assert!(iftb.chunk_set.contains(0));
    assert_eq!(iftb.chunk_set.ones().count(), 1);
}

#[test]
#[tracing_test::traced_test]
fn test_encode_logs_partition_summary() {
    let source = FakeSource::plain(4);
    let mut config = basic_config();
    config.push_ordered_group([0x41]);
    let _ = encode_with(&source, &config);
    assert!(logs_contain("partitioning complete"));
}

#[test]
fn test_encode_rejects_invalid_config() {
    let source = FakeSource::plain(4);
    let config = ChunkingConfig {
        base_points: [0x41].into(),
        ordered_point_groups: vec![vec![0x41]],
        ..ChunkingConfig::default()
    };
    let result = Encoder::new(&source, &config).encode(
        starter_font(),
        "c/$1",
        "r",
    );
    assert!(result.is_err());
    assert!(matches!(
        result.err().unwrap(),
        FontIoError::DuplicatePoint(0x41)
    ));
}
