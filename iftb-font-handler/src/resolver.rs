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

//! Missing-chunk resolution.
//!
//! Given the text a client wants to render (code points plus feature
//! tags) and the set of chunks it already holds, compute which chunks to
//! fetch. This is a single forward pass, not a fixed-point iteration; a
//! client that applies the fetched chunks and queries again converges
//! naturally.

use std::collections::{BTreeMap, BTreeSet};

use crate::{chunk_set::ChunkSet, sfnt::table::iftb::FeatureRanges};

/// Computes the chunks that must be fetched to cover `unicodes` and
/// `features`, given local availability in `chunk_set`.
///
/// `uni_map` maps code points to the chunk holding their glyph (built
/// client-side from the font's cmap and the table's gidMap). For each
/// requested feature, `feature_map.ranges[j]` names the base chunks whose
/// use implies feature chunk `start_index + j`; a feature chunk is needed
/// when any base chunk in its range is locally present or already slated
/// for fetching.
pub fn missing_chunks(
    uni_map: &BTreeMap<u32, u32>,
    feature_map: &BTreeMap<u32, FeatureRanges>,
    chunk_set: &ChunkSet,
    unicodes: &[u32],
    features: &[u32],
) -> BTreeSet<u32> {
    let mut needed = BTreeSet::new();
    for cp in unicodes {
        let Some(&chunk) = uni_map.get(cp) else {
            continue;
        };
        if !chunk_set.contains(chunk) {
            needed.insert(chunk);
        }
    }
    for feature in features {
        let Some(ranges) = feature_map.get(feature) else {
            continue;
        };
        let mut companion = ranges.start_index.wrapping_sub(1);
        for &(lo, hi) in &ranges.ranges {
            companion = companion.wrapping_add(1);
            let triggered = (lo..=hi)
                .any(|base| chunk_set.contains(base) || needed.contains(&base));
            if triggered {
                needed.insert(companion);
            }
        }
    }
    needed
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
