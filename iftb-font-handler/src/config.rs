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

//! Chunking configuration.
//!
//! A [`ChunkingConfig`] tells the partitioner how code points map onto
//! chunks. It is a plain value: external loaders (YAML, JSON, whatever the
//! packaging pipeline uses) produce it via serde or the builder methods
//! here. Across all three point-group sources every code point may appear
//! at most once; the builder methods enforce that silently (first
//! occurrence wins), and [`ChunkingConfig::validate`] re-checks it for
//! configs deserialized wholesale.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::FontIoError;

/// Default for [`ChunkingConfig::feature_subset_cutoff`].
pub const DEFAULT_FEATURE_SUBSET_CUTOFF: u32 = 100;
/// Default for [`ChunkingConfig::target_chunk_size`], in bytes.
pub const DEFAULT_TARGET_CHUNK_SIZE: u32 = 32_768;

/// How code points and features are partitioned into chunks.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Code points whose glyphs belong in chunk 0, the always-present base.
    pub base_points: BTreeSet<u32>,
    /// Ordered lists of code points; each list becomes a run of
    /// consecutive chunks preserving the list order.
    pub ordered_point_groups: Vec<Vec<u32>>,
    /// Unordered sets of code points; each becomes a run of chunks with
    /// membership order chosen deterministically (ascending).
    pub unordered_point_groups: Vec<BTreeSet<u32>>,
    /// Features whose reachable-glyph count falls below this are inlined
    /// into the primary chunks instead of being split out.
    pub feature_subset_cutoff: u32,
    /// Soft target, in bytes, for one chunk's payload.
    pub target_chunk_size: u32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            base_points: BTreeSet::new(),
            ordered_point_groups: Vec::new(),
            unordered_point_groups: Vec::new(),
            feature_subset_cutoff: DEFAULT_FEATURE_SUBSET_CUTOFF,
            target_chunk_size: DEFAULT_TARGET_CHUNK_SIZE,
        }
    }
}

impl ChunkingConfig {
    /// Creates an empty configuration with default cutoffs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single base code point.
    pub fn add_base_point(&mut self, cp: u32) {
        self.base_points.insert(cp);
    }

    /// Adds an inclusive range of base code points.
    pub fn add_base_range(&mut self, first: u32, last: u32) {
        self.base_points.extend(first..=last);
    }

    /// Appends an ordered point group. Points already claimed by the base
    /// set or an earlier group are dropped; order of the survivors is
    /// preserved.
    pub fn push_ordered_group<I: IntoIterator<Item = u32>>(
        &mut self,
        points: I,
    ) {
        let used = self.used_points();
        let mut group = Vec::new();
        let mut claimed = BTreeSet::new();
        for cp in points {
            if !used.contains(&cp) && claimed.insert(cp) {
                group.push(cp);
            }
        }
        self.ordered_point_groups.push(group);
    }

    /// Appends an unordered point group, subtracting points already
    /// claimed elsewhere.
    pub fn push_unordered_group<I: IntoIterator<Item = u32>>(
        &mut self,
        points: I,
    ) {
        let used = self.used_points();
        let group: BTreeSet<u32> =
            points.into_iter().filter(|cp| !used.contains(cp)).collect();
        self.unordered_point_groups.push(group);
    }

    /// Appends an unordered point group given as inclusive code-point
    /// ranges.
    pub fn push_unordered_range_group(&mut self, ranges: &[(u32, u32)]) {
        self.push_unordered_group(
            ranges.iter().flat_map(|&(first, last)| first..=last),
        );
    }

    /// Every code point claimed by any source so far.
    pub fn used_points(&self) -> BTreeSet<u32> {
        let mut used = self.base_points.clone();
        for group in &self.ordered_point_groups {
            used.extend(group.iter().copied());
        }
        for group in &self.unordered_point_groups {
            used.extend(group.iter().copied());
        }
        used
    }

    /// Checks the at-most-once constraint across all point sources.
    ///
    /// The builder methods can't produce a violation; this exists for
    /// configurations deserialized from external data.
    pub fn validate(&self) -> Result<(), FontIoError> {
        let mut seen = BTreeSet::new();
        let ordered = self.ordered_point_groups.iter().flatten();
        let unordered = self.unordered_point_groups.iter().flatten();
        for &cp in self.base_points.iter().chain(ordered).chain(unordered) {
            if !seen.insert(cp) {
                return Err(FontIoError::DuplicatePoint(cp));
            }
        }
        Ok(())
    }

    /// Logs a one-shot summary of the configuration's shape.
    pub fn log_summary(&self) {
        tracing::debug!(
            feature_subset_cutoff = self.feature_subset_cutoff,
            target_chunk_size = self.target_chunk_size,
            base_points = self.base_points.len(),
            total_points = self.used_points().len(),
            "chunking config"
        );
        let ordered: Vec<usize> =
            self.ordered_point_groups.iter().map(Vec::len).collect();
        let unordered: Vec<usize> =
            self.unordered_point_groups.iter().map(BTreeSet::len).collect();
        tracing::debug!(?ordered, ?unordered, "point group populations");
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
