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

//! Tests for the chunking configuration

use super::*;

#[test]
fn test_defaults() {
    let config = ChunkingConfig::new();
    assert_eq!(config.feature_subset_cutoff, DEFAULT_FEATURE_SUBSET_CUTOFF);
    assert_eq!(config.target_chunk_size, DEFAULT_TARGET_CHUNK_SIZE);
    assert!(config.base_points.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_base_range_expansion() {
    let mut config = ChunkingConfig::new();
    config.add_base_range(0x41, 0x43);
    config.add_base_point(0x20);
    assert_eq!(
        config.base_points.iter().copied().collect::<Vec<u32>>(),
        vec![0x20, 0x41, 0x42, 0x43]
    );
}

#[test]
fn test_ordered_group_first_occurrence_wins() {
    let mut config = ChunkingConfig::new();
    config.add_base_point(0x41);
    // 0x41 is taken by the base, and 0x42 repeats within the group.
    config.push_ordered_group([0x42, 0x41, 0x43, 0x42]);
    assert_eq!(config.ordered_point_groups, vec![vec![0x42, 0x43]]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_ordered_group_preserves_input_order() {
    let mut config = ChunkingConfig::new();
    config.push_ordered_group([0x4e2d, 0x56fd, 0x4eba]);
    assert_eq!(
        config.ordered_point_groups,
        vec![vec![0x4e2d, 0x56fd, 0x4eba]]
    );
}

#[test]
fn test_unordered_group_subtracts_used_points() {
    let mut config = ChunkingConfig::new();
    config.push_ordered_group([0x100, 0x101]);
    config.push_unordered_group([0x101, 0x102, 0x103]);
    assert_eq!(
        config.unordered_point_groups[0]
            .iter()
            .copied()
            .collect::<Vec<u32>>(),
        vec![0x102, 0x103]
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_unordered_range_group() {
    let mut config = ChunkingConfig::new();
    config.push_unordered_range_group(&[(0x30, 0x32), (0x39, 0x39)]);
    assert_eq!(
        config.unordered_point_groups[0]
            .iter()
            .copied()
            .collect::<Vec<u32>>(),
        vec![0x30, 0x31, 0x32, 0x39]
    );
}

#[test]
fn test_validate_catches_duplicates() {
    // Bypass the builder methods, as a deserializer would.
    let config = ChunkingConfig {
        base_points: [0x41].into(),
        ordered_point_groups: vec![vec![0x41]],
        ..ChunkingConfig::default()
    };
    let result = config.validate();
    assert!(result.is_err());
    assert!(matches!(
        result.err().unwrap(),
        FontIoError::DuplicatePoint(0x41)
    ));
}

#[test]
fn test_deserialize_from_external_producer() {
    // Stands in for the YAML pipeline, which hands us a ready-made value.
    let config: ChunkingConfig = serde_json::from_str(
        r#"{
            "base_points": [32, 65],
            "ordered_point_groups": [[66, 67]],
            "unordered_point_groups": [[68, 69]],
            "target_chunk_size": 1024
        }"#,
    )
    .unwrap();
    assert_eq!(config.base_points.len(), 2);
    assert_eq!(config.ordered_point_groups, vec![vec![66, 67]]);
    assert_eq!(config.target_chunk_size, 1024);
    // Omitted fields take the defaults.
    assert_eq!(config.feature_subset_cutoff, DEFAULT_FEATURE_SUBSET_CUTOFF);
    assert!(config.validate().is_ok());
}

#[test]
fn test_used_points_spans_all_sources() {
    let mut config = ChunkingConfig::new();
    config.add_base_point(1);
    config.push_ordered_group([2]);
    config.push_unordered_group([3]);
    assert_eq!(
        config.used_points().into_iter().collect::<Vec<u32>>(),
        vec![1, 2, 3]
    );
}
