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

//! Tests for SFNT header module

use std::io::Cursor;

use super::*;

#[test]
fn test_sfnt_header_read() {
    let mut reader = Cursor::new(vec![
        0x00, 0x01, 0x00, 0x00, // sfntVersion (TrueType)
        0x00, 0x09, // numTables
        0x00, 0x80, // searchRange
        0x00, 0x03, // entrySelector
        0x00, 0x10, // rangeShift
    ]);
    let header = SfntHeader::from_reader(&mut reader).unwrap();
    let sfnt_version = header.sfntVersion;
    assert_eq!(sfnt_version, Magic::TrueType);
    let num_tables = header.numTables;
    assert_eq!(num_tables, 9);
    let search_range = header.searchRange;
    assert_eq!(search_range, 0x80);
    let entry_selector = header.entrySelector;
    assert_eq!(entry_selector, 3);
    let range_shift = header.rangeShift;
    assert_eq!(range_shift, 0x10);
}

#[test]
fn test_sfnt_header_read_bad_magic() {
    let mut reader = Cursor::new(vec![
        0xff, 0xff, 0xff, 0xff, // not a magic number
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ]);
    let result = SfntHeader::from_reader(&mut reader);
    assert!(result.is_err());
    assert!(matches!(
        result.err().unwrap(),
        FontIoError::UnknownMagic(0xffffffff)
    ));
}

#[test]
fn test_sfnt_header_read_woff_is_rejected() {
    let mut reader = Cursor::new(vec![
        0x77, 0x4f, 0x46, 0x46, // 'wOFF'
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ]);
    let result = SfntHeader::from_reader(&mut reader);
    assert!(result.is_err());
    assert!(matches!(
        result.err().unwrap(),
        FontIoError::WrappedFontUnsupported(0x774f4646)
    ));
}

#[test]
fn test_sfnt_header_read_exact_bad_size() {
    let mut reader = Cursor::new(vec![0; 12]);
    let result = SfntHeader::from_reader_exact(&mut reader, 0, 11);
    assert!(result.is_err());
    assert!(matches!(
        result.err().unwrap(),
        FontIoError::InvalidSizeForHeader(11)
    ));
}

#[test]
fn test_sfnt_header_write() {
    let header = SfntHeader {
        sfntVersion: Magic::OpenType,
        numTables: 2,
        searchRange: 32,
        entrySelector: 1,
        rangeShift: 0,
    };
    let mut writer = Cursor::new(Vec::new());
    header.write(&mut writer).unwrap();
    assert_eq!(
        writer.into_inner(),
        vec![
            0x4f, 0x54, 0x54, 0x4f, // 'OTTO'
            0x00, 0x02, // numTables
            0x00, 0x20, // searchRange
            0x00, 0x01, // entrySelector
            0x00, 0x00, // rangeShift
        ]
    );
}

#[test]
fn test_sfnt_header_synthesize() {
    let header = SfntHeader::synthesize(Magic::TrueType, 11);
    let num_tables = header.numTables;
    assert_eq!(num_tables, 11);
    // floor(log2(11)) = 3; searchRange = 2^3 * 16; rangeShift fills out.
    let entry_selector = header.entrySelector;
    assert_eq!(entry_selector, 3);
    let search_range = header.searchRange;
    assert_eq!(search_range, 128);
    let range_shift = header.rangeShift;
    assert_eq!(range_shift, 11 * 16 - 128);
}

#[test]
fn test_sfnt_header_checksum_matches_bytes() {
    let header = SfntHeader {
        sfntVersion: Magic::TrueType,
        numTables: 3,
        searchRange: 32,
        entrySelector: 1,
        rangeShift: 16,
    };
    let mut bytes = Vec::new();
    header.write(&mut bytes).unwrap();
    assert_eq!(header.checksum(), crate::utils::checksum(&bytes));
}

#[test]
fn test_sfnt_header_num_tables_trait() {
    let header = SfntHeader::synthesize(Magic::TrueType, 5);
    assert_eq!(header.num_tables(), 5);
}
