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

//! Tests for SFNT directory module

use std::io::Cursor;

use super::*;

#[test]
fn test_sfnt_directory_entry_read() {
    let mut reader = Cursor::new(vec![
        0x67, 0x6c, 0x79, 0x66, // tag 'glyf'
        0x12, 0x34, 0x56, 0x78, // checksum
        0x00, 0x00, 0x01, 0x00, // offset
        0x00, 0x00, 0x00, 0x40, // length
    ]);
    let entry = SfntDirectoryEntry::from_reader(&mut reader).unwrap();
    assert_eq!(entry.tag, FontTag::new(*b"glyf"));
    let checksum = entry.checksum;
    assert_eq!(checksum, 0x12345678);
    let offset = entry.offset;
    assert_eq!(offset, 0x100);
    let length = entry.length;
    assert_eq!(length, 0x40);
}

#[test]
fn test_sfnt_directory_entry_read_exact_with_bad_size() {
    let mut reader = Cursor::new(vec![0; 16]);
    let result = SfntDirectoryEntry::from_reader_exact(&mut reader, 0, 15);
    assert!(result.is_err());
    assert!(matches!(
        result.err().unwrap(),
        FontIoError::InvalidSizeForDirectoryEntry {
            expected: 16,
            got: 15,
        }
    ));
}

#[test]
fn test_sfnt_directory_entry_write_round_trip() {
    let entry = SfntDirectoryEntry {
        tag: FontTag::IFTB,
        checksum: 0x0000cafe,
        offset: 0x00000200,
        length: 0x00000035,
    };
    let mut writer = Cursor::new(Vec::new());
    entry.write(&mut writer).unwrap();
    let bytes = writer.into_inner();
    assert_eq!(bytes.len(), SfntDirectoryEntry::SIZE);
    let mut reader = Cursor::new(bytes);
    let round = SfntDirectoryEntry::from_reader(&mut reader).unwrap();
    assert_eq!(round.tag, FontTag::IFTB);
    let checksum = round.checksum;
    assert_eq!(checksum, 0x0000cafe);
}

#[test]
fn test_sfnt_directory_entry_checksum() {
    let entry = SfntDirectoryEntry {
        tag: FontTag::new(*b"test"),
        checksum: 0x00005678,
        offset: 0x00000003,
        length: 0x00000100,
    };
    assert_eq!(
        entry.checksum(),
        Wrapping(0x74657374u32 + 0x00005678u32 + 0x00000003u32 + 0x00000100u32)
    );
}

#[test]
fn test_sfnt_directory_read_with_count() {
    let mut reader = Cursor::new(vec![
        0x68, 0x65, 0x61, 0x64, // tag 'head'
        0x00, 0x00, 0x00, 0x01, // checksum
        0x00, 0x00, 0x00, 0x2c, // offset
        0x00, 0x00, 0x00, 0x36, // length
        0x6d, 0x61, 0x78, 0x70, // tag 'maxp'
        0x00, 0x00, 0x00, 0x02, // checksum
        0x00, 0x00, 0x00, 0x64, // offset
        0x00, 0x00, 0x00, 0x20, // length
    ]);
    let dir = SfntDirectory::from_reader_with_count(&mut reader, 2).unwrap();
    assert_eq!(dir.entries().len(), 2);
    assert_eq!(dir.entries()[0].tag, FontTag::HEAD);
    assert_eq!(dir.entries()[1].tag, FontTag::MAXP);
}

#[test]
fn test_sfnt_directory_read_exact_without_4byte_aligned() {
    let mut reader = Cursor::new(vec![0; 20]);
    let result = SfntDirectory::from_reader_exact(&mut reader, 0, 20);
    assert!(result.is_err());
    assert!(matches!(
        result.err().unwrap(),
        FontIoError::InvalidSizeForDirectory(20)
    ));
}

#[test]
fn test_sfnt_directory_entry_lookup() {
    let mut dir = SfntDirectory::new();
    dir.add_entry(SfntDirectoryEntry {
        tag: FontTag::HEAD,
        checksum: 0,
        offset: 44,
        length: 54,
    });
    assert!(dir.entry(&FontTag::HEAD).is_some());
    assert!(dir.entry(&FontTag::IFTB).is_none());
}

#[test]
fn test_sfnt_directory_physical_order() {
    let mut dir = SfntDirectory::new();
    dir.add_entry(SfntDirectoryEntry {
        tag: FontTag::new(*b"bbbb"),
        checksum: 0,
        offset: 0x200,
        length: 4,
    });
    dir.add_entry(SfntDirectoryEntry {
        tag: FontTag::new(*b"aaaa"),
        checksum: 0,
        offset: 0x100,
        length: 4,
    });
    let physical = dir.physical_order();
    assert_eq!(physical[0].tag, FontTag::new(*b"aaaa"));
    assert_eq!(physical[1].tag, FontTag::new(*b"bbbb"));
}

#[test]
fn test_sfnt_directory_sort_entries() {
    let mut dir = SfntDirectory::new();
    dir.add_entry(SfntDirectoryEntry {
        tag: FontTag::new(*b"test"),
        checksum: 0,
        offset: 0,
        length: 0,
    });
    dir.add_entry(SfntDirectoryEntry {
        tag: FontTag::new(*b"best"),
        checksum: 0,
        offset: 0,
        length: 0,
    });
    dir.sort_entries(|entry| entry.tag);
    assert_eq!(dir.entries()[0].tag, FontTag::new(*b"best"));
    assert_eq!(dir.entries()[1].tag, FontTag::new(*b"test"));
}

#[test]
fn test_sfnt_directory_checksum_sums_entries() {
    let mut dir = SfntDirectory::new();
    assert_eq!(dir.checksum(), Wrapping(0));
    dir.add_entry(SfntDirectoryEntry {
        tag: FontTag::new(*b"test"),
        checksum: 0x10,
        offset: 0x20,
        length: 0x30,
    });
    assert_eq!(dir.checksum(), Wrapping(0x74657374u32 + 0x10 + 0x20 + 0x30));
}

#[test]
fn test_sfnt_directory_validate_bounds() {
    let mut dir = SfntDirectory::new();
    dir.add_entry(SfntDirectoryEntry {
        tag: FontTag::new(*b"glyf"),
        checksum: 0,
        offset: 0x100,
        length: 0x100,
    });
    assert!(dir.validate_bounds(0x200).is_ok());
    let result = dir.validate_bounds(0x1ff);
    assert!(result.is_err());
    assert!(matches!(
        result.err().unwrap(),
        FontIoError::DirectoryEntryOutOfBounds {
            offset: 0x100,
            length: 0x100,
            file_size: 0x1ff,
            ..
        }
    ));
}
