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

//! Tests for font tag module

use std::io::Cursor;

use super::*;
use crate::FontDataExactRead;

#[test]
fn test_font_tag_read() {
    let mut reader = Cursor::new(vec![0x49, 0x46, 0x54, 0x42]);
    let tag = FontTag::from_reader(&mut reader).unwrap();
    assert_eq!(tag, FontTag::IFTB);
}

#[test]
fn test_font_tag_read_exact_with_bad_size() {
    let mut reader = Cursor::new(vec![0x49, 0x46, 0x54, 0x42]);
    let result = FontTag::from_reader_exact(&mut reader, 0, 5);
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert!(matches!(err, FontIoError::InvalidSizeForTAG(5)));
}

#[test]
fn test_font_tag_read_with_too_small_buffer() {
    let mut reader = Cursor::new(vec![0x49, 0x46]);
    let result = FontTag::from_reader(&mut reader);
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert!(matches!(err, FontIoError::IoError(_)));
}

#[test]
fn test_font_tag_write() {
    let tag = FontTag::new(*b"glyf");
    let mut writer = Cursor::new(Vec::new());
    tag.write(&mut writer).unwrap();
    assert_eq!(writer.into_inner(), vec![0x67, 0x6c, 0x79, 0x66]);
}

#[test]
fn test_font_tag_display() {
    assert_eq!(format!("{}", FontTag::HEAD), "head");
    assert_eq!(format!("{:?}", FontTag::IFTB), "FontTag(IFTB)");
}

#[test]
fn test_known_tags() {
    assert!(FontTag::IFTB.is_known());
    assert!(FontTag::HEAD.is_known());
    assert!(FontTag::new(*b"OS/2").is_known());
    assert!(FontTag::new(*b"cvt ").is_known());
    assert!(!FontTag::new(*b"Xyz1").is_known());
}
