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

//! Variable-width chunk-index codec.
//!
//! Chunk indices inside an IFTB table are stored as 1-, 2- or 3-byte
//! big-endian unsigned integers. The width is a property of the whole
//! table, derived once from its chunk count, and is never serialized with
//! the individual values; every read or write site is handed the width.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::FontIoError;

/// Byte width of the chunk-index encoding for one IFTB table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChunkIndexWidth {
    /// Single byte, for tables with fewer than 256 chunks.
    One = 1,
    /// Two bytes, for tables with fewer than 65536 chunks.
    Two = 2,
    /// Three bytes, for anything larger.
    Three = 3,
}

impl ChunkIndexWidth {
    /// Selects the width that covers every index below `chunk_count`.
    pub fn for_chunk_count(chunk_count: u32) -> Self {
        if chunk_count < 0x100 {
            ChunkIndexWidth::One
        } else if chunk_count < 0x1_0000 {
            ChunkIndexWidth::Two
        } else {
            ChunkIndexWidth::Three
        }
    }

    /// The number of bytes one encoded index occupies.
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// The largest value this width can encode.
    pub fn max_value(self) -> u32 {
        match self {
            ChunkIndexWidth::One => 0xff,
            ChunkIndexWidth::Two => 0xffff,
            ChunkIndexWidth::Three => 0xff_ffff,
        }
    }
}

/// Extends readers with chunk-index decoding.
pub trait ReadChunkIndex: Read {
    /// Reads one chunk index of the given width.
    fn read_chunk_index(
        &mut self,
        width: ChunkIndexWidth,
    ) -> Result<u32, FontIoError> {
        let value = match width {
            ChunkIndexWidth::One => self.read_u8()? as u32,
            ChunkIndexWidth::Two => self.read_u16::<BigEndian>()? as u32,
            ChunkIndexWidth::Three => self.read_u24::<BigEndian>()?,
        };
        Ok(value)
    }
}

impl<T: Read + ?Sized> ReadChunkIndex for T {}

/// Extends writers with chunk-index encoding.
pub trait WriteChunkIndex: Write {
    /// Writes one chunk index of the given width, failing if the value
    /// does not fit.
    fn write_chunk_index(
        &mut self,
        width: ChunkIndexWidth,
        value: u32,
    ) -> Result<(), FontIoError> {
        if value > width.max_value() {
            return Err(FontIoError::ChunkIndexOutOfRange {
                value,
                width: width.bytes() as u8,
            });
        }
        match width {
            ChunkIndexWidth::One => self.write_u8(value as u8)?,
            ChunkIndexWidth::Two => self.write_u16::<BigEndian>(value as u16)?,
            ChunkIndexWidth::Three => self.write_u24::<BigEndian>(value)?,
        }
        Ok(())
    }
}

impl<T: Write + ?Sized> WriteChunkIndex for T {}

#[cfg(test)]
#[path = "chunk_index_test.rs"]
mod tests;
