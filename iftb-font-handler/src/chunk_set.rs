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

//! Chunk-availability bitset.
//!
//! One bit per chunk, packed LSB-first within each byte: bit `i` set means
//! chunk `i` is locally available. The packed form is exactly
//! `ceil(chunk_count / 8)` bytes and bits at or past the chunk count are
//! always zero.

use std::io::{Read, Write};

use crate::error::FontIoError;

/// Availability bitset over a font's chunks.
///
/// This is the one piece of a decoded IFTB table a client mutates: bits
/// get set as chunks are fetched and applied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChunkSet {
    chunk_count: u32,
    bytes: Vec<u8>,
}

impl ChunkSet {
    /// Creates an all-clear set for the given number of chunks.
    pub fn new(chunk_count: u32) -> Self {
        Self {
            chunk_count,
            bytes: vec![0; Self::packed_len_for(chunk_count)],
        }
    }

    /// The packed byte length for a chunk count.
    pub(crate) fn packed_len_for(chunk_count: u32) -> usize {
        (chunk_count as usize + 7) / 8
    }

    /// The number of chunks this set covers.
    pub fn chunk_count(&self) -> u32 {
        self.chunk_count
    }

    /// The packed byte length of this set.
    pub fn packed_len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the given chunk is marked available. Out-of-range indices
    /// are never available.
    pub fn contains(&self, index: u32) -> bool {
        if index >= self.chunk_count {
            return false;
        }
        self.bytes[index as usize / 8] & (1 << (index % 8)) != 0
    }

    /// Marks the given chunk available (or not). Returns false if the
    /// index is out of range.
    pub fn set(&mut self, index: u32, available: bool) -> bool {
        if index >= self.chunk_count {
            return false;
        }
        let mask = 1u8 << (index % 8);
        if available {
            self.bytes[index as usize / 8] |= mask;
        } else {
            self.bytes[index as usize / 8] &= !mask;
        }
        true
    }

    /// Iterates the indices of available chunks, ascending.
    pub fn ones(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.chunk_count).filter(|&i| self.contains(i))
    }

    /// Reads a packed set covering `chunk_count` chunks. Bits past the
    /// chunk count are dropped, keeping the trailing-bits invariant even
    /// for sloppy producers.
    pub fn from_reader_with_count<T: Read + ?Sized>(
        reader: &mut T,
        chunk_count: u32,
    ) -> Result<Self, FontIoError> {
        let mut bytes = vec![0; Self::packed_len_for(chunk_count)];
        reader.read_exact(&mut bytes)?;
        let mut set = Self { chunk_count, bytes };
        set.mask_tail();
        Ok(set)
    }

    /// Writes the packed form.
    pub fn write<TDest: Write + ?Sized>(
        &self,
        dest: &mut TDest,
    ) -> Result<(), FontIoError> {
        dest.write_all(&self.bytes)
            .map_err(FontIoError::FailedToWriteTableData)?;
        Ok(())
    }

    fn mask_tail(&mut self) {
        let used = self.chunk_count as usize % 8;
        if used != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= (1u8 << used) - 1;
            }
        }
    }
}

impl std::fmt::Display for ChunkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut printed = false;
        for index in self.ones() {
            if printed {
                write!(f, ", ")?;
            }
            printed = true;
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "chunk_set_test.rs"]
mod tests;
