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

//! Various utilities for working with fonts.

use std::{mem::size_of, num::Wrapping};

use byteorder::{BigEndian, ByteOrder};

/// Round the given value up to the next multiple of four (4).
pub(crate) fn align_to_four(size: u32) -> u32 {
    (size + 3) & (!3)
}

/// Computes a 32-bit big-endian OpenType-style checksum over the given
/// bytes, treating them as a sequence of u32 words with any trailing
/// fragment zero-padded out to a full word.
///
/// # Remarks
/// Trailing pad bytes never change the sum, so tables can be checksummed
/// from their unpadded contents.
pub(crate) fn checksum(bytes: &[u8]) -> Wrapping<u32> {
    let words = bytes.chunks_exact(size_of::<u32>());
    // Zero-extend whatever is left over into one last word.
    let mut tail = [0u8; size_of::<u32>()];
    tail[..words.remainder().len()].copy_from_slice(words.remainder());
    words.fold(Wrapping(BigEndian::read_u32(&tail)), |cksum, word| {
        cksum + Wrapping(BigEndian::read_u32(word))
    })
}

/// Assembles two u16 values (with `hi` being the more-significant u16
/// halfword, and `lo` being the less-significant u16 halfword) into a u32
/// checksum term.
pub(crate) fn u32_from_u16_pair(hi: u16, lo: u16) -> Wrapping<u32> {
    Wrapping(((hi as u32) << 16) + lo as u32)
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
