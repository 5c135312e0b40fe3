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

//! Packaging and client-side chunk resolution for per-block Incremental
//! Font Transfer (IFTB) fonts.
//!
//! An IFTB-enabled font is an ordinary sfnt container carrying a private
//! 'IFTB' table, which records how the font's glyph data has been split
//! into numbered chunks that a client fetches on demand. This crate covers
//! both ends of that arrangement: the packager side
//! ([`encoder::Encoder`]), which partitions glyphs into chunks from a
//! [`config::ChunkingConfig`] and emits the augmented font plus the chunk
//! payload blobs, and the client side ([`client::Session`]), which decodes
//! the table and answers "which chunks do I still need for this text?".
//!
//! # Example
//! ```
//! use iftb_font_handler::uri::render_chunk_uri;
//!
//! let uri = render_chunk_uri("chunks/$4$3$2$1.br", 0x0abc).unwrap();
//! assert_eq!(uri, "chunks/0abc.br");
//! ```

use std::{
    io::{Read, Seek, Write},
    num::Wrapping,
};

use tag::FontTag;

pub mod chunk_index;
pub mod chunk_set;
pub mod client;
#[cfg(feature = "compression")]
pub mod compression;
pub mod config;
pub mod encoder;
pub mod error;
pub(crate) mod magic;
pub mod resolver;
pub mod sfnt;
pub mod tag;
pub mod uri;
pub(crate) mod utils;

/// Trait for computing a checksum on SFNT data.
pub trait FontDataChecksum {
    /// Computes the checksum for the SFNT data.
    fn checksum(&self) -> Wrapping<u32>;
}

/// Trait for reading SFNT data from a reader.
pub trait FontDataRead
where
    Self: Sized,
{
    /// The error type for reading the data.
    type Error;
    /// Reads the font data from a reader.
    fn from_reader<T: Read + Seek + ?Sized>(
        reader: &mut T,
    ) -> Result<Self, Self::Error>;
}

/// Trait for reading SFNT data from a reader, with exact size information.
pub trait FontDataExactRead
where
    Self: Sized,
{
    /// The error type for reading the data.
    type Error;

    /// Reads the font data from a reader, starting at a specific offset and
    /// reading a specific length.
    fn from_reader_exact<T: Read + Seek + ?Sized>(
        reader: &mut T,
        offset: u64,
        size: usize,
    ) -> Result<Self, Self::Error>;
}

/// Trait for writing SFNT data to a writer.
pub trait FontDataWrite {
    /// The error type for writing the data.
    type Error;
    /// Writes the SFNT data to a writer.
    fn write<TDest: Write + ?Sized>(
        &self,
        dest: &mut TDest,
    ) -> Result<(), Self::Error>;
}

/// Trait for writing SFNT data to a writer, with the ability to modify the
/// object.
pub trait MutFontDataWrite {
    /// The error type for writing the data.
    type Error;
    /// Writes the SFNT data to a writer.
    fn write<TDest: Write + ?Sized>(
        &mut self,
        dest: &mut TDest,
    ) -> Result<(), Self::Error>;
}

/// A font header.
pub trait FontHeader: FontDataRead + FontDataChecksum + FontDataWrite {
    /// Returns the number of tables in the font.
    fn num_tables(&self) -> u16;
}

/// A directory in a font.
pub trait FontDirectory:
    FontDataExactRead + FontDataChecksum + FontDataWrite
{
    /// The type of entry in the directory.
    type Entry: FontDirectoryEntry;
    /// Reads the font directory from a reader, with a specified number of
    /// entries.
    fn from_reader_with_count<T: Read + Seek + ?Sized>(
        reader: &mut T,
        entry_count: usize,
    ) -> Result<Self, <Self as FontDataExactRead>::Error>;
    /// Returns a reference to the entries in this directory.
    fn entries(&self) -> &[Self::Entry];
    /// Returns an array which contains the indices of this directory's entries,
    /// arranged in increasing order of `offset` field.
    fn physical_order(&self) -> Vec<&Self::Entry>;
}

/// A directory entry in a font directory.
pub trait FontDirectoryEntry:
    FontDataRead + FontDataChecksum + FontDataWrite
{
}

/// A table in a font.
#[allow(clippy::len_without_is_empty)] // Doesn't make sense for this trait to have is_empty.
pub trait FontTable: FontDataChecksum + FontDataWrite {
    /// Returns the length of the table.
    fn len(&self) -> u32;
    /// Returns whether the table is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Represents a font.
pub trait Font: FontDataRead + MutFontDataWrite {
    /// The header type for the font.
    type Header: FontHeader;
    /// The directory type for the font.
    type Directory: FontDirectory;
    /// Checks if the font contains a specific table.
    fn contains_table(&self, tag: &FontTag) -> bool;
    /// Returns the font header.
    fn header(&self) -> &Self::Header;
    /// Returns the font directory.
    fn directory(&self) -> &Self::Directory;
}
