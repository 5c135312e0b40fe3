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

//! 'IFTB' font table.
//!
//! The private table that makes a font incrementally transferable
//! per-block. It records how many chunks the glyph data was split into,
//! which chunk holds each glyph (gidMap), which chunks are locally
//! available (chunkSet), the URI templates chunks are fetched from, and
//! two optional sub-tables: per-chunk end offsets within a CFF/CFF2
//! CharStrings INDEX, and a feature map tying feature tags to companion
//! chunks.
//!
//! On disk the three sub-table offsets are relative to the table start
//! and are back-patched once the sub-tables have been laid down. All
//! chunk indices use the table-global variable-width codec chosen by
//! `chunkCount`.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::{Cursor, Read, Seek, SeekFrom, Write},
    num::Wrapping,
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    chunk_index::{ChunkIndexWidth, ReadChunkIndex, WriteChunkIndex},
    chunk_set::ChunkSet,
    error::FontIoError,
    resolver,
    tag::FontTag,
    uri::render_chunk_uri,
    utils, FontDataChecksum, FontDataExactRead, FontDataWrite, FontTable,
};

/// The supported major version.
const IFTB_MAJOR_VERSION: u16 = 0;
/// The supported minor version.
const IFTB_MINOR_VERSION: u16 = 1;
/// Bytes from the table start up to and including CFFCharStringsOffset.
const FIXED_HEADER_SIZE: u32 = 34;
/// Position of the three back-patched sub-table offsets.
const REL_OFFSETS_SIZE: u32 = 12;

/// One feature's companion-chunk declaration.
///
/// `ranges[j]` names an inclusive range of *primary* chunks; whenever any
/// chunk in that range is in play, feature chunk `start_index + j` must
/// accompany it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeatureRanges {
    /// First chunk index holding this feature's split-out glyphs.
    pub start_index: u32,
    /// Primary-chunk ranges, one per companion chunk.
    pub ranges: Vec<(u32, u32)>,
}

/// 'IFTB' font table, fully loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct TableIFTB {
    /// Major version; only 0 is defined.
    pub major_version: u16,
    /// Minor version; only 1 is defined.
    pub minor_version: u16,
    /// Opaque font identity, matched against chunk files on apply.
    pub id: [u32; 4],
    /// Reserved flag bits.
    pub flags: u16,
    /// Total number of chunks, including the base chunk 0.
    pub chunk_count: u16,
    /// The font's glyph count (maxp.numGlyphs).
    pub glyph_count: u16,
    /// Byte offset of the CharStrings INDEX within the CFF/CFF2 table,
    /// or 0 for glyf-flavored fonts.
    pub cff_charstrings_offset: u32,
    /// Local chunk availability, one bit per chunk.
    pub chunk_set: ChunkSet,
    /// URI template for per-chunk files.
    pub files_uri: String,
    /// URI template for the combined range-request file.
    pub range_file_uri: String,
    /// Chunk index per glyph; entry 0 (.notdef) is always chunk 0.
    pub gid_map: Vec<u32>,
    /// End offset (exclusive) of each chunk within the CharStrings
    /// INDEX; empty for glyf-flavored fonts.
    pub chunk_offsets: Vec<u32>,
    /// Feature tag to companion-chunk declarations.
    pub feature_map: BTreeMap<u32, FeatureRanges>,
}

impl TableIFTB {
    /// Creates a table for a freshly partitioned font: versions set, the
    /// base chunk marked available, everything else empty.
    pub fn new(chunk_count: u16, glyph_count: u16) -> Self {
        let mut chunk_set = ChunkSet::new(chunk_count as u32);
        chunk_set.set(0, true);
        Self {
            major_version: IFTB_MAJOR_VERSION,
            minor_version: IFTB_MINOR_VERSION,
            id: [0; 4],
            flags: 0,
            chunk_count,
            glyph_count,
            cff_charstrings_offset: 0,
            chunk_set,
            files_uri: String::new(),
            range_file_uri: String::new(),
            gid_map: vec![0; glyph_count as usize],
            chunk_offsets: Vec::new(),
            feature_map: BTreeMap::new(),
        }
    }

    /// The chunk-index codec width implied by this table's chunk count.
    pub fn chunk_index_width(&self) -> ChunkIndexWidth {
        ChunkIndexWidth::for_chunk_count(self.chunk_count as u32)
    }

    /// The first gid whose chunk assignment is stored explicitly; all
    /// earlier gids live in chunk 0.
    fn first_mapped_gid(&self) -> u16 {
        self.gid_map
            .iter()
            .position(|&chunk| chunk != 0)
            .unwrap_or(self.gid_map.len()) as u16
    }

    /// Checks the structural invariants that must hold before the table
    /// can be serialized.
    pub fn validate(&self) -> Result<(), FontIoError> {
        if self.chunk_count == 0 {
            return Err(FontIoError::ZeroChunkCount);
        }
        if self.chunk_set.chunk_count() != self.chunk_count as u32 {
            return Err(FontIoError::InvalidChunkSetLength {
                expected: ChunkSet::packed_len_for(self.chunk_count as u32),
                got: self.chunk_set.packed_len(),
            });
        }
        if self.gid_map.len() != self.glyph_count as usize {
            return Err(FontIoError::InvalidGidMapLength {
                expected: self.glyph_count as usize,
                got: self.gid_map.len(),
            });
        }
        for (gid, &chunk) in self.gid_map.iter().enumerate() {
            if chunk >= self.chunk_count as u32 {
                return Err(FontIoError::GidChunkOutOfRange {
                    gid: gid as u16,
                    chunk,
                    chunk_count: self.chunk_count,
                });
            }
        }
        if !self.gid_map.is_empty() && self.gid_map[0] != 0 {
            return Err(FontIoError::GidChunkOutOfRange {
                gid: 0,
                chunk: self.gid_map[0],
                chunk_count: self.chunk_count,
            });
        }
        if !self.chunk_offsets.is_empty() {
            if self.chunk_offsets.len() != self.chunk_count as usize {
                return Err(FontIoError::InvalidChunkOffsetCount {
                    expected: self.chunk_count as usize,
                    got: self.chunk_offsets.len(),
                });
            }
            for i in 1..self.chunk_offsets.len() {
                if self.chunk_offsets[i] < self.chunk_offsets[i - 1] {
                    return Err(FontIoError::ChunkOffsetsNotMonotonic(i));
                }
            }
        }
        for (&feature, ranges) in &self.feature_map {
            for &(start, end) in &ranges.ranges {
                if start < 1 || start > end || end >= self.chunk_count as u32 {
                    return Err(FontIoError::InvalidFeatureRange {
                        feature,
                        start,
                        end,
                    });
                }
            }
        }
        Ok(())
    }

    /// Serializes the table at `base_offset` in the destination stream,
    /// returning the (unpadded) table length.
    ///
    /// The three sub-table offsets are written as zero placeholders and
    /// back-patched once each sub-table's position is known. The stream
    /// is left positioned at the end of the table.
    pub fn compile<T: Write + Seek + ?Sized>(
        &self,
        dest: &mut T,
        base_offset: u32,
    ) -> Result<u32, FontIoError> {
        self.validate()?;
        let width = self.chunk_index_width();
        let base = base_offset as u64;

        dest.seek(SeekFrom::Start(base))?;
        dest.write_u16::<BigEndian>(self.major_version)?;
        dest.write_u16::<BigEndian>(self.minor_version)?;
        dest.write_u32::<BigEndian>(0)?; // reserved
        for word in self.id {
            dest.write_u32::<BigEndian>(word)?;
        }
        dest.write_u16::<BigEndian>(self.flags)?;
        dest.write_u16::<BigEndian>(self.chunk_count)?;
        dest.write_u16::<BigEndian>(self.glyph_count)?;
        dest.write_u32::<BigEndian>(self.cff_charstrings_offset)?;

        // Placeholders for the three sub-table offsets.
        let rel_offsets_pos = dest.stream_position()?;
        dest.write_u32::<BigEndian>(0)?;
        dest.write_u32::<BigEndian>(0)?;
        dest.write_u32::<BigEndian>(0)?;

        self.chunk_set.write(dest)?;
        write_uri(dest, &self.files_uri)?;
        write_uri(dest, &self.range_file_uri)?;

        let gid_map_offset = (dest.stream_position()? - base) as u32;
        let first_mapped = self.first_mapped_gid();
        dest.write_u16::<BigEndian>(first_mapped)?;
        for &chunk in &self.gid_map[first_mapped as usize..] {
            dest.write_chunk_index(width, chunk)?;
        }

        let mut chunk_offset_table_offset = 0_u32;
        if !self.chunk_offsets.is_empty() {
            chunk_offset_table_offset = (dest.stream_position()? - base) as u32;
            for &offset in &self.chunk_offsets {
                dest.write_u32::<BigEndian>(offset)?;
            }
        }

        let mut feature_map_offset = 0_u32;
        if !self.feature_map.is_empty() {
            feature_map_offset = (dest.stream_position()? - base) as u32;
            dest.write_u16::<BigEndian>(self.feature_map.len() as u16)?;
            for (&feature, ranges) in &self.feature_map {
                dest.write_u32::<BigEndian>(feature)?;
                dest.write_chunk_index(width, ranges.start_index)?;
                dest.write_chunk_index(width, ranges.ranges.len() as u32)?;
            }
            for ranges in self.feature_map.values() {
                for &(start, end) in &ranges.ranges {
                    dest.write_chunk_index(width, start)?;
                    dest.write_chunk_index(width, end)?;
                }
            }
        }

        let total_len = (dest.stream_position()? - base) as u32;
        dest.seek(SeekFrom::Start(rel_offsets_pos))?;
        dest.write_u32::<BigEndian>(gid_map_offset)?;
        dest.write_u32::<BigEndian>(chunk_offset_table_offset)?;
        dest.write_u32::<BigEndian>(feature_map_offset)?;
        dest.seek(SeekFrom::Start(base + total_len as u64))?;
        Ok(total_len)
    }

    /// Serializes the table into a fresh buffer.
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, FontIoError> {
        let mut cursor = Cursor::new(Vec::new());
        self.compile(&mut cursor, 0)?;
        Ok(cursor.into_inner())
    }

    /// Computes the chunks that must be fetched to render `unicodes` with
    /// `features`, given this table's local chunk set.
    ///
    /// `uni_map` is the client-side code-point to chunk-index map built
    /// from the font's cmap and this table's gidMap.
    pub fn missing_chunks(
        &self,
        uni_map: &BTreeMap<u32, u32>,
        unicodes: &[u32],
        features: &[u32],
    ) -> BTreeSet<u32> {
        resolver::missing_chunks(
            uni_map,
            &self.feature_map,
            &self.chunk_set,
            unicodes,
            features,
        )
    }

    /// The end offset (exclusive) of chunk `index` within the CharStrings
    /// INDEX, or 0 when chunk offsets are absent or the index is out of
    /// range.
    pub fn chunk_offset(&self, index: u32) -> u32 {
        if index < 1 || index as usize >= self.chunk_offsets.len() {
            return 0;
        }
        self.chunk_offsets[index as usize - 1]
    }

    /// The `(start, end)` byte range of chunk `index` within the
    /// CharStrings INDEX, or `(0, 0)` when chunk offsets are absent or
    /// the index is out of range. Chunk 0 has no range; it is the base.
    pub fn chunk_range(&self, index: u32) -> (u32, u32) {
        if index < 1 || index as usize >= self.chunk_offsets.len() {
            return (0, 0);
        }
        (
            self.chunk_offsets[index as usize - 1],
            self.chunk_offsets[index as usize],
        )
    }

    /// Renders the fetch URI for the given chunk.
    pub fn chunk_uri(&self, index: u32) -> Result<String, FontIoError> {
        render_chunk_uri(&self.files_uri, index)
    }

    /// The (unpadded) serialized size of the table.
    fn byte_len(&self) -> u32 {
        let width = self.chunk_index_width().bytes() as u32;
        let mut len = FIXED_HEADER_SIZE + REL_OFFSETS_SIZE;
        len += self.chunk_set.packed_len() as u32;
        len += 1 + self.files_uri.len() as u32;
        len += 1 + self.range_file_uri.len() as u32;
        let mapped = self.glyph_count.saturating_sub(self.first_mapped_gid());
        len += 2 + mapped as u32 * width;
        if !self.chunk_offsets.is_empty() {
            len += self.chunk_offsets.len() as u32 * 4;
        }
        if !self.feature_map.is_empty() {
            len += 2;
            for ranges in self.feature_map.values() {
                len += 4 + 2 * width;
                len += ranges.ranges.len() as u32 * 2 * width;
            }
        }
        len
    }
}

/// Writes a length-prefixed URI string (prefix byte holds `len - 1`).
fn write_uri<T: Write + ?Sized>(
    dest: &mut T,
    uri: &str,
) -> Result<(), FontIoError> {
    if uri.is_empty() || uri.len() > 256 {
        return Err(FontIoError::InvalidUriLength(uri.len()));
    }
    dest.write_u8((uri.len() - 1) as u8)?;
    dest.write_all(uri.as_bytes())?;
    Ok(())
}

/// Reads a length-prefixed URI string, bounds-checked against the space
/// remaining in the enclosing table.
fn read_uri<T: Read + Seek + ?Sized>(
    reader: &mut T,
    table_start: u64,
    table_size: usize,
) -> Result<String, FontIoError> {
    let consumed = (reader.stream_position()? - table_start) as usize;
    if consumed >= table_size {
        return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
    }
    let declared = reader.read_u8()? as usize + 1;
    let available = table_size - consumed - 1;
    if declared > available {
        return Err(FontIoError::UriOutOfBounds {
            declared,
            available,
        });
    }
    let mut bytes = vec![0; declared];
    reader.read_exact(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

impl FontDataExactRead for TableIFTB {
    type Error = FontIoError;

    fn from_reader_exact<T: Read + Seek + ?Sized>(
        reader: &mut T,
        offset: u64,
        size: usize,
    ) -> Result<Self, Self::Error> {
        if size < (FIXED_HEADER_SIZE + REL_OFFSETS_SIZE) as usize {
            return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
        }
        reader.seek(SeekFrom::Start(offset))?;
        let major_version = reader.read_u16::<BigEndian>()?;
        if major_version != IFTB_MAJOR_VERSION {
            return Err(FontIoError::InvalidIftbMajorVersion(major_version));
        }
        let minor_version = reader.read_u16::<BigEndian>()?;
        if minor_version != IFTB_MINOR_VERSION {
            return Err(FontIoError::InvalidIftbMinorVersion(minor_version));
        }
        let _reserved = reader.read_u32::<BigEndian>()?;
        let mut id = [0_u32; 4];
        for word in &mut id {
            *word = reader.read_u32::<BigEndian>()?;
        }
        let flags = reader.read_u16::<BigEndian>()?;
        let chunk_count = reader.read_u16::<BigEndian>()?;
        let glyph_count = reader.read_u16::<BigEndian>()?;
        let cff_charstrings_offset = reader.read_u32::<BigEndian>()?;
        let gid_map_offset = reader.read_u32::<BigEndian>()? as usize;
        let chunk_offset_table_offset = reader.read_u32::<BigEndian>()? as usize;
        let feature_map_offset = reader.read_u32::<BigEndian>()? as usize;
        let width = ChunkIndexWidth::for_chunk_count(chunk_count as u32);

        let set_len = ChunkSet::packed_len_for(chunk_count as u32);
        if (FIXED_HEADER_SIZE + REL_OFFSETS_SIZE) as usize + set_len > size {
            return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
        }
        let chunk_set =
            ChunkSet::from_reader_with_count(reader, chunk_count as u32)?;

        let files_uri = read_uri(reader, offset, size)?;
        let range_file_uri = read_uri(reader, offset, size)?;

        // gidMap sub-table; a zero offset means every glyph is in the
        // base chunk.
        let mut gid_map = vec![0_u32; glyph_count as usize];
        if gid_map_offset != 0 {
            if gid_map_offset + 2 > size {
                return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
            }
            reader.seek(SeekFrom::Start(offset + gid_map_offset as u64))?;
            let first_mapped = reader.read_u16::<BigEndian>()?;
            if first_mapped > glyph_count {
                return Err(FontIoError::FirstMappedGidOutOfRange {
                    first_mapped,
                    glyph_count,
                });
            }
            let mapped = (glyph_count - first_mapped) as usize;
            if gid_map_offset + 2 + mapped * width.bytes() > size {
                return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
            }
            for gid in first_mapped..glyph_count {
                let chunk = reader.read_chunk_index(width)?;
                if chunk >= chunk_count as u32 {
                    return Err(FontIoError::GidChunkOutOfRange {
                        gid,
                        chunk,
                        chunk_count,
                    });
                }
                gid_map[gid as usize] = chunk;
            }
        }

        let mut chunk_offsets = Vec::new();
        if chunk_offset_table_offset != 0 {
            let needed = chunk_count as usize * 4;
            if chunk_offset_table_offset + needed > size {
                return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
            }
            reader.seek(SeekFrom::Start(
                offset + chunk_offset_table_offset as u64,
            ))?;
            chunk_offsets.reserve(chunk_count as usize);
            for i in 0..chunk_count as usize {
                let end = reader.read_u32::<BigEndian>()?;
                if i > 0 && end < chunk_offsets[i - 1] {
                    return Err(FontIoError::ChunkOffsetsNotMonotonic(i));
                }
                chunk_offsets.push(end);
            }
        }

        let mut feature_map = BTreeMap::new();
        if feature_map_offset != 0 {
            if feature_map_offset + 2 > size {
                return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
            }
            reader.seek(SeekFrom::Start(offset + feature_map_offset as u64))?;
            let feature_count = reader.read_u16::<BigEndian>()? as usize;
            let record_size = 4 + 2 * width.bytes();
            if feature_map_offset + 2 + feature_count * record_size > size {
                return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
            }
            // Header block first, then the concatenated ranges in record
            // order.
            let mut records = Vec::with_capacity(feature_count);
            for _ in 0..feature_count {
                let feature = reader.read_u32::<BigEndian>()?;
                let start_index = reader.read_chunk_index(width)?;
                let range_count = reader.read_chunk_index(width)? as usize;
                records.push((feature, start_index, range_count));
            }
            let total_ranges: usize =
                records.iter().map(|&(_, _, count)| count).sum();
            let ranges_start = (reader.stream_position()? - offset) as usize;
            if ranges_start + total_ranges * 2 * width.bytes() > size {
                return Err(FontIoError::LoadTableTruncated(FontTag::IFTB));
            }
            for (feature, start_index, range_count) in records {
                let mut ranges = Vec::with_capacity(range_count);
                for _ in 0..range_count {
                    let start = reader.read_chunk_index(width)?;
                    let end = reader.read_chunk_index(width)?;
                    if start < 1 || start > end || end >= chunk_count as u32 {
                        return Err(FontIoError::InvalidFeatureRange {
                            feature,
                            start,
                            end,
                        });
                    }
                    ranges.push((start, end));
                }
                feature_map.insert(
                    feature,
                    FeatureRanges {
                        start_index,
                        ranges,
                    },
                );
            }
        }

        Ok(Self {
            major_version,
            minor_version,
            id,
            flags,
            chunk_count,
            glyph_count,
            cff_charstrings_offset,
            chunk_set,
            files_uri,
            range_file_uri,
            gid_map,
            chunk_offsets,
            feature_map,
        })
    }
}

impl FontDataWrite for TableIFTB {
    type Error = FontIoError;

    fn write<TDest: Write + ?Sized>(
        &self,
        dest: &mut TDest,
    ) -> Result<(), Self::Error> {
        let bytes = self.to_bytes()?;
        dest.write_all(&bytes)
            .map_err(FontIoError::FailedToWriteTableData)?;
        let trailing = bytes.len() % 4;
        if trailing > 0 {
            let padding = vec![0; 4 - trailing];
            dest.write_all(&padding)
                .map_err(FontIoError::FailedToWriteTableData)?;
        }
        Ok(())
    }
}

impl FontDataChecksum for TableIFTB {
    fn checksum(&self) -> Wrapping<u32> {
        // An unserializable table surfaces its error at write time; the
        // checksum of one is never used.
        match self.to_bytes() {
            Ok(bytes) => utils::checksum(&bytes),
            Err(_) => Wrapping(0),
        }
    }
}

impl FontTable for TableIFTB {
    fn len(&self) -> u32 {
        self.byte_len()
    }
}

impl std::fmt::Display for TableIFTB {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "majorVersion: {}", self.major_version)?;
        writeln!(f, "minorVersion: {}", self.minor_version)?;
        writeln!(
            f,
            "ID: {:08x} {:08x} {:08x} {:08x}",
            self.id[0], self.id[1], self.id[2], self.id[3]
        )?;
        writeln!(f, "chunkCount: {}", self.chunk_count)?;
        writeln!(f, "glyphCount: {}", self.glyph_count)?;
        writeln!(f, "chunkSet indexes: {}", self.chunk_set)?;
        if !self.feature_map.is_empty() {
            write!(f, "Separately mapped features: ")?;
            let mut printed = false;
            for &feature in self.feature_map.keys() {
                if printed {
                    write!(f, ", ")?;
                }
                printed = true;
                let tag = feature.to_be_bytes();
                write!(f, "{}", String::from_utf8_lossy(&tag))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "filesURI: {}", self.files_uri)?;
        writeln!(f, "rangeFileURI: {}", self.range_file_uri)
    }
}

#[cfg(test)]
#[path = "iftb_test.rs"]
mod tests;
