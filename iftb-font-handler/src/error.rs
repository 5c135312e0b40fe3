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

//! Errors related to font I/O.

use super::tag::FontTag;

/// Errors related to font I/O.
#[derive(Debug, thiserror::Error)]
pub enum FontIoError {
    /// An error occurred while compressing/decompressing a chunk payload.
    #[cfg(feature = "compression")]
    #[error(transparent)]
    CompressionError(#[from] crate::compression::CompressionError),
    /// A chunk index does not fit the table-global codec width.
    #[error("Chunk index {value} does not fit in {width} byte(s)")]
    ChunkIndexOutOfRange {
        /// The value that was to be written.
        value: u32,
        /// The codec width in bytes (1, 2 or 3).
        width: u8,
    },
    /// The chunk-offset table is not non-decreasing.
    #[error("Chunk offset at index {0} is smaller than its predecessor")]
    ChunkOffsetsNotMonotonic(usize),
    /// A checksum stored in the table directory disagrees with the table
    /// contents.
    #[error("Checksum mismatch for table {tag}; expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// The table whose checksum failed verification.
        tag: FontTag,
        /// The checksum recorded in the directory entry.
        expected: u32,
        /// The checksum computed over the table contents.
        computed: u32,
    },
    /// A table directory entry points outside the font file.
    #[error("Directory entry for {tag} (offset {offset}, length {length}) extends past the end of the {file_size}-byte file")]
    DirectoryEntryOutOfBounds {
        /// The offending table.
        tag: FontTag,
        /// The entry's offset field.
        offset: u32,
        /// The entry's length field.
        length: u32,
        /// The total file size.
        file_size: u64,
    },
    /// A code point was assigned to more than one point group.
    #[error("Code point U+{0:04X} is assigned to more than one point group")]
    DuplicatePoint(u32),
    /// Failed to write the font table data.
    #[error("Failed to write font table data")]
    FailedToWriteTableData(std::io::Error),
    /// A gidMap entry names a chunk at or past the chunk count.
    #[error("Glyph {gid} is mapped to chunk {chunk}, but the font only has {chunk_count} chunks")]
    GidChunkOutOfRange {
        /// The glyph whose mapping is invalid.
        gid: u16,
        /// The chunk index recorded for the glyph.
        chunk: u32,
        /// The table's chunk count.
        chunk_count: u16,
    },
    /// The gidMap sub-table's first mapped gid exceeds the glyph count.
    #[error("First mapped gid {first_mapped} exceeds the glyph count {glyph_count}")]
    FirstMappedGidOutOfRange {
        /// The firstMappedGid read from the sub-table.
        first_mapped: u16,
        /// The table's glyph count.
        glyph_count: u16,
    },
    /// The chunk-offset table does not hold exactly chunkCount entries.
    #[error("Chunk-offset table must hold {expected} entries, got {got}")]
    InvalidChunkOffsetCount {
        /// The table's chunk count.
        expected: usize,
        /// The number of offsets present.
        got: usize,
    },
    /// The chunk set's packed length disagrees with the chunk count.
    #[error("Chunk set must pack to {expected} bytes, got {got}")]
    InvalidChunkSetLength {
        /// ceil(chunkCount / 8).
        expected: usize,
        /// The packed length present.
        got: usize,
    },
    /// The gidMap does not hold exactly glyphCount entries.
    #[error("gidMap must hold {expected} entries, got {got}")]
    InvalidGidMapLength {
        /// The table's glyph count.
        expected: usize,
        /// The number of entries present.
        got: usize,
    },
    /// A feature-map range violates `1 <= start <= end < chunkCount`.
    #[error("Feature {feature:#010x} carries invalid chunk range [{start}, {end}]")]
    InvalidFeatureRange {
        /// The feature tag.
        feature: u32,
        /// Range start, inclusive.
        start: u32,
        /// Range end, inclusive.
        end: u32,
    },
    /// The header's table count cannot fit in the file.
    #[error("The header claims {num_tables} tables, more than the {file_size}-byte file can hold")]
    ImplausibleTableCount {
        /// The numTables field from the header.
        num_tables: u16,
        /// The total file size.
        file_size: u64,
    },
    /// The magic number in the 'head' table is invalid.
    #[error("Invalid magic number in the 'head' table; expected 0x5f0f3cf5, got {0}")]
    InvalidHeadMagicNumber(u32),
    /// An invalid (or unsupported) major IFTB version.
    #[error("Invalid major version specified for a valid IFTB table: {0}")]
    InvalidIftbMajorVersion(u16),
    /// An invalid (or unsupported) minor IFTB version.
    #[error("Invalid minor version specified for a valid IFTB table: {0}")]
    InvalidIftbMinorVersion(u16),
    /// The specified size for reading a table directory entry record is
    /// invalid.
    #[error("Invalid size for a table directory entry record, expected {expected} bytes, got {got}")]
    InvalidSizeForDirectoryEntry {
        /// Expected size
        expected: usize,
        /// The actual size specified
        got: usize,
    },
    /// The specified size for reading a directory is not 4-byte aligned.
    #[error("Invalid size for a table directory entry record, expected a 4-byte aligned request, got {0}")]
    InvalidSizeForDirectory(usize),
    /// The specified size for reading a header is invalid.
    #[error("Invalid size for a header, expected 12 bytes, got {0}")]
    InvalidSizeForHeader(usize),
    /// The specified size for reading a tag is invalid.
    #[error("Invalid size for a tag, expected 4 bytes, got {0}")]
    InvalidSizeForTAG(usize),
    /// An IFTB URI string must be 1 to 256 bytes long.
    #[error("IFTB URI strings must be 1 to 256 bytes long, got {0}")]
    InvalidUriLength(usize),
    /// An error occurred while reading or writing the font data.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// The font has no IFTB table.
    #[error("The font does not carry an IFTB table")]
    IftbTableMissing,
    /// The font table is truncated.
    #[error("The font table is truncated: {0}")]
    LoadTableTruncated(FontTag),
    /// Save errors.
    #[error("Error saving the font: {0}")]
    SaveError(#[from] FontSaveError),
    /// An error occurred while generating a string from UTF-8 bytes.
    #[error("Error occurred while generating a string from UTF-8 bytes: {0}")]
    StringFromUtf8(#[from] std::string::FromUtf8Error),
    /// The partitioner produced more chunks than the table can number.
    #[error("Partitioning produced {0} chunks, which exceeds the 16-bit chunk count")]
    TooManyChunks(u32),
    /// A URI template ends in the middle of an escape sequence.
    #[error("URI template ends with an unterminated '$' escape")]
    UnterminatedUriTemplate,
    /// A URI template contains an escape other than `$$` or `$1`..`$8`.
    #[error("URI template contains invalid escape '${0}'")]
    BadUriTemplate(char),
    /// A URI's declared length runs past the end of the enclosing table.
    #[error("URI of {declared} bytes does not fit in the {available} remaining bytes of the IFTB table")]
    UriOutOfBounds {
        /// The length declared by the length-prefix byte.
        declared: usize,
        /// The bytes remaining in the table.
        available: usize,
    },
    /// When determining the type of font, the magic number was not recognized.
    #[error("An unknown magic number was encountered: {0}")]
    UnknownMagic(u32),
    /// An IFTB table must describe at least one chunk.
    #[error("An IFTB table must describe at least one chunk")]
    ZeroChunkCount,
    /// The whole-file checksum does not come out to 0xb1b0afba.
    #[error("Whole-file checksum came out to {0:#010x} instead of 0xb1b0afba")]
    WholeFileChecksumMismatch(u32),
    /// The input is a compressed wrapper (WOFF and friends), which must be
    /// unwrapped to a raw sfnt before reading.
    #[error("Input is a wrapped font ({0:#010x}); unwrap it to a raw sfnt first")]
    WrappedFontUnsupported(u32),
}

/// Errors related to saving a font
#[derive(Debug, thiserror::Error)]
pub enum FontSaveError {
    /// The font has no tables.
    #[error("No tables were found in the font.")]
    NoTablesFound,
    /// The font has too many tables that were added.
    #[error("Too many tables were added to the font, which is currently not supported.")]
    TooManyTablesAdded,
    /// The font has too many tables that were removed.
    #[error("Too many tables were removed from the font, which is currently not supported.")]
    TooManyTablesRemoved,
}
