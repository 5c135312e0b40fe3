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

//! SFNT font.

use std::{
    collections::BTreeMap,
    io::{Read, Seek, SeekFrom},
    num::Wrapping,
};

use super::{
    directory::{SfntDirectory, SfntDirectoryEntry},
    header::SfntHeader,
    table::{
        head::SFNT_EXPECTED_CHECKSUM, iftb::TableIFTB, named_table::NamedTable,
    },
};
use crate::{
    error::{FontIoError, FontSaveError},
    tag::FontTag,
    utils::align_to_four,
    Font, FontDataChecksum, FontDataExactRead, FontDataRead, FontDataWrite,
    FontDirectory, FontHeader, FontTable, MutFontDataWrite,
};

/// Implementation of an SFNT font.
pub struct SfntFont {
    pub(crate) header: SfntHeader,
    pub(crate) directory: SfntDirectory,
    pub(crate) tables: BTreeMap<FontTag, NamedTable>,
}

impl SfntFont {
    /// Returns the decoded IFTB table, if the font carries one.
    pub fn iftb(&self) -> Option<&TableIFTB> {
        match self.tables.get(&FontTag::IFTB) {
            Some(NamedTable::Iftb(table)) => Some(table),
            _ => None,
        }
    }

    /// Returns the decoded IFTB table mutably, if the font carries one.
    pub fn iftb_mut(&mut self) -> Option<&mut TableIFTB> {
        match self.tables.get_mut(&FontTag::IFTB) {
            Some(NamedTable::Iftb(table)) => Some(table),
            _ => None,
        }
    }

    /// Installs (or replaces) the IFTB table.
    pub fn set_iftb_table(&mut self, table: TableIFTB) {
        self.tables.insert(FontTag::IFTB, NamedTable::Iftb(table));
    }

    /// The byte range `(offset, length)` a table occupies in the source
    /// file, per the directory.
    pub fn table_slice(&self, tag: &FontTag) -> Option<(u32, u32)> {
        self.directory
            .entry(tag)
            .map(|entry| (entry.offset, entry.length))
    }

    /// Serializes one table (unpadded) into a fresh buffer.
    pub fn table_bytes(&self, tag: &FontTag) -> Option<Vec<u8>> {
        let table = self.tables.get(tag)?;
        let mut bytes = Vec::new();
        table.write(&mut bytes).ok()?;
        bytes.truncate(table.len() as usize);
        Some(bytes)
    }

    /// Overwrites a table's directory entry in place. With `rechecksum`
    /// the entry's checksum is refreshed from the loaded table contents;
    /// otherwise only offset and length change.
    ///
    /// This is the low-level escape hatch for callers that patch table
    /// data outside the usual re-serialization path;
    /// [`MutFontDataWrite::write`] rebuilds the whole directory and does
    /// not need it.
    pub fn adjust_table(
        &mut self,
        tag: &FontTag,
        new_offset: u32,
        new_length: u32,
        rechecksum: bool,
    ) -> Result<(), FontIoError> {
        let checksum = if rechecksum {
            Some(
                self.tables
                    .get(tag)
                    .ok_or(FontIoError::LoadTableTruncated(*tag))?
                    .checksum()
                    .0,
            )
        } else {
            None
        };
        let entry = self
            .directory
            .entry_mut(tag)
            .ok_or(FontIoError::LoadTableTruncated(*tag))?;
        entry.offset = new_offset;
        entry.length = new_length;
        if let Some(checksum) = checksum {
            entry.checksum = checksum;
        }
        Ok(())
    }

    /// Refreshes a table's directory checksum from its loaded contents.
    /// For 'head' the adjustment field is summed as zero, per the spec.
    pub fn recalc_table_checksum(
        &mut self,
        tag: &FontTag,
    ) -> Result<(), FontIoError> {
        let checksum = self
            .tables
            .get(tag)
            .ok_or(FontIoError::LoadTableTruncated(*tag))?
            .checksum()
            .0;
        if let Some(entry) = self.directory.entry_mut(tag) {
            entry.checksum = checksum;
        }
        Ok(())
    }

    /// Verifies every table's directory checksum against its contents,
    /// and with `full` also verifies that the whole-file sum (with the
    /// 'head' adjustment folded in) comes out to the spec constant.
    ///
    /// Decoding never does this on its own; it is O(file) work that
    /// callers opt into.
    pub fn check_sums(&self, full: bool) -> Result<(), FontIoError> {
        for entry in self.directory.entries() {
            let Some(table) = self.tables.get(&entry.tag) else {
                continue;
            };
            let computed = table.checksum().0;
            if computed != entry.checksum {
                return Err(FontIoError::ChecksumMismatch {
                    tag: entry.tag,
                    expected: entry.checksum,
                    computed,
                });
            }
        }
        if full {
            let adjustment = match self.tables.get(&FontTag::HEAD) {
                Some(NamedTable::Head(head)) => head.checksumAdjustment,
                _ => 0,
            };
            let sum = self.font_checksum() + Wrapping(adjustment);
            if sum.0 != SFNT_EXPECTED_CHECKSUM {
                return Err(FontIoError::WholeFileChecksumMismatch(sum.0));
            }
        }
        Ok(())
    }

    /// Sums header, directory, and all tables ('head' adjustment as
    /// zero).
    fn font_checksum(&self) -> Wrapping<u32> {
        self.header.checksum()
            + self.directory.checksum()
            + self
                .tables
                .values()
                .fold(Wrapping(0_u32), |cksum, table| cksum + table.checksum())
    }
}

impl FontDataRead for SfntFont {
    type Error = FontIoError;

    fn from_reader<T: Read + Seek + ?Sized>(
        reader: &mut T,
    ) -> Result<Self, Self::Error> {
        let start = reader.stream_position()?;
        let file_size = reader.seek(SeekFrom::End(0))? - start;
        reader.seek(SeekFrom::Start(start))?;

        let header = SfntHeader::from_reader(reader)?;
        let directory_end = SfntHeader::SIZE as u64
            + SfntDirectoryEntry::SIZE as u64 * header.num_tables() as u64;
        if directory_end > file_size {
            return Err(FontIoError::ImplausibleTableCount {
                num_tables: header.num_tables(),
                file_size,
            });
        }
        let directory = SfntDirectory::from_reader_with_count(
            reader,
            header.num_tables() as usize,
        )?;
        directory.validate_bounds(file_size)?;
        let mut tables = BTreeMap::new();
        for entry in directory.entries() {
            if !entry.tag.is_known() {
                tracing::debug!(
                    "unrecognized table {}, carrying it as opaque bytes",
                    entry.tag
                );
            }
            let table = NamedTable::from_reader_exact(
                &entry.tag,
                reader,
                entry.offset as u64,
                entry.length as usize,
            )?;
            tables.insert(entry.tag, table);
        }
        Ok(Self {
            header,
            directory,
            tables,
        })
    }
}

impl FontDataExactRead for SfntFont {
    type Error = FontIoError;

    fn from_reader_exact<T: Read + Seek + ?Sized>(
        reader: &mut T,
        offset: u64,
        _size: usize,
    ) -> Result<Self, Self::Error> {
        reader.seek(SeekFrom::Start(offset))?;
        Self::from_reader(reader)
    }
}

impl SfntFont {
    /// Serializes the font, optionally retagging the container as an
    /// incrementally transferable font ('IFTB' sfnt version) and
    /// optionally recomputing the head checksum adjustment.
    ///
    /// The plain [`MutFontDataWrite::write`] is `write_with(dest, false,
    /// true)`: keep the version, fix the head.
    pub fn write_with<TDest: std::io::Write + ?Sized>(
        &mut self,
        dest: &mut TDest,
        as_iftb: bool,
        write_head: bool,
    ) -> Result<(), FontIoError> {
        if self.tables.is_empty() {
            return Err(FontSaveError::NoTablesFound.into());
        }
        if as_iftb {
            self.header.sfntVersion = crate::magic::Magic::Iftb;
        }
        // Adding the IFTB table is the one structural change this crate
        // makes to a font; anything beyond a one-table delta means the
        // caller mangled the table map.
        let table_diff =
            self.tables.len() as i32 - self.header.numTables as i32;
        if table_diff <= -2 {
            return Err(FontSaveError::TooManyTablesRemoved.into());
        } else if table_diff >= 2 {
            return Err(FontSaveError::TooManyTablesAdded.into());
        }

        let new_table_count = self.tables.len() as u16;
        let neo_header =
            SfntHeader::synthesize(self.header.sfntVersion, new_table_count);
        let mut neo_directory = SfntDirectory::new();

        // Lay tables out in the old physical order, padded to four;
        // tables the map no longer holds fall away, new ones are
        // appended at the end.
        let mut running_offset = SfntHeader::SIZE as u32
            + SfntDirectoryEntry::SIZE as u32 * new_table_count as u32;
        let mut placed: Vec<FontTag> = Vec::with_capacity(self.tables.len());
        for entry in self.directory.physical_order() {
            if self.tables.contains_key(&entry.tag) {
                placed.push(entry.tag);
            }
        }
        for tag in self.tables.keys() {
            if !placed.contains(tag) {
                tracing::trace!("appending new table {tag}");
                placed.push(*tag);
            }
        }
        for tag in &placed {
            let table = &self.tables[tag];
            neo_directory.add_entry(SfntDirectoryEntry {
                tag: *tag,
                checksum: table.checksum().0,
                offset: running_offset,
                length: table.len(),
            });
            running_offset += align_to_four(table.len());
        }

        // Directory entries are sorted by tag, per the sfnt spec.
        neo_directory.sort_entries(|entry| entry.tag);

        // Whole-font checksum over header, directory, and tables; the
        // per-table sums in the fresh directory are already current.
        let font_cksum = neo_header.checksum()
            + neo_directory.checksum()
            + neo_directory
                .entries()
                .iter()
                .fold(Wrapping(0_u32), |tables_cksum, entry| {
                    tables_cksum + Wrapping(entry.checksum)
                });

        // Rewrite the head table's checksumAdjustment. The adjustment
        // itself is summed as zero, so the directory entry stays valid.
        if write_head {
            if let Some(NamedTable::Head(head)) =
                self.tables.get_mut(&FontTag::HEAD)
            {
                head.checksumAdjustment =
                    (Wrapping(SFNT_EXPECTED_CHECKSUM) - font_cksum).0;
            }
        }

        self.header = neo_header;
        self.directory = neo_directory;
        self.header.write(dest)?;
        self.directory.write(dest)?;
        for entry in self.directory.physical_order() {
            self.tables[&entry.tag].write(dest)?;
        }
        Ok(())
    }
}

impl MutFontDataWrite for SfntFont {
    type Error = FontIoError;

    fn write<TDest: std::io::Write + ?Sized>(
        &mut self,
        dest: &mut TDest,
    ) -> Result<(), Self::Error> {
        self.write_with(dest, false, true)
    }
}

impl Font for SfntFont {
    type Directory = SfntDirectory;
    type Header = SfntHeader;

    fn contains_table(&self, tag: &FontTag) -> bool {
        self.tables.contains_key(tag)
    }

    fn header(&self) -> &Self::Header {
        &self.header
    }

    fn directory(&self) -> &Self::Directory {
        &self.directory
    }
}

#[cfg(test)]
#[path = "font_test.rs"]
mod tests;
