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

//! 'head' SFNT table.
//!
//! The 'head' table is parsed structurally because of the
//! checkSumAdjustment protocol: the field participates in the whole-file
//! checksum yet is defined by it. The field is treated as zero whenever a
//! checksum is computed, and the file-level writer patches in
//! `0xb1b0afba - sum` afterwards.

use std::{
    io::{Read, Seek, SeekFrom, Write},
    mem::size_of,
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    error::FontIoError, tag::FontTag, utils::u32_from_u16_pair,
    FontDataChecksum, FontDataExactRead, FontDataWrite, FontTable,
};

/// Spec-mandated magic number for the 'head' table.
const HEAD_TABLE_MAGIC_NUMBER: u32 = 0x5f0f3cf5;
/// The 'head' table's checksumAdjustment value should be such that the
/// whole-font checksum comes out to this value.
pub(crate) const SFNT_EXPECTED_CHECKSUM: u32 = 0xb1b0afba;

/// 'head' font table
#[derive(Debug)]
#[repr(C, packed(1))]
#[allow(non_snake_case)] // As named by Open Font Format / OpenType.
pub struct TableHead {
    /// Major version number of the font.
    pub majorVersion: u16,
    /// Minor version number of the font.
    pub minorVersion: u16,
    /// Revision number of the font.
    pub fontRevision: u32,
    /// Checksum adjustment.
    pub checksumAdjustment: u32,
    /// Magic number for the font.
    pub magicNumber: u32,
    /// Flags for the font.
    pub flags: u16,
    /// Units per em.
    pub unitsPerEm: u16,
    /// Date created.
    pub created: i64,
    /// Date modified.
    pub modified: i64,
    /// Minimum x.
    pub xMin: i16,
    /// Minimum y.
    pub yMin: i16,
    /// Maximum x.
    pub xMax: i16,
    /// Maximum y.
    pub yMax: i16,
    /// Mac style.
    pub macStyle: u16,
    /// Lowest PPEM.
    pub lowestRecPPEM: u16,
    /// Font direction hint.
    pub fontDirectionHint: i16,
    /// Index to loc format.
    pub indexToLocFormat: i16,
    /// Glyph data format.
    pub glyphDataFormat: i16,
}

impl TableHead {
    /// The size of a 'head' table (unpadded).
    const SIZE: usize = size_of::<Self>();
}

impl FontDataExactRead for TableHead {
    type Error = FontIoError;

    fn from_reader_exact<T: Read + Seek + ?Sized>(
        reader: &mut T,
        offset: u64,
        size: usize,
    ) -> Result<Self, Self::Error> {
        reader.seek(SeekFrom::Start(offset))?;
        if size != Self::SIZE {
            return Err(FontIoError::LoadTableTruncated(FontTag::HEAD));
        }
        let head = Self {
            majorVersion: reader.read_u16::<BigEndian>()?,
            minorVersion: reader.read_u16::<BigEndian>()?,
            fontRevision: reader.read_u32::<BigEndian>()?,
            checksumAdjustment: reader.read_u32::<BigEndian>()?,
            magicNumber: reader.read_u32::<BigEndian>()?,
            flags: reader.read_u16::<BigEndian>()?,
            unitsPerEm: reader.read_u16::<BigEndian>()?,
            created: reader.read_i64::<BigEndian>()?,
            modified: reader.read_i64::<BigEndian>()?,
            xMin: reader.read_i16::<BigEndian>()?,
            yMin: reader.read_i16::<BigEndian>()?,
            xMax: reader.read_i16::<BigEndian>()?,
            yMax: reader.read_i16::<BigEndian>()?,
            macStyle: reader.read_u16::<BigEndian>()?,
            lowestRecPPEM: reader.read_u16::<BigEndian>()?,
            fontDirectionHint: reader.read_i16::<BigEndian>()?,
            indexToLocFormat: reader.read_i16::<BigEndian>()?,
            glyphDataFormat: reader.read_i16::<BigEndian>()?,
            // 54 bytes read; the two pad bytes up to 56 are left in the
            // stream, callers always seek.
        };
        if head.magicNumber != HEAD_TABLE_MAGIC_NUMBER {
            return Err(FontIoError::InvalidHeadMagicNumber(head.magicNumber));
        }
        Ok(head)
    }
}

impl FontDataWrite for TableHead {
    type Error = FontIoError;

    fn write<TDest: Write + ?Sized>(
        &self,
        dest: &mut TDest,
    ) -> Result<(), Self::Error> {
        dest.write_u16::<BigEndian>(self.majorVersion)?;
        dest.write_u16::<BigEndian>(self.minorVersion)?;
        dest.write_u32::<BigEndian>(self.fontRevision)?;
        dest.write_u32::<BigEndian>(self.checksumAdjustment)?;
        dest.write_u32::<BigEndian>(self.magicNumber)?;
        dest.write_u16::<BigEndian>(self.flags)?;
        dest.write_u16::<BigEndian>(self.unitsPerEm)?;
        dest.write_i64::<BigEndian>(self.created)?;
        dest.write_i64::<BigEndian>(self.modified)?;
        dest.write_i16::<BigEndian>(self.xMin)?;
        dest.write_i16::<BigEndian>(self.yMin)?;
        dest.write_i16::<BigEndian>(self.xMax)?;
        dest.write_i16::<BigEndian>(self.yMax)?;
        dest.write_u16::<BigEndian>(self.macStyle)?;
        dest.write_u16::<BigEndian>(self.lowestRecPPEM)?;
        dest.write_i16::<BigEndian>(self.fontDirectionHint)?;
        dest.write_i16::<BigEndian>(self.indexToLocFormat)?;
        dest.write_i16::<BigEndian>(self.glyphDataFormat)?;
        // Two pad bytes bring the 54-byte 'head' up to a 4-byte boundary.
        dest.write_u16::<BigEndian>(0_u16)?;
        Ok(())
    }
}

impl FontDataChecksum for TableHead {
    fn checksum(&self) -> std::num::Wrapping<u32> {
        let mut cksum = u32_from_u16_pair(self.majorVersion, self.minorVersion);
        cksum += self.fontRevision;
        // checksumAdjustment is summed as zero, always.
        cksum += self.magicNumber;
        cksum += u32_from_u16_pair(self.flags, self.unitsPerEm);

        cksum += self.created as u32;
        cksum += (self.created >> 32) as u32;
        cksum += self.modified as u32;
        cksum += (self.modified >> 32) as u32;

        cksum += u32_from_u16_pair(self.xMin as u16, self.yMin as u16);
        cksum += u32_from_u16_pair(self.xMax as u16, self.yMax as u16);
        cksum += u32_from_u16_pair(self.macStyle, self.lowestRecPPEM);
        cksum += u32_from_u16_pair(
            self.fontDirectionHint as u16,
            self.indexToLocFormat as u16,
        );
        cksum += u32_from_u16_pair(self.glyphDataFormat as u16, 0_u16);

        cksum
    }
}

impl FontTable for TableHead {
    fn len(&self) -> u32 {
        Self::SIZE as u32
    }
}

#[cfg(test)]
#[path = "head_test.rs"]
mod tests;
