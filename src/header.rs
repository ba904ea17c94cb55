use core::ops::{BitAnd, Shr};

use crate::common::{ExtensionLabel, ExtractError};
use crate::cursor::ByteCursor;
use embedded_graphics::prelude::Size;
use log::{debug, trace};

/// Length of the header plus the logical screen descriptor
pub const SCREEN_DESCRIPTOR_END: usize = 13;

/// RGB channels per color table entry
const CHANNELS: usize = 3;

/// Everything in front of the first block: header, screen descriptor and global color table
#[derive(Debug, Clone)]
pub struct GifInfo<'a> {
    pub header: Header,
    pub screen: LogicalScreenDescriptor,
    /// Global color table (if it exists)
    pub global_table: Option<ColorTable<'a>>,
    /// Start of the file through the end of the global color table
    prelude: &'a [u8],
}

impl<'a> GifInfo<'a> {
    pub(crate) fn parser(cursor: &mut ByteCursor<'a>) -> Result<Self, ExtractError> {
        let header = Header::parser(cursor)?;
        let screen = LogicalScreenDescriptor::parser(cursor)?;
        debug_assert_eq!(cursor.get_offset(), SCREEN_DESCRIPTOR_END);

        let global_table = if screen.global_color_table_flag {
            Some(ColorTable::parser(cursor, screen.global_color_table_size)?)
        } else {
            None
        };

        Ok(Self {
            header,
            screen,
            global_table,
            prelude: cursor.span_from(0),
        })
    }

    /// The bytes from the start of the file through the end of the global color table
    pub fn prelude(&self) -> &'a [u8] {
        self.prelude
    }

    /// Offset of the first block introducer
    pub fn data_offset(&self) -> usize {
        self.prelude.len()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Header {
    /// Always `GIF`
    pub signature: [u8; 3],
    /// `87a` or `89a` in practice; never validated
    pub version: [u8; 3],
}

impl Header {
    pub(crate) fn parser(cursor: &mut ByteCursor<'_>) -> Result<Header, ExtractError> {
        let signature: [u8; 3] = cursor
            .take_arr()
            .map_err(|_| ExtractError::InvalidSignature)?;

        if signature.ne(b"GIF") {
            return Err(ExtractError::InvalidSignature);
        }

        let version = cursor.take_arr()?;
        Ok(Header { signature, version })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LogicalScreenDescriptor {
    /// Gif size in pixels.
    pub screen_size: Size,
    pub global_color_table_flag: bool,
    /// Bits per primary color, minus one
    pub color_resolution: u8,
    pub sort_flag: bool,
    /// Number of entries in the global color table, whether or not the table is present
    pub global_color_table_size: u16,
    pub background_color_index: u8,
    pub pixel_aspect_ratio: u8,
}

impl LogicalScreenDescriptor {
    pub(crate) fn parser(cursor: &mut ByteCursor<'_>) -> Result<Self, ExtractError> {
        let width = cursor.take_u16_le()? as u32;
        let height = cursor.take_u16_le()? as u32;
        let packed = cursor.take_byte()?;
        let background_color_index = cursor.take_byte()?;
        let pixel_aspect_ratio = cursor.take_byte()?;

        Ok(Self {
            screen_size: Size { width, height },
            global_color_table_flag: packed.bitand(0x80).eq(&0x80),
            color_resolution: packed.bitand(0x70).shr(4),
            sort_flag: packed.bitand(0x08).eq(&0x08),
            global_color_table_size: color_table_entries(packed),
            background_color_index,
            pixel_aspect_ratio,
        })
    }
}

/// Entry count encoded in the low three bits of a packed byte: `2^(n+1)`
#[inline]
pub(crate) fn color_table_entries(packed: u8) -> u16 {
    1 << (packed.bitand(0x07) + 1)
}

/// A color table borrowed straight out of the source buffer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ColorTable<'a> {
    offset: usize,
    table: &'a [u8],
}

impl<'a> ColorTable<'a> {
    pub(crate) fn parser(cursor: &mut ByteCursor<'a>, len: u16) -> Result<Self, ExtractError> {
        let offset = cursor.get_offset();
        let table = cursor.take_slice(len as usize * CHANNELS)?;
        trace!("{} entry color table at {}", len, offset);
        Ok(Self { offset, table })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.table.len() / CHANNELS
    }

    /// Always false for a parsed table, which has at least 2 entries
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Offset of the table in the source buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.table
    }

    pub fn rgb(&self, idx: u8) -> Option<[u8; 3]> {
        let start = idx as usize * CHANNELS;
        self.table
            .get(start..start + CHANNELS)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
    }
}

/// Skips an extension block, the introducer already consumed. Returns the label.
pub(crate) fn eat_extension(cursor: &mut ByteCursor<'_>) -> Result<u8, ExtractError> {
    let offset = cursor.get_offset();
    let label = cursor.take_byte()?;
    match ExtensionLabel::from_u8(label) {
        Some(extension) => debug!("Ate extension {:?} at {}", extension, offset),
        None => debug!("Ate unknown extension 0x{:02x} at {}", label, offset),
    }
    skip_sub_blocks(cursor)?;
    Ok(label)
}

/// Skips length-prefixed sub-blocks through the zero length terminator.
pub(crate) fn skip_sub_blocks(cursor: &mut ByteCursor<'_>) -> Result<(), ExtractError> {
    loop {
        match cursor.take_byte()? {
            0 => return Ok(()),
            len => {
                trace!("Skipping {} byte sub-block at {}", len, cursor.get_offset());
                cursor.seek_by(len as usize)?
            }
        }
    }
}
