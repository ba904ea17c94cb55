use alloc::vec::Vec;
use core::ops::BitAnd;

use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::{
    common::{Block, ExtractError},
    cursor::ByteCursor,
    header::{color_table_entries, eat_extension, skip_sub_blocks, ColorTable, GifInfo},
};

/// Media type of every buffer produced by [`FrameExtractor::extract`]
pub const MEDIA_TYPE: &str = "image/gif";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    origin: Point,
    size: Size,
    interlaced: bool,
    sort_flag: bool,
    local_color_table_flag: bool,
    /// Entry count of the local color table, meaningful only if the flag is set
    local_color_table_size: u16,
}

impl ImageDescriptor {
    /// Parses the 9 bytes following an image introducer.
    pub(crate) fn parser(cursor: &mut ByteCursor<'_>) -> Result<ImageDescriptor, ExtractError> {
        let left = cursor.take_u16_le()? as i32;
        let top = cursor.take_u16_le()? as i32;
        let origin = Point { x: left, y: top };
        let width = cursor.take_u16_le()? as u32;
        let height = cursor.take_u16_le()? as u32;

        let size = Size { width, height };

        let packed = cursor.take_byte()?;
        Ok(Self {
            origin,
            size,
            local_color_table_flag: packed.bitand(0x80).eq(&0x80),
            interlaced: packed.bitand(0x40).eq(&0x40),
            sort_flag: packed.bitand(0x20).eq(&0x20),
            local_color_table_size: color_table_entries(packed),
        })
    }

    pub(crate) fn maybe_parse_local_color_table<'a>(
        &self,
        cursor: &mut ByteCursor<'a>,
    ) -> Result<Option<ColorTable<'a>>, ExtractError> {
        if self.local_color_table_flag {
            ColorTable::parser(cursor, self.local_color_table_size).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(self.origin, self.size)
    }

    pub fn num_pixels(&self) -> usize {
        self.size.width as usize * self.size.height as usize
    }

    pub fn interlaced(&self) -> bool {
        self.interlaced
    }

    pub fn sort_flag(&self) -> bool {
        self.sort_flag
    }

    pub fn has_local_color_table(&self) -> bool {
        self.local_color_table_flag
    }
}

/// Byte ranges of one frame, borrowed from the source gif
#[derive(Debug, Clone)]
pub struct GifFrame<'a> {
    /// Offset of the image introducer
    offset: usize,
    image_descriptor: ImageDescriptor,
    /// Introducer through the end of the local color table
    descriptor_bytes: &'a [u8],
    local_table: Option<ColorTable<'a>>,
    global_table: Option<ColorTable<'a>>,
    /// LZW minimum code size through the zero length terminator
    image_data: &'a [u8],
}

impl<'a> GifFrame<'a> {
    /// Reads one image block, the introducer at `offset` already consumed.
    pub(crate) fn parser(
        cursor: &mut ByteCursor<'a>,
        offset: usize,
        global_table: Option<ColorTable<'a>>,
    ) -> Result<Self, ExtractError> {
        let image_descriptor = ImageDescriptor::parser(cursor)?;
        let local_table = image_descriptor.maybe_parse_local_color_table(cursor)?;
        let descriptor_bytes = cursor.span_from(offset);

        let data_start = cursor.get_offset();
        let _min_code_size = cursor.take_byte()?;
        skip_sub_blocks(cursor)?;
        let image_data = cursor.span_from(data_start);

        Ok(Self {
            offset,
            image_descriptor,
            descriptor_bytes,
            local_table,
            global_table,
            image_data,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn image_descriptor(&self) -> &ImageDescriptor {
        &self.image_descriptor
    }

    pub fn frame_area(&self) -> Rectangle {
        self.image_descriptor.bounding_box()
    }

    /// The local color table if the frame has one, the global one otherwise
    pub fn color_table(&self) -> Option<ColorTable<'a>> {
        self.local_table.or(self.global_table)
    }

    pub fn local_color_table(&self) -> Option<ColorTable<'a>> {
        self.local_table
    }

    pub fn descriptor_bytes(&self) -> &'a [u8] {
        self.descriptor_bytes
    }

    pub fn image_data(&self) -> &'a [u8] {
        self.image_data
    }

    pub fn min_code_size(&self) -> u8 {
        self.image_data[0]
    }
}

/// A standalone single-frame gif
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFrame {
    bytes: Vec<u8>,
}

impl ExtractedFrame {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn media_type(&self) -> &'static str {
        MEDIA_TYPE
    }
}

impl AsRef<[u8]> for ExtractedFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Pulls the first frame out of a gif and repackages it as a gif of its own.
///
/// Only the header, logical screen descriptor, global color table, and the first image block
/// survive. Extensions are dropped, including a graphic control extension in front of the first
/// frame, so a transparent or timed first frame loses that metadata. Image data is copied
/// verbatim and never decompressed.
#[derive(Debug, Clone, Copy)]
pub struct FrameExtractor<'a> {
    bytes: &'a [u8],
}

impl<'a> FrameExtractor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Parses up to and including the first image block
    pub fn locate(&self) -> Result<(GifInfo<'a>, GifFrame<'a>), ExtractError> {
        let mut cursor = ByteCursor::from_slice(self.bytes);
        let info = GifInfo::parser(&mut cursor)?;
        let mut blocks = ImageBlocks::new(cursor, info.global_table);

        match blocks.next_image()? {
            NextImage::Found(frame) => Ok((info, frame)),
            NextImage::Stopped { offset, .. } => Err(ExtractError::NoImageFound { offset }),
        }
    }

    pub fn extract(&self) -> Result<ExtractedFrame, ExtractError> {
        let (info, frame) = self.locate()?;
        let prelude = info.prelude();

        let mut bytes = Vec::with_capacity(
            prelude.len() + frame.descriptor_bytes.len() + frame.image_data.len() + 1,
        );
        bytes.extend_from_slice(prelude);
        bytes.extend_from_slice(frame.descriptor_bytes);
        bytes.extend_from_slice(frame.image_data);
        bytes.push(Block::Trailer as u8);

        debug!(
            "Extracted {} byte frame from {} byte gif",
            bytes.len(),
            self.bytes.len()
        );
        Ok(ExtractedFrame { bytes })
    }

    /// Offsets of every image introducer in the stream.
    ///
    /// Scanning ends at the trailer, an unknown block, or the end of the buffer; each of those is
    /// [`ExtractError::NoImageFound`] if no image was found yet.
    pub fn frame_offsets(&self) -> Result<SmallVec<[usize; 16]>, ExtractError> {
        let mut cursor = ByteCursor::from_slice(self.bytes);
        let info = GifInfo::parser(&mut cursor)?;
        let mut blocks = ImageBlocks::new(cursor, info.global_table);
        let mut image_block_locations: SmallVec<[usize; 16]> = SmallVec::new();

        loop {
            match blocks.next_image()? {
                NextImage::Found(frame) => image_block_locations.push(frame.offset()),
                NextImage::Stopped { offset, .. } if image_block_locations.is_empty() => {
                    return Err(ExtractError::NoImageFound { offset });
                }
                NextImage::Stopped { offset, at } => {
                    match at {
                        Stop::Trailer => {}
                        Stop::Unknown(byte) => {
                            warn!("Stopping at unknown block 0x{:02x} at {}", byte, offset)
                        }
                        Stop::End => warn!("Gif ends at {} without a trailer", offset),
                    }
                    break;
                }
            }
        }

        Ok(image_block_locations)
    }
}

/// Why a walk over the blocks ended without another image
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Stop {
    Trailer,
    Unknown(u8),
    End,
}

enum NextImage<'a> {
    Found(GifFrame<'a>),
    /// `offset` is where the stopping byte (or the end of the buffer) is
    Stopped { offset: usize, at: Stop },
}

/// Walks the blocks after the global color table one image at a time, eating extensions on the
/// way. Both extraction and frame scanning go through here.
struct ImageBlocks<'a> {
    cursor: ByteCursor<'a>,
    global_table: Option<ColorTable<'a>>,
}

impl<'a> ImageBlocks<'a> {
    fn new(cursor: ByteCursor<'a>, global_table: Option<ColorTable<'a>>) -> Self {
        Self {
            cursor,
            global_table,
        }
    }

    fn next_image(&mut self) -> Result<NextImage<'a>, ExtractError> {
        loop {
            let offset = self.cursor.get_offset();
            let Some(introducer) = self.cursor.next_byte() else {
                return Ok(NextImage::Stopped {
                    offset,
                    at: Stop::End,
                });
            };
            match Block::from_u8(introducer) {
                Some(Block::Image) => {
                    debug!("Found an image at {}", offset);
                    let frame = GifFrame::parser(&mut self.cursor, offset, self.global_table)?;
                    return Ok(NextImage::Found(frame));
                }
                Some(Block::Extension) => {
                    eat_extension(&mut self.cursor)?;
                }
                Some(Block::Trailer) => {
                    return Ok(NextImage::Stopped {
                        offset,
                        at: Stop::Trailer,
                    })
                }
                None => {
                    return Ok(NextImage::Stopped {
                        offset,
                        at: Stop::Unknown(introducer),
                    })
                }
            }
        }
    }
}
