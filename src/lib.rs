//! A small and opinionated gif frame extractor, usable in no-std environments (with `alloc`) but
//! usable anywhere.
//!
//! Given the bytes of an arbitrary, possibly animated gif, this crate locates the first image
//! block and rebuilds it as a standalone single-frame gif: the original header, logical screen
//! descriptor and global color table, followed by the first image descriptor, its local color
//! table, its compressed image data, and a trailer. Pixel data is never decompressed; the frame's
//! bytes are copied verbatim, so extraction costs one pass over the block structure.
//!
//! ```no_run
//! let gif = std::fs::read("animation.gif").unwrap();
//! let frame = gif_first_frame::extract_first_frame(&gif).unwrap();
//! assert_eq!(frame.media_type(), "image/gif");
//! std::fs::write("still.gif", frame.bytes()).unwrap();
//! ```
//!
//! Extension blocks are skipped and never copied, including the [graphic control extension] that
//! may carry the first frame's transparency index. Only the first frame is kept.
//!
//! Diagnostics go through the [`log`] facade; install any logger to see which blocks were found
//! and skipped.
//!
//! [graphic control extension]: ExtensionLabel::Graphics

#![cfg_attr(not(test), no_std)]
extern crate alloc;

mod common;
mod cursor;
mod frame;
mod header;
#[cfg(test)]
mod test_utils;

pub use common::{Block, ExtensionLabel, ExtractError};
pub use frame::{ExtractedFrame, FrameExtractor, GifFrame, ImageDescriptor, MEDIA_TYPE};
pub use header::{ColorTable, GifInfo, Header, LogicalScreenDescriptor};

/// Rebuilds the first frame of `bytes` as a single-frame gif.
///
/// Shorthand for [`FrameExtractor::extract`].
pub fn extract_first_frame(bytes: &[u8]) -> Result<ExtractedFrame, ExtractError> {
    FrameExtractor::new(bytes).extract()
}
