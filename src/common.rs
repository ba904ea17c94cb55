use thiserror::Error;

/// Introducer bytes that start a block after the global color table.
///
/// The extractor steps over extensions and stops at the first image. Any other byte, the trailer
/// included, ends the walk: before an image that is [`ExtractError::NoImageFound`], since there is
/// no frame left to copy and no framing to skip an unknown block by.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Block {
    /// Image block.
    Image = 0x2C,
    /// Extension block.
    Extension = 0x21,
    /// Image trailer.
    Trailer = 0x3B,
}

impl Block {
    /// Try to parse from u8
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            0x2C => Some(Block::Image),
            0x21 => Some(Block::Extension),
            0x3B => Some(Block::Trailer),
            _ => None,
        }
    }
}

/// Known GIF Extension labels.
///
/// Every extension is skipped the same way; the label only matters for diagnostics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ExtensionLabel {
    /// Graphic control extension (transparency, delay, disposal).
    Graphics = 0xf9,
    /// Application extension.
    App = 0xff,
    /// Plain text extension.
    Text = 0x01,
    /// Comment extension
    Comment = 0xfe,
}

impl ExtensionLabel {
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            0xf9 => Some(ExtensionLabel::Graphics),
            0xff => Some(ExtensionLabel::App),
            0x01 => Some(ExtensionLabel::Text),
            0xfe => Some(ExtensionLabel::Comment),
            _ => None,
        }
    }
}

/// Errors that emerge when pulling the first frame out of a gif
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The buffer doesn't start with `GIF`
    #[error("invalid gif signature")]
    InvalidSignature,
    /// Hit the end of the stream or a block we don't understand before any image block
    #[error("no image block found before offset {offset}")]
    NoImageFound { offset: usize },
    /// A field or sub-block runs past the end of the buffer
    #[error("truncated input: needed {needed} bytes at offset {offset}")]
    TruncatedInput { offset: usize, needed: usize },
}
