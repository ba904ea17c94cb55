pub(crate) const BLACK_WHITE: [[u8; 3]; 2] = [[0x00, 0x00, 0x00], [0xff, 0xff, 0xff]];

pub(crate) const FOUR_COLORS: [[u8; 3]; 4] = [
    [0x10, 0x20, 0x30],
    [0x40, 0x50, 0x60],
    [0x70, 0x80, 0x90],
    [0xa0, 0xb0, 0xc0],
];

/// LZW stream for a single pixel of color 0 at minimum code size 2: clear, 0, end
pub(crate) const ONE_PIXEL_LZW: [u8; 2] = [0x44, 0x01];

/// Image block parameters for [`GifBuilder::frame`]
#[derive(Clone, Copy)]
pub(crate) struct TestFrame<'t> {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub local_table: Option<&'t [[u8; 3]]>,
    pub interlaced: bool,
    pub min_code_size: u8,
    /// Compressed payload, split into sub-blocks of at most 255 bytes
    pub data: &'t [u8],
}

impl Default for TestFrame<'_> {
    fn default() -> Self {
        Self {
            left: 0,
            top: 0,
            width: 1,
            height: 1,
            local_table: None,
            interlaced: false,
            min_code_size: 2,
            data: &ONE_PIXEL_LZW,
        }
    }
}

/// Assembles gif streams byte by byte, including ones no encoder would produce
pub(crate) struct GifBuilder {
    version: [u8; 3],
    width: u16,
    height: u16,
    screen_flags: u8,
    background: u8,
    global_table: Option<Vec<u8>>,
    blocks: Vec<u8>,
    image_offsets: Vec<usize>,
    trailer: bool,
}

impl GifBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            version: *b"89a",
            width,
            height,
            screen_flags: 0,
            background: 0,
            global_table: None,
            blocks: Vec::new(),
            image_offsets: Vec::new(),
            trailer: true,
        }
    }

    pub fn version(mut self, version: &[u8; 3]) -> Self {
        self.version = *version;
        self
    }

    pub fn global_table(mut self, table: &[[u8; 3]]) -> Self {
        self.global_table = Some(table.concat());
        self
    }

    /// Extra packed bits (color resolution, sort flag) for the screen descriptor
    pub fn screen_flags(mut self, flags: u8) -> Self {
        self.screen_flags = flags;
        self
    }

    pub fn background(mut self, idx: u8) -> Self {
        self.background = idx;
        self
    }

    pub fn graphic_control(mut self, delay: u16, transparent: Option<u8>) -> Self {
        self.blocks.extend_from_slice(&[0x21, 0xf9, 4]);
        self.blocks.push(transparent.map_or(0x00, |_| 0x01));
        self.blocks.extend_from_slice(&delay.to_le_bytes());
        self.blocks.push(transparent.unwrap_or(0));
        self.blocks.push(0);
        self
    }

    pub fn comment(mut self, text: &[u8]) -> Self {
        self.blocks.extend_from_slice(&[0x21, 0xfe]);
        push_sub_blocks(&mut self.blocks, text);
        self
    }

    pub fn netscape_loop(mut self, count: u16) -> Self {
        self.blocks.extend_from_slice(&[0x21, 0xff, 11]);
        self.blocks.extend_from_slice(b"NETSCAPE2.0");
        self.blocks.extend_from_slice(&[3, 1]);
        self.blocks.extend_from_slice(&count.to_le_bytes());
        self.blocks.push(0);
        self
    }

    pub fn frame(mut self, frame: TestFrame<'_>) -> Self {
        self.image_offsets.push(self.blocks.len());
        self.blocks.push(0x2C);
        for field in [frame.left, frame.top, frame.width, frame.height] {
            self.blocks.extend_from_slice(&field.to_le_bytes());
        }
        let mut packed = if frame.interlaced { 0x40 } else { 0x00 };
        if let Some(table) = frame.local_table {
            packed |= 0x80 | table_bits(table.len());
        }
        self.blocks.push(packed);
        if let Some(table) = frame.local_table {
            self.blocks.extend_from_slice(&table.concat());
        }
        self.blocks.push(frame.min_code_size);
        push_sub_blocks(&mut self.blocks, frame.data);
        self
    }

    /// Appends bytes as-is
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.blocks.extend_from_slice(bytes);
        self
    }

    pub fn no_trailer(mut self) -> Self {
        self.trailer = false;
        self
    }

    fn prelude_len(&self) -> usize {
        13 + self.global_table.as_ref().map_or(0, Vec::len)
    }

    /// Offsets of every image introducer in the built stream
    pub fn image_offsets(&self) -> Vec<usize> {
        let prelude = self.prelude_len();
        self.image_offsets.iter().map(|off| prelude + off).collect()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prelude_len() + self.blocks.len() + 1);
        out.extend_from_slice(b"GIF");
        out.extend_from_slice(&self.version);
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        let mut packed = self.screen_flags;
        if let Some(table) = &self.global_table {
            packed |= 0x80 | table_bits(table.len() / 3);
        }
        out.extend_from_slice(&[packed, self.background, 0]);
        if let Some(table) = &self.global_table {
            out.extend_from_slice(table);
        }
        out.extend_from_slice(&self.blocks);
        if self.trailer {
            out.push(0x3B);
        }
        out
    }
}

/// Size bits for a power of two table length
fn table_bits(entries: usize) -> u8 {
    assert!(entries.is_power_of_two() && (2..=256).contains(&entries));
    (entries.trailing_zeros() - 1) as u8
}

pub(crate) fn push_sub_blocks(out: &mut Vec<u8>, data: &[u8]) {
    for chunk in data.chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
}

/// Number of non-overlapping occurrences of `needle` in `haystack`
pub(crate) fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    let mut count = 0;
    let mut idx = 0;
    while idx + needle.len() <= haystack.len() {
        if haystack[idx..].starts_with(needle) {
            count += 1;
            idx += needle.len();
        } else {
            idx += 1;
        }
    }
    count
}
