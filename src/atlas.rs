//! The glyph and icon atlas.
//!
//! The atlas is a single-channel (coverage) texture holding a solid white
//! block, a handful of icons and one cell for every byte value 0..=127. It is
//! generated once at startup from the embedded 8x8 bitmap font below and never
//! changes afterwards, so regions can be looked up by symbolic id without any
//! bookkeeping.

use image::{GrayImage, Luma};

use crate::geometry::Rect;

pub const ATLAS_WIDTH: u32 = 128;
pub const ATLAS_HEIGHT: u32 = 128;

/// Width of every glyph cell, which is also the pen advance.
pub const GLYPH_WIDTH: i32 = 8;
/// Height of every glyph cell, which is also the line height.
pub const GLYPH_HEIGHT: i32 = 12;
/// Number of glyph cells; bytes above the last one are clamped onto it.
pub const GLYPH_COUNT: usize = 128;

const ICON_SIZE: i32 = 12;
const GLYPHS_TOP: i32 = 12;
const GLYPHS_PER_ROW: i32 = ATLAS_WIDTH as i32 / GLYPH_WIDTH;
const GLYPH_BITMAP_TOP: i32 = 2;

/// Icons available in the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Icon {
    Close,
    Check,
    Collapsed,
    Expanded,
}

impl Icon {
    pub const ALL: [Icon; 4] = [Icon::Close, Icon::Check, Icon::Collapsed, Icon::Expanded];

    fn index(self) -> usize {
        match self {
            Icon::Close => 0,
            Icon::Check => 1,
            Icon::Collapsed => 2,
            Icon::Expanded => 3,
        }
    }
}

/// Symbolic name of an atlas region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtlasId {
    /// A block of fully opaque pixels used to draw solid rectangles.
    White,
    Icon(Icon),
    /// Glyph for a byte value; anything above 127 resolves to glyph 127.
    Glyph(u8),
}

/// A rectangle in atlas pixel space together with the id it was looked up by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasRegion {
    pub id: AtlasId,
    pub rect: Rect,
}

/// The immutable atlas texture plus its region table.
pub struct Atlas {
    image: GrayImage,
    white: Rect,
    icons: [Rect; 4],
    glyphs: [Rect; GLYPH_COUNT],
}

impl Atlas {
    /// Generates the built-in atlas.
    pub fn builtin() -> Self {
        let mut image = GrayImage::new(ATLAS_WIDTH, ATLAS_HEIGHT);

        let white = Rect::new(0, 0, 3, 3);
        fill(&mut image, white);

        let mut icons = [Rect::default(); 4];
        for icon in Icon::ALL {
            let rect = Rect::new(4 + ICON_SIZE * icon.index() as i32, 0, ICON_SIZE, ICON_SIZE);
            draw_icon(&mut image, icon, rect);
            icons[icon.index()] = rect;
        }

        let mut glyphs = [Rect::default(); GLYPH_COUNT];
        for (code, glyph) in glyphs.iter_mut().enumerate() {
            let code = code as i32;
            let rect = Rect::new(
                GLYPH_WIDTH * (code % GLYPHS_PER_ROW),
                GLYPHS_TOP + GLYPH_HEIGHT * (code / GLYPHS_PER_ROW),
                GLYPH_WIDTH,
                GLYPH_HEIGHT,
            );
            if let Some(bitmap) = glyph_bitmap(code as u8) {
                blit_glyph(&mut image, rect, bitmap);
            }
            *glyph = rect;
        }

        Self {
            image,
            white,
            icons,
            glyphs,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The coverage image backing the atlas.
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Looks up a region by its symbolic id.
    pub fn region(&self, id: AtlasId) -> AtlasRegion {
        let rect = match id {
            AtlasId::White => self.white,
            AtlasId::Icon(icon) => self.icons[icon.index()],
            AtlasId::Glyph(byte) => self.glyph(byte),
        };
        AtlasRegion { id, rect }
    }

    pub fn white(&self) -> Rect {
        self.white
    }

    pub fn icon(&self, icon: Icon) -> Rect {
        self.icons[icon.index()]
    }

    /// Returns the glyph cell for a byte, clamping bytes above 127 onto the
    /// last cell.
    pub fn glyph(&self, byte: u8) -> Rect {
        self.glyphs[(byte as usize).min(GLYPH_COUNT - 1)]
    }

    /// Width in pixels of `text` when drawn with [`glyph_bytes`] rules.
    pub fn text_width(&self, text: &str) -> i32 {
        glyph_bytes(text).map(|byte| self.glyph(byte).w).sum()
    }

    pub fn text_height(&self) -> i32 {
        GLYPH_HEIGHT
    }
}

/// Yields the bytes of `text` that select a glyph.
///
/// UTF-8 continuation bytes are skipped, so every encoded code point yields
/// exactly one byte: its leading byte. Leading bytes of multi-byte sequences
/// are >= 0xC0 and end up on the last glyph cell.
pub fn glyph_bytes(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.bytes().filter(|byte| *byte & 0xC0 != 0x80)
}

fn fill(image: &mut GrayImage, rect: Rect) {
    for y in rect.y..rect.y + rect.h {
        for x in rect.x..rect.x + rect.w {
            image.put_pixel(x as u32, y as u32, Luma([255]));
        }
    }
}

fn blit_glyph(image: &mut GrayImage, cell: Rect, bitmap: &[u8; 8]) {
    for (row, bits) in bitmap.iter().enumerate() {
        for col in 0..8 {
            if bits & (1 << col) != 0 {
                let x = cell.x + col;
                let y = cell.y + GLYPH_BITMAP_TOP + row as i32;
                image.put_pixel(x as u32, y as u32, Luma([255]));
            }
        }
    }
}

fn draw_icon(image: &mut GrayImage, icon: Icon, cell: Rect) {
    let size = cell.w;
    let mut plot = |x: i32, y: i32| {
        if (0..size).contains(&x) && (0..size).contains(&y) {
            image.put_pixel((cell.x + x) as u32, (cell.y + y) as u32, Luma([255]));
        }
    };

    match icon {
        Icon::Close => {
            for i in 2..size - 2 {
                plot(i, i);
                plot(i + 1, i);
                plot(size - 1 - i, i);
                plot(size - 2 - i, i);
            }
        }
        Icon::Check => {
            // Short stroke down to the knee at (4, 8), then the long stroke up.
            for i in 0..4 {
                plot(1 + i, 5 + i);
                plot(1 + i, 6 + i);
            }
            for i in 0..6 {
                plot(5 + i, 7 - i);
                plot(5 + i, 8 - i);
            }
        }
        Icon::Collapsed => {
            for x in 0..5 {
                for y in 2 + x..size - 2 - x {
                    plot(4 + x, y);
                }
            }
        }
        Icon::Expanded => {
            for y in 0..5 {
                for x in 2 + y..size - 2 - y {
                    plot(x, 4 + y);
                }
            }
        }
    }
}

fn glyph_bitmap(code: u8) -> Option<&'static [u8; 8]> {
    match code {
        0x20..=0x7e => Some(&FONT_8X8[(code - 0x20) as usize]),
        _ => None,
    }
}

/// Public domain 8x8 font covering printable ASCII. One byte per row, least
/// significant bit is the leftmost pixel.
#[rustfmt::skip]
const FONT_8X8: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // '!'
    [0x36, 0x36, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '"'
    [0x36, 0x36, 0x7F, 0x36, 0x7F, 0x36, 0x36, 0x00], // '#'
    [0x0C, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x0C, 0x00], // '$'
    [0x00, 0x63, 0x33, 0x18, 0x0C, 0x66, 0x63, 0x00], // '%'
    [0x1C, 0x36, 0x1C, 0x6E, 0x3B, 0x33, 0x6E, 0x00], // '&'
    [0x06, 0x06, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00], // '''
    [0x18, 0x0C, 0x06, 0x06, 0x06, 0x0C, 0x18, 0x00], // '('
    [0x06, 0x0C, 0x18, 0x18, 0x18, 0x0C, 0x06, 0x00], // ')'
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // '*'
    [0x00, 0x0C, 0x0C, 0x3F, 0x0C, 0x0C, 0x00, 0x00], // '+'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ','
    [0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0x00], // '-'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00], // '.'
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00], // '/'
    [0x3E, 0x63, 0x73, 0x7B, 0x6F, 0x67, 0x3E, 0x00], // '0'
    [0x0C, 0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x3F, 0x00], // '1'
    [0x1E, 0x33, 0x30, 0x1C, 0x06, 0x33, 0x3F, 0x00], // '2'
    [0x1E, 0x33, 0x30, 0x1C, 0x30, 0x33, 0x1E, 0x00], // '3'
    [0x38, 0x3C, 0x36, 0x33, 0x7F, 0x30, 0x78, 0x00], // '4'
    [0x3F, 0x03, 0x1F, 0x30, 0x30, 0x33, 0x1E, 0x00], // '5'
    [0x1C, 0x06, 0x03, 0x1F, 0x33, 0x33, 0x1E, 0x00], // '6'
    [0x3F, 0x33, 0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x00], // '7'
    [0x1E, 0x33, 0x33, 0x1E, 0x33, 0x33, 0x1E, 0x00], // '8'
    [0x1E, 0x33, 0x33, 0x3E, 0x30, 0x18, 0x0E, 0x00], // '9'
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x00], // ':'
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ';'
    [0x18, 0x0C, 0x06, 0x03, 0x06, 0x0C, 0x18, 0x00], // '<'
    [0x00, 0x00, 0x3F, 0x00, 0x00, 0x3F, 0x00, 0x00], // '='
    [0x06, 0x0C, 0x18, 0x30, 0x18, 0x0C, 0x06, 0x00], // '>'
    [0x1E, 0x33, 0x30, 0x18, 0x0C, 0x00, 0x0C, 0x00], // '?'
    [0x3E, 0x63, 0x7B, 0x7B, 0x7B, 0x03, 0x1E, 0x00], // '@'
    [0x0C, 0x1E, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x00], // 'A'
    [0x3F, 0x66, 0x66, 0x3E, 0x66, 0x66, 0x3F, 0x00], // 'B'
    [0x3C, 0x66, 0x03, 0x03, 0x03, 0x66, 0x3C, 0x00], // 'C'
    [0x1F, 0x36, 0x66, 0x66, 0x66, 0x36, 0x1F, 0x00], // 'D'
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x46, 0x7F, 0x00], // 'E'
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x06, 0x0F, 0x00], // 'F'
    [0x3C, 0x66, 0x03, 0x03, 0x73, 0x66, 0x7C, 0x00], // 'G'
    [0x33, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x33, 0x00], // 'H'
    [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'I'
    [0x78, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E, 0x00], // 'J'
    [0x67, 0x66, 0x36, 0x1E, 0x36, 0x66, 0x67, 0x00], // 'K'
    [0x0F, 0x06, 0x06, 0x06, 0x46, 0x66, 0x7F, 0x00], // 'L'
    [0x63, 0x77, 0x7F, 0x7F, 0x6B, 0x63, 0x63, 0x00], // 'M'
    [0x63, 0x67, 0x6F, 0x7B, 0x73, 0x63, 0x63, 0x00], // 'N'
    [0x1C, 0x36, 0x63, 0x63, 0x63, 0x36, 0x1C, 0x00], // 'O'
    [0x3F, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x0F, 0x00], // 'P'
    [0x1E, 0x33, 0x33, 0x33, 0x3B, 0x1E, 0x38, 0x00], // 'Q'
    [0x3F, 0x66, 0x66, 0x3E, 0x36, 0x66, 0x67, 0x00], // 'R'
    [0x1E, 0x33, 0x07, 0x0E, 0x38, 0x33, 0x1E, 0x00], // 'S'
    [0x3F, 0x2D, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'T'
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x33, 0x3F, 0x00], // 'U'
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // 'V'
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // 'W'
    [0x63, 0x63, 0x36, 0x1C, 0x1C, 0x36, 0x63, 0x00], // 'X'
    [0x33, 0x33, 0x33, 0x1E, 0x0C, 0x0C, 0x1E, 0x00], // 'Y'
    [0x7F, 0x63, 0x31, 0x18, 0x4C, 0x66, 0x7F, 0x00], // 'Z'
    [0x1E, 0x06, 0x06, 0x06, 0x06, 0x06, 0x1E, 0x00], // '['
    [0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x40, 0x00], // '\'
    [0x1E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x1E, 0x00], // ']'
    [0x08, 0x1C, 0x36, 0x63, 0x00, 0x00, 0x00, 0x00], // '^'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // '_'
    [0x0C, 0x0C, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // '`'
    [0x00, 0x00, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 'a'
    [0x07, 0x06, 0x06, 0x3E, 0x66, 0x66, 0x3B, 0x00], // 'b'
    [0x00, 0x00, 0x1E, 0x33, 0x03, 0x33, 0x1E, 0x00], // 'c'
    [0x38, 0x30, 0x30, 0x3E, 0x33, 0x33, 0x6E, 0x00], // 'd'
    [0x00, 0x00, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // 'e'
    [0x1C, 0x36, 0x06, 0x0F, 0x06, 0x06, 0x0F, 0x00], // 'f'
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x1F], // 'g'
    [0x07, 0x06, 0x36, 0x6E, 0x66, 0x66, 0x67, 0x00], // 'h'
    [0x0C, 0x00, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'i'
    [0x30, 0x00, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E], // 'j'
    [0x07, 0x06, 0x66, 0x36, 0x1E, 0x36, 0x67, 0x00], // 'k'
    [0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'l'
    [0x00, 0x00, 0x33, 0x7F, 0x7F, 0x6B, 0x63, 0x00], // 'm'
    [0x00, 0x00, 0x1F, 0x33, 0x33, 0x33, 0x33, 0x00], // 'n'
    [0x00, 0x00, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 'o'
    [0x00, 0x00, 0x3B, 0x66, 0x66, 0x3E, 0x06, 0x0F], // 'p'
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x78], // 'q'
    [0x00, 0x00, 0x3B, 0x6E, 0x66, 0x06, 0x0F, 0x00], // 'r'
    [0x00, 0x00, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x00], // 's'
    [0x08, 0x0C, 0x3E, 0x0C, 0x0C, 0x2C, 0x18, 0x00], // 't'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // 'u'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // 'v'
    [0x00, 0x00, 0x63, 0x6B, 0x7F, 0x7F, 0x36, 0x00], // 'w'
    [0x00, 0x00, 0x63, 0x36, 0x1C, 0x36, 0x63, 0x00], // 'x'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x3E, 0x30, 0x1F], // 'y'
    [0x00, 0x00, 0x3F, 0x19, 0x0C, 0x26, 0x3F, 0x00], // 'z'
    [0x38, 0x0C, 0x0C, 0x07, 0x0C, 0x0C, 0x38, 0x00], // '{'
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // '|'
    [0x07, 0x0C, 0x0C, 0x38, 0x0C, 0x0C, 0x07, 0x00], // '}'
    [0x6E, 0x3B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_fit_inside_atlas() {
        let atlas = Atlas::builtin();
        let mut rects = vec![atlas.white()];
        rects.extend(Icon::ALL.iter().map(|icon| atlas.icon(*icon)));
        rects.extend((0..=127u8).map(|b| atlas.glyph(b)));
        for rect in rects {
            assert!(rect.x >= 0 && rect.y >= 0);
            assert!(rect.x + rect.w <= atlas.width() as i32);
            assert!(rect.y + rect.h <= atlas.height() as i32);
        }
    }

    #[test]
    fn test_white_region_is_opaque() {
        let atlas = Atlas::builtin();
        let white = atlas.white();
        for y in white.y..white.y + white.h {
            for x in white.x..white.x + white.w {
                assert_eq!(atlas.image().get_pixel(x as u32, y as u32).0[0], 255);
            }
        }
    }

    #[test]
    fn test_high_bytes_clamp_to_last_glyph() {
        let atlas = Atlas::builtin();
        assert_eq!(atlas.glyph(128), atlas.glyph(127));
        assert_eq!(atlas.glyph(255), atlas.glyph(127));
        assert_ne!(atlas.glyph(126), atlas.glyph(127));
    }

    #[test]
    fn test_region_lookup_matches_accessors() {
        let atlas = Atlas::builtin();
        assert_eq!(atlas.region(AtlasId::White).rect, atlas.white());
        assert_eq!(atlas.region(AtlasId::Glyph(b'A')).rect, atlas.glyph(b'A'));
        assert_eq!(
            atlas.region(AtlasId::Icon(Icon::Check)).rect,
            atlas.icon(Icon::Check)
        );
    }

    #[test]
    fn test_glyph_bytes_skips_continuation_bytes() {
        let bytes: Vec<u8> = glyph_bytes("aé€b").collect();
        assert_eq!(bytes, vec![b'a', 0xC3, 0xE2, b'b']);
    }

    #[test]
    fn test_text_width_counts_code_points() {
        let atlas = Atlas::builtin();
        assert_eq!(atlas.text_width(""), 0);
        assert_eq!(atlas.text_width("Hi"), 2 * GLYPH_WIDTH);
        assert_eq!(atlas.text_width("é"), GLYPH_WIDTH);
    }

    #[test]
    fn test_glyph_cells_do_not_overlap_icons() {
        let atlas = Atlas::builtin();
        let icon_bottom = Icon::ALL
            .iter()
            .map(|icon| atlas.icon(*icon))
            .map(|r| r.y + r.h)
            .max()
            .unwrap();
        assert!(atlas.glyph(0).y >= icon_bottom);
    }
}
