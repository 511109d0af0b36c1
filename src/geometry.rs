//! Integer rectangles and 8-bit colors shared by every layer of the UI.
//!
//! All rectangles live in window pixel space with the origin at the top-left
//! corner and y pointing down. The only place where the bottom-left origin of
//! the GPU scissor test shows up is [`Rect::to_scissor`].

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with an integer origin and size.
///
/// Width and height may be zero (or negative after an intersection that does
/// not overlap); such rectangles cover no pixels but are otherwise valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns `true` if the rectangle covers no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Right edge, widened so that extreme rectangles cannot overflow.
    fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.x
            && (point.x as i64) < self.right()
            && point.y >= self.y
            && (point.y as i64) < self.bottom()
    }

    /// Returns the overlapping area of both rectangles, with a zero size when
    /// they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right()).max(x1 as i64);
        let y2 = self.bottom().min(other.bottom()).max(y1 as i64);
        // Bounded by the smaller positive extent, so it fits in i32.
        Rect::new(x1, y1, (x2 - x1 as i64) as i32, (y2 - y1 as i64) as i32)
    }

    /// Shrinks the rectangle by `amount` on every side.
    pub fn shrink(&self, amount: i32) -> Rect {
        let twice = amount.saturating_mul(2);
        Rect::new(
            self.x.saturating_add(amount),
            self.y.saturating_add(amount),
            self.w.saturating_sub(twice).max(0),
            self.h.saturating_sub(twice).max(0),
        )
    }

    pub fn offset(&self, by: IVec2) -> Rect {
        Rect::new(self.x.saturating_add(by.x), self.y.saturating_add(by.y), self.w, self.h)
    }

    /// Converts the rectangle into the bottom-left origin scissor box used by
    /// the GPU for a viewport `viewport_height` pixels tall.
    pub fn to_scissor(&self, viewport_height: i32) -> ScissorRect {
        let y = (viewport_height as i64 - self.bottom()).clamp(i32::MIN as i64, i32::MAX as i64);
        ScissorRect {
            x: self.x,
            y: y as i32,
            w: self.w.max(0),
            h: self.h.max(0),
        }
    }
}

/// A scissor box in GPU framebuffer coordinates (bottom-left origin, y up).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// A straight (not premultiplied) RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Returns the channels as normalized floats, in `r, g, b, a` order.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Formats the color as `#RRGGBB`, ignoring alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
