//! Coordinate translation between calibration space and PDF page space.
//!
//! Field rectangles are authored with a top-left origin (the convention of
//! the calibration tool the operators use), while PDF content streams place
//! (0, 0) at the bottom-left corner of the page with Y growing upward. The
//! conversion is `y = page_height - y2`.

/// Rectangle in top-left-origin units, as authored during calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl FieldRect {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rebase the rectangle so its top-left corner sits at `(x, y)`,
    /// keeping the original width and height. Used when a calibration
    /// override replaces the anchor point.
    pub fn at(&self, x: f32, y: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + (self.x2 - self.x1),
            y2: y + (self.y2 - self.y1),
        }
    }
}

/// Rectangle in native PDF coordinates (bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Convert a top-left-origin rectangle into page-native coordinates.
///
/// Inverted rectangles (x2 < x1 or y2 < y1) are a caller mistake that only
/// affects cosmetics; extents clamp to zero instead of erroring.
pub fn to_native(rect: FieldRect, page_height: f32) -> NativeRect {
    NativeRect {
        x: rect.x1,
        y: page_height - rect.y2,
        width: (rect.x2 - rect.x1).max(0.0),
        height: (rect.y2 - rect.y1).max(0.0),
    }
}
