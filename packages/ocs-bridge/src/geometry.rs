//! Box geometry: engine boxes live in the unit square with a bottom-left
//! origin, entries use absolute pixels with a top-left origin.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in normalized `0..1` coordinates, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Box in image pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn extent(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.min(max).max(0.0)
    }
}

impl NormalizedRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Pulls the box back into the unit square.
    ///
    /// Engines occasionally report negative origins or extents running past
    /// the image edge. Those are truncated rather than rejected, so a
    /// slightly-off box still yields a usable entry.
    pub fn clamp(&self) -> Self {
        let x = unit(self.x);
        let y = unit(self.y);
        Self {
            x,
            y,
            width: extent(self.width, 1.0 - x),
            height: extent(self.height, 1.0 - y),
        }
    }

    /// Converts to absolute pixels with the origin moved to the top-left
    /// corner. Values are truncated, not rounded.
    pub fn axis_flip(&self, image_width: u32, image_height: u32) -> PixelBox {
        let w = f64::from(image_width);
        let h = f64::from(image_height);

        let left = self.x * w;
        let top = (1.0 - self.y - self.height) * h;
        let right = left + self.width * w;
        let bottom = top + self.height * h;

        // `as` saturates: negatives and NaN land on 0
        PixelBox {
            left: (left as u32).min(image_width),
            top: (top as u32).min(image_height),
            right: (right as u32).min(image_width),
            bottom: (bottom as u32).min(image_height),
        }
    }
}

impl PixelBox {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}
