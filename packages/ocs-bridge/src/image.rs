use std::fmt;

use crate::error::OcrError;

/// Packed 24-bit sRGB, no alpha.
pub const BYTES_PER_PIXEL: u32 = 3;

/// Borrowed view over a row-major RGB frame.
///
/// Rows may be padded: `bytes_per_line` can exceed `width * 3`.
#[derive(Clone, Copy)]
pub struct ImageView<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
    bytes_per_line: u32,
}

impl<'a> ImageView<'a> {
    pub fn new(
        pixels: &'a [u8],
        width: u32,
        height: u32,
        bytes_per_line: u32,
    ) -> Result<Self, OcrError> {
        let required = required_len(width, height, bytes_per_line)?;
        if pixels.len() < required {
            return Err(OcrError::InvalidImage(format!(
                "buffer holds {} bytes, {width}x{height} with stride {bytes_per_line} needs {required}",
                pixels.len()
            )));
        }
        Ok(Self {
            pixels: &pixels[..required],
            width,
            height,
            bytes_per_line,
        })
    }

    /// Builds a view over memory owned by the caller of the C entry point.
    ///
    /// # Safety
    /// When `data` is non-null it must point to at least
    /// `bytes_per_line * height` readable bytes that stay valid and unchanged
    /// for `'a`.
    pub unsafe fn from_raw(
        data: *const u8,
        width: u32,
        height: u32,
        bytes_per_line: u32,
    ) -> Result<Self, OcrError> {
        if data.is_null() {
            return Err(OcrError::InvalidImage("null pixel buffer".into()));
        }
        let len = required_len(width, height, bytes_per_line)?;
        let pixels = std::slice::from_raw_parts(data, len);
        Self::new(pixels, width, height, bytes_per_line)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_line(&self) -> u32 {
        self.bytes_per_line
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Pixel bytes of row `y`, without the stride padding.
    pub fn row(&self, y: u32) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.bytes_per_line as usize;
        let end = start + (self.width * BYTES_PER_PIXEL) as usize;
        Some(&self.pixels[start..end])
    }
}

impl fmt::Debug for ImageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageView")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_per_line", &self.bytes_per_line)
            .finish_non_exhaustive()
    }
}

fn required_len(width: u32, height: u32, bytes_per_line: u32) -> Result<usize, OcrError> {
    if width == 0 || height == 0 {
        return Err(OcrError::InvalidImage(format!(
            "empty image {width}x{height}"
        )));
    }
    let row_bytes = width
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or_else(|| OcrError::InvalidImage(format!("width {width} overflows a row")))?;
    if bytes_per_line < row_bytes {
        return Err(OcrError::InvalidImage(format!(
            "stride {bytes_per_line} is shorter than {width} pixels at {BYTES_PER_PIXEL} bytes each"
        )));
    }
    (bytes_per_line as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| OcrError::InvalidImage("image size overflows".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tight_rows() {
        let pixels = vec![0u8; 4 * 3 * 2];
        let image = ImageView::new(&pixels, 4, 2, 12).unwrap();
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 2);
        assert_eq!(image.row(1).unwrap().len(), 12);
        assert!(image.row(2).is_none());
    }

    #[test]
    fn padded_rows_skip_padding() {
        let mut pixels = vec![0u8; 16 * 2];
        pixels[16..19].copy_from_slice(&[1, 2, 3]);
        let image = ImageView::new(&pixels, 4, 2, 16).unwrap();
        let row = image.row(1).unwrap();
        assert_eq!(row.len(), 12);
        assert_eq!(&row[..3], &[1, 2, 3]);
    }

    #[test]
    fn rejects_short_stride() {
        let pixels = vec![0u8; 64];
        let err = ImageView::new(&pixels, 4, 2, 11).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn rejects_short_buffer() {
        let pixels = vec![0u8; 23];
        assert!(matches!(
            ImageView::new(&pixels, 4, 2, 12),
            Err(OcrError::InvalidImage(_))
        ));
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(ImageView::new(&[], 0, 10, 0).is_err());
        assert!(ImageView::new(&[], 10, 0, 30).is_err());
    }

    #[test]
    fn rejects_null_pointer() {
        let err = unsafe { ImageView::from_raw(std::ptr::null(), 4, 4, 12) }.unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn row_size_overflow_is_rejected() {
        assert!(matches!(
            ImageView::new(&[], u32::MAX, 1, 0),
            Err(OcrError::InvalidImage(msg)) if msg.contains("overflows a row")
        ));
    }
}
