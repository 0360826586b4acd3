//! In-memory raster image model.
//!
//! Channel order is RGBA internally; storage-format channel order is handled
//! at the codec boundary in [`crate::tga`]. Channel access is uniform across
//! channel counts: selecting Red, Green, or Blue on a grayscale image yields
//! the sole channel, and selecting Alpha on a 1- or 3-channel image yields
//! `None` rather than a value.

use thiserror::Error;

/// Errors from image construction and codec operations.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("unsupported channel count: {0} (expected 1, 3, or 4)")]
    UnsupportedChannelCount(u8),

    #[error("buffer length mismatch: expected {expected} bytes for {width}x{height}x{channels}, got {actual}")]
    BadBufferLength {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },
}

/// One scalar per-pixel component of a raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

/// An 8-bit raster image with 1, 3, or 4 interleaved channels (gray / RGB /
/// RGBA semantics), row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Image {
    /// Create an image with every channel of every pixel set to `fill`.
    pub fn new(width: u32, height: u32, channels: u8, fill: u8) -> Result<Self, ImageError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(ImageError::UnsupportedChannelCount(channels));
        }
        let size = width as usize * height as usize * channels as usize;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![fill; size],
        })
    }

    /// Wrap an interleaved byte buffer, validating its length.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(ImageError::UnsupportedChannelCount(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ImageError::BadBufferLength {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of channels per pixel (1, 3, or 4).
    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Returns true if the image has an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Returns true if `other` has the same width and height.
    #[inline]
    pub fn same_dimensions(&self, other: &Image) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Interleaved pixel bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    fn channel_offset(&self, channel: Channel) -> Option<usize> {
        match (self.channels, channel) {
            // Grayscale: R, G, B all read the sole channel.
            (1, Channel::Red | Channel::Green | Channel::Blue) => Some(0),
            (1, Channel::Alpha) => None,
            (3 | 4, Channel::Red) => Some(0),
            (3 | 4, Channel::Green) => Some(1),
            (3 | 4, Channel::Blue) => Some(2),
            (4, Channel::Alpha) => Some(3),
            (3, Channel::Alpha) => None,
            _ => None,
        }
    }

    /// Sample one channel at (x, y). Returns `None` when the channel is
    /// absent (Alpha on a 1- or 3-channel image).
    #[inline]
    pub fn get(&self, x: u32, y: u32, channel: Channel) -> Option<u8> {
        let offset = self.channel_offset(channel)?;
        Some(self.data[self.pixel_index(x, y) + offset])
    }

    /// Write one channel at (x, y). A write to an absent channel is a no-op.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, channel: Channel, value: u8) {
        if let Some(offset) = self.channel_offset(channel) {
            let idx = self.pixel_index(x, y) + offset;
            self.data[idx] = value;
        }
    }

    /// Upgrade the image in place to 4 channels. Grayscale replicates into
    /// R, G, B; `default_alpha` fills the new alpha channel. A 4-channel
    /// image is left untouched.
    pub fn ensure_rgba(&mut self, default_alpha: u8) {
        match self.channels {
            4 => {}
            3 => {
                let pixels = self.width as usize * self.height as usize;
                let mut data = Vec::with_capacity(pixels * 4);
                for px in self.data.chunks_exact(3) {
                    data.extend_from_slice(px);
                    data.push(default_alpha);
                }
                self.data = data;
                self.channels = 4;
            }
            _ => {
                let pixels = self.width as usize * self.height as usize;
                let mut data = Vec::with_capacity(pixels * 4);
                for &v in &self.data {
                    data.extend_from_slice(&[v, v, v, default_alpha]);
                }
                self.data = data;
                self.channels = 4;
            }
        }
    }

    /// Maximum value of the alpha channel, or `None` when alpha is absent.
    pub fn max_alpha(&self) -> Option<u8> {
        if !self.has_alpha() {
            return None;
        }
        self.data.iter().skip(3).step_by(4).copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_gray_reads_same_value_for_rgb() {
        let img = Image::from_raw(2, 1, 1, vec![10, 200]).unwrap();
        assert_eq!(img.get(0, 0, Channel::Red), Some(10));
        assert_eq!(img.get(0, 0, Channel::Green), Some(10));
        assert_eq!(img.get(0, 0, Channel::Blue), Some(10));
        assert_eq!(img.get(0, 0, Channel::Alpha), None);
        assert_eq!(img.get(1, 0, Channel::Red), Some(200));
    }

    #[test]
    fn test_rgb_has_no_alpha() {
        let img = Image::new(2, 2, 3, 128).unwrap();
        assert!(!img.has_alpha());
        assert_eq!(img.get(1, 1, Channel::Alpha), None);
    }

    #[test]
    fn test_ensure_rgba_from_rgb_keeps_colors() {
        let mut img = Image::from_raw(1, 1, 3, vec![1, 2, 3]).unwrap();
        img.ensure_rgba(255);
        assert_eq!(img.channels(), 4);
        assert_eq!(img.as_bytes(), &[1, 2, 3, 255]);
    }

    #[test]
    fn test_ensure_rgba_from_gray_replicates() {
        let mut img = Image::from_raw(2, 1, 1, vec![7, 9]).unwrap();
        img.ensure_rgba(255);
        assert_eq!(img.as_bytes(), &[7, 7, 7, 255, 9, 9, 9, 255]);
    }

    #[test]
    fn test_ensure_rgba_noop_on_rgba() {
        let mut img = Image::from_raw(1, 1, 4, vec![1, 2, 3, 4]).unwrap();
        img.ensure_rgba(255);
        assert_eq!(img.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_set_absent_channel_is_noop() {
        let mut img = Image::from_raw(1, 1, 3, vec![1, 2, 3]).unwrap();
        img.set(0, 0, Channel::Alpha, 99);
        assert_eq!(img.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_from_raw_rejects_bad_length() {
        let err = Image::from_raw(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, ImageError::BadBufferLength { expected: 12, actual: 11, .. }));
    }

    #[test]
    fn test_new_rejects_two_channels() {
        let err = Image::new(1, 1, 2, 0).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedChannelCount(2)));
    }

    #[test]
    fn test_max_alpha() {
        let img = Image::from_raw(2, 1, 4, vec![0, 0, 0, 30, 0, 0, 0, 200]).unwrap();
        assert_eq!(img.max_alpha(), Some(200));
        let rgb = Image::new(2, 1, 3, 255).unwrap();
        assert_eq!(rgb.max_alpha(), None);
    }
}
