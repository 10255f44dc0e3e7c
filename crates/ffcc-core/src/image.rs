//! Interleaved BGR image buffer.
//!
//! [`Image`] is the buffer handed to and returned from the pipeline. It is a
//! plain owned container: width, height, channel count and a flat sample
//! vector.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, channels
//! interleaved in **Blue, Green, Red** order:
//!
//! ```text
//! Memory: [B G R B G R B G R ...]  <- Row 0
//!         [B G R B G R B G R ...]  <- Row 1
//!         ...
//! ```
//!
//! The channel count is stored rather than fixed by the type so that a
//! decoder handing over a gray or RGBA buffer is rejected with
//! [`Error::InvalidImage`] instead of silently misread. Use
//! [`Image::ensure_bgr`] to validate before processing.
//!
//! # Usage
//!
//! ```rust
//! use ffcc_core::Image;
//!
//! let img = Image::from_pixels(2, 1, vec![[10u8, 20, 30], [40, 50, 60]]).unwrap();
//! assert_eq!(img.pixel(1, 0), &[40, 50, 60]);
//! img.ensure_bgr().unwrap();
//! ```

use crate::{Error, Result, Sample};

/// Channel index of blue in a BGR pixel.
pub const BLUE: usize = 0;
/// Channel index of green in a BGR pixel.
pub const GREEN: usize = 1;
/// Channel index of red in a BGR pixel.
pub const RED: usize = 2;

/// Number of channels the pipeline accepts.
pub const BGR_CHANNELS: usize = 3;

/// Owned image buffer with interleaved channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T: Sample> {
    data: Vec<T>,
    width: u32,
    height: u32,
    channels: usize,
}

impl<T: Sample> Image<T> {
    /// Creates an image from existing sample data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] if `data.len()` is not
    /// `width * height * channels`. Zero sizes are accepted here and
    /// rejected by [`ensure_bgr`](Self::ensure_bgr).
    pub fn from_data(width: u32, height: u32, channels: usize, data: Vec<T>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(channels))
            .ok_or_else(|| Error::invalid_image(format!("{width}x{height}x{channels} overflows")))?;
        if data.len() != expected {
            return Err(Error::invalid_image(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Creates a 3-channel image from a row-major list of BGR pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[T; 3]>) -> Result<Self> {
        let data = pixels.into_iter().flatten().collect();
        Self::from_data(width, height, BGR_CHANNELS, data)
    }

    /// Creates a 3-channel image with every pixel set to `bgr`.
    pub fn filled(width: u32, height: u32, bgr: [T; 3]) -> Self {
        let count = width as usize * height as usize;
        let data = std::iter::repeat_n(bgr, count).flatten().collect();
        Self {
            data,
            width,
            height,
            channels: BGR_CHANNELS,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of interleaved channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the image and returns its samples.
    #[inline]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Returns the samples of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.data[idx..idx + self.channels]
    }

    /// Iterates over pixels in row-major order.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.channels.max(1))
    }

    /// Samples of one row, `width * channels` long.
    pub fn row(&self, y: u32) -> &[T] {
        let stride = self.width as usize * self.channels;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Checks that the image is a non-empty 3-channel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] for zero width or height, or a
    /// channel count other than 3.
    pub fn ensure_bgr(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_image(format!(
                "image must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.channels != BGR_CHANNELS {
            return Err(Error::invalid_image(format!(
                "expected {} channels (BGR), got {}",
                BGR_CHANNELS, self.channels
            )));
        }
        Ok(())
    }

    /// Maps every sample to a new type, keeping the shape.
    ///
    /// `f` receives the channel index (0 = blue for BGR) and the sample.
    pub fn map_channels<U: Sample>(&self, mut f: impl FnMut(usize, T) -> U) -> Image<U> {
        let channels = self.channels.max(1);
        Image {
            data: self
                .data
                .iter()
                .enumerate()
                .map(|(i, &s)| f(i % channels, s))
                .collect(),
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// Converts every sample to `f32` without rescaling.
    pub fn to_f32(&self) -> Image<f32> {
        self.map_channels(|_, s| s.to_f32())
    }

    /// Returns `true` if both images have the same size and channel count.
    #[inline]
    pub fn same_shape<U: Sample>(&self, other: &Image<U>) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }
}
