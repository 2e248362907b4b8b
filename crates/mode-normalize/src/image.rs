//! In-memory raster types.
//!
//! [`Image`] pairs dimensions with a [`PixelData`] buffer. The buffer is a
//! tagged variant so the pixel layout and the bytes that follow it can never
//! disagree; [`PixelMode`] is the fieldless discriminant used for reporting
//! and comparisons.

use std::fmt;

/// Semantic pixel layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelMode {
    /// One luma byte per pixel.
    Gray,
    /// Luma and alpha bytes per pixel.
    GrayAlpha,
    /// One palette index per pixel.
    Indexed,
    /// Red, green, blue bytes per pixel.
    Rgb,
    /// Red, green, blue, alpha bytes per pixel.
    Rgba,
}

impl PixelMode {
    /// Bytes used per pixel in the unpacked buffer.
    pub fn channels(self) -> usize {
        match self {
            PixelMode::Gray | PixelMode::Indexed => 1,
            PixelMode::GrayAlpha => 2,
            PixelMode::Rgb => 3,
            PixelMode::Rgba => 4,
        }
    }

    /// Short uppercase name, e.g. `"RGBA"`.
    pub fn as_str(self) -> &'static str {
        match self {
            PixelMode::Gray => "L",
            PixelMode::GrayAlpha => "LA",
            PixelMode::Indexed => "P",
            PixelMode::Rgb => "RGB",
            PixelMode::Rgba => "RGBA",
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color table for indexed images.
///
/// `alpha` is the transparency key: one alpha value per leading palette
/// entry. Entries past the end of the table are fully opaque, matching the
/// semantics of a PNG `tRNS` chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
    alpha: Option<Vec<u8>>,
}

impl Palette {
    /// Create an opaque palette.
    pub fn new(colors: Vec<[u8; 3]>) -> Self {
        Self {
            colors,
            alpha: None,
        }
    }

    /// Create a palette with a transparency table.
    ///
    /// An empty table is treated as no transparency.
    pub fn with_alpha(colors: Vec<[u8; 3]>, alpha: Vec<u8>) -> Self {
        Self {
            colors,
            alpha: if alpha.is_empty() { None } else { Some(alpha) },
        }
    }

    /// Build a palette from packed `[r, g, b, r, g, b, ...]` bytes, as found
    /// in a PNG `PLTE` chunk. A trailing partial entry is ignored.
    pub fn from_rgb_bytes(bytes: &[u8], alpha: Option<&[u8]>) -> Self {
        let colors = bytes
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        match alpha {
            Some(a) => Self::with_alpha(colors, a.to_vec()),
            None => Self::new(colors),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// The transparency table, if any.
    pub fn alpha_table(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    /// Whether this palette carries a transparency key.
    pub fn has_transparency(&self) -> bool {
        self.alpha.is_some()
    }

    /// Color of entry `index`, black if out of range.
    #[inline]
    pub fn color(&self, index: u8) -> [u8; 3] {
        self.colors
            .get(index as usize)
            .copied()
            .unwrap_or([0, 0, 0])
    }

    /// Alpha of entry `index`.
    #[inline]
    pub fn alpha(&self, index: u8) -> u8 {
        self.alpha
            .as_ref()
            .and_then(|a| a.get(index as usize).copied())
            .unwrap_or(255)
    }

    /// Packed RGB bytes for encoders.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }
}

/// Pixel buffer tagged with its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    Gray(Vec<u8>),
    GrayAlpha(Vec<u8>),
    Indexed { indices: Vec<u8>, palette: Palette },
    Rgb(Vec<u8>),
    Rgba(Vec<u8>),
}

impl PixelData {
    pub fn mode(&self) -> PixelMode {
        match self {
            PixelData::Gray(_) => PixelMode::Gray,
            PixelData::GrayAlpha(_) => PixelMode::GrayAlpha,
            PixelData::Indexed { .. } => PixelMode::Indexed,
            PixelData::Rgb(_) => PixelMode::Rgb,
            PixelData::Rgba(_) => PixelMode::Rgba,
        }
    }

    /// Raw bytes of the buffer (palette indices for indexed data).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PixelData::Gray(b)
            | PixelData::GrayAlpha(b)
            | PixelData::Rgb(b)
            | PixelData::Rgba(b) => b,
            PixelData::Indexed { indices, .. } => indices,
        }
    }

    /// Whether any pixel can be less than fully opaque.
    pub fn has_alpha(&self) -> bool {
        match self {
            PixelData::GrayAlpha(_) | PixelData::Rgba(_) => true,
            PixelData::Indexed { palette, .. } => palette.has_transparency(),
            PixelData::Gray(_) | PixelData::Rgb(_) => false,
        }
    }
}

/// Validation failure when constructing an [`Image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Buffer length does not match `width * height * channels`.
    BufferSize {
        mode: PixelMode,
        expected: usize,
        actual: usize,
    },
    /// An indexed pixel refers past the end of the palette.
    IndexOutOfRange { index: u8, palette_len: usize },
    /// Width or height is zero.
    EmptyDimensions,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::BufferSize {
                mode,
                expected,
                actual,
            } => write!(
                f,
                "{} buffer has {} bytes, expected {}",
                mode, actual, expected
            ),
            ImageError::IndexOutOfRange { index, palette_len } => write!(
                f,
                "palette index {} out of range for {} entries",
                index, palette_len
            ),
            ImageError::EmptyDimensions => write!(f, "image has zero width or height"),
        }
    }
}

impl std::error::Error for ImageError {}

/// A decoded raster owned by a single conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: PixelData,
}

impl Image {
    /// Create an image, validating the buffer against the dimensions.
    pub fn new(width: u32, height: u32, pixels: PixelData) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyDimensions);
        }
        let mode = pixels.mode();
        let expected = width as usize * height as usize * mode.channels();
        let actual = pixels.as_bytes().len();
        if expected != actual {
            return Err(ImageError::BufferSize {
                mode,
                expected,
                actual,
            });
        }
        if let PixelData::Indexed { indices, palette } = &pixels {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= palette.len()) {
                return Err(ImageError::IndexOutOfRange {
                    index,
                    palette_len: palette.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        Self::new(width, height, PixelData::Gray(data))
    }

    pub fn gray_alpha(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        Self::new(width, height, PixelData::GrayAlpha(data))
    }

    pub fn indexed(
        width: u32,
        height: u32,
        indices: Vec<u8>,
        palette: Palette,
    ) -> Result<Self, ImageError> {
        Self::new(width, height, PixelData::Indexed { indices, palette })
    }

    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        Self::new(width, height, PixelData::Rgb(data))
    }

    pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        Self::new(width, height, PixelData::Rgba(data))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn mode(&self) -> PixelMode {
        self.pixels.mode()
    }

    #[inline]
    pub fn pixels(&self) -> &PixelData {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelData {
        self.pixels
    }

    /// Transform the buffer, keeping the dimensions.
    ///
    /// Only used by conversions that preserve the pixel count, so the length
    /// invariant is checked in debug builds only.
    pub(crate) fn map_pixels(self, f: impl FnOnce(PixelData) -> PixelData) -> Self {
        let pixels = f(self.pixels);
        debug_assert_eq!(
            pixels.as_bytes().len(),
            self.width as usize * self.height as usize * pixels.mode().channels()
        );
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}
