//! mode-normalize: map decoded images onto the pixel mode a container
//! format can store.
//!
//! A decoded raster arrives in whatever layout its file used: grayscale,
//! grayscale with alpha, an indexed palette (optionally with per-entry
//! transparency), RGB or RGBA. Each target container accepts only some of
//! those layouts. [`normalize()`] performs the minimal conversion so that the
//! result can be handed straight to an encoder.
//!
//! # Quick Start
//!
//! ```
//! use mode_normalize::{normalize, Image, PixelMode, TargetFormat};
//!
//! // 1x1 half-transparent red
//! let image = Image::rgba(1, 1, vec![255, 0, 0, 128]).unwrap();
//! let target: TargetFormat = "jpg".parse().unwrap();
//!
//! let out = normalize(image, target);
//! assert_eq!(out.mode(), PixelMode::Rgb);
//! assert_eq!(out.pixels().as_bytes(), &[255, 127, 127]);
//! ```
//!
//! # Target Rules
//!
//! | Source mode | JPEG | PNG |
//! |-------------|------|-----|
//! | Gray | RGB (replicated) | unchanged |
//! | GrayAlpha | RGB, composited over white | RGBA |
//! | Indexed | RGB (palette lookup) | unchanged |
//! | Indexed + transparency | RGB, composited over white | RGBA |
//! | Rgb | unchanged | unchanged |
//! | Rgba | RGB, composited over white | unchanged |
//!
//! The compositing background is always opaque white.

pub mod composite;
pub mod image;
pub mod normalize;
pub mod target;


pub use image::{Image, ImageError, Palette, PixelData, PixelMode};
pub use normalize::{is_normalized, normalize, output_mode};
pub use target::{TargetFormat, UnsupportedFormatError};
