//! Container codecs.
//!
//! PNG goes through the `png` crate directly so palettes survive decoding as
//! indices; JPEG is decoded with `image` and written with `jpeg-encoder` for
//! progressive output.

pub mod decode;
pub mod encode;
pub mod probe;
pub mod sniff;

pub use decode::decode;
pub use encode::{encode, EncodeOptions, JPEG_QUALITY, PNG_COMPRESSION_LEVEL};
pub use probe::{probe, HeaderInfo};
pub use sniff::{format_from_extension, sniff_container};
