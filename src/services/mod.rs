pub mod converted_file;
pub mod converter;

pub use converted_file::ConvertedFile;
pub use converter::{download_name, ConversionRequest, ConversionService, ConvertedImage};
