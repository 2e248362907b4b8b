pub mod config;
pub mod image_info;

pub use config::AppConfig;
pub use image_info::{FormatInfo, ImageInfo};
