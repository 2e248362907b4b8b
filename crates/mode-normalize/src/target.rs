//! Target container formats.

use std::fmt;
use std::str::FromStr;

/// Container format an image is being converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// JPEG / JFIF. Opaque RGB only.
    Jpeg,
    /// PNG. Accepts grayscale, indexed, RGB and RGBA.
    Png,
}

impl TargetFormat {
    /// Tokens accepted by [`FromStr`], in display order.
    pub const TOKENS: [&'static str; 3] = ["JPG", "PNG", "JPEG"];

    /// Canonical file extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
        }
    }

    /// MIME type of the encoded output.
    pub fn mime_type(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "image/jpeg",
            TargetFormat::Png => "image/png",
        }
    }

    /// Human-readable container name.
    pub fn name(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Png => "PNG",
        }
    }

    /// Whether the container can store an alpha channel.
    pub fn supports_alpha(self) -> bool {
        matches!(self, TargetFormat::Png)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a target token is not one of `JPEG`, `JPG` or `PNG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedFormatError {
    token: String,
}

impl UnsupportedFormatError {
    /// The rejected token as supplied.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for UnsupportedFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported target format '{}' (expected one of JPG, JPEG, PNG)",
            self.token
        )
    }
}

impl std::error::Error for UnsupportedFormatError {}

impl FromStr for TargetFormat {
    type Err = UnsupportedFormatError;

    /// Case-insensitive; a leading dot is accepted so extensions parse too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let bare = token.strip_prefix('.').unwrap_or(token);
        if bare.eq_ignore_ascii_case("jpg") || bare.eq_ignore_ascii_case("jpeg") {
            Ok(TargetFormat::Jpeg)
        } else if bare.eq_ignore_ascii_case("png") {
            Ok(TargetFormat::Png)
        } else {
            Err(UnsupportedFormatError {
                token: s.to_string(),
            })
        }
    }
}
