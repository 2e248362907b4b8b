//! Scoped temporary output files.

use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::ConvertError;
use crate::services::converter::ConvertedImage;

/// A converted image written to a temporary file.
///
/// The file lives exactly as long as this value; dropping it deletes the
/// file. Call [`ConvertedFile::persist`] to keep it.
#[derive(Debug)]
pub struct ConvertedFile {
    file: NamedTempFile,
    image: ConvertedImage,
}

impl ConvertedFile {
    pub(crate) fn new(file: NamedTempFile, image: ConvertedImage) -> Self {
        Self { file, image }
    }

    /// Current location of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Conversion metadata and bytes.
    pub fn image(&self) -> &ConvertedImage {
        &self.image
    }

    /// Move the file to `dest`, replacing any existing file there.
    pub fn persist(self, dest: &Path) -> Result<PathBuf, ConvertError> {
        match self.file.persist(dest) {
            Ok(_) => Ok(dest.to_path_buf()),
            Err(e) => {
                // Rename fails across filesystems; copy instead and let the
                // temporary file be removed on drop.
                tracing::debug!(error = %e.error, "Rename failed, copying output");
                std::fs::copy(e.file.path(), dest)?;
                Ok(dest.to_path_buf())
            }
        }
    }
}
