use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Please upload an image file")]
    NotAnImage,

    #[error("Please upload an image less than {0} bytes")]
    TooLarge(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Validate an uploaded photo against its declared content type and size
pub fn validate_photo(content_type: Option<&str>, size: usize) -> Result<(), StorageError> {
    match content_type {
        Some(mime) if mime.starts_with("image") => {}
        _ => return Err(StorageError::NotAnImage),
    }

    let max = config::config().uploads.max_file_bytes;
    if size > max {
        return Err(StorageError::TooLarge(max));
    }
    Ok(())
}

/// Deterministic stored name: `photo_<record-id><original-extension>`.
/// Repeated uploads for the same record overwrite the same file name
/// (modulo a changed extension - the old file is then orphaned).
pub fn photo_filename(id: Uuid, original_name: &str) -> String {
    match Path::new(original_name).extension() {
        Some(ext) => format!("photo_{}.{}", id, ext.to_string_lossy()),
        None => format!("photo_{}", id),
    }
}

/// Write the photo into the configured upload directory
pub async fn store_photo(filename: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
    let dir = PathBuf::from(&config::config().uploads.directory);
    tokio::fs::create_dir_all(&dir).await?;

    let dest = dir.join(filename);
    tokio::fs::write(&dest, bytes).await?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_within_limit() {
        assert!(validate_photo(Some("image/jpeg"), 1024).is_ok());
        assert!(validate_photo(Some("image/png"), 1024).is_ok());
    }

    #[test]
    fn rejects_non_image_content_types() {
        assert!(matches!(
            validate_photo(Some("application/pdf"), 10),
            Err(StorageError::NotAnImage)
        ));
        assert!(matches!(
            validate_photo(None, 10),
            Err(StorageError::NotAnImage)
        ));
    }

    #[test]
    fn rejects_oversize_file() {
        let max = config::config().uploads.max_file_bytes;
        assert!(matches!(
            validate_photo(Some("image/jpeg"), max + 1),
            Err(StorageError::TooLarge(_))
        ));
        // Exactly at the limit is fine
        assert!(validate_photo(Some("image/jpeg"), max).is_ok());
    }

    #[test]
    fn filename_keeps_original_extension() {
        let id = Uuid::parse_str("6f2b8c0a-9d4e-4f63-8c1a-2f9e5d7b0c11").unwrap();
        assert_eq!(
            photo_filename(id, "campus.jpg"),
            format!("photo_{}.jpg", id)
        );
        assert_eq!(
            photo_filename(id, "archive.tar.gz"),
            format!("photo_{}.gz", id)
        );
        assert_eq!(photo_filename(id, "noextension"), format!("photo_{}", id));
    }

    #[tokio::test]
    async fn stores_photo_on_disk() {
        let filename = photo_filename(Uuid::new_v4(), "campus.png");
        let dest = store_photo(&filename, b"png-bytes").await.unwrap();

        let written = tokio::fs::read(&dest).await.unwrap();
        assert_eq!(written, b"png-bytes");

        tokio::fs::remove_file(&dest).await.unwrap();
    }
}
