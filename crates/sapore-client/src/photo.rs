//! Product photo encoding.
//!
//! The backend stores photos inline on the product as `data:` URLs. Only
//! the extension is checked, matching the photo picker's accept filter.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tracing::debug;

use sapore_core::fields::PHOTO_EXTENSIONS;

use crate::error::{ClientError, ClientResult};

/// MIME type for an accepted photo extension.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Encodes raw image bytes as a data URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads an image file and encodes it as a data URL.
pub fn encode_photo(path: &Path) -> ClientResult<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let mime = PHOTO_EXTENSIONS
        .contains(&extension.as_str())
        .then(|| mime_for_extension(&extension))
        .flatten()
        .ok_or_else(|| ClientError::UnsupportedPhoto {
            extension: extension.clone(),
        })?;

    let bytes = std::fs::read(path)?;
    debug!(?path, mime, size = bytes.len(), "Photo encoded");
    Ok(to_data_url(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        assert_eq!(to_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_encode_photo_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bolo.JPG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let url = encode_photo(&path).unwrap();
        assert_eq!(url, "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bolo.bmp");
        std::fs::write(&path, b"BM").unwrap();

        assert!(matches!(
            encode_photo(&path),
            Err(ClientError::UnsupportedPhoto { extension }) if extension == "bmp"
        ));
        assert!(encode_photo(&dir.path().join("no-extension")).is_err());
    }

    #[test]
    fn test_every_accepted_extension_has_a_mime() {
        for ext in PHOTO_EXTENSIONS {
            assert!(mime_for_extension(ext).is_some(), "{ext}");
        }
    }
}
