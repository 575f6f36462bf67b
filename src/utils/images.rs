use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;

use crate::error::AppError;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Source photo accepted for editing, decoded from a base64 data URI.
#[derive(Debug)]
pub struct ImagePayload {
    /// Decoded size in bytes.
    pub size: i64,
    /// Canonical format name: jpeg, png or webp.
    pub format: String,
}

fn canonical_format(declared: &str) -> Option<&'static str> {
    match declared {
        "jpeg" | "jpg" => Some("jpeg"),
        "png" => Some("png"),
        "webp" => Some("webp"),
        _ => None,
    }
}

fn sniffed_format(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some("jpeg"),
        ImageFormat::Png => Some("png"),
        ImageFormat::WebP => Some("webp"),
        _ => None,
    }
}

/// Validates a `data:image/...;base64,...` URI: declared format must be one of
/// JPEG/PNG/WebP, the payload must decode, stay under 10 MB and carry the
/// magic bytes of the declared format.
pub fn validate_data_uri(data_uri: &str) -> Result<ImagePayload, AppError> {
    let (head, payload) = data_uri.split_once(";base64,").ok_or_else(|| {
        AppError::InvalidInput(
            "Invalid image format. Please provide a valid base64 data URI for JPEG, PNG, or WebP image.".to_string(),
        )
    })?;

    let head = head.to_ascii_lowercase();
    let declared = head.strip_prefix("data:image/").ok_or_else(|| {
        AppError::InvalidInput(
            "Invalid image format. Please provide a valid base64 data URI for JPEG, PNG, or WebP image.".to_string(),
        )
    })?;

    let declared = canonical_format(declared).ok_or_else(|| {
        AppError::InvalidInput("Invalid file format. Please use JPEG, PNG, or WebP".to_string())
    })?;

    let bytes = general_purpose::STANDARD.decode(payload).map_err(|_| {
        AppError::InvalidInput("Invalid image data. The base64 payload could not be decoded.".to_string())
    })?;

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::InvalidInput(
            "File is too large. Maximum size is 10MB".to_string(),
        ));
    }

    let sniffed = sniffed_format(&bytes).ok_or_else(|| {
        AppError::InvalidInput("Invalid file format. Please use JPEG, PNG, or WebP".to_string())
    })?;

    if sniffed != declared {
        return Err(AppError::InvalidInput(format!(
            "Image data does not match the declared format ({})",
            declared
        )));
    }

    Ok(ImagePayload {
        size: bytes.len() as i64,
        format: declared.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: [u8; 12] = [
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
    ];
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn data_uri(mime: &str, bytes: &[u8]) -> String {
        format!(
            "data:image/{};base64,{}",
            mime,
            general_purpose::STANDARD.encode(bytes)
        )
    }

    #[test]
    fn accepts_a_valid_jpeg() {
        let payload = validate_data_uri(&data_uri("jpeg", &JPEG_MAGIC)).unwrap();
        assert_eq!(payload.format, "jpeg");
        assert_eq!(payload.size, JPEG_MAGIC.len() as i64);
    }

    #[test]
    fn jpg_is_an_alias_for_jpeg() {
        let payload = validate_data_uri(&data_uri("jpg", &JPEG_MAGIC)).unwrap();
        assert_eq!(payload.format, "jpeg");
    }

    #[test]
    fn mime_matching_ignores_case() {
        let uri = format!(
            "DATA:IMAGE/JPEG;base64,{}",
            general_purpose::STANDARD.encode(JPEG_MAGIC)
        );
        assert!(validate_data_uri(&uri).is_ok());
    }

    #[test]
    fn rejects_plain_strings() {
        assert!(validate_data_uri("not an image").is_err());
        assert!(validate_data_uri("data:image/jpeg,unencoded").is_err());
    }

    #[test]
    fn rejects_unsupported_declared_format() {
        let err = validate_data_uri(&data_uri("gif", &PNG_MAGIC)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn rejects_declared_format_that_does_not_match_bytes() {
        let err = validate_data_uri(&data_uri("png", &JPEG_MAGIC)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn rejects_broken_base64() {
        let uri = "data:image/png;base64,!!!not-base64!!!";
        assert!(validate_data_uri(uri).is_err());
    }

    #[test]
    fn rejects_payloads_over_the_size_cap() {
        let mut bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        bytes[..8].copy_from_slice(&PNG_MAGIC);
        let err = validate_data_uri(&data_uri("png", &bytes)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn accepts_payloads_at_the_size_cap() {
        let mut bytes = vec![0u8; MAX_IMAGE_BYTES];
        bytes[..8].copy_from_slice(&PNG_MAGIC);
        assert!(validate_data_uri(&data_uri("png", &bytes)).is_ok());
    }
}
