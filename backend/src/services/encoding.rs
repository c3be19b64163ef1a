use std::fmt;
use std::path::Path;

use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::models::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::models::error::AppError;

const FALLBACK_MIME: &str = "application/octet-stream";

/// `data:<mime>;base64,<payload>` string as accepted by the stylization backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_uri: String,
    mime_type: &'static str,
    size_bytes: u64,
}

impl EncodedImage {
    pub fn as_str(&self) -> &str {
        &self.data_uri
    }

    pub fn into_string(self) -> String {
        self.data_uri
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data_uri)
    }
}

/// Sniffs the MIME type from magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

pub fn encode(bytes: &[u8]) -> Result<EncodedImage, AppError> {
    encode_with_limit(bytes, DEFAULT_MAX_UPLOAD_BYTES)
}

pub fn encode_with_limit(bytes: &[u8], limit: u64) -> Result<EncodedImage, AppError> {
    let size = bytes.len() as u64;
    if size > limit {
        return Err(AppError::SizeLimit { size, limit });
    }
    let mime_type = sniff_mime(bytes);
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(EncodedImage {
        data_uri: format!("data:{};base64,{}", mime_type, payload),
        mime_type,
        size_bytes: size,
    })
}

/// Reads and encodes a file. The size is checked from metadata before the read.
pub async fn encode_file(path: &Path, limit: u64) -> Result<EncodedImage, AppError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| AppError::ReadError(format!("Failed to read {}: {}", path.display(), e)))?;
    if meta.len() > limit {
        return Err(AppError::SizeLimit { size: meta.len(), limit });
    }
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::ReadError(format!("Failed to read {}: {}", path.display(), e)))?;
    encode_with_limit(&bytes, limit)
}

/// Decodes a data URI or raw base64 string into `(mime, bytes)`.
pub fn decode(encoded: &str) -> Result<(String, Vec<u8>), AppError> {
    let (declared, payload) = match encoded.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| AppError::ValidationError("data URI has no payload".to_string()))?;
            let mime = header.strip_suffix(";base64").unwrap_or(header);
            (Some(mime.to_string()), payload)
        }
        None => (None, encoded),
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::ValidationError(format!("Invalid base64 image: {}", e)))?;

    let mime = declared
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| sniff_mime(&bytes).to_string());
    Ok((mime, bytes))
}

/// Decoded byte count of a data URI or raw base64 string, estimated from its
/// length without decoding.
pub fn estimated_decoded_size(encoded: &str) -> u64 {
    let payload = encoded.split_once("base64,").map_or(encoded, |(_, p)| p);
    let chars = payload.trim_end().trim_end_matches('=').len() as u64;
    chars * 3 / 4
}

/// Rejects an already-encoded image whose payload would exceed `limit` bytes.
pub fn check_encoded_size(encoded: &str, limit: u64) -> Result<(), AppError> {
    let size = estimated_decoded_size(encoded);
    if size > limit {
        return Err(AppError::SizeLimit { size, limit });
    }
    Ok(())
}

/// Size-checks and decodes a client-supplied image string. Returns the decoded
/// bytes so callers can hash them.
pub fn validate_encoded_image(encoded: &str, limit: u64) -> Result<Vec<u8>, AppError> {
    check_encoded_size(encoded, limit)?;
    let (mime, bytes) = decode(encoded)?;
    if !mime.starts_with("image/") {
        return Err(AppError::InvalidMimeType(mime));
    }
    Ok(bytes)
}

/// Hex SHA-256 of the raw upload, used to recognise re-uploads of the same photo.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn encode_tags_mime_from_magic_bytes() {
        let png = encode(PNG_MAGIC).unwrap();
        assert_eq!(png.mime_type(), "image/png");
        assert!(png.as_str().starts_with("data:image/png;base64,"));

        let jpeg = encode(JPEG_MAGIC).unwrap();
        assert_eq!(jpeg.mime_type(), "image/jpeg");

        let unknown = encode(b"hello").unwrap();
        assert_eq!(unknown.mime_type(), FALLBACK_MIME);
    }

    #[test]
    fn encode_rejects_oversized_input() {
        let big = vec![0u8; DEFAULT_MAX_UPLOAD_BYTES as usize + 1];
        match encode(&big) {
            Err(AppError::SizeLimit { size, limit }) => {
                assert_eq!(size, DEFAULT_MAX_UPLOAD_BYTES + 1);
                assert_eq!(limit, DEFAULT_MAX_UPLOAD_BYTES);
            }
            other => panic!("expected size limit, got {:?}", other),
        }
        let exact = vec![0u8; DEFAULT_MAX_UPLOAD_BYTES as usize];
        assert!(encode(&exact).is_ok());
    }

    #[test]
    fn decode_handles_data_uri_and_raw() {
        let encoded = encode(PNG_MAGIC).unwrap();
        let (mime, bytes) = decode(encoded.as_str()).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, PNG_MAGIC);

        let raw = base64::engine::general_purpose::STANDARD.encode(JPEG_MAGIC);
        let (mime, bytes) = decode(&raw).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, JPEG_MAGIC);

        assert!(decode("data:image/png;base64").is_err());
        assert!(decode("not base64!!").is_err());
    }

    #[tokio::test]
    async fn encode_file_reports_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.jpg");
        assert!(matches!(
            encode_file(&missing, DEFAULT_MAX_UPLOAD_BYTES).await,
            Err(AppError::ReadError(_))
        ));

        let path = dir.path().join("photo.png");
        std::fs::write(&path, PNG_MAGIC).unwrap();
        let encoded = encode_file(&path, DEFAULT_MAX_UPLOAD_BYTES).await.unwrap();
        assert_eq!(encoded.size_bytes(), PNG_MAGIC.len() as u64);
        assert!(matches!(encode_file(&path, 4).await, Err(AppError::SizeLimit { .. })));
    }

    #[test]
    fn encoded_size_is_checked_without_decoding() {
        let encoded = encode(&[7u8; 300]).unwrap();
        assert_eq!(estimated_decoded_size(encoded.as_str()), 300);
        assert_eq!(estimated_decoded_size("AAAA"), 3);

        let oversized = format!("data:image/png;base64,{}", "A".repeat(2000));
        assert!(check_encoded_size(&oversized, 1500).is_ok());
        match check_encoded_size(&oversized, 1000) {
            Err(AppError::SizeLimit { size, limit }) => {
                assert_eq!(size, 1500);
                assert_eq!(limit, 1000);
            }
            other => panic!("expected size limit, got {:?}", other),
        }
    }

    #[test]
    fn client_images_must_decode_to_images() {
        let png = encode(PNG_MAGIC).unwrap();
        assert_eq!(validate_encoded_image(png.as_str(), 1024).unwrap(), PNG_MAGIC);

        assert!(matches!(
            validate_encoded_image("not-an-image", 1024),
            Err(AppError::ValidationError(_))
        ));
        let text = format!(
            "data:text/plain;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(b"hello")
        );
        assert!(matches!(
            validate_encoded_image(&text, 1024),
            Err(AppError::InvalidMimeType(_))
        ));
        assert!(matches!(
            validate_encoded_image(png.as_str(), 4),
            Err(AppError::SizeLimit { .. })
        ));
    }

    #[test]
    fn content_hash_is_stable() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_eq!(content_hash(b"abc").len(), 64);
    }
}
