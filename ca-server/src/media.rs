//! Image payloads
//!
//! Clients send images inline, either as a `data:<mime>;base64,<data>` URL
//! or as bare base64. They are decoded once to validate them and measure the
//! real size, then stored as base64 plus mime type and served back as data
//! URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::error::{AppError, ErrorCode};

/// Banner images
pub const MAX_BANNER_IMAGE_BYTES: usize = 10 * 1024 * 1024;
/// Product gallery images
pub const MAX_PRODUCT_IMAGE_BYTES: usize = 10 * 1024 * 1024;
/// Member photos
pub const MAX_MEMBER_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Mime type assumed for bare base64
pub const DEFAULT_MIME: &str = "image/jpeg";

/// A validated image ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime: String,
    /// Canonical base64 (whitespace stripped)
    pub base64: String,
    /// Decoded size
    pub size: usize,
}

/// Parse and validate an inline image no larger than `max_bytes` once decoded.
pub fn parse_image(input: &str, max_bytes: usize) -> Result<ImagePayload, AppError> {
    let input = input.trim();
    let (mime, data) = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| invalid("data URL has no payload"))?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| invalid("data URL must be base64 encoded"))?;
            (mime.to_ascii_lowercase(), data)
        }
        None => (DEFAULT_MIME.to_string(), input),
    };

    if !mime.starts_with("image/") || mime.len() <= "image/".len() {
        return Err(invalid(&format!("unsupported mime type {mime}")));
    }

    let base64: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if base64.is_empty() {
        return Err(invalid("image is empty"));
    }

    // Reject on the encoded length first so oversized payloads are not decoded
    let estimated = base64.len() / 4 * 3;
    if estimated > max_bytes + 3 {
        return Err(too_large(estimated, max_bytes));
    }

    let size = STANDARD
        .decode(base64.as_bytes())
        .map_err(|e| invalid(&format!("invalid base64: {e}")))?
        .len();
    if size > max_bytes {
        return Err(too_large(size, max_bytes));
    }

    Ok(ImagePayload { mime, base64, size })
}

/// Optional image field: `None` stays `None`, an empty string clears.
pub fn parse_optional_image(
    input: Option<&str>,
    max_bytes: usize,
) -> Result<Option<Option<ImagePayload>>, AppError> {
    match input {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(Some(None)),
        Some(s) => parse_image(s, max_bytes).map(|p| Some(Some(p))),
    }
}

fn invalid(reason: &str) -> AppError {
    AppError::with_message(ErrorCode::InvalidImage, format!("Invalid image: {reason}"))
}

fn too_large(size: usize, max_bytes: usize) -> AppError {
    AppError::with_message(
        ErrorCode::ImageTooLarge,
        format!(
            "Image is too large ({:.1} MB, max {} MB)",
            size as f64 / (1024.0 * 1024.0),
            max_bytes / (1024 * 1024)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_1PX: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

    #[test]
    fn data_url_keeps_mime() {
        let payload = parse_image(&format!("data:image/png;base64,{PNG_1PX}"), 1024).unwrap();
        assert_eq!(payload.mime, "image/png");
        assert_eq!(payload.base64, PNG_1PX);
        assert!(payload.size > 0);
    }

    #[test]
    fn bare_base64_defaults_to_jpeg() {
        let payload = parse_image(PNG_1PX, 1024).unwrap();
        assert_eq!(payload.mime, DEFAULT_MIME);
    }

    #[test]
    fn whitespace_is_stripped() {
        let wrapped = format!("{}\n{}", &PNG_1PX[..20], &PNG_1PX[20..]);
        assert_eq!(parse_image(&wrapped, 1024).unwrap().base64, PNG_1PX);
    }

    #[test]
    fn oversize_is_413() {
        let big = STANDARD.encode(vec![0u8; 2048]);
        let err = parse_image(&big, 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageTooLarge);
        assert_eq!(err.http_status(), http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn exact_limit_is_accepted() {
        let exact = STANDARD.encode(vec![0u8; 1024]);
        assert_eq!(parse_image(&exact, 1024).unwrap().size, 1024);
    }

    #[test]
    fn malformed_is_400() {
        let err = parse_image("data:image/png;base64,@@@@", 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImage);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        assert!(parse_image("data:text/plain;base64,aGVsbG8=", 1024).is_err());
        assert!(parse_image("data:image/png,raw", 1024).is_err());
        assert!(parse_image("", 1024).is_err());
    }

    #[test]
    fn optional_image_semantics() {
        assert_eq!(parse_optional_image(None, 1024).unwrap(), None);
        assert_eq!(parse_optional_image(Some(""), 1024).unwrap(), Some(None));
        assert!(matches!(
            parse_optional_image(Some(PNG_1PX), 1024).unwrap(),
            Some(Some(_))
        ));
    }
}
