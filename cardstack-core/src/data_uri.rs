//! Helpers for images carried as base64 data URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Encodes raw image bytes as a `data:<mime>;base64,` URI.
pub fn encode_data_uri(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Returns the base64 payload with any `data:...,` prefix removed.
pub fn strip_data_uri_prefix(image: &str) -> &str {
    if !image.starts_with("data:") {
        return image;
    }
    image
        .split_once(',')
        .map(|(_, payload)| payload)
        .unwrap_or(image)
}

pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

/// Guesses an image MIME type from a file extension.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_data_uri() {
        assert_eq!(
            encode_data_uri(b"abc", "image/png"),
            "data:image/png;base64,YWJj"
        );
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_data_uri_prefix("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri_prefix("QUJD"), "QUJD");
    }

    #[test]
    fn test_strip_prefix_without_comma_is_untouched() {
        assert_eq!(strip_data_uri_prefix("data:broken"), "data:broken");
    }

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(mime_type_for_path(Path::new("a/b.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for_path(Path::new("card.png")), Some("image/png"));
        assert_eq!(mime_type_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for_path(Path::new("noext")), None);
    }
}
