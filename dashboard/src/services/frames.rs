//! Decoding of base64 JPEG frames sent by the device.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Decode a frame to raw JPEG bytes.
///
/// Accepts bare base64 or a `data:image/jpeg;base64,` URL and ignores
/// embedded line breaks.
pub fn decode_jpeg(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let body = encoded.strip_prefix(DATA_URL_PREFIX).unwrap_or(encoded);
    if body.contains(['\n', '\r']) {
        let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        return STANDARD.decode(compact);
    }
    STANDARD.decode(body.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn decodes_bare_base64() {
        let encoded = STANDARD.encode(JPEG_HEADER);
        assert_eq!(decode_jpeg(&encoded).unwrap(), JPEG_HEADER);
    }

    #[test]
    fn decodes_data_url_with_line_breaks() {
        let encoded = STANDARD.encode(JPEG_HEADER);
        let (a, b) = encoded.split_at(3);
        let wrapped = format!("{DATA_URL_PREFIX}{a}\n{b}\n");
        assert_eq!(decode_jpeg(&wrapped).unwrap(), JPEG_HEADER);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_jpeg("not base64!").is_err());
    }
}
