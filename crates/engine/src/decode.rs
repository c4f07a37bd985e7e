//! Byte decoding and newline normalization.

/// Decode raw export bytes into text. Never fails.
///
/// The exports carry no encoding declaration and in practice are Windows-1252.
/// That encoding is total over all 256 byte values, so the primary decode
/// always succeeds; the detector tier only engages if the primary is ever
/// swapped for a multi-byte encoding.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }
    detect_and_decode(bytes)
}

/// Statistical fallback: guess the encoding, decode with replacement
/// characters for anything unmappable.
fn detect_and_decode(bytes: &[u8]) -> String {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Collapse CRLF and lone CR line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
