const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes UTF-8, falling back to Latin-1 so any byte sequence yields text.
pub(crate) fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
