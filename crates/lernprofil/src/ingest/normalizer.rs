/// Canonical item code: invisible characters dropped, trimmed, upper-cased.
pub(crate) fn normalize_code(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.trim().to_ascii_uppercase()
}

/// Canonical CSV header name.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.trim().to_ascii_lowercase()
}
