//! Common utilities for form generation.

use std::path::Path;

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
}

/// Turns a subject (class name, teacher short) into a file name component.
///
/// Case is kept so `5AHIT` stays recognizable; whitespace becomes `_`.
pub fn file_component(name: &str, fallback: &str) -> String {
    let cleaned: String = sanitize_filename::sanitize(name.trim())
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect();

    let cleaned = cleaned.trim_matches(|ch| ch == '_' || ch == '.');
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned.to_string()
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
