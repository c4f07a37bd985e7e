//! Physical-line splitting and per-line field extraction.
//!
//! Each physical line of an export is `content;metadata...` where only the
//! content before the first `;` belongs to the record text. Lines that are
//! empty after trimming carry nothing and are dropped before extraction.

/// Lines that survive trimming, in file order.
pub fn content_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// The record content of one physical line: everything before the first `;`,
/// trimmed, with one layer of enclosing double quotes removed.
///
/// Exactly one quote layer is stripped, and only when both ends carry one
/// (length at least 2). The result can be empty for lines like `;meta`.
pub fn first_field(line: &str) -> &str {
    let head = match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let head = head.trim();
    if head.len() >= 2 && head.starts_with('"') && head.ends_with('"') {
        &head[1..head.len() - 1]
    } else {
        head
    }
}
