//! Character-indexed text helpers
//!
//! Offsets count `char`s. These helpers translate to byte boundaries so a
//! multi-byte character is never split.

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of character `index`, or `text.len()` past the end
pub fn byte_index(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// First `count` characters of `text`
pub fn prefix(text: &str, count: usize) -> &str {
    &text[..byte_index(text, count)]
}

/// `text` with characters `start..start + length` removed
pub fn splice_out(text: &str, start: usize, length: usize) -> String {
    let from = byte_index(text, start);
    let to = from + byte_index(&text[from..], length);

    let mut out = String::with_capacity(text.len() - (to - from));
    out.push_str(&text[..from]);
    out.push_str(&text[to..]);
    out
}
