//! Caret-aware token insertion.

/// Converts a caret position (in characters) into a byte offset.
///
/// Carets past the end of the text clamp to `text.len()`.
pub(crate) fn byte_offset(text: &str, caret: usize) -> usize {
    text.char_indices()
        .nth(caret)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Inserts `token` at `caret`, keeping single-space separation.
///
/// A single space is placed before the token unless the caret is at the
/// start of the buffer or the text before it already ends with a space.
/// Whatever follows the caret is kept as-is; no trailing space is added.
///
/// # Arguments
///
/// * `buffer` - Current composition text
/// * `caret` - Caret position in characters (clamped to the text length)
/// * `token` - Note token to insert
///
/// # Returns
///
/// The new text and the caret position immediately after the inserted token.
///
/// # Examples
///
/// ```
/// use keyscribe::composition::insert_token;
///
/// assert_eq!(insert_token("", 0, "C4"), ("C4".to_string(), 2));
/// assert_eq!(insert_token("C4", 2, "D4"), ("C4 D4".to_string(), 5));
/// ```
pub fn insert_token(buffer: &str, caret: usize, token: &str) -> (String, usize) {
    let split = byte_offset(buffer, caret);
    let (before, after) = buffer.split_at(split);
    let caret = before.chars().count();

    let needs_space = !before.is_empty() && !before.ends_with(' ');

    let mut text = String::with_capacity(buffer.len() + token.len() + 1);
    text.push_str(before);
    if needs_space {
        text.push(' ');
    }
    text.push_str(token);
    text.push_str(after);

    let new_caret = caret + token.chars().count() + usize::from(needs_space);
    (text, new_caret)
}
