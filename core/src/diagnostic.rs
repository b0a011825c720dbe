/// Rewrites every line break of the diagnostic dump to `\n`.
///
/// Recognizes CRLF, CR, LF, NEL, LS, PS and form feed. A leading
/// byte order mark is dropped.
pub fn normalize_line_endings(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                normalized.push('\n');
            }
            '\u{0085}' | '\u{2028}' | '\u{2029}' | '\u{000C}' => normalized.push('\n'),
            _ => normalized.push(c),
        }
    }
    normalized
}
