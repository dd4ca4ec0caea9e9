/// Translates a single escape character (the one after `\`).
///
/// Returns `None` when the character has no escape meaning.
#[must_use]
pub const fn escape_char(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'r' => Some('\r'),
        'v' => Some('\u{0B}'),
        '?' => Some('?'),
        _ => None,
    }
}

/// Translates every escape sequence in `text`.
///
/// # Errors
/// Returns the offending character when a backslash is followed by a
/// character without escape meaning, or by nothing at all.
///
/// # Example
/// ```
/// use pile::util::escape::unescape;
///
/// assert_eq!(unescape(r"a\tb\n").unwrap(), "a\tb\n");
/// assert_eq!(unescape(r"\q").unwrap_err(), 'q');
/// ```
pub fn unescape(text: &str) -> Result<String, char> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let next = chars.next().ok_or('\\')?;
        out.push(escape_char(next).ok_or(next)?);
    }

    Ok(out)
}

/// Translates the escape sequences in `text` that have a meaning and keeps
/// everything else as written.
///
/// # Example
/// ```
/// use pile::util::escape::unescape_lenient;
///
/// assert_eq!(unescape_lenient(r"x\ny\q"), "x\ny\\q");
/// ```
#[must_use]
pub fn unescape_lenient(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\'
           && let Some(translated) = chars.peek().copied().and_then(escape_char)
        {
            chars.next();
            out.push(translated);
        } else {
            out.push(c);
        }
    }

    out
}
