//! Escaping between literal text and regex syntax.

/// Escapes every regex metacharacter so `text` matches only itself.
pub fn escape_pattern(text: &str) -> String {
    regex::escape(text)
}

/// Escapes capture-group references so `text` is inserted verbatim by
/// `Captures::expand`.
pub fn escape_replacement(text: &str) -> String {
    text.replace('$', "$$")
}

/// Returns true if a pattern has a `^` or `$` anchor.
///
/// Escaped characters and the inside of character classes are skipped,
/// so `\$`, `[^a]` and `[$]` are not anchors. A `]` right after `[` or
/// `[^` is a literal member of the class, as in `[]$]`.
pub fn has_line_anchors(pattern: &str) -> bool {
    let mut chars = pattern.chars().peekable();
    let mut class_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => {
                class_depth += 1;
                chars.next_if_eq(&'^');
                chars.next_if_eq(&']');
            }
            ']' if class_depth > 0 => class_depth -= 1,
            '^' | '$' if class_depth == 0 => return true,
            _ => {}
        }
    }
    false
}
