//! String escape processing.
//!
//! Recognized escapes: `\n`, `\t`, `\\`, `\"`. Anything else is kept as written.

#[inline]
fn resolve_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        _ => None,
    }
}

pub(crate) fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(esc) => match resolve_escape(esc) {
                Some(resolved) => result.push(resolved),
                None => {
                    result.push('\\');
                    result.push(esc);
                }
            },
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_escapes() {
        assert_eq!(unescape_string(r#"a\nb\t\\\""#), "a\nb\t\\\"");
    }

    #[test]
    fn test_unknown_escape_kept() {
        assert_eq!(unescape_string(r"\q"), r"\q");
    }
}
