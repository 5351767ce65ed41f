//! # Issue Path Normalization
//!
//! Vendors report where an issue occurred in one of three forms (see
//! [`NativePath`]). [`normalize_path`] turns each into an ordered list of
//! [`PathSegment`]s.
//!
//! A purely numeric component becomes [`PathSegment::Index`] in the
//! delimited form and inside accessor brackets. Quoted accessor keys
//! (`a["0"]`) always stay keys.

use polyschema_core::{NativePath, PathSegment};

/// Normalize a vendor path. The root is the empty list.
pub fn normalize_path(path: &NativePath) -> Vec<PathSegment> {
    match path {
        NativePath::Segments(segments) => segments.clone(),
        NativePath::Delimited(raw) => delimited(raw),
        NativePath::Accessor(raw) => accessor(raw),
    }
}

/// `a/b/0` or JSON Pointer `/a/b/0`, with `~1` → `/` and `~0` → `~`.
fn delimited(raw: &str) -> Vec<PathSegment> {
    let body = raw.strip_prefix('/').unwrap_or(raw);
    if body.is_empty() {
        return Vec::new();
    }
    body.split('/')
        .map(|part| segment(&part.replace("~1", "/").replace("~0", "~")))
        .collect()
}

/// `a.b[0].c`, `[1]`, `a["x.y"]`, `a['x']`.
fn accessor(raw: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut chars = raw.chars().peekable();
    let mut ident = String::new();

    while let Some(c) = chars.next() {
        match c {
            '.' => flush(&mut ident, &mut segments),
            '[' => {
                flush(&mut ident, &mut segments);
                match chars.peek().copied() {
                    Some(quote @ ('"' | '\'')) => {
                        chars.next();
                        let mut key = String::new();
                        while let Some(c) = chars.next() {
                            match c {
                                '\\' => {
                                    if let Some(escaped) = chars.next() {
                                        key.push(escaped);
                                    }
                                }
                                c if c == quote => break,
                                c => key.push(c),
                            }
                        }
                        // Closing bracket.
                        if chars.peek() == Some(&']') {
                            chars.next();
                        }
                        segments.push(PathSegment::Key(key));
                    }
                    _ => {
                        let mut inner = String::new();
                        for c in chars.by_ref() {
                            if c == ']' {
                                break;
                            }
                            inner.push(c);
                        }
                        let inner = inner.trim();
                        if !inner.is_empty() {
                            segments.push(segment(inner));
                        }
                    }
                }
            }
            c => ident.push(c),
        }
    }
    flush(&mut ident, &mut segments);
    segments
}

fn flush(ident: &mut String, segments: &mut Vec<PathSegment>) {
    if !ident.is_empty() {
        segments.push(PathSegment::Key(std::mem::take(ident)));
    }
}

fn segment(part: &str) -> PathSegment {
    let canonical_number =
        !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) && (part == "0" || !part.starts_with('0'));
    match part.parse::<usize>() {
        Ok(index) if canonical_number => PathSegment::Index(index),
        _ => PathSegment::Key(part.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(k.to_string())
    }

    fn accessor_path(s: &str) -> Vec<PathSegment> {
        normalize_path(&NativePath::Accessor(s.to_string()))
    }

    fn delimited_path(s: &str) -> Vec<PathSegment> {
        normalize_path(&NativePath::Delimited(s.to_string()))
    }

    #[test]
    fn segments_pass_through() {
        let segs = vec![key("a"), PathSegment::Index(2)];
        assert_eq!(normalize_path(&NativePath::Segments(segs.clone())), segs);
    }

    #[test]
    fn slash_delimited() {
        assert_eq!(
            delimited_path("a/b/0"),
            vec![key("a"), key("b"), PathSegment::Index(0)]
        );
    }

    #[test]
    fn json_pointer_with_escapes() {
        assert_eq!(
            delimited_path("/a~1b/m~0n/12"),
            vec![key("a/b"), key("m~n"), PathSegment::Index(12)]
        );
        assert!(delimited_path("/").is_empty());
        assert!(delimited_path("").is_empty());
    }

    #[test]
    fn escape_order_keeps_literal_tilde_one() {
        // `~01` is an escaped `~` followed by `1`, not an escaped `/`.
        assert_eq!(delimited_path("/~01"), vec![key("~1")]);
    }

    #[test]
    fn accessor_chain() {
        assert_eq!(
            accessor_path("a.b[0].c"),
            vec![key("a"), key("b"), PathSegment::Index(0), key("c")]
        );
    }

    #[test]
    fn accessor_leading_index() {
        assert_eq!(accessor_path("[1]"), vec![PathSegment::Index(1)]);
        assert_eq!(
            accessor_path("[1][2]"),
            vec![PathSegment::Index(1), PathSegment::Index(2)]
        );
    }

    #[test]
    fn accessor_quoted_keys() {
        assert_eq!(accessor_path(r#"a["x.y"]"#), vec![key("a"), key("x.y")]);
        assert_eq!(accessor_path("a['0']"), vec![key("a"), key("0")]);
        assert_eq!(
            accessor_path(r#"["say \"hi\""].z"#),
            vec![key(r#"say "hi""#), key("z")]
        );
    }

    #[test]
    fn accessor_empty_is_root() {
        assert!(accessor_path("").is_empty());
    }

    #[test]
    fn leading_zero_stays_a_key() {
        assert_eq!(delimited_path("a/007"), vec![key("a"), key("007")]);
    }
}
