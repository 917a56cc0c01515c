use super::types::MethodName;

/// Split a compressed method name into its source context and short name.
///
/// Names look like `[$]<source>$[$]<short>[$]`. Anything that does not fit
/// this shape maps to itself with no source.
pub fn decode_name(raw: &str) -> MethodName {
    if !raw.contains('$') {
        return undecomposed(raw);
    }

    let full = if raw.len() > 1 && raw.starts_with('$') && raw.ends_with('$') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };

    let last = match full.rfind('$') {
        Some(idx) if idx != 0 && idx != full.len() - 1 => idx,
        _ => return undecomposed(full),
    };

    // `$$` separates as a single `$`
    let collapse = usize::from(full.as_bytes()[last - 1] == b'$');

    MethodName {
        full: full.to_string(),
        source: Some(full[..last - collapse].to_string()),
        short: full[last + 1..].to_string(),
    }
}

fn undecomposed(text: &str) -> MethodName {
    MethodName {
        full: text.to_string(),
        source: None,
        short: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(full: &str, source: Option<&str>, short: &str) -> MethodName {
        MethodName {
            full: full.to_string(),
            source: source.map(str::to_string),
            short: short.to_string(),
        }
    }

    #[test]
    fn plain_name_is_identity() {
        assert_eq!(decode_name("foo"), name("foo", None, "foo"));
    }

    #[test]
    fn outer_dollars_are_stripped() {
        assert_eq!(decode_name("$foo$bar$"), name("foo$bar", Some("foo"), "bar"));
    }

    #[test]
    fn doubled_separator_collapses() {
        assert_eq!(decode_name("a$$b"), name("a$$b", Some("a"), "b"));
    }

    #[test]
    fn leading_dollar_only_is_not_decomposable() {
        assert_eq!(decode_name("$abc"), name("$abc", None, "$abc"));
    }

    #[test]
    fn trailing_dollar_only_is_not_decomposable() {
        assert_eq!(decode_name("abc$"), name("abc$", None, "abc$"));
    }

    #[test]
    fn wrapper_without_inner_separator() {
        assert_eq!(decode_name("$foo$"), name("foo", None, "foo"));
        assert_eq!(decode_name("$"), name("$", None, "$"));
        assert_eq!(decode_name("$$"), name("", None, ""));
    }

    #[test]
    fn source_keeps_path_segments() {
        assert_eq!(
            decode_name("$lib/math.js$Math$$max$"),
            name("lib/math.js$Math$$max", Some("lib/math.js$Math"), "max")
        );
    }
}
