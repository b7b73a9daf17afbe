//! Post-conversion sanitization passes for Markdown note text.
//!
//! Each pass is a function `&str -> String` applied in sequence. The order
//! is fixed: un-escaping runs before tag wrapping, otherwise the wrapped
//! backticks would be visible to the un-escape pass.

use std::sync::LazyLock;

use regex::Regex;

/// Sanitize converted Markdown: un-escape converter artifacts, then wrap
/// bare interactive-element tag names in inline code.
pub fn sanitize(md: &str) -> String {
    static BARE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<(input|script|textarea|select|option)>").expect("valid regex")
    });

    wrap_bare_tags(&unescape_artifacts(md), &BARE_TAG_RE)
}

/// Sanitize highlighted text: [`sanitize`] plus an extended tag allow-list
/// used for highlights, which quote arbitrary document markup more often
/// than note bodies do.
pub fn sanitize_highlight(text: &str) -> String {
    static EXTENDED_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<(dl|img|div|canvas|figcaption|section|body|form)>").expect("valid regex")
    });

    wrap_bare_tags(&sanitize(text), &EXTENDED_TAG_RE)
}

// ---------------------------------------------------------------------------
// Pass 1: un-escape converter artifacts
// ---------------------------------------------------------------------------

/// Remove stray backslash escapes of `` ` ``, `_`, `[`, `]` that the
/// HTML-to-Markdown converter inserts into literal text and code.
fn unescape_artifacts(md: &str) -> String {
    static ESCAPED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\([`_\[\]])").expect("valid regex"));

    ESCAPED_RE.replace_all(md, "$1").to_string()
}

// ---------------------------------------------------------------------------
// Pass 2: wrap bare HTML tag names in inline code
// ---------------------------------------------------------------------------

/// Wrap each bare `<tag>` match in backticks unless it is already adjacent
/// to one. `regex` has no lookaround, so the surrounding bytes are checked
/// through the match offsets instead.
fn wrap_bare_tags(md: &str, re: &Regex) -> String {
    re.replace_all(md, |caps: &regex::Captures| {
        let m = caps.get(0).expect("whole match");
        let bytes = md.as_bytes();

        let before = m.start().checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(m.end()).copied();
        if before == Some(b'`') || after == Some(b'`') {
            return caps[0].to_string();
        }

        format!("`{}`", &caps[0])
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_converter_artifacts() {
        let input = r"let \`x\` = arr\[0\] and snake\_case";
        let result = sanitize(input);
        assert_eq!(result, "let `x` = arr[0] and snake_case");
    }

    #[test]
    fn leaves_other_escapes_alone() {
        let input = r"a \* b \# c";
        let result = sanitize(input);
        assert_eq!(result, r"a \* b \# c");
    }

    #[test]
    fn wraps_bare_tags_in_backticks() {
        let result = sanitize("Use a <select> with an <option> inside");
        assert_eq!(result, "Use a `<select>` with an `<option>` inside");
    }

    #[test]
    fn skips_tags_already_in_backticks() {
        let input = "already wrapped `<select>` here";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn tag_with_attributes_is_not_wrapped() {
        let input = r#"keep <select name="x"> as-is"#;
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            r"Use \`<select>\` and \_underscores\_",
            "plain text",
            "a <script> tag and a `<input>` span",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn highlight_wraps_extended_tag_list() {
        let result = sanitize_highlight("a <div> inside a <section> with an <img>");
        assert_eq!(result, "a `<div>` inside a `<section>` with an `<img>`");
    }

    #[test]
    fn highlight_keeps_base_list_too() {
        let result = sanitize_highlight("Use <select> tags");
        assert_eq!(result, "Use `<select>` tags");
    }

    #[test]
    fn highlight_is_idempotent() {
        let once = sanitize_highlight("a <div> and a <select>");
        assert_eq!(sanitize_highlight(&once), once);
    }
}
