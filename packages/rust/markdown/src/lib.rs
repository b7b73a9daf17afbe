//! HTML-to-Markdown conversion for note content.
//!
//! Converts the raw HTML bodies of exported notes to Markdown using the
//! `htmd` crate with two custom rules, then runs the sanitization passes.
//! The rules:
//! - `<em>` elements are unwrapped to their inner HTML — emphasis markup is
//!   dropped rather than converted to `*text*`.
//! - `<pre>` blocks become fenced code blocks tagged with the course's
//!   language hint.
//!
//! `htmd` 0.1 has no per-element rule hooks, so both rules are applied as a
//! pre-pass over the parsed fragment before conversion.

mod sanitize;

pub use sanitize::{sanitize, sanitize_highlight};

use scraper::{Html, Selector};
use tracing::{debug, instrument};

use notedown_shared::{CodeLanguage, NotedownError, Result};

/// Inline token standing in for an extracted `<pre>` block during
/// conversion. Plain text that `htmd` passes through untouched.
const CODE_TOKEN_PREFIX: &str = "@@notedown-code-";

/// Convert one note's HTML body to sanitized Markdown.
///
/// Malformed HTML is not validated here; whatever the underlying parser
/// tolerates is converted.
#[instrument(skip(html), fields(len = html.len()))]
pub fn convert_note_html(html: &str, lang: CodeLanguage) -> Result<String> {
    let (prepared, code_blocks) = apply_note_rules(html);

    let converter = htmd::HtmlToMarkdown::builder().build();
    let raw = converter
        .convert(&prepared)
        .map_err(|e| NotedownError::Conversion(format!("htmd conversion failed: {e}")))?;

    debug!(
        raw_len = raw.len(),
        code_blocks = code_blocks.len(),
        "htmd conversion complete"
    );

    let restored = restore_code_blocks(&raw, &code_blocks, lang);
    Ok(sanitize(&restored))
}

// ---------------------------------------------------------------------------
// Pre-pass: custom note rules
// ---------------------------------------------------------------------------

/// Apply the `<pre>` and `<em>` rules to the HTML before conversion.
///
/// Returns the prepared HTML plus the extracted code block texts, in
/// placeholder order.
fn apply_note_rules(html: &str) -> (String, Vec<String>) {
    let doc = Html::parse_fragment(html);

    let pre_sel = Selector::parse("pre").expect("valid selector");
    let em_sel = Selector::parse("em").expect("valid selector");

    if doc.select(&pre_sel).next().is_none() && doc.select(&em_sel).next().is_none() {
        return (html.to_string(), Vec::new());
    }

    // Work on the re-serialized fragment so the outer-HTML needles below
    // byte-match the haystack.
    let mut result = doc.root_element().inner_html();
    let mut code_blocks = Vec::new();

    // Extract <pre> blocks first: emphasis inside code is captured as text,
    // not unwrapped.
    for el in doc.select(&pre_sel) {
        let token = format!("{CODE_TOKEN_PREFIX}{}@@", code_blocks.len());
        code_blocks.push(el.text().collect::<String>());
        result = result.replacen(&el.html(), &token, 1);
    }

    // Unwrap <em> elements to their inner HTML. Elements inside an extracted
    // <pre> no longer appear in the haystack and are skipped.
    for el in doc.select(&em_sel) {
        result = result.replacen(&el.html(), &el.inner_html(), 1);
    }

    (result, code_blocks)
}

/// Replace each placeholder token with its fenced code block.
fn restore_code_blocks(md: &str, code_blocks: &[String], lang: CodeLanguage) -> String {
    let mut result = md.to_string();
    for (i, code) in code_blocks.iter().enumerate() {
        let token = format!("{CODE_TOKEN_PREFIX}{i}@@");
        let fence = format!("```{}\n{}\n```", lang.fence_info(), code);
        result = result.replacen(&token, &fence, 1);
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
