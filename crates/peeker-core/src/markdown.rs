//! Rewriting of upstream internal references in note bodies.
//!
//! The upstream links notes and resources with a private `:/<id>` scheme that
//! only its own clients understand. Three rules turn those references into
//! gateway URLs, applied in order, each to the previous rule's output:
//!
//! 1. `![alt](:/res)` becomes `<img src='/image/res' alt='alt'/>`
//! 2. `[text](:/note)` not preceded by `!` becomes `[text](/id/note)`
//! 3. `<img ... src=":/res" ...>` gets `src` pointed at `/image/res`
//!
//! The image rule must run before the link rule, since every embedded image
//! also contains a link-shaped `[alt](:/res)`. A rewritten reference no
//! longer matches any rule, so rewriting is idempotent.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Gateway route serving resource bytes.
pub const IMAGE_ROUTE: &str = "/image/";

/// Gateway route serving rewritten notes.
pub const NOTE_ROUTE: &str = "/id/";

/// `![alt](:/id)` with an optional `"title"`, `'title'` or `(title)`.
///
/// The alt text stays within one bracket pair, so a failed match can never
/// stretch over a following link.
static EMBEDDED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"!\[([^\]\n]*)\]\(:/([^)\s]+)(?:\s+(?:"([^"]*)"|'([^']*)'|\(([^)]*)\)))?\)"#,
    )
    .expect("invalid embedded image regex")
});

/// `[text](:/id)`; the "not after `!`" condition is checked on each match.
///
/// Link text holds no brackets, so a skipped match never hides a link nested
/// inside it.
static NOTE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]\n]*)\]\(:/([^()\]\n]*)\)").expect("invalid note link regex")
});

/// `<img ... src=":/id" ... />`, confined to a single tag.
static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img(\s(?:[^>]*?\s)?)src=(?:":/([^"\s>]+)"|':/([^'\s>]+)')([^>]*)/>"#)
        .expect("invalid html image regex")
});

/// Rewrite every internal reference in `body` to a gateway-relative URL.
///
/// Text without internal references is returned unchanged.
pub fn rewrite(body: &str) -> String {
    let text = rewrite_embedded_images(body);
    let text = rewrite_note_links(&text);
    rewrite_html_images(&text).into_owned()
}

fn rewrite_embedded_images(text: &str) -> Cow<'_, str> {
    EMBEDDED_IMAGE.replace_all(text, |caps: &Captures| {
        let mut tag = format!(
            "<img src='{IMAGE_ROUTE}{}' alt='{}'",
            &caps[2],
            escape_attribute(&caps[1])
        );
        if let Some(title) = caps.get(3).or_else(|| caps.get(4)).or_else(|| caps.get(5)) {
            tag.push_str(&format!(" title='{}'", escape_attribute(title.as_str())));
        }
        tag.push_str("/>");
        tag
    })
}

fn rewrite_note_links(text: &str) -> Cow<'_, str> {
    NOTE_LINK.replace_all(text, |caps: &Captures| {
        let start = caps.get(0).map_or(0, |m| m.start());
        if text[..start].ends_with('!') {
            return caps[0].to_string();
        }
        format!("[{}]({NOTE_ROUTE}{})", &caps[1], &caps[2])
    })
}

fn rewrite_html_images(text: &str) -> Cow<'_, str> {
    HTML_IMAGE.replace_all(text, |caps: &Captures| {
        let (quote, id) = match (caps.get(2), caps.get(3)) {
            (Some(id), _) => ('"', id.as_str()),
            (None, Some(id)) => ('\'', id.as_str()),
            (None, None) => return caps[0].to_string(),
        };
        format!(
            "<img{}src={quote}{IMAGE_ROUTE}{id}{quote}{}/>",
            &caps[1], &caps[4]
        )
    })
}

/// Escape text for a single-quoted HTML attribute.
///
/// Square brackets are escaped too so alt text can never re-form markdown
/// link syntax in the output.
fn escape_attribute(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'', '[', ']']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '[' => escaped.push_str("&#91;"),
            ']' => escaped.push_str("&#93;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
