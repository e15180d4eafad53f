//! Chunk splitting: decompose section markup into ordered typed fragments.
//!
//! ## Why split at all?
//!
//! A converted paper section is markdown with embedded image references.
//! Prose must go to the language model; image tokens must go to the asset
//! store. Neither handler can process the other's input, so the section is
//! tokenised into an ordered sequence of [`Chunk`]s first and reassembled
//! after both handlers have run. The splitter is the only place where the
//! image grammar is interpreted — everything downstream works on whole,
//! already-classified tokens.
//!
//! ## Grammar
//!
//! Two image token forms are recognised:
//!
//! - Markdown: `![alt](url "optional title")` where `url` is any run of
//!   non-whitespace, non-`)` characters
//! - HTML: `<img ... src="...">` with single- or double-quoted `src`,
//!   case-insensitive tag and attribute names
//!
//! Malformed or unterminated image syntax never matches and is carried
//! through as ordinary text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What a [`Chunk`] carries: prose or a complete image reference token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// A prose fragment destined for the language model.
    Text,
    /// A whole image token (markdown or HTML form) destined for relocation.
    #[serde(rename = "img")]
    Image,
}

/// An atomic, ordered fragment of section markup.
///
/// Produced by [`split_text_and_images`]; consumed exactly once by either the
/// chunk transformer (Text) or the image relocator (Image).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub content: String,
}

impl Chunk {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: ChunkKind::Text,
            content: content.into(),
        }
    }

    pub fn image(content: impl Into<String>) -> Self {
        Self {
            kind: ChunkKind::Image,
            content: content.into(),
        }
    }
}

// Markdown image token: ![alt](url "optional title")
const MD_IMG: &str = r#"!\[[^\]]*\]\([^\s)]+(?:\s+"[^"]*")?\)"#;
// HTML image tag with quoted src, any attribute order.
const HTML_IMG: &str = r#"<img\b[^>]*?\bsrc\s*=\s*(?:"[^"]*"|'[^']*')[^>]*?>"#;

static IMAGE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?i)(?:{MD_IMG}|{HTML_IMG})")).unwrap());

static IMAGE_TOKEN_FULL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?i)^(?:{MD_IMG}|{HTML_IMG})$")).unwrap());

static MD_IMG_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"!\[[^\]]*\]\(([^\s)]+)(?:\s+"[^"]*")?\)"#).unwrap());

static HTML_IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']*)["']"#).unwrap());

/// Split markup into an ordered sequence of text and image chunks.
///
/// Image tokens are isolated as standalone chunks; the text between them is
/// kept in original order. Fragments that are empty or whitespace-only after
/// trimming are dropped, so adjacent images produce two consecutive Image
/// chunks with no empty Text chunk between them.
///
/// Deterministic and side-effect free: identical input yields byte-identical
/// output.
pub fn split_text_and_images(input: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut last = 0;
    for m in IMAGE_TOKEN.find_iter(input) {
        push_fragment(&mut chunks, &input[last..m.start()]);
        push_fragment(&mut chunks, m.as_str());
        last = m.end();
    }
    push_fragment(&mut chunks, &input[last..]);
    chunks
}

/// Split a multi-part input, treating the parts as one logical document
/// joined with line breaks.
pub fn split_text_and_images_joined<I, S>(parts: I) -> Vec<Chunk>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = parts
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    split_text_and_images(&joined)
}

fn push_fragment(out: &mut Vec<Chunk>, raw: &str) {
    let piece = raw.trim();
    if piece.is_empty() {
        return;
    }
    // A fragment is an image chunk only when the entire trimmed fragment is
    // an image token; a fragment merely containing one is never produced
    // because the splitter isolates full tokens as boundaries.
    let kind = if IMAGE_TOKEN_FULL.is_match(piece) {
        ChunkKind::Image
    } else {
        ChunkKind::Text
    };
    out.push(Chunk {
        kind,
        content: piece.to_string(),
    });
}

/// Extract the resource locator from an image token.
///
/// Returns `None` when the token matches neither image grammar.
pub fn extract_image_url(token: &str) -> Option<String> {
    if let Some(caps) = MD_IMG_URL.captures(token) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = HTML_IMG_SRC.captures(token) {
        return Some(caps[1].to_string());
    }
    None
}

/// Rewrite an image token's locator, preserving every other byte of the
/// token (alt text, optional title, remaining HTML attributes).
///
/// Returns the token unchanged when it matches neither grammar.
pub fn replace_image_url(token: &str, new_url: &str) -> String {
    let locator = MD_IMG_URL
        .captures(token)
        .and_then(|caps| caps.get(1))
        .or_else(|| HTML_IMG_SRC.captures(token).and_then(|caps| caps.get(1)));

    match locator {
        Some(m) => {
            let mut rewritten = String::with_capacity(token.len() + new_url.len());
            rewritten.push_str(&token[..m.start()]);
            rewritten.push_str(new_url);
            rewritten.push_str(&token[m.end()..]);
            rewritten
        }
        None => token.to_string(),
    }
}
