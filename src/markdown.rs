//! Markdown section splitting: heading-delimited `(title, body)` pairs.
//!
//! Converters that emit a whole markdown document (rather than pre-split
//! sections) are adapted through [`split_sections`], which turns ATX
//! headings into section boundaries. The returned list order is the
//! document's top-to-bottom reading order — the ordering contract the
//! analyzer depends on is explicit in the return type.

use tracing::debug;

/// Split a markdown document into ordered `(title, body)` sections.
///
/// Every ATX heading (`#` through `######`) starts a new section titled by
/// the heading text; the body is everything up to the next heading, trimmed.
/// Headings inside fenced code blocks are not boundaries. Content before the
/// first heading has no title to attach to and is dropped with a debug log.
pub fn split_sections(markdown: &str) -> Vec<(String, String)> {
    let mut sections: Vec<(String, String)> = Vec::new();
    let mut current_title: Option<String> = None;
    let mut current_body: Vec<&str> = Vec::new();
    let mut in_fence = false;

    fn flush(title: &mut Option<String>, body: &mut Vec<&str>, out: &mut Vec<(String, String)>) {
        let text = body.join("\n").trim().to_string();
        match title.take() {
            Some(t) => out.push((t, text)),
            None => {
                if !text.is_empty() {
                    debug!("Dropping {} bytes of pre-heading content", text.len());
                }
            }
        }
        body.clear();
    }

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }

        if !in_fence {
            if let Some(title) = heading_text(trimmed) {
                flush(&mut current_title, &mut current_body, &mut sections);
                current_title = Some(title.to_string());
                continue;
            }
        }
        current_body.push(line);
    }
    flush(&mut current_title, &mut current_body, &mut sections);

    sections
}

/// The text of an ATX heading line, or `None` if the line is not a heading.
fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    // "#Title" without a space is not an ATX heading; a bare "#" is.
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix(' ').map(|t| t.trim())
}
