//! arXiv collaborator: id handling, metadata lookup, and PDF download.
//!
//! Metadata comes from the arXiv Atom export API
//! (`https://export.arxiv.org/api/query`), parsed with a quick-xml event
//! loop. The PDF download validates the response's declared content type and
//! leaves magic-byte validation to the analyzer, so a paywall HTML page or a
//! redirect-to-login never reaches the converter.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::DigestError;
use crate::output::ArxivMetadata;
use crate::ports::PaperSource;

const EXPORT_API: &str = "https://export.arxiv.org/api/query";

static ABS_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://arxiv\.org/abs/([^/\s]+)").unwrap());

static VERSION_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"v\d+$").unwrap());

/// Strip a trailing version marker (`v1`, `v2`, …) from an arXiv id.
pub fn normalize_arxiv_id(arxiv_id: &str) -> String {
    VERSION_SUFFIX.replace(arxiv_id.trim(), "").to_string()
}

/// Convert an arXiv abs URL to its PDF download URL.
///
/// Returns the input unchanged when it already ends in `.pdf`, `None` when
/// the string is neither an abs URL nor a PDF URL.
pub fn abs_url_to_pdf_url(arxiv_url: &str) -> Option<String> {
    if let Some(caps) = ABS_URL.captures(arxiv_url) {
        let clean_id = normalize_arxiv_id(&caps[1]);
        return Some(format!("https://arxiv.org/pdf/{clean_id}.pdf"));
    }
    if arxiv_url.ends_with(".pdf") {
        return Some(arxiv_url.to_string());
    }
    None
}

/// PDF download URL for a bare arXiv id.
pub fn pdf_url_for_id(arxiv_id: &str) -> String {
    format!("https://arxiv.org/pdf/{}.pdf", normalize_arxiv_id(arxiv_id))
}

/// Client for the arXiv export API and PDF endpoint.
pub struct ArxivClient {
    http: reqwest::Client,
    timeout_secs: u64,
}

impl ArxivClient {
    pub fn new(timeout_secs: u64) -> Result<Self, DigestError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(concat!("paper-digest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DigestError::Internal(format!("http client: {e}")))?;
        Ok(Self { http, timeout_secs })
    }

    /// Fetch paper metadata for an arXiv id.
    pub async fn fetch_metadata(&self, arxiv_id: &str) -> Result<ArxivMetadata, DigestError> {
        let clean_id = normalize_arxiv_id(arxiv_id);
        if clean_id.is_empty() {
            return Err(DigestError::InvalidArxivId {
                input: arxiv_id.to_string(),
            });
        }

        let url = format!("{EXPORT_API}?id_list={clean_id}&max_results=1");
        debug!("Querying arXiv export API: {url}");

        let body = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DigestError::MetadataFetchFailed {
                arxiv_id: clean_id.clone(),
                reason: e.to_string(),
            })?
            .text()
            .await
            .map_err(|e| DigestError::MetadataFetchFailed {
                arxiv_id: clean_id.clone(),
                reason: e.to_string(),
            })?;

        let metadata = parse_atom_entry(&body, &clean_id)?;
        info!("Fetched metadata for {clean_id}: {}", metadata.title);
        Ok(metadata)
    }

    /// Download a PDF, validating the declared content type.
    pub async fn download_pdf(&self, pdf_url: &str) -> Result<Vec<u8>, DigestError> {
        info!("Downloading PDF: {pdf_url}");
        let response = self.http.get(pdf_url).send().await.map_err(|e| {
            if e.is_timeout() {
                DigestError::DownloadTimeout {
                    url: pdf_url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                DigestError::DownloadFailed {
                    url: pdf_url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(DigestError::DownloadFailed {
                url: pdf_url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("application/pdf") {
            return Err(DigestError::UnsupportedContent {
                url: pdf_url.to_string(),
                content_type,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DigestError::DownloadFailed {
                url: pdf_url.to_string(),
                reason: e.to_string(),
            })?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl PaperSource for ArxivClient {
    async fn fetch_metadata(&self, arxiv_id: &str) -> Result<ArxivMetadata, DigestError> {
        ArxivClient::fetch_metadata(self, arxiv_id).await
    }

    async fn download_pdf(&self, pdf_url: &str) -> Result<Vec<u8>, DigestError> {
        ArxivClient::download_pdf(self, pdf_url).await
    }
}

/// Parse the first `<entry>` of an arXiv Atom feed into metadata.
///
/// The feed wraps the query result in feed-level `<title>`/`<updated>`
/// elements, so only text inside `<entry>` is collected.
pub fn parse_atom_entry(feed_xml: &str, arxiv_id: &str) -> Result<ArxivMetadata, DigestError> {
    // Text nodes are collected untrimmed: an entity reference splits a text
    // run into fragments, and trimming each fragment would eat the spaces
    // around the entity ("Deep &amp; Wide" must not become "Deep&Wide").
    // Whitespace is normalized once per field after assembly instead.
    let mut reader = Reader::from_str(feed_xml);

    let mut in_entry = false;
    let mut in_author = false;
    let mut current: Option<&'static str> = None;

    let mut title = String::new();
    let mut abstract_text = String::new();
    let mut updated_raw = String::new();
    let mut name_buf = String::new();
    let mut authors: Vec<String> = Vec::new();
    let mut categories: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"entry" => in_entry = true,
                b"author" if in_entry => in_author = true,
                b"title" if in_entry => current = Some("title"),
                b"summary" if in_entry => current = Some("summary"),
                b"updated" if in_entry => current = Some("updated"),
                b"name" if in_author => current = Some("name"),
                _ => {}
            },
            Ok(Event::Empty(e)) if in_entry && e.name().as_ref() == b"category" => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"term" {
                        if let Ok(term) = String::from_utf8(attr.value.to_vec()) {
                            categories.push(term);
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(field) = current {
                    let text = String::from_utf8_lossy(t.as_ref()).to_string();
                    match field {
                        "title" => title.push_str(&text),
                        "summary" => abstract_text.push_str(&text),
                        "updated" => updated_raw.push_str(&text),
                        "name" => name_buf.push_str(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(field) = current {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        match field {
                            "title" => title.push_str(&resolved),
                            "summary" => abstract_text.push_str(&resolved),
                            "name" => name_buf.push_str(&resolved),
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                // Stop at the first entry; id_list queries return at most one.
                b"entry" => break,
                b"author" => in_author = false,
                b"name" => {
                    if in_author && !name_buf.trim().is_empty() {
                        authors.push(name_buf.trim().to_string());
                    }
                    name_buf.clear();
                    current = None;
                }
                b"title" | b"summary" | b"updated" => current = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DigestError::MetadataFetchFailed {
                    arxiv_id: arxiv_id.to_string(),
                    reason: format!("feed parse: {e}"),
                })
            }
            _ => {}
        }
    }

    if !in_entry {
        return Err(DigestError::PaperNotFound {
            arxiv_id: arxiv_id.to_string(),
        });
    }

    let updated = match DateTime::parse_from_rfc3339(updated_raw.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => {
            if !updated_raw.is_empty() {
                warn!("Unparseable updated timestamp: {updated_raw:?}");
            }
            None
        }
    };

    Ok(ArxivMetadata {
        arxiv_id: arxiv_id.to_string(),
        title: collapse_whitespace(&title),
        authors,
        abstract_text: collapse_whitespace(&abstract_text),
        updated,
        categories,
    })
}

/// Atom feeds hard-wrap long titles and abstracts; fold runs of whitespace
/// back into single spaces.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve the predefined XML entities plus numeric character references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };
    code.and_then(char::from_u32).map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=&amp;id_list=1706.03762</title>
  <updated>2026-08-01T00:00:00-04:00</updated>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <updated>2023-08-02T00:41:18Z</updated>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
  You Need</title>
    <summary>  The dominant sequence transduction models are based on complex
recurrent or convolutional neural networks.
</summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>"#;

    #[test]
    fn normalizes_version_suffix() {
        assert_eq!(normalize_arxiv_id("2301.00001v2"), "2301.00001");
        assert_eq!(normalize_arxiv_id("2301.00001"), "2301.00001");
        assert_eq!(normalize_arxiv_id("cs.AI/0301001v1"), "cs.AI/0301001");
    }

    #[test]
    fn abs_url_converts_to_pdf() {
        assert_eq!(
            abs_url_to_pdf_url("https://arxiv.org/abs/2301.00001v3").as_deref(),
            Some("https://arxiv.org/pdf/2301.00001.pdf")
        );
        assert_eq!(
            abs_url_to_pdf_url("https://arxiv.org/pdf/2301.00001.pdf").as_deref(),
            Some("https://arxiv.org/pdf/2301.00001.pdf")
        );
        assert_eq!(abs_url_to_pdf_url("https://example.com/x"), None);
    }

    #[test]
    fn parses_sample_feed() {
        let meta = parse_atom_entry(SAMPLE_FEED, "1706.03762").unwrap();
        assert_eq!(meta.title, "Attention Is All You Need");
        assert_eq!(meta.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(meta.categories, vec!["cs.CL", "cs.LG"]);
        assert!(meta.abstract_text.starts_with("The dominant sequence"));
        assert!(meta.updated.is_some());
    }

    #[test]
    fn resolves_entities_in_title() {
        let feed = r#"<feed><entry><title>Q&amp;A over
Graphs</title><summary>s</summary></entry></feed>"#;
        let meta = parse_atom_entry(feed, "x").unwrap();
        assert_eq!(meta.title, "Q&A over Graphs");
    }

    #[test]
    fn entity_with_surrounding_spaces_keeps_the_spaces() {
        let feed = r#"<feed><entry><title>Deep &amp; Wide Networks</title>
<summary>Networks that are deep &amp; wide.</summary>
<author><name>Mart&#237;n A &amp; B</name></author></entry></feed>"#;
        let meta = parse_atom_entry(feed, "x").unwrap();
        assert_eq!(meta.title, "Deep & Wide Networks");
        assert_eq!(meta.abstract_text, "Networks that are deep & wide.");
        assert_eq!(meta.authors, vec!["Martín A & B"]);
    }

    #[test]
    fn feed_without_entry_is_not_found() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#;
        let err = parse_atom_entry(feed, "0000.00000").unwrap_err();
        assert!(matches!(err, DigestError::PaperNotFound { .. }));
    }
}
