//! Pluggable bibliographic metadata sources.
//!
//! A source turns a free-text query into candidate [`BibRecord`]s. Transport
//! failures are per-source and non-fatal; every request carries a timeout so
//! a hung endpoint degrades to a source failure instead of blocking
//! resolution.

use std::time::Duration;

use serde::Deserialize;

use crate::error::SourceError;
use crate::record::BibRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A bibliographic metadata source.
pub trait BibSource {
    /// Human-readable source name, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Query the source with a free-text citation description.
    fn query(&self, text: &str) -> Result<Vec<BibRecord>, SourceError>;
}

/// Derive the fallback citation key for a candidate record.
///
/// Priority: first author's family-name token plus year, then the DOI
/// suffix, then the first 20 characters of the title with non-alphanumerics
/// stripped, then an `unknown<n>` ordinal within the result list. The resolver
/// overwrites this key once a candidate is accepted, but it is computed for
/// every candidate so choosers can display it.
pub fn fallback_key(record: &BibRecord, ordinal: usize) -> String {
    if let (Some(author), Some(year)) = (record.authors.first(), record.year.as_deref()) {
        if !author.is_empty() && !year.is_empty() {
            let family = author.split(',').next().unwrap_or(author);
            let family: String = family.chars().filter(|c| c.is_alphanumeric()).collect();
            return format!("{}{}", family, year);
        }
    }

    if let Some(doi) = record.doi.as_deref().filter(|d| !d.is_empty()) {
        let suffix = doi.rsplit('/').next().unwrap_or(doi);
        return format!("doi{}", suffix);
    }

    if let Some(title) = record.title.as_deref().filter(|t| !t.is_empty()) {
        let short: String = title.chars().take(20).filter(|c| c.is_alphanumeric()).collect();
        return format!("title{}", short);
    }

    format!("unknown{}", ordinal)
}

/// CrossRef REST API source (JSON over HTTP).
#[derive(Debug, Default)]
pub struct CrossRefSource;

impl CrossRefSource {
    pub fn new() -> Self {
        Self
    }
}

impl BibSource for CrossRefSource {
    fn name(&self) -> &str {
        "CrossRef"
    }

    fn query(&self, text: &str) -> Result<Vec<BibRecord>, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("markdown-latex/0.1 (mailto:user@example.com)")
            .build()?;

        let body = client
            .get("https://api.crossref.org/works")
            .query(&[("query", text), ("rows", "5"), ("sort", "relevance")])
            .send()?
            .text()?;

        parse_crossref_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefMessage,
}

#[derive(Debug, Deserialize, Default)]
struct CrossrefMessage {
    #[serde(default)]
    items: Vec<CrossrefItem>,
}

#[derive(Debug, Deserialize, Default)]
struct CrossrefItem {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
    #[serde(default, rename = "container-title")]
    container_title: Vec<String>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
    published: Option<CrossrefDate>,
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    publisher: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CrossrefAuthor {
    family: Option<String>,
    given: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CrossrefDate {
    #[serde(default, rename = "date-parts")]
    date_parts: Vec<Vec<serde_json::Value>>,
}

fn parse_crossref_response(body: &str) -> Result<Vec<BibRecord>, SourceError> {
    let response: CrossrefResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    let mut records = Vec::new();
    for item in response.message.items {
        let authors: Vec<String> = item
            .author
            .iter()
            .filter_map(|a| match (a.family.as_deref(), a.given.as_deref()) {
                (Some(family), Some(given)) => Some(format!("{}, {}", family, given)),
                (Some(family), None) => Some(family.to_string()),
                (None, Some(given)) => Some(given.to_string()),
                (None, None) => None,
            })
            .collect();

        let year = item
            .published
            .as_ref()
            .and_then(|p| p.date_parts.first())
            .and_then(|parts| parts.first())
            .and_then(|v| v.as_i64())
            .map(|y| y.to_string());

        let mut record = BibRecord {
            title: item.title.first().cloned(),
            authors,
            journal: item.container_title.first().cloned(),
            volume: item.volume,
            issue: item.issue,
            pages: item.page,
            year,
            doi: item.doi,
            url: item.url,
            publisher: item.publisher,
            ..Default::default()
        };
        record.citation_key = fallback_key(&record, records.len() + 1);
        records.push(record);
    }

    Ok(records)
}

/// Google Scholar source: best-effort extraction from the result page HTML.
///
/// No structured API exists, so this scans for `gs_ri` result blocks and
/// pulls the title from `gs_rt` and authors/year from `gs_a`. A layout
/// change parses to an empty candidate list rather than an error.
#[derive(Debug, Default)]
pub struct GoogleScholarSource;

impl GoogleScholarSource {
    pub fn new() -> Self {
        Self
    }
}

impl BibSource for GoogleScholarSource {
    fn name(&self) -> &str {
        "Google Scholar"
    }

    fn query(&self, text: &str) -> Result<Vec<BibRecord>, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        let body = client
            .get("https://scholar.google.com/scholar")
            .query(&[("q", text), ("hl", "en"), ("as_sdt", "0,5")])
            .send()?
            .text()?;

        Ok(parse_scholar_response(&body))
    }
}

fn parse_scholar_response(body: &str) -> Vec<BibRecord> {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static TITLE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"<h3 class="gs_rt"[^>]*>(.*?)</h3>"#).unwrap());
    static BYLINE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"<div class="gs_a"[^>]*>(.*?)</div>"#).unwrap());
    static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

    let mut records = Vec::new();

    for block in body.split(r#"<div class="gs_ri">"#).skip(1) {
        let title = TITLE_RE
            .captures(block)
            .map(|c| TAG_RE.replace_all(&c[1], "").trim().to_string())
            .filter(|t| !t.is_empty());

        let Some(title) = title else { continue };

        let mut authors = Vec::new();
        let mut year = None;
        if let Some(byline) = BYLINE_RE.captures(block) {
            let byline = TAG_RE.replace_all(&byline[1], "").to_string();
            authors = byline
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty() && !a.contains("..."))
                .map(str::to_string)
                .collect();
            year = YEAR_RE.find(&byline).map(|m| m.as_str().to_string());
        }

        let mut record = BibRecord {
            title: Some(title),
            authors,
            year,
            ..Default::default()
        };
        record.citation_key = fallback_key(&record, records.len() + 1);
        records.push(record);
    }

    records
}
