//! Input-side parsing: front matter, line classification, and citation
//! definition collection.

pub mod citations;
pub mod lexer;

pub use citations::collect_definitions;

use crate::error::{ParseError, Result};
use serde::Deserialize;

/// Document metadata from TOML front matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub date: Option<String>,
    /// Destination path for the bibliography store, overriding the default
    /// `references.bib`.
    pub bibliography: Option<String>,
}

/// Parse optional TOML front matter delimited by `+++`, returning the
/// metadata and the remaining document body.
pub fn parse_front_matter(input: &str) -> Result<(Metadata, &str)> {
    let trimmed = input.trim_start();

    if !trimmed.starts_with("+++") {
        return Ok((Metadata::default(), input));
    }

    let after_open = &trimmed[3..];
    let close_pos = after_open.find("\n+++").ok_or_else(|| {
        ParseError::FrontMatter("Unclosed front matter (missing closing +++)".into())
    })?;

    let front_matter_str = &after_open[..close_pos];
    let content_start = 3 + close_pos + 4; // "+++" + content + "\n+++"
    let content = trimmed[content_start..].trim_start_matches('\n');

    let raw: RawFrontMatter = toml::from_str(front_matter_str)
        .map_err(|e| ParseError::FrontMatter(format!("Invalid TOML: {}", e)))?;

    Ok((convert_front_matter(raw), content))
}

/// Raw front matter structure for deserialization.
#[derive(Debug, Deserialize, Default)]
struct RawFrontMatter {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    author: Option<String>,
    date: Option<String>,
    bibliography: Option<String>,
}

fn convert_front_matter(raw: RawFrontMatter) -> Metadata {
    let mut authors = raw.authors;
    if let Some(author) = raw.author {
        if authors.is_empty() {
            authors.push(author);
        }
    }

    Metadata {
        title: raw.title,
        authors,
        date: raw.date,
        bibliography: raw.bibliography,
    }
}
