//! Bibliographic record types shared by the resolver and the writer.

use std::collections::BTreeMap;

/// Footnote citation definitions collected from a document.
///
/// Maps `ref<token>` keys to the free-text description from the definition
/// line. A `BTreeMap` keeps resolution order deterministic (sorted by key).
pub type CitationDefs = BTreeMap<String, String>;

/// The BibTeX entry type of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordType {
    #[default]
    Article,
    Book,
}

impl RecordType {
    /// The BibTeX entry-type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Article => "article",
            RecordType::Book => "book",
        }
    }
}

/// A bibliographic record returned by a metadata source.
///
/// All fields are optional apart from `citation_key` and `record_type`;
/// empty fields are omitted when the record is rendered to BibTeX.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BibRecord {
    pub title: Option<String>,
    pub authors: Vec<String>,
    /// Journal or other container title.
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub year: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub publisher: Option<String>,
    /// Book-only fields.
    pub edition: Option<String>,
    pub isbn: Option<String>,
    /// Fallback key computed by the source; overwritten with the
    /// definition's own key once the record is accepted.
    pub citation_key: String,
    pub record_type: RecordType,
}
