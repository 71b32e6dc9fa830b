//! # markdown-latex
//!
//! Convert Markdown documents with footnote-style citations into LaTeX, and
//! resolve those citations against bibliographic metadata sources to produce
//! a matching BibTeX file.
//!
//! ## Pipeline
//!
//! 1. Optional TOML front matter (`+++` fences) supplies title, authors,
//!    date, and the bibliography output path.
//! 2. [`collect_definitions`] scans the body once for `[^token]: text`
//!    definition lines.
//! 3. [`convert::convert`] runs the line-oriented block state machine,
//!    rewriting inline spans (links, images, emphasis, inline code,
//!    citation markers, character escaping) and emitting a complete LaTeX
//!    document. `[^token]` markers become `\cite{ref<token>}`.
//! 4. [`resolve::resolve`] queries the registered [`BibSource`]s with each
//!    definition's free text, lets a [`Chooser`] pick among the candidates,
//!    and stamps the accepted record with the definition's key.
//! 5. [`bibtex::save_bibliography`] writes the accepted records as BibTeX
//!    entries.
//!
//! ## Quick Start
//!
//! ```rust
//! use markdown_latex::convert_document;
//!
//! let input = "# Title\n\nSome **bold** text with [^1].\n\n[^1]: Jane Doe, Widgets, 2021";
//! let converted = convert_document(input).unwrap();
//!
//! assert!(converted.latex.contains("\\section{Title}"));
//! assert!(converted.latex.contains("\\cite{ref1}"));
//! assert_eq!(converted.definitions["ref1"], "Jane Doe, Widgets, 2021");
//! ```
//!
//! ## Syntax Reference
//!
//! - Headings `#`..`######` map to `\section` through `\subparagraph`
//! - `**bold**`/`__bold__` and `*italic*`/`_italic_`
//! - `` `code` `` becomes `\texttt{...}`, fenced blocks become `lstlisting`
//! - `[text](url)` becomes `\href`, `![alt](url)` a captioned figure
//! - `[^1]` cites, `[^1]: description` defines; definition lines (and
//!   everything after the first one) are excluded from the body

pub mod bibtex;
pub mod convert;
pub mod error;
pub mod parser;
pub mod record;
pub mod resolve;
pub mod span;

pub use error::{BibliographyError, Error, ParseError, Result, SourceError};
pub use parser::{collect_definitions, parse_front_matter, Metadata};
pub use record::{BibRecord, CitationDefs, RecordType};
pub use resolve::{resolve, BibSource, Chooser, ConsoleChooser, CrossRefSource, GoogleScholarSource};

/// Output of one conversion pass.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    /// The complete LaTeX document source.
    pub latex: String,
    /// Collected citation definitions, frozen before resolution.
    pub definitions: CitationDefs,
    /// Front matter metadata (empty defaults when absent).
    pub metadata: Metadata,
}

/// Parse front matter, collect citation definitions, and convert the body
/// to LaTeX in one step.
pub fn convert_document(input: &str) -> Result<ConvertedDocument> {
    let (metadata, body) = parser::parse_front_matter(input)?;
    let definitions = parser::collect_definitions(body);
    let latex = convert::convert(body, &metadata, &definitions);

    Ok(ConvertedDocument {
        latex,
        definitions,
        metadata,
    })
}

/// Read a Markdown file and convert it with [`convert_document`].
pub fn convert_file(path: &std::path::Path) -> Result<ConvertedDocument> {
    let input = std::fs::read_to_string(path)?;
    convert_document(&input)
}
