//! BibTeX rendering and serialization of resolved records.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{BibliographyError, Result};
use crate::record::{BibRecord, RecordType};

/// Render one record as a BibTeX entry.
///
/// Field order: title, author, then the type-specific fields (edition/isbn
/// for books, journal/volume/number/pages for articles), then year,
/// publisher, doi, url. Empty fields are omitted and the final field
/// carries no trailing comma.
pub fn render_entry(record: &BibRecord) -> String {
    let mut fields: Vec<String> = Vec::new();

    let mut push = |name: &str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            fields.push(format!("  {} = {{{}}}", name, value));
        }
    };

    push("title", record.title.as_deref());

    let authors = (!record.authors.is_empty()).then(|| record.authors.join(" and "));
    push("author", authors.as_deref());

    match record.record_type {
        RecordType::Book => {
            push("edition", record.edition.as_deref());
            push("isbn", record.isbn.as_deref());
        }
        RecordType::Article => {
            push("journal", record.journal.as_deref());
            push("volume", record.volume.as_deref());
            push("number", record.issue.as_deref());
            push("pages", record.pages.as_deref());
        }
    }

    push("year", record.year.as_deref());
    push("publisher", record.publisher.as_deref());
    push("doi", record.doi.as_deref());
    push("url", record.url.as_deref());

    format!(
        "@{}{{{},\n{}\n}}",
        record.record_type.as_str(),
        record.citation_key,
        fields.join(",\n")
    )
}

/// Write all records to `destination`, one entry per record, entries
/// separated by a blank line.
pub fn save_bibliography(records: &[BibRecord], destination: &Path) -> Result<()> {
    let mut file = File::create(destination).map_err(|e| BibliographyError::Open {
        path: destination.display().to_string(),
        message: e.to_string(),
    })?;

    for record in records {
        writeln!(file, "{}\n", render_entry(record)).map_err(|e| BibliographyError::Write {
            path: destination.display().to_string(),
            message: e.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article() -> BibRecord {
        BibRecord {
            title: Some("Literate Programming".into()),
            authors: vec!["Knuth, Donald E.".into()],
            journal: Some("The Computer Journal".into()),
            volume: Some("27".into()),
            issue: Some("2".into()),
            pages: Some("97-111".into()),
            year: Some("1984".into()),
            doi: Some("10.1093/comjnl/27.2.97".into()),
            citation_key: "ref1".into(),
            record_type: RecordType::Article,
            ..Default::default()
        }
    }

    #[test]
    fn test_render_article() {
        let expected = "@article{ref1,\n  \
            title = {Literate Programming},\n  \
            author = {Knuth, Donald E.},\n  \
            journal = {The Computer Journal},\n  \
            volume = {27},\n  \
            number = {2},\n  \
            pages = {97-111},\n  \
            year = {1984},\n  \
            doi = {10.1093/comjnl/27.2.97}\n}";
        assert_eq!(render_entry(&article()), expected);
    }

    #[test]
    fn test_render_book_fields() {
        let record = BibRecord {
            title: Some("The TeXbook".into()),
            authors: vec!["Knuth, Donald E.".into()],
            edition: Some("1st".into()),
            isbn: Some("0-201-13447-0".into()),
            year: Some("1986".into()),
            publisher: Some("Addison-Wesley".into()),
            citation_key: "ref2".into(),
            record_type: RecordType::Book,
            // Article-only fields must not leak into a book entry.
            journal: Some("ignored".into()),
            ..Default::default()
        };

        let entry = render_entry(&record);
        assert!(entry.starts_with("@book{ref2,"));
        assert!(entry.contains("edition = {1st}"));
        assert!(entry.contains("isbn = {0-201-13447-0}"));
        assert!(!entry.contains("journal"));
    }

    #[test]
    fn test_multiple_authors_joined_with_and() {
        let mut record = article();
        record.authors = vec!["Aho, Alfred V.".into(), "Ullman, Jeffrey D.".into()];
        assert!(render_entry(&record).contains("author = {Aho, Alfred V. and Ullman, Jeffrey D.}"));
    }

    #[test]
    fn test_empty_fields_omitted_and_no_dangling_comma() {
        let record = BibRecord {
            title: Some("Only A Title".into()),
            citation_key: "ref3".into(),
            ..Default::default()
        };
        assert_eq!(render_entry(&record), "@article{ref3,\n  title = {Only A Title}\n}");
    }

    #[test]
    fn test_save_bibliography() {
        let dir = std::env::temp_dir().join("markdown-latex-bibtex-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("references.bib");

        let records = vec![article(), article()];
        save_bibliography(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("@article{ref1,").count(), 2);
        // Entries are separated by a blank line.
        assert!(content.contains("}\n\n@article"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_to_unopenable_destination_fails() {
        use crate::error::Error;

        let records = vec![article()];
        let result = save_bibliography(&records, Path::new("/nonexistent-dir/refs.bib"));
        assert!(matches!(
            result,
            Err(Error::Bibliography(BibliographyError::Open { .. }))
        ));
    }
}
