//! Citation resolution: definitions to accepted bibliographic records.

pub mod sources;

pub use sources::{BibSource, CrossRefSource, GoogleScholarSource};

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::record::{BibRecord, CitationDefs};

/// Candidate selection capability.
///
/// Given the ordered candidate list for one definition, returns the
/// zero-based index of the accepted candidate, or `None` to decline them
/// all. Injectable so tests can script choices.
pub trait Chooser {
    fn choose(&mut self, candidates: &[BibRecord]) -> Option<usize>;
}

/// Resolve every citation definition against the registered sources.
///
/// Sources are queried in registration order and candidate sets from
/// successful sources are concatenated in that order. A failed source is
/// logged and skipped; it never aborts resolution for other sources or
/// definitions. Definitions with no candidates, or where the chooser
/// declines, contribute nothing. An accepted candidate's citation key is
/// overwritten with the definition's own key.
pub fn resolve(
    defs: &CitationDefs,
    sources: &[Box<dyn BibSource>],
    chooser: &mut dyn Chooser,
) -> Vec<BibRecord> {
    let mut records = Vec::new();

    for (key, raw_text) in defs {
        let mut candidates = Vec::new();

        for source in sources {
            debug!(source = source.name(), query = %raw_text, "querying source");
            match source.query(raw_text) {
                Ok(found) => candidates.extend(found),
                Err(e) => {
                    warn!(source = source.name(), error = %e, "source query failed");
                }
            }
        }

        if candidates.is_empty() {
            debug!(key = %key, "no candidates found");
            continue;
        }

        if let Some(index) = chooser.choose(&candidates) {
            if let Some(mut record) = candidates.into_iter().nth(index) {
                record.citation_key = key.clone();
                records.push(record);
            }
        }
    }

    records
}

/// Interactive chooser: prints a 1-based numbered candidate list and reads
/// an integer from stdin. Out-of-range or non-numeric input declines the
/// whole set; there is no retry loop.
#[derive(Debug, Default)]
pub struct ConsoleChooser;

impl Chooser for ConsoleChooser {
    fn choose(&mut self, candidates: &[BibRecord]) -> Option<usize> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        for (i, candidate) in candidates.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} ({}) [{}]",
                i + 1,
                candidate.title.as_deref().unwrap_or("<untitled>"),
                candidate.year.as_deref().unwrap_or("n.d."),
                candidate.citation_key,
            );
            if !candidate.authors.is_empty() {
                let _ = writeln!(out, "   {}", candidate.authors.join(", "));
            }
        }
        let _ = writeln!(out, "Please select a record, input the number");
        let _ = out.flush();

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;

        match line.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= candidates.len() => Some(n - 1),
            _ => None,
        }
    }
}
