//! Footnote citation definition collection.

use crate::parser::lexer::{citation_definition, Token};
use crate::record::CitationDefs;

/// Scan the document once and collect every footnote citation definition
/// (`[^token]: description`) into a `ref<token> -> description` map.
///
/// Later definitions for the same token overwrite earlier ones. Definition
/// lines are metadata: the block converter excludes them (and, matching the
/// original tool, everything after the first one) from the rendered body.
pub fn collect_definitions(input: &str) -> CitationDefs {
    let mut defs = CitationDefs::new();

    for line in input.lines() {
        if let Ok((_, Token::CitationDefinition(token, text))) = citation_definition(line) {
            defs.insert(format!("ref{}", token), text.to_string());
        }
    }

    defs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect_definitions() {
        let input = "Body text with [^1].\n\n[^1]: Jane Doe, Widgets, 2021\n[^2]: Another Source";
        let defs = collect_definitions(input);

        assert_eq!(defs.len(), 2);
        assert_eq!(defs.get("ref1").map(String::as_str), Some("Jane Doe, Widgets, 2021"));
        assert_eq!(defs.get("ref2").map(String::as_str), Some("Another Source"));
    }

    #[test]
    fn test_description_is_trimmed() {
        let defs = collect_definitions("[^3]:    Some Author, Some Title, 2020   ");
        assert_eq!(
            defs.get("ref3").map(String::as_str),
            Some("Some Author, Some Title, 2020")
        );
    }

    #[test]
    fn test_later_definition_overwrites() {
        let defs = collect_definitions("[^1]: first\n[^1]: second");
        assert_eq!(defs.get("ref1").map(String::as_str), Some("second"));
    }

    #[test]
    fn test_inline_markers_are_not_definitions() {
        let defs = collect_definitions("see [^1] and [^2] inline");
        assert!(defs.is_empty());
    }
}
