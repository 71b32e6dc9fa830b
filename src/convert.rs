//! Line-oriented Markdown to LaTeX conversion.
//!
//! A single forward pass over the document lines, tracking block-level
//! state (open list nesting, open quotation, open code fence) and
//! dispatching content lines through the inline span pipeline.

use crate::parser::lexer::{
    block_quote, citation_definition, fence_delimiter, heading, is_blank, list_indent_depth,
    list_item, Token,
};
use crate::parser::Metadata;
use crate::record::CitationDefs;
use crate::span;

/// Mutable block-level state, owned for the duration of one conversion.
///
/// Invariant: `list_depth == 0` whenever `in_list` is false, and
/// `in_code_block` suppresses all other classification until the fence
/// closes.
#[derive(Debug, Default)]
struct ConversionState {
    in_list: bool,
    list_depth: usize,
    in_quote: bool,
    in_code_block: bool,
    code_language: String,
    code_buffer: String,
    /// Set once the first citation definition line is seen; every later
    /// line is excluded from the body.
    suppress_tail: bool,
}

/// Convert a Markdown body to a complete LaTeX document.
///
/// `defs` is the frozen definition map from
/// [`collect_definitions`](crate::parser::collect_definitions); its key
/// presence decides whether the bibliography directive is appended.
pub fn convert(body: &str, metadata: &Metadata, defs: &CitationDefs) -> String {
    let mut out = String::new();
    let mut state = ConversionState::default();

    push_preamble(&mut out, metadata);

    for line in body.lines() {
        // Tail suppression: once a definition line has been seen, nothing
        // after it reaches the body. Definitions inside an open code fence
        // are code content, not metadata.
        if !state.in_code_block {
            if state.suppress_tail {
                continue;
            }
            if citation_definition(line).is_ok() {
                state.suppress_tail = true;
                continue;
            }
        }

        if let Ok((_, Token::FenceDelimiter(lang))) = fence_delimiter(line) {
            toggle_fence(&mut state, lang, &mut out);
            continue;
        }

        if state.in_code_block {
            state.code_buffer.push_str(line);
            state.code_buffer.push('\n');
            continue;
        }

        if line.starts_with('#') {
            close_list(&mut state, &mut out);
            close_quote(&mut state, &mut out);
            if let Ok((_, Token::Heading(level, text))) = heading(line) {
                out.push_str(&section_command(level, text));
                out.push_str("\n\n");
            }
            continue;
        }

        if let Ok((_, Token::ListItem(text))) = list_item(line.trim_start()) {
            close_quote(&mut state, &mut out);
            push_list_item(&mut state, line, text, &mut out);
            continue;
        }

        if let Ok((_, Token::BlockQuote(text))) = block_quote(line) {
            close_list(&mut state, &mut out);
            if !state.in_quote {
                out.push_str("\\begin{quotation}\n");
                state.in_quote = true;
            }
            out.push_str(&span::rewrite(text));
            out.push('\n');
            continue;
        }

        if is_blank(line) {
            out.push('\n');
            continue;
        }

        // Plain paragraph text.
        close_list(&mut state, &mut out);
        close_quote(&mut state, &mut out);
        out.push_str(&span::rewrite(line));
        out.push_str("\n\n");
    }

    // An unterminated fence still emits its buffered content.
    if state.in_code_block {
        emit_code_block(&mut state, &mut out);
    }
    close_list(&mut state, &mut out);
    close_quote(&mut state, &mut out);

    if !defs.is_empty() {
        out.push_str("\\bibliographystyle{plain}\n");
        out.push_str("\\bibliography{references}\n");
    }

    out.push_str("\\end{document}\n");
    out
}

fn push_preamble(out: &mut String, metadata: &Metadata) {
    out.push_str("\\documentclass{article}\n");
    out.push_str("\\usepackage{hyperref}\n");
    out.push_str("\\usepackage{graphicx}\n");
    out.push_str("\\usepackage{listings}\n");
    out.push_str("\\usepackage{xcolor}\n");
    out.push_str("\\usepackage{enumitem}\n");
    out.push_str("\\usepackage{geometry}\n");
    out.push_str("\\usepackage{natbib}\n");
    out.push_str("\\geometry{margin=1in}\n");

    if let Some(ref title) = metadata.title {
        out.push_str(&format!("\\title{{{}}}\n", span::escape_latex_chars(title)));
    }
    if !metadata.authors.is_empty() {
        let authors = metadata
            .authors
            .iter()
            .map(|a| span::escape_latex_chars(a))
            .collect::<Vec<_>>()
            .join(" \\and ");
        out.push_str(&format!("\\author{{{}}}\n", authors));
    }
    if let Some(ref date) = metadata.date {
        out.push_str(&format!("\\date{{{}}}\n", span::escape_latex_chars(date)));
    }

    out.push_str("\n\\begin{document}\n\n");

    if metadata.title.is_some() {
        out.push_str("\\maketitle\n\n");
    }
}

/// Map a heading level to its LaTeX section command. Heading text is
/// emitted verbatim, without the span pipeline.
fn section_command(level: u8, text: &str) -> String {
    let command = match level {
        1 => "\\section{",
        2 => "\\subsection{",
        3 => "\\subsubsection{",
        4 => "\\paragraph{",
        5 | 6 => "\\subparagraph{",
        _ => "\\section{",
    };
    format!("{}{}}}", command, text)
}

fn toggle_fence(state: &mut ConversionState, lang: &str, out: &mut String) {
    if state.in_code_block {
        emit_code_block(state, out);
    } else {
        state.in_code_block = true;
        state.code_language = lang.to_string();
    }
}

fn emit_code_block(state: &mut ConversionState, out: &mut String) {
    let language = if state.code_language.is_empty() {
        "text"
    } else {
        &state.code_language
    };
    out.push_str(&format!("\\begin{{lstlisting}}[language={}]\n", language));
    out.push_str(&state.code_buffer);
    out.push_str("\\end{lstlisting}\n\n");
    state.in_code_block = false;
    state.code_buffer.clear();
    state.code_language.clear();
}

fn push_list_item(state: &mut ConversionState, line: &str, text: &str, out: &mut String) {
    if !state.in_list {
        out.push_str("\\begin{itemize}\n");
        state.in_list = true;
        state.list_depth = 1;
    }

    let depth = list_indent_depth(line);
    while depth > state.list_depth {
        out.push_str("\\begin{itemize}\n");
        state.list_depth += 1;
    }
    while depth < state.list_depth {
        out.push_str("\\end{itemize}\n");
        state.list_depth -= 1;
    }

    out.push_str("\\item ");
    out.push_str(&span::rewrite(text));
    out.push('\n');
}

fn close_list(state: &mut ConversionState, out: &mut String) {
    if !state.in_list {
        return;
    }
    while state.list_depth > 0 {
        out.push_str("\\end{itemize}\n");
        state.list_depth -= 1;
    }
    out.push('\n');
    state.in_list = false;
}

fn close_quote(state: &mut ConversionState, out: &mut String) {
    if state.in_quote {
        out.push_str("\\end{quotation}\n\n");
        state.in_quote = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::collect_definitions;
    use pretty_assertions::assert_eq;

    fn convert_plain(body: &str) -> String {
        let defs = collect_definitions(body);
        convert(body, &Metadata::default(), &defs)
    }

    #[test]
    fn test_heading_levels() {
        let out = convert_plain("# One\n## Two\n### Three\n#### Four\n##### Five\n###### Six");
        assert!(out.contains("\\section{One}"));
        assert!(out.contains("\\subsection{Two}"));
        assert!(out.contains("\\subsubsection{Three}"));
        assert!(out.contains("\\paragraph{Four}"));
        assert!(out.contains("\\subparagraph{Five}"));
        assert!(out.contains("\\subparagraph{Six}"));
    }

    #[test]
    fn test_heading_beyond_six_falls_back_to_section() {
        let out = convert_plain("####### Deep");
        assert!(out.contains("\\section{Deep}"));
    }

    #[test]
    fn test_heading_text_is_verbatim() {
        let out = convert_plain("# A **tight** title");
        assert!(out.contains("\\section{A **tight** title}"));
    }

    #[test]
    fn test_preamble_and_document_markers() {
        let out = convert_plain("Hello");
        assert!(out.starts_with("\\documentclass{article}\n"));
        assert!(out.contains("\\usepackage{natbib}"));
        assert!(out.contains("\\geometry{margin=1in}"));
        assert!(out.contains("\\begin{document}"));
        assert!(out.ends_with("\\end{document}\n"));
    }

    #[test]
    fn test_front_matter_title_block() {
        let metadata = Metadata {
            title: Some("My Paper".into()),
            authors: vec!["Jane Doe".into(), "John Roe".into()],
            date: Some("2024".into()),
            bibliography: None,
        };
        let out = convert("Hello", &metadata, &CitationDefs::new());
        assert!(out.contains("\\title{My Paper}"));
        assert!(out.contains("\\author{Jane Doe \\and John Roe}"));
        assert!(out.contains("\\date{2024}"));
        assert!(out.contains("\\maketitle"));
    }

    #[test]
    fn test_paragraph_goes_through_span_pipeline() {
        let out = convert_plain("Some **bold** text.");
        assert!(out.contains("Some \\textbf{bold} text."));
    }

    #[test]
    fn test_list_nesting_balanced() {
        let body = "- a\n  - b\n    - c\n  - d\n- e";
        let out = convert_plain(body);
        let opens = out.matches("\\begin{itemize}").count();
        let closes = out.matches("\\end{itemize}").count();
        assert_eq!(opens, 3);
        assert_eq!(opens, closes);
        assert_eq!(out.matches("\\item ").count(), 5);
    }

    #[test]
    fn test_list_closed_by_paragraph() {
        let out = convert_plain("- item\nplain text");
        let end = out.find("\\end{itemize}").unwrap();
        let text = out.find("plain text").unwrap();
        assert!(end < text);
    }

    #[test]
    fn test_blockquote() {
        let out = convert_plain("> quoted *words*\n> more");
        assert!(out.contains("\\begin{quotation}\nquoted \\textit{words}\nmore\n\\end{quotation}"));
    }

    #[test]
    fn test_quote_closed_before_list_opens() {
        let out = convert_plain("> quote\n- item");
        let close = out.find("\\end{quotation}").unwrap();
        let open = out.find("\\begin{itemize}").unwrap();
        assert!(close < open);
    }

    #[test]
    fn test_code_block_verbatim() {
        let body = "```rust\nfn main() { let x_y = 1; }\n```";
        let out = convert_plain(body);
        assert!(out.contains("\\begin{lstlisting}[language=rust]\n"));
        // No span rewriting or escaping inside the fence.
        assert!(out.contains("fn main() { let x_y = 1; }\n"));
        assert!(out.contains("\\end{lstlisting}"));
    }

    #[test]
    fn test_code_block_default_language() {
        let out = convert_plain("```\nplain\n```");
        assert!(out.contains("[language=text]"));
    }

    #[test]
    fn test_unclosed_fence_still_emits() {
        let out = convert_plain("```sh\necho hi");
        assert!(out.contains("[language=sh]"));
        assert!(out.contains("echo hi\n"));
    }

    #[test]
    fn test_definition_lines_suppressed() {
        let body = "# Title\n\nBody with [^3].\n\n[^3]: Some Author, Some Title, 2020\ntrailing note";
        let defs = collect_definitions(body);
        let out = convert(body, &Metadata::default(), &defs);

        assert!(out.contains("\\cite{ref3}"));
        assert!(!out.contains("Some Author"));
        // The tail after the first definition line is suppressed too.
        assert!(!out.contains("trailing note"));
        assert_eq!(defs.get("ref3").map(String::as_str), Some("Some Author, Some Title, 2020"));
    }

    #[test]
    fn test_bibliography_directive_only_with_definitions() {
        let with = convert_plain("text [^1]\n\n[^1]: A Source");
        assert!(with.contains("\\bibliographystyle{plain}\n\\bibliography{references}\n"));

        let without = convert_plain("just text");
        assert!(!without.contains("\\bibliography"));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let body = "# Title\n\nSome **bold** and _italic_ text with [^1].\n\n[^1]: Jane Doe, Widgets, 2021";
        let defs = collect_definitions(body);
        let out = convert(body, &Metadata::default(), &defs);

        assert!(out.contains("\\section{Title}"));
        assert!(out.contains("\\textbf{bold}"));
        assert!(out.contains("\\textit{italic}"));
        assert!(out.contains("\\cite{ref1}"));
        assert!(out.contains("\\bibliography{references}"));
        assert!(!out.contains("Jane Doe"));
    }
}
