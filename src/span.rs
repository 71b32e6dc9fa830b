//! Inline span rewriting: Markdown spans to LaTeX constructs.
//!
//! The rewrite is an ordered pipeline of pure string-to-string stages:
//! links, images, emphasis, inline code, citation markers, and finally
//! character escaping. The order is load-bearing: escaping runs last and
//! must not touch syntax emitted by the earlier stages, so the escaper
//! recognizes previously emitted LaTeX tokens and skips them.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());

static BOLD_STAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static BOLD_UNDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.*?)__").unwrap());
static ITALIC_STAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static ITALIC_UNDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.*?)_").unwrap());

static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());

static CITATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\^(\w+)\]").unwrap());

/// LaTeX tokens emitted by the earlier pipeline stages (or by the block
/// converter), plus reserved characters that are already escaped. Text
/// matched here must pass through the escaper untouched. Constructs whose
/// content is verbatim (`\texttt`, `\cite`, the url argument of `\href`,
/// `\includegraphics`) are protected whole; for the rest only the command
/// name is protected so its argument text still gets escaped.
static PROTECTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\texttt\{[^{}]*\}|\\cite\{[^{}]*\}|\\href\{[^{}]*\}|\\includegraphics\{[^{}]*\}|\\begin\{[^{}]*\}|\\end\{[^{}]*\}|\\(?:subsubsection|subsection|section|subparagraph|paragraph|textbf|textit|centering|caption|item)|\\[#$%&_~^\\]",
    )
    .unwrap()
});

/// Run the full inline pipeline over one content line.
pub fn rewrite(line: &str) -> String {
    let s = rewrite_links(line);
    let s = rewrite_images(&s);
    let s = rewrite_emphasis(&s);
    let s = rewrite_inline_code(&s);
    let s = rewrite_citations(&s);
    escape_latex_chars(&s)
}

/// `[text](url)` -> `\href{url}{text}`.
///
/// Non-greedy; unmatched brackets stay literal. A match immediately
/// preceded by `!` is image syntax and is left for the image stage, which
/// runs next. The preceding byte is only inspected, never consumed, so
/// adjacent links all rewrite.
pub fn rewrite_links(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;

    for caps in LINK_RE.captures_iter(line) {
        let Some(m) = caps.get(0) else { continue };
        if m.start() > 0 && line.as_bytes()[m.start() - 1] == b'!' {
            continue;
        }
        out.push_str(&line[last..m.start()]);
        out.push_str(&format!("\\href{{{}}}{{{}}}", &caps[2], &caps[1]));
        last = m.end();
    }
    out.push_str(&line[last..]);

    out
}

/// `![alt](url)` -> centered figure with `\includegraphics` and a caption.
pub fn rewrite_images(line: &str) -> String {
    IMAGE_RE
        .replace_all(line, |caps: &Captures| {
            format!(
                "\\begin{{figure}}\n\\centering\n\\includegraphics{{{}}}\n\\caption{{{}}}\n\\end{{figure}}",
                &caps[2], &caps[1]
            )
        })
        .into_owned()
}

/// Bold (`**text**`, `__text__`) then italic (`*text*`, `_text_`).
///
/// Bold must run first: a single-`*` match would otherwise consume half of
/// a `**` pair.
pub fn rewrite_emphasis(line: &str) -> String {
    let s = BOLD_STAR_RE.replace_all(line, "\\textbf{$1}");
    let s = BOLD_UNDER_RE.replace_all(&s, "\\textbf{$1}");
    let s = ITALIC_STAR_RE.replace_all(&s, "\\textit{$1}");
    let s = ITALIC_UNDER_RE.replace_all(&s, "\\textit{$1}");
    s.into_owned()
}

/// `` `code` `` -> `\texttt{code}`. The content is kept verbatim; the
/// escaper treats the whole construct as protected.
pub fn rewrite_inline_code(line: &str) -> String {
    INLINE_CODE_RE.replace_all(line, "\\texttt{$1}").into_owned()
}

/// `[^token]` -> `\cite{ref<token>}`, substituting every occurrence on the
/// line, not just the first.
pub fn rewrite_citations(line: &str) -> String {
    CITATION_RE.replace_all(line, "\\cite{ref$1}").into_owned()
}

/// Escape LaTeX-reserved characters (`# $ % & _ ~ ^ \`) in text that is not
/// part of a construct emitted by the earlier stages.
///
/// Protected tokens are located first and copied through verbatim; only the
/// gaps between them are escaped. Already-escaped reserved characters count
/// as protected, which makes the pass idempotent over its own output.
pub fn escape_latex_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in PROTECTED_RE.find_iter(text) {
        escape_fragment(&text[last..m.start()], &mut out);
        out.push_str(m.as_str());
        last = m.end();
    }
    escape_fragment(&text[last..], &mut out);

    out
}

fn escape_fragment(fragment: &str, out: &mut String) {
    for c in fragment.chars() {
        if matches!(c, '#' | '$' | '%' | '&' | '_' | '~' | '^' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
}
