//! Line classification for the block converter.
//!
//! Each classifier inspects the start of one line and returns a token the
//! converter dispatches on. Classification is line-oriented: no classifier
//! consumes more than the line it is given.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, not_line_ending, space0, space1},
    combinator::{map, rest},
    sequence::tuple,
    IResult,
};

/// A classified line token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Heading(u8, &'a str),          // level, content
    FenceDelimiter(&'a str),       // language tag (empty on the closing fence)
    ListItem(&'a str),             // item text, marker stripped
    BlockQuote(&'a str),           // quoted text, marker stripped
    CitationDefinition(&'a str, &'a str), // token, description
}

/// Parse an ATX heading (`# Heading`). Levels past 6 are clamped by the
/// converter's section mapping, not here.
pub fn heading(input: &str) -> IResult<&str, Token> {
    let (input, hashes) = take_while1(|c| c == '#')(input)?;
    let level = hashes.len() as u8;
    let (input, _) = space0(input)?;
    let (input, content) = not_line_ending(input)?;
    Ok((input, Token::Heading(level, content.trim())))
}

/// Parse a code fence delimiter (```` ``` ````), capturing the language tag.
pub fn fence_delimiter(input: &str) -> IResult<&str, Token> {
    let (input, _) = tag("```")(input)?;
    let (input, lang) = rest(input)?;
    Ok((input, Token::FenceDelimiter(lang.trim())))
}

/// Parse a list item marker: `-`, `*`, `+`, or `<digits>.`, each followed by
/// whitespace. Returns the item text with the marker stripped.
pub fn list_item(input: &str) -> IResult<&str, Token> {
    let (input, _) = alt((
        map(tuple((alt((char('-'), char('*'), char('+'))), space1)), |_| ()),
        map(
            tuple((take_while1(|c: char| c.is_ascii_digit()), char('.'), space1)),
            |_| (),
        ),
    ))(input)?;
    let (input, text) = rest(input)?;
    Ok((input, Token::ListItem(text)))
}

/// Parse a block quote marker (`>`), returning the quoted text.
pub fn block_quote(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('>')(input)?;
    let (input, _) = space0(input)?;
    let (input, text) = rest(input)?;
    Ok((input, Token::BlockQuote(text)))
}

/// Parse a footnote citation definition line: `[^token]: description`.
pub fn citation_definition(input: &str) -> IResult<&str, Token> {
    let (input, _) = tag("[^")(input)?;
    let (input, token) =
        take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)?;
    let (input, _) = tag("]:")(input)?;
    let (input, _) = space0(input)?;
    let (input, text) = rest(input)?;
    Ok((input, Token::CitationDefinition(token, text.trim_end())))
}

/// Compute the nesting depth of an indented list line: each leading space
/// counts 1, each tab counts 4, divided by 2 and offset by 1.
pub fn list_indent_depth(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => break,
        }
    }
    width / 2 + 1
}

/// Leading-whitespace check used before list classification.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
