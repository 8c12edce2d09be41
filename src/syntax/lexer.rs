//! C# lexer. Produces a flat token stream; literal values are not kept, only
//! the token shapes the downstream walkers look at.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while, take_while_m_n},
    character::complete::one_of,
    combinator::{map, opt, recognize, value},
    error::{Error as NomError, ErrorKind},
    sequence::pair,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifiers and keywords; keywords are not distinguished here.
    Ident(String),
    /// Numeric or character literal.
    Literal,
    /// String literal of any flavour (regular, verbatim, interpolated, raw).
    Str,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Colon,
    Question,
    QuestionDot,
    QuestionQuestion,
    AndAnd,
    OrOr,
    FatArrow,
    /// Remaining operator glyphs, multi-character first (`==`, `<<`, `+`...).
    Op(String),
}

impl Token {
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_ident(&self, text: &str) -> bool {
        matches!(self, Token::Ident(s) if s == text)
    }

    pub fn is_op(&self, text: &str) -> bool {
        matches!(self, Token::Op(s) if s == text)
    }
}

/// Lex a compilation unit. Unknown bytes are dropped so a partially broken
/// file still yields a usable stream.
pub fn lex(source: &str) -> Vec<Token> {
    let mut rest = source;
    let mut tokens = Vec::new();
    loop {
        rest = skip_trivia(rest);
        if rest.is_empty() {
            break;
        }
        match token(rest) {
            Ok((next, tok)) => {
                tokens.push(tok);
                rest = next;
            }
            Err(_) => {
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }
    }
    tokens
}

/// Whitespace, comments and preprocessor lines.
fn skip_trivia(mut input: &str) -> &str {
    loop {
        let trimmed = input.trim_start();
        if let Some(rest) = trimmed.strip_prefix("//") {
            input = rest
                .find('\n')
                .map(|i| &rest[i + 1..])
                .unwrap_or("");
        } else if let Some(rest) = trimmed.strip_prefix("/*") {
            input = rest
                .find("*/")
                .map(|i| &rest[i + 2..])
                .unwrap_or("");
        } else if trimmed.starts_with('#') {
            input = trimmed
                .find('\n')
                .map(|i| &trimmed[i + 1..])
                .unwrap_or("");
        } else {
            return trimmed;
        }
    }
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        string_literal,
        char_literal,
        number,
        identifier,
        multi_op,
        single_op,
    ))(input)
}

fn err(input: &str) -> nom::Err<NomError<&str>> {
    nom::Err::Error(NomError::new(input, ErrorKind::Char))
}

fn identifier(input: &str) -> IResult<&str, Token> {
    // '@' prefixes a verbatim identifier; the sigil is not part of the name.
    let (input, _) = opt(nom::character::complete::char('@'))(input)?;
    let (rest, text) = recognize(pair(
        take_while_m_n(1, 1, |c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)?;
    Ok((rest, Token::Ident(text.to_string())))
}

/// Numbers swallow suffixes, underscores, hex/binary digits and embedded
/// dots; the value never matters downstream.
fn number(input: &str) -> IResult<&str, Token> {
    let (rest, _) = recognize(pair(
        take_while_m_n(1, 1, |c: char| c.is_ascii_digit()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    ))(input)?;
    Ok((rest, Token::Literal))
}

fn char_literal(input: &str) -> IResult<&str, Token> {
    let mut chars = input.char_indices();
    if !matches!(chars.next(), Some((_, '\''))) {
        return Err(err(input));
    }
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\'' => return Ok((&input[i + 1..], Token::Literal)),
            '\n' => break,
            _ => {}
        }
    }
    Err(err(input))
}

fn string_literal(input: &str) -> IResult<&str, Token> {
    if input.starts_with("\"\"\"") {
        return raw_string(input);
    }
    if input.starts_with("$@\"") || input.starts_with("@$\"") {
        return verbatim_string(&input[2..], input, true);
    }
    if let Some(rest) = input.strip_prefix("@\"") {
        return verbatim_string_body(rest, input, false);
    }
    if let Some(rest) = input.strip_prefix("$\"") {
        return regular_string_body(rest, input, true);
    }
    if let Some(rest) = input.strip_prefix('"') {
        return regular_string_body(rest, input, false);
    }
    Err(err(input))
}

fn raw_string(input: &str) -> IResult<&str, Token> {
    let body = &input[3..];
    match body.find("\"\"\"") {
        Some(i) => Ok((&body[i + 3..], Token::Str)),
        None => Err(err(input)),
    }
}

fn verbatim_string<'a>(
    after_prefix: &'a str,
    original: &'a str,
    interpolated: bool,
) -> IResult<&'a str, Token> {
    let rest = after_prefix
        .strip_prefix('"')
        .ok_or_else(|| err(original))?;
    verbatim_string_body(rest, original, interpolated)
}

/// Verbatim strings escape quotes by doubling and may span lines.
fn verbatim_string_body<'a>(
    body: &'a str,
    original: &'a str,
    interpolated: bool,
) -> IResult<&'a str, Token> {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                } else {
                    return Ok((&body[i + 1..], Token::Str));
                }
            }
            b'{' if interpolated => {
                if bytes.get(i + 1) == Some(&b'{') {
                    i += 2;
                } else {
                    i = skip_hole(body, i + 1);
                }
            }
            _ => i += 1,
        }
    }
    Err(err(original))
}

/// Regular strings end at the line; backslash escapes apply. Interpolated
/// strings additionally contain `{expr}` holes whose content is opaque here.
fn regular_string_body<'a>(
    body: &'a str,
    original: &'a str,
    interpolated: bool,
) -> IResult<&'a str, Token> {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Ok((&body[i + 1..], Token::Str)),
            b'\n' => break,
            b'{' if interpolated => {
                if bytes.get(i + 1) == Some(&b'{') {
                    i += 2;
                } else {
                    i = skip_hole(body, i + 1);
                }
            }
            _ => i += 1,
        }
    }
    Err(err(original))
}

/// Skip an interpolation hole starting just after its `{`. Nested strings
/// and braces are balanced; the returned offset sits after the closing `}`.
fn skip_hole(body: &str, mut i: usize) -> usize {
    let bytes = body.as_bytes();
    let mut depth = 1usize;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            b'"' => {
                // Nested string inside the hole
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 1,
                        b'"' => break,
                        _ => {}
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    i
}

fn multi_op(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::QuestionDot, tag("?.")),
        value(Token::QuestionQuestion, tag("??")),
        value(Token::AndAnd, tag("&&")),
        value(Token::OrOr, tag("||")),
        value(Token::FatArrow, tag("=>")),
        map(
            alt((
                tag("<<="),
                tag(">>="),
                tag("=="),
                tag("!="),
                tag("<="),
                tag(">="),
                tag("<<"),
                tag(">>"),
                tag("+="),
                tag("-="),
                tag("*="),
                tag("/="),
                tag("%="),
                tag("&="),
                tag("|="),
                tag("^="),
                tag("++"),
                tag("--"),
                tag("->"),
            )),
            |s: &str| Token::Op(s.to_string()),
        ),
    ))(input)
}

fn single_op(input: &str) -> IResult<&str, Token> {
    let (rest, c) = one_of("{}()[];,.:?+-*/%=<>!&|^~")(input)?;
    let tok = match c {
        '{' => Token::LBrace,
        '}' => Token::RBrace,
        '(' => Token::LParen,
        ')' => Token::RParen,
        '[' => Token::LBracket,
        ']' => Token::RBracket,
        ';' => Token::Semi,
        ',' => Token::Comma,
        '.' => Token::Dot,
        ':' => Token::Colon,
        '?' => Token::Question,
        other => Token::Op(other.to_string()),
    };
    Ok((rest, tok))
}
