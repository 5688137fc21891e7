//! Lexer (tokenizer) for the descriptor mini-language
//!
//! Descriptors are tiny, so the lexer keeps no state of its own:
//! [`next_token`] is a pure function of the descriptor text and a byte
//! offset, and callers advance their own cursor to [`Token::end`].
//!
//! Recognition order matters because the patterns overlap. At each offset the
//! lexer tries, in this order: end of input, a whitespace run, `;`, `*`, `[`,
//! `]`, the `TSC` keyword, the `MODULE` keyword, a decimal digit run, and
//! finally an identifier (any run of characters other than whitespace, `[`
//! and `;`). Nothing is ever rejected here; the parser decides what is valid.

use std::fmt;

/// Keyword that declares an array of timestamp counter records.
pub const TSC_KEYWORD: &str = "TSC";

/// Keyword that declares a nested performance module slot.
pub const MODULE_KEYWORD: &str = "MODULE";

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `TSC`
    Tsc,
    /// `MODULE`
    Module,
    /// `*`
    Star,
    Ident,
    Whitespace,
    /// `;`
    Semicolon,
    EndOfInput,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    Number,
    /// Never produced: unrecognized text degrades to [`TokenKind::Ident`].
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Tsc => write!(f, "'{}'", TSC_KEYWORD),
            TokenKind::Module => write!(f, "'{}'", MODULE_KEYWORD),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Whitespace => write!(f, "whitespace"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::EndOfInput => write!(f, "end of descriptor"),
            TokenKind::OpenBracket => write!(f, "'['"),
            TokenKind::CloseBracket => write!(f, "']'"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::Unknown => write!(f, "unknown token"),
        }
    }
}

/// A single token. Offsets are absolute byte offsets into the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// Parsed value, only set for [`TokenKind::Number`].
    pub value: Option<u64>,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Token {
            kind,
            start,
            end,
            value: None,
        }
    }

    /// The token's text within `descriptor`.
    pub fn text<'a>(&self, descriptor: &'a str) -> &'a str {
        &descriptor[self.start..self.end]
    }
}

/// Scan one token starting at byte offset `pos` of `descriptor`.
///
/// `pos` must lie on a character boundary; every offset returned in
/// [`Token::end`] does.
pub fn next_token(descriptor: &str, pos: usize) -> Token {
    let rest = &descriptor.as_bytes()[pos.min(descriptor.len())..];

    let Some(&first) = rest.first() else {
        return Token::new(TokenKind::EndOfInput, pos, pos);
    };

    let whitespace = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
    if whitespace > 0 {
        return Token::new(TokenKind::Whitespace, pos, pos + whitespace);
    }

    let single = match first {
        b';' => Some(TokenKind::Semicolon),
        b'*' => Some(TokenKind::Star),
        b'[' => Some(TokenKind::OpenBracket),
        b']' => Some(TokenKind::CloseBracket),
        _ => None,
    };
    if let Some(kind) = single {
        return Token::new(kind, pos, pos + 1);
    }

    if rest.starts_with(TSC_KEYWORD.as_bytes()) {
        return Token::new(TokenKind::Tsc, pos, pos + TSC_KEYWORD.len());
    }
    if rest.starts_with(MODULE_KEYWORD.as_bytes()) {
        return Token::new(TokenKind::Module, pos, pos + MODULE_KEYWORD.len());
    }

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 {
        // Overflow saturates; the parser's payload bound check rejects the count.
        let value = rest[..digits].iter().fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        });
        return Token {
            kind: TokenKind::Number,
            start: pos,
            end: pos + digits,
            value: Some(value),
        };
    }

    // Delimiters are ASCII, so this never splits a multi-byte character.
    let ident = rest
        .iter()
        .take_while(|&&b| !b.is_ascii_whitespace() && b != b'[' && b != b';')
        .count();
    Token::new(TokenKind::Ident, pos, pos + ident)
}

/// Iterator over every token of a descriptor, stopping before end of input.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    descriptor: &'a str,
    position: usize,
}

/// Tokenize a whole descriptor, whitespace included.
pub fn tokens(descriptor: &str) -> Tokens<'_> {
    Tokens {
        descriptor,
        position: 0,
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = next_token(self.descriptor, self.position);
        if token.kind == TokenKind::EndOfInput {
            return None;
        }
        self.position = token.end;
        Some(token)
    }
}
