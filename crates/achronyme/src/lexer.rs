//! Single-pass lexer turning source text into a token stream.
//!
//! The lexer walks the source once with one character of lookahead. Tokens
//! carry the byte offset of their first character so parse errors can point
//! back into the source. Multi-character operators (`=>`, `>=`, `<=`, `==`,
//! `!=`) are resolved greedily.

use std::{fmt, iter::Peekable, str::CharIndices};

use crate::error::{Error, EvalResult, Position};

/// Atomic semantic unit of the expression language.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Equals,
    Arrow,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    Let,
    /// End of input. Always the last token in the stream.
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number `{n}`"),
            Self::Identifier(name) => write!(f, "identifier `{name}`"),
            Self::Plus => f.write_str("`+`"),
            Self::Minus => f.write_str("`-`"),
            Self::Star => f.write_str("`*`"),
            Self::Slash => f.write_str("`/`"),
            Self::Percent => f.write_str("`%`"),
            Self::Caret => f.write_str("`^`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::LBracket => f.write_str("`[`"),
            Self::RBracket => f.write_str("`]`"),
            Self::Comma => f.write_str("`,`"),
            Self::Semicolon => f.write_str("`;`"),
            Self::Equals => f.write_str("`=`"),
            Self::Arrow => f.write_str("`=>`"),
            Self::Gt => f.write_str("`>`"),
            Self::Lt => f.write_str("`<`"),
            Self::Ge => f.write_str("`>=`"),
            Self::Le => f.write_str("`<=`"),
            Self::Eq => f.write_str("`==`"),
            Self::Ne => f.write_str("`!=`"),
            Self::Let => f.write_str("keyword `let`"),
            Self::End => f.write_str("end of input"),
        }
    }
}

/// A token together with the byte offset of its first character.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

/// Tokenizes the whole source eagerly.
///
/// The returned stream always ends with a single [`TokenKind::End`] token,
/// which simplifies lookahead in the parser.
pub(crate) fn tokenize(source: &str) -> EvalResult<Vec<Token>> {
    let mut lexer = Lexer {
        source,
        chars: source.char_indices().peekable(),
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    tokens.push(Token {
        kind: TokenKind::End,
        position: source.len(),
    });
    Ok(tokens)
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl Lexer<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consumes the next character if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn next_token(&mut self) -> EvalResult<Option<Token>> {
        // Whitespace between tokens carries no meaning.
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.chars.next();
        }

        let Some(&(position, c)) = self.chars.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '0'..='9' => return self.lex_number(position).map(Some),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(Some(self.lex_identifier(position))),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '%' => self.single(TokenKind::Percent),
            '^' => self.single(TokenKind::Caret),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '=' => {
                self.chars.next();
                if self.eat('=') {
                    TokenKind::Eq
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Equals
                }
            }
            '>' => {
                self.chars.next();
                if self.eat('=') { TokenKind::Ge } else { TokenKind::Gt }
            }
            '<' => {
                self.chars.next();
                if self.eat('=') { TokenKind::Le } else { TokenKind::Lt }
            }
            '!' => {
                self.chars.next();
                if self.eat('=') {
                    TokenKind::Ne
                } else {
                    return Err(Error::Lex {
                        position,
                        message: "expected `=` after `!`".to_owned(),
                    });
                }
            }
            other => {
                return Err(Error::Lex {
                    position,
                    message: format!("unexpected character `{other}`"),
                });
            }
        };
        Ok(Some(Token { kind, position }))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.chars.next();
        kind
    }

    /// Lexes a number literal: digits, optional fractional part, optional
    /// exponent (`e`/`E`, optional sign, digits).
    fn lex_number(&mut self, start: Position) -> EvalResult<Token> {
        self.consume_digits();

        if self.peek() == Some('.') {
            self.chars.next();
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(Error::Lex {
                    position: start,
                    message: "expected digits after decimal point".to_owned(),
                });
            }
            self.consume_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.chars.next();
            if matches!(self.peek(), Some('+' | '-')) {
                self.chars.next();
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(Error::Lex {
                    position: start,
                    message: "expected digits in exponent".to_owned(),
                });
            }
            self.consume_digits();
        }

        let end = self.offset();
        let text = &self.source[start..end];
        let value = text.parse::<f64>().map_err(|_| Error::Lex {
            position: start,
            message: format!("malformed number `{text}`"),
        })?;
        Ok(Token {
            kind: TokenKind::Number(value),
            position: start,
        })
    }

    fn consume_digits(&mut self) {
        while matches!(self.peek(), Some('0'..='9')) {
            self.chars.next();
        }
    }

    fn lex_identifier(&mut self, start: Position) -> Token {
        while matches!(self.peek(), Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_')) {
            self.chars.next();
        }
        let end = self.offset();
        let text = &self.source[start..end];
        let kind = if text == "let" {
            TokenKind::Let
        } else {
            TokenKind::Identifier(text.to_owned())
        };
        Token { kind, position: start }
    }

    /// Byte offset of the next unconsumed character.
    fn offset(&mut self) -> Position {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }
}
