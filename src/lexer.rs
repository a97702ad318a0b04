use thiserror::Error;

use crate::ast::{Token, TokenKind};

/// Errors raised while scanning a formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character outside the formula alphabet
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    /// A token of the wrong kind where a specific kind is required
    #[error("unexpected token {found} at position {position}, expected {expected}")]
    UnexpectedToken {
        expected: TokenKind,
        found: Token,
        position: usize,
    },

    /// Input ran out where a token is required
    #[error("unexpected end of input at position {position}, expected {expected}")]
    UnexpectedEnd { expected: TokenKind, position: usize },
}

/// Tokenizer over a single formula string.
///
/// One lexer serves one parse; it keeps a mutable cursor and is not meant to
/// be shared between threads.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Current 0-based cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.current_char() {
            self.advance();
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if accept(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn punctuation(&mut self, kind: TokenKind, ch: char) -> Token {
        let start = self.position;
        self.advance();
        Token::new(kind, ch, start)
    }

    /// Scan the next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let start = self.position;
        let token = match self.current_char() {
            None => return Ok(None),
            Some(ch @ '(') => self.punctuation(TokenKind::LeftBracket, ch),
            Some(ch @ ')') => self.punctuation(TokenKind::RightBracket, ch),
            Some(ch @ ',') => self.punctuation(TokenKind::Comma, ch),
            Some(ch @ '$') => self.punctuation(TokenKind::Dollar, ch),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let name = self.read_while(|c| c.is_alphabetic() || c == '_');
                Token::new(TokenKind::Name, name, start)
            }
            Some(ch) if ch.is_ascii_digit() => {
                let digits = self.read_while(|c| c.is_ascii_digit());
                Token::new(TokenKind::Integer, digits, start)
            }
            Some(ch) => {
                return Err(LexError::UnexpectedCharacter {
                    ch,
                    position: start,
                });
            }
        };
        Ok(Some(token))
    }

    /// Scan the next token, failing if the input is exhausted.
    ///
    /// `expected` only feeds the end-of-input diagnostic; the returned token
    /// may be of any kind.
    pub fn next_required(&mut self, expected: TokenKind) -> Result<Token, LexError> {
        match self.next_token()? {
            Some(token) => Ok(token),
            None => Err(LexError::UnexpectedEnd {
                expected,
                position: self.position,
            }),
        }
    }

    /// Scan the next token and require it to be of `expected` kind.
    pub fn expect(&mut self, expected: TokenKind) -> Result<Token, LexError> {
        let token = self.next_required(expected)?;
        if token.kind() == expected {
            Ok(token)
        } else {
            Err(LexError::UnexpectedToken {
                expected,
                position: token.position(),
                found: token,
            })
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(e) => {
                // stop after the first error
                self.position = self.input.len();
                Some(Err(e))
            }
        }
    }
}

#[test]
fn test_punctuation() {
    let mut lexer = Lexer::new("( ) , $");
    assert_eq!(lexer.next_token().unwrap().unwrap().kind(), TokenKind::LeftBracket);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind(), TokenKind::RightBracket);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind(), TokenKind::Comma);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind(), TokenKind::Dollar);
    assert_eq!(lexer.next_token().unwrap(), None);
}

#[test]
fn test_expect_reports_position() {
    let mut lexer = Lexer::new("avg 5");
    lexer.expect(TokenKind::Name).unwrap();
    let err = lexer.expect(TokenKind::LeftBracket).unwrap_err();
    assert!(matches!(
        err,
        LexError::UnexpectedToken {
            expected: TokenKind::LeftBracket,
            position: 4,
            ..
        }
    ));
}
