use std::fmt;

/// Lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Function name, time unit, operand or field name
    ///
    /// Any run of letters or underscores.
    ///
    /// # Examples
    /// ```text
    /// avg
    /// sec
    /// heap_usage
    /// ```
    Name,

    /// Non-negative integer literal
    ///
    /// No sign and no decimal point; the grammar only needs counts,
    /// percentiles and time amounts.
    ///
    /// # Examples
    /// ```text
    /// 5
    /// 90
    /// ```
    Integer,

    /// Opening parenthesis of a parameter list
    LeftBracket,

    /// Closing parenthesis of a parameter list
    RightBracket,

    /// Parameter separator
    Comma,

    /// Operand reference prefix
    ///
    /// # Examples
    /// ```text
    /// correl($requests)
    /// ```
    Dollar,
}

impl TokenKind {
    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Name => "name",
            TokenKind::Integer => "integer",
            TokenKind::LeftBracket => "'('",
            TokenKind::RightBracket => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dollar => "'$'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A single lexical token.
///
/// Tokens are produced by the [`Lexer`](crate::lexer::Lexer) during one parse
/// pass and dropped once the parse completes. Two tokens are equal when
/// their kind and text match; the position only feeds diagnostics.
#[derive(Debug, Clone)]
pub struct Token {
    kind: TokenKind,
    text: String,
    position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Literal source text of the token.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 0-based character offset of the first character of the token.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}
