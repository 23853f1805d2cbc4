use serde::{Deserialize, Serialize};

/// Half-open byte range into the analyzed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Smallest span containing both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Lexical category of a [`Token`].
///
/// The discriminants are stable and double as the integer codes handed to
/// foreign callers (see [`TokenType::code`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    // Literals
    /// Quoted string literal
    ///
    /// # Examples
    /// ```text
    /// 'active'
    /// "It's"
    /// 'It''s'
    /// ```
    String = 0,

    /// Integer literal, digits only
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 18
    /// ```
    Integer = 1,

    /// Number with a decimal point or an exponent
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 1.23e-4
    /// 2E10
    /// ```
    Float = 2,

    /// `true` or `false`, in any letter case
    Boolean = 3,

    // References
    /// Bracketed column name, brackets included
    ///
    /// # Examples
    /// ```text
    /// [age]
    /// [first_name]
    /// ```
    ColumnReference = 4,

    /// Function name directly ahead of its argument list
    ///
    /// # Examples
    /// ```text
    /// SUM([price])
    /// NOW()
    /// ```
    Function = 5,

    /// Arithmetic, comparison or logical operator
    Operator = 6,

    // Delimiters
    /// Argument separator
    Comma = 7,

    /// Left parenthesis for grouping or function calls
    LeftParen = 8,

    /// Right parenthesis
    RightParen = 9,

    /// `[` that does not open a well-formed column reference
    LeftBracket = 10,

    /// `]` that does not close a well-formed column reference
    RightBracket = 11,

    // Trivia and specials
    /// One contiguous run of whitespace
    Whitespace = 12,

    /// Text that matches no lexical rule
    Error = 13,

    /// Zero-width end-of-input marker
    Eof = 14,
}

impl TokenType {
    /// Stable integer code for boundary layers.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable name used in diagnostics.
    pub const fn describe(self) -> &'static str {
        match self {
            TokenType::String => "string",
            TokenType::Integer => "integer",
            TokenType::Float => "number",
            TokenType::Boolean => "boolean",
            TokenType::ColumnReference => "column reference",
            TokenType::Function => "function",
            TokenType::Operator => "operator",
            TokenType::Comma => "comma",
            TokenType::LeftParen => "'('",
            TokenType::RightParen => "')'",
            TokenType::LeftBracket => "'['",
            TokenType::RightBracket => "']'",
            TokenType::Whitespace => "whitespace",
            TokenType::Error => "invalid text",
            TokenType::Eof => "end of expression",
        }
    }
}

/// One classified lexical unit with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Exact source text covered by the token.
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// 1-based line of `start`.
    pub line: usize,
    /// 1-based column of `start`, counted in characters.
    pub column: usize,
    /// False when the token did not lex cleanly on its own.
    pub is_valid: bool,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }

    /// Whitespace is kept for editors but skipped by the parser.
    pub fn is_trivia(&self) -> bool {
        self.token_type == TokenType::Whitespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_declaration_order() {
        assert_eq!(TokenType::String.code(), 0);
        assert_eq!(TokenType::ColumnReference.code(), 4);
        assert_eq!(TokenType::Whitespace.code(), 12);
        assert_eq!(TokenType::Eof.code(), 14);
    }

    #[test]
    fn token_type_serializes_camel_case() {
        let json = serde_json::to_string(&TokenType::ColumnReference).unwrap();
        assert_eq!(json, "\"columnReference\"");
    }

    #[test]
    fn span_cover() {
        let a = Span::new(2, 5);
        assert_eq!(a.cover(Span::new(4, 9)), Span::new(2, 9));
        assert_eq!(Span::new(7, 9).cover(a), Span::new(2, 9));
    }
}
