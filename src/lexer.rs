use tracing::{trace, warn};

use crate::{
    ast::{Span, Token, TokenType},
    error::{SyntaxError, SyntaxErrorKind},
};

/// A resolved source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Computes the line and column of byte `offset` in `source`.
    ///
    /// Offsets past the end clamp to the end; offsets inside a multi-byte
    /// character resolve to that character.
    pub fn locate(source: &str, offset: usize) -> Position {
        let mut position = Position::START;
        for (index, ch) in source.char_indices() {
            if index >= offset {
                break;
            }
            position.offset = index + ch.len_utf8();
            if ch == '\n' {
                position.line += 1;
                position.column = 1;
            } else {
                position.column += 1;
            }
        }
        position.offset = offset.min(source.len());
        position
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Single-pass scanner turning source text into positioned tokens.
///
/// The lexer never fails: text that matches no rule becomes an
/// [`TokenType::Error`] token and a [`SyntaxError`] is recorded.
pub struct Lexer<'a> {
    source: &'a str,
    position: Position,
    errors: Vec<SyntaxError>,
    /// Type of the last non-whitespace token.
    previous: Option<TokenType>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: Position::START,
            errors: Vec::new(),
            previous: None,
            finished: false,
        }
    }

    /// Lexes the whole source, returning every token (whitespace included,
    /// terminated by EOF) and the lexical errors in source order.
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SyntaxError>) {
        let mut lexer = Lexer::new(source);
        let tokens: Vec<Token> = lexer.by_ref().collect();
        trace!(
            tokens = tokens.len(),
            errors = lexer.errors.len(),
            "lexed expression"
        );
        (tokens, lexer.into_errors())
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.position.offset..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.source[self.position.offset..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position.offset += ch.len_utf8();
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.current_char() {
            if pred(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// First non-whitespace character at or after the cursor.
    fn next_significant_char(&self) -> Option<char> {
        self.source[self.position.offset..]
            .chars()
            .find(|c| !c.is_whitespace())
    }

    /// Whether the last significant token closed an operand, which makes a
    /// following `AND (` an infix operator rather than a call.
    fn after_operand(&self) -> bool {
        matches!(
            self.previous,
            Some(
                TokenType::String
                    | TokenType::Integer
                    | TokenType::Float
                    | TokenType::Boolean
                    | TokenType::ColumnReference
                    | TokenType::RightParen
                    | TokenType::RightBracket
            )
        )
    }

    fn make_token(&self, token_type: TokenType, start: Position, is_valid: bool) -> Token {
        Token {
            token_type,
            text: self.source[start.offset..self.position.offset].to_string(),
            start: start.offset,
            end: self.position.offset,
            line: start.line,
            column: start.column,
            is_valid,
        }
    }

    fn error(&mut self, kind: SyntaxErrorKind, message: String, start: Position) {
        self.errors.push(SyntaxError::new(
            kind,
            message,
            Span::new(start.offset, self.position.offset),
            start.line,
            start.column,
        ));
    }

    /// Records an error over everything consumed since `start` and returns
    /// the matching ERROR token.
    fn error_token(&mut self, kind: SyntaxErrorKind, message: String, start: Position) -> Token {
        self.error(kind, message, start);
        self.make_token(TokenType::Error, start, false)
    }

    fn single(&mut self, token_type: TokenType, start: Position) -> Token {
        self.advance();
        self.make_token(token_type, start, true)
    }

    /// Operator that may take a trailing `=`, like `<` / `<=`.
    fn operator_with_eq(&mut self, start: Position) -> Token {
        self.advance();
        if self.current_char() == Some('=') {
            self.advance();
        }
        self.make_token(TokenType::Operator, start, true)
    }

    /// Operator that only exists doubled or with `=`, like `==`, `&&`.
    fn paired_operator(&mut self, first: char, second: char, start: Position) -> Token {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            return self.make_token(TokenType::Operator, start, true);
        }

        self.advance();
        let expected = format!("{first}{second}");
        self.error_token(
            SyntaxErrorKind::UnexpectedCharacter,
            format!("Unexpected '{first}' (did you mean '{expected}'?)"),
            start,
        )
    }

    fn read_string(&mut self, quote: char, start: Position) -> Token {
        self.advance(); // Consume opening quote

        loop {
            match self.current_char() {
                None => {
                    return self.error_token(
                        SyntaxErrorKind::UnterminatedString,
                        format!("Unterminated string literal: missing closing {quote}"),
                        start,
                    );
                }
                Some('\\') => {
                    self.advance();
                    // Any character may follow the backslash; EOF is caught above
                    self.advance();
                }
                Some(c) if c == quote => {
                    self.advance();
                    // A doubled quote is an escaped quote, not the end
                    if self.current_char() == Some(quote) {
                        self.advance();
                        continue;
                    }
                    return self.make_token(TokenType::String, start, true);
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn read_number(&mut self, start: Position) -> Token {
        let mut is_float = false;

        self.advance_while(|c| c.is_ascii_digit());

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            let exponent_digits = match self.peek_char(1) {
                Some(c) if c.is_ascii_digit() => Some(1),
                Some('+' | '-') if self.peek_char(2).is_some_and(|c| c.is_ascii_digit()) => {
                    Some(2)
                }
                _ => None,
            };
            if let Some(prefix) = exponent_digits {
                is_float = true;
                for _ in 0..prefix {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit());
            }
        }

        if self.current_char().is_some_and(is_ident_continue) {
            self.advance_while(is_ident_continue);
            let text = self.source[start.offset..self.position.offset].to_string();
            return self.error_token(
                SyntaxErrorKind::InvalidNumber,
                format!("Invalid number literal '{text}'"),
                start,
            );
        }

        let token_type = if is_float {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        self.make_token(token_type, start, true)
    }

    fn read_word(&mut self, start: Position) -> Token {
        self.advance_while(is_ident_continue);
        let source = self.source;
        let word = &source[start.offset..self.position.offset];
        let is_keyword_operator =
            word.eq_ignore_ascii_case("and") || word.eq_ignore_ascii_case("or");

        if is_keyword_operator && self.after_operand() {
            return self.make_token(TokenType::Operator, start, true);
        }
        if word.eq_ignore_ascii_case("true") || word.eq_ignore_ascii_case("false") {
            return self.make_token(TokenType::Boolean, start, true);
        }
        if self.next_significant_char() == Some('(') {
            return self.make_token(TokenType::Function, start, true);
        }
        if is_keyword_operator {
            return self.make_token(TokenType::Operator, start, true);
        }

        let message = format!(
            "Unexpected identifier '{word}': column references must be enclosed in brackets, e.g. [{word}]"
        );
        self.error_token(SyntaxErrorKind::BareIdentifier, message, start)
    }

    fn read_column_reference(&mut self, start: Position) -> Token {
        self.advance(); // Consume '['

        if !self.current_char().is_some_and(is_ident_start) {
            return self.make_token(TokenType::LeftBracket, start, true);
        }

        let name_start = self.position.offset;
        self.advance_while(is_ident_continue);

        if self.current_char() == Some(']') {
            self.advance();
            return self.make_token(TokenType::ColumnReference, start, true);
        }

        let name = &self.source[name_start..self.position.offset];
        let message = format!("Missing closing bracket ']' for column reference '{name}'");
        self.error(SyntaxErrorKind::UnclosedColumnReference, message, start);
        self.make_token(TokenType::ColumnReference, start, false)
    }

    /// Produce the next token. Returns EOF once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        let start = self.position;

        let Some(ch) = self.current_char() else {
            return self.make_token(TokenType::Eof, start, true);
        };

        match ch {
            c if c.is_whitespace() => {
                self.advance_while(char::is_whitespace);
                self.make_token(TokenType::Whitespace, start, true)
            }
            '\'' | '"' => self.read_string(ch, start),
            c if c.is_ascii_digit() => self.read_number(start),
            c if is_ident_start(c) => self.read_word(start),
            '[' => self.read_column_reference(start),
            ']' => self.single(TokenType::RightBracket, start),
            '(' => self.single(TokenType::LeftParen, start),
            ')' => self.single(TokenType::RightParen, start),
            ',' => self.single(TokenType::Comma, start),
            '+' | '-' | '*' | '/' | '%' | '^' => self.single(TokenType::Operator, start),
            '<' | '>' => self.operator_with_eq(start),
            '=' => self.paired_operator('=', '=', start),
            '!' => self.paired_operator('!', '=', start),
            '&' => self.paired_operator('&', '&', start),
            '|' => self.paired_operator('|', '|', start),
            other => {
                self.advance();
                self.error_token(
                    SyntaxErrorKind::UnexpectedCharacter,
                    format!("Unexpected character '{other}'"),
                    start,
                )
            }
        }
    }

    /// Forces the cursor past one character after a rule failed to consume
    /// input, so scanning always terminates.
    fn recover_stall(&mut self, start: Position) -> Token {
        warn!(offset = start.offset, "lexer made no progress; skipping one character");
        self.advance();
        self.error_token(
            SyntaxErrorKind::LexerStalled,
            "Internal error: lexer made no progress".to_string(),
            start,
        )
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let start = self.position;
        let token = self.next_token();

        if token.is(TokenType::Eof) {
            self.finished = true;
            return Some(token);
        }
        let token = if self.position.offset == start.offset {
            self.recover_stall(start)
        } else {
            token
        };
        if !token.is_trivia() {
            self.previous = Some(token.token_type);
        }
        Some(token)
    }
}
