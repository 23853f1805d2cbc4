use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    ast::{BinOp, Expr, ExprKind, Literal, LiteralKind, Span, Token, TokenType},
    error::{SyntaxError, SyntaxErrorKind},
};

/// Default bound on nested parentheses, calls, brackets and unary minus.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Recursive-descent validator over a token stream.
///
/// The parser never stops at the first problem: each mismatch is recorded,
/// the parser resynchronizes, and checking continues so one pass reports as
/// many independent errors as it can. Regions that fail to parse become
/// [`ExprKind::Error`] nodes.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
    depth_exceeded: bool,
    errors: Vec<SyntaxError>,
    reported: HashSet<Span>,
}

impl Parser {
    /// Builds a parser over lexer output. Whitespace is dropped; a missing
    /// EOF is synthesized after the last token.
    pub fn new(tokens: &[Token], max_depth: usize) -> Self {
        let mut tokens: Vec<Token> = tokens.iter().filter(|t| !t.is_trivia()).cloned().collect();
        if !tokens.last().is_some_and(|t| t.is(TokenType::Eof)) {
            tokens.push(eof_after(tokens.last()));
        }

        Parser {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
            depth_exceeded: false,
            errors: Vec::new(),
            reported: HashSet::new(),
        }
    }

    /// Parses one complete expression. Returns `None` for the tree only when
    /// there was nothing to parse.
    pub fn parse(mut self) -> (Option<Expr>, Vec<SyntaxError>) {
        if self.check(TokenType::Eof) {
            let eof = self.current().clone();
            self.report(SyntaxError::at_token(
                SyntaxErrorKind::EmptyExpression,
                "Empty expression",
                &eof,
            ));
            return (None, self.errors);
        }

        let expr = self.parse_expression();
        self.parse_trailing();

        debug!(
            errors = self.errors.len(),
            depth_exceeded = self.depth_exceeded,
            "parsed expression"
        );
        (Some(expr), self.errors)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.current().is(token_type)
    }

    /// Binary operator at the cursor, if it binds at `precedence`.
    fn binop_at(&self, precedence: u8) -> Option<BinOp> {
        let token = self.current();
        if !token.is(TokenType::Operator) {
            return None;
        }
        BinOp::from_symbol(&token.text).filter(|op| op.precedence() == precedence)
    }

    fn is_unary_minus(&self) -> bool {
        let token = self.current();
        token.is(TokenType::Operator) && token.text == "-"
    }

    /// Whether the cursor can begin an operand. ERROR tokens count: they
    /// stand in for an operand the lexer already complained about.
    fn starts_operand(&self) -> bool {
        match self.current().token_type {
            TokenType::String
            | TokenType::Integer
            | TokenType::Float
            | TokenType::Boolean
            | TokenType::ColumnReference
            | TokenType::Function
            | TokenType::LeftParen
            | TokenType::LeftBracket
            | TokenType::Error => true,
            TokenType::Operator => self.is_unary_minus(),
            _ => false,
        }
    }

    fn report(&mut self, error: SyntaxError) {
        if self.depth_exceeded {
            return;
        }
        if self.reported.insert(error.span()) {
            self.errors.push(error);
        }
    }

    fn report_at(&mut self, kind: SyntaxErrorKind, message: String, token: &Token) {
        self.report(SyntaxError::at_token(kind, message, token));
    }

    /// Enters one nesting level. On overflow the single `NestingTooDeep`
    /// error is recorded and the cursor jumps to EOF so every open frame
    /// unwinds without further reports.
    fn enter(&mut self, at: &Token) -> bool {
        if self.depth >= self.max_depth {
            if !self.depth_exceeded {
                warn!(
                    max_depth = self.max_depth,
                    offset = at.start,
                    "nesting limit exceeded"
                );
                self.report_at(
                    SyntaxErrorKind::NestingTooDeep,
                    format!(
                        "Expression is nested too deeply (maximum depth is {})",
                        self.max_depth
                    ),
                    at,
                );
                self.depth_exceeded = true;
            }
            self.pos = self.tokens.len() - 1;
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Skips ahead to a token in `stop` at the current nesting level, or EOF.
    fn synchronize(&mut self, stop: &[TokenType]) {
        let mut nesting = 0usize;
        loop {
            match self.current().token_type {
                TokenType::Eof => return,
                TokenType::LeftParen => nesting += 1,
                TokenType::RightParen if nesting > 0 => nesting -= 1,
                t if nesting == 0 && stop.contains(&t) => return,
                _ => {}
            }
            self.advance();
        }
    }

    pub fn parse_expression(&mut self) -> Expr {
        self.parse_or()
    }

    /// Reports whatever is left once a complete expression has been read.
    fn parse_trailing(&mut self) {
        while !self.check(TokenType::Eof) {
            let token = self.current().clone();
            match token.token_type {
                TokenType::RightParen => {
                    self.report_at(
                        SyntaxErrorKind::UnmatchedParen,
                        "Unmatched ')': no '(' to close".to_string(),
                        &token,
                    );
                    self.advance();
                }
                TokenType::RightBracket => {
                    self.report_at(
                        SyntaxErrorKind::UnmatchedBracket,
                        "Unmatched ']': no '[' to close".to_string(),
                        &token,
                    );
                    self.advance();
                }
                TokenType::Error => self.advance(),
                TokenType::Comma => {
                    self.report_at(
                        SyntaxErrorKind::UnexpectedToken,
                        "Unexpected ',' outside of a function call".to_string(),
                        &token,
                    );
                    self.advance();
                }
                _ => {
                    self.report_at(
                        SyntaxErrorKind::UnexpectedToken,
                        format!("Unexpected {} after end of expression", describe(&token)),
                        &token,
                    );
                    if self.starts_operand() {
                        self.parse_expression();
                    } else {
                        self.advance();
                    }
                }
            }
        }
    }

    /// Builds `left op right` once the operator is consumed. With no operand
    /// ahead, reports the gap and returns an error node over `left op`.
    fn finish_binary(
        &mut self,
        op: BinOp,
        op_token: &Token,
        left: Expr,
        next: fn(&mut Self) -> Expr,
    ) -> Expr {
        if self.starts_operand() {
            let right = next(self);
            return Expr::binary(op, left, right);
        }

        let found = self.current().clone();
        let (kind, message) = match found.token_type {
            TokenType::Eof => (
                SyntaxErrorKind::UnexpectedEof,
                format!(
                    "Unexpected end of expression: missing right operand for operator '{}'",
                    op_token.text
                ),
            ),
            TokenType::Operator => (
                SyntaxErrorKind::MissingOperand,
                format!(
                    "Missing operand between '{}' and '{}'",
                    op_token.text, found.text
                ),
            ),
            _ => (
                SyntaxErrorKind::MissingOperand,
                format!("Missing right operand for operator '{}'", op_token.text),
            ),
        };
        self.report_at(kind, message, op_token);
        Expr::error(left.span.cover(op_token.span()))
    }

    /// Left-associative binary level.
    fn parse_left_assoc(&mut self, precedence: u8, next: fn(&mut Self) -> Expr) -> Expr {
        let mut left = next(self);

        while let Some(op) = self.binop_at(precedence) {
            let op_token = self.current().clone();
            self.advance();
            left = self.finish_binary(op, &op_token, left, next);
        }
        left
    }

    fn parse_or(&mut self) -> Expr {
        self.parse_left_assoc(1, Self::parse_and)
    }

    fn parse_and(&mut self) -> Expr {
        self.parse_left_assoc(2, Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Expr {
        self.parse_left_assoc(3, Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Expr {
        self.parse_left_assoc(4, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Expr {
        self.parse_left_assoc(5, Self::parse_power)
    }

    fn parse_power(&mut self) -> Expr {
        let base = self.parse_unary();

        let Some(op) = self.binop_at(6) else {
            return base;
        };
        let op_token = self.current().clone();
        self.advance();

        // Right associative: recurse instead of looping
        if !self.enter(&op_token) {
            return Expr::error(base.span.cover(op_token.span()));
        }
        let expr = self.finish_binary(op, &op_token, base, Self::parse_power);
        self.leave();
        expr
    }

    fn parse_unary(&mut self) -> Expr {
        if !self.is_unary_minus() {
            let primary = self.parse_primary();
            return self.absorb_error_tokens(primary);
        }

        let minus = self.current().clone();
        if !self.enter(&minus) {
            return Expr::error(minus.span());
        }
        self.advance();

        let expr = if self.starts_operand() {
            let operand = self.parse_unary();
            let span = minus.span().cover(operand.span);
            Expr::new(ExprKind::UnaryMinus(Box::new(operand)), span)
        } else {
            let kind = if self.check(TokenType::Eof) {
                SyntaxErrorKind::UnexpectedEof
            } else {
                SyntaxErrorKind::MissingOperand
            };
            self.report_at(kind, "Missing operand after unary '-'".to_string(), &minus);
            Expr::error(minus.span())
        };
        self.leave();
        expr
    }

    /// ERROR tokens right after an operand act as an unknown operator
    /// (`5 # 3`) or as junk glued to it; either way the lexer has reported
    /// them, so they are folded into one error node here.
    fn absorb_error_tokens(&mut self, expr: Expr) -> Expr {
        if !self.check(TokenType::Error) {
            return expr;
        }

        let mut span = expr.span;
        while self.check(TokenType::Error) {
            span = span.cover(self.current().span());
            self.advance();
            if self.starts_operand() && !self.check(TokenType::Error) && !self.is_unary_minus() {
                let operand = self.parse_primary();
                span = span.cover(operand.span);
            }
        }
        Expr::error(span)
    }

    /// Parse primary expressions: literals, column references, calls and
    /// groups.
    fn parse_primary(&mut self) -> Expr {
        let token = self.current().clone();

        match token.token_type {
            // Literals
            TokenType::String | TokenType::Integer | TokenType::Float | TokenType::Boolean => {
                self.advance();
                let kind = match token.token_type {
                    TokenType::String => LiteralKind::String,
                    TokenType::Integer => LiteralKind::Integer,
                    TokenType::Float => LiteralKind::Float,
                    _ => LiteralKind::Boolean,
                };
                Expr::new(
                    ExprKind::Literal(Literal {
                        kind,
                        text: token.text.clone(),
                    }),
                    token.span(),
                )
            }

            // References
            TokenType::ColumnReference => {
                self.advance();
                // `[name` without `]` was already reported by the lexer
                let name = token.text.trim_start_matches('[').trim_end_matches(']');
                Expr::new(ExprKind::ColumnRef(name.to_string()), token.span())
            }
            TokenType::Function => self.parse_call(token),

            // Groups
            TokenType::LeftParen => self.parse_group(token),
            TokenType::LeftBracket => self.parse_bracket_group(token),

            TokenType::Error => {
                self.advance();
                Expr::error(token.span())
            }

            TokenType::Operator => {
                self.report_at(
                    SyntaxErrorKind::MissingOperand,
                    format!("Missing left operand for operator '{}'", token.text),
                    &token,
                );
                self.advance();
                if self.starts_operand() {
                    let operand = self.parse_unary();
                    return Expr::error(token.span().cover(operand.span));
                }
                Expr::error(token.span())
            }

            TokenType::Eof => {
                self.report_at(
                    SyntaxErrorKind::UnexpectedEof,
                    "Unexpected end of expression: expected an operand".to_string(),
                    &token,
                );
                Expr::error(token.span())
            }

            // Closers and separators are left for the enclosing construct
            _ => {
                self.report_at(
                    SyntaxErrorKind::UnexpectedToken,
                    format!("Expected an operand, found {}", describe(&token)),
                    &token,
                );
                Expr::error(token.span())
            }
        }
    }

    fn parse_group(&mut self, open: Token) -> Expr {
        if !self.enter(&open) {
            return Expr::error(open.span());
        }
        self.advance(); // Consume '('

        let expr = match self.current().token_type {
            TokenType::RightParen => {
                let close = self.current().clone();
                self.advance();
                let span = open.span().cover(close.span());
                self.report(SyntaxError::new(
                    SyntaxErrorKind::EmptyParentheses,
                    "Empty parentheses '()'",
                    span,
                    open.line,
                    open.column,
                ));
                Expr::error(span)
            }
            TokenType::Eof => {
                self.report_unclosed(&open, "Unclosed '(': missing ')'".to_string());
                Expr::error(open.span())
            }
            _ => {
                let inner = self.parse_expression();
                self.close_group(&open, inner)
            }
        };

        self.leave();
        expr
    }

    fn close_group(&mut self, open: &Token, inner: Expr) -> Expr {
        if self.check(TokenType::RightParen) {
            let close = self.current().clone();
            self.advance();
            let span = open.span().cover(close.span());
            return Expr::new(ExprKind::Paren(Box::new(inner)), span);
        }

        if !self.check(TokenType::Eof) {
            let found = self.current().clone();
            self.report_at(
                SyntaxErrorKind::UnexpectedToken,
                format!("Expected ')' but found {}", describe(&found)),
                &found,
            );
            self.synchronize(&[TokenType::RightParen]);
            if self.check(TokenType::RightParen) {
                let close = self.current().clone();
                self.advance();
                return Expr::error(open.span().cover(close.span()));
            }
        }

        self.report_unclosed(open, "Unclosed '(': missing ')'".to_string());
        Expr::error(open.span().cover(inner.span))
    }

    fn report_unclosed(&mut self, open: &Token, message: String) {
        self.report_at(SyntaxErrorKind::UnclosedParen, message, open);
    }

    fn parse_call(&mut self, name: Token) -> Expr {
        if !is_valid_function_name(&name.text) {
            self.report_at(
                SyntaxErrorKind::InvalidFunctionName,
                format!(
                    "Invalid function name '{}': function names must be uppercase, e.g. {}",
                    name.text,
                    name.text.to_ascii_uppercase()
                ),
                &name,
            );
        }
        self.advance(); // Consume name

        if !self.check(TokenType::LeftParen) {
            let found = self.current().clone();
            self.report_at(
                SyntaxErrorKind::UnexpectedToken,
                format!(
                    "Expected '(' after function name '{}', found {}",
                    name.text,
                    describe(&found)
                ),
                &found,
            );
            return Expr::error(name.span());
        }

        let open = self.current().clone();
        if !self.enter(&open) {
            return Expr::error(name.span());
        }
        self.advance(); // Consume '('

        let mut args = Vec::new();
        let mut pending_comma: Option<Token> = None;
        let mut expect_argument = true;

        let close = loop {
            let token = self.current().clone();
            match token.token_type {
                TokenType::RightParen => {
                    if let Some(comma) = pending_comma.take() {
                        self.report_at(
                            SyntaxErrorKind::TrailingComma,
                            format!("Trailing comma in call to '{}'", name.text),
                            &comma,
                        );
                    }
                    self.advance();
                    break Some(token);
                }
                TokenType::Eof => break None,
                TokenType::Comma if expect_argument => {
                    self.report_at(
                        SyntaxErrorKind::MissingArgument,
                        format!("Missing argument before ',' in call to '{}'", name.text),
                        &token,
                    );
                    pending_comma = Some(token);
                    self.advance();
                }
                TokenType::Comma => {
                    pending_comma = Some(token);
                    expect_argument = true;
                    self.advance();
                }
                TokenType::RightBracket if !expect_argument => {
                    self.report_at(
                        SyntaxErrorKind::UnmatchedBracket,
                        "Unmatched ']': no '[' to close".to_string(),
                        &token,
                    );
                    self.advance();
                }
                _ if expect_argument => {
                    args.push(self.parse_expression());
                    pending_comma = None;
                    expect_argument = false;
                }
                _ => {
                    self.report_at(
                        SyntaxErrorKind::UnexpectedToken,
                        format!(
                            "Expected ',' or ')' in argument list of '{}', found {}",
                            name.text,
                            describe(&token)
                        ),
                        &token,
                    );
                    self.synchronize(&[
                        TokenType::Comma,
                        TokenType::RightParen,
                        TokenType::RightBracket,
                    ]);
                }
            }
        };

        let expr = match close {
            Some(close) => Expr::new(
                ExprKind::FunctionCall {
                    name: name.text.clone(),
                    args,
                },
                name.span().cover(close.span()),
            ),
            None => {
                self.report_unclosed(
                    &open,
                    format!(
                        "Unclosed '(': missing ')' for function call '{}'",
                        name.text
                    ),
                );
                let end = args.last().map_or(open.span(), |arg| arg.span);
                Expr::error(name.span().cover(end))
            }
        };

        self.leave();
        expr
    }

    /// `[` that did not lex as a column reference: `[]`, `[123]`, `[ x ]`.
    fn parse_bracket_group(&mut self, open: Token) -> Expr {
        if !self.enter(&open) {
            return Expr::error(open.span());
        }
        self.advance(); // Consume '['

        let expr = if self.check(TokenType::RightBracket) {
            let close = self.current().clone();
            self.advance();
            let span = open.span().cover(close.span());
            self.report(SyntaxError::new(
                SyntaxErrorKind::InvalidColumnReference,
                "Empty column reference '[]'",
                span,
                open.line,
                open.column,
            ));
            Expr::error(span)
        } else {
            self.report_at(
                SyntaxErrorKind::InvalidColumnReference,
                "Invalid column reference: expected a column name after '['".to_string(),
                &open,
            );
            let mut span = open.span();
            while !self.check(TokenType::Eof) {
                let token = self.current();
                if matches!(
                    token.token_type,
                    TokenType::RightBracket | TokenType::Comma | TokenType::RightParen
                ) {
                    break;
                }
                span = span.cover(token.span());
                self.synchronize_one();
            }
            if self.check(TokenType::RightBracket) {
                span = span.cover(self.current().span());
                self.advance();
            }
            Expr::error(span)
        };

        self.leave();
        expr
    }

    /// Skips one token, or a whole balanced `( ... )` run.
    fn synchronize_one(&mut self) {
        if self.check(TokenType::LeftParen) {
            self.advance();
            self.synchronize(&[TokenType::RightParen]);
        }
        self.advance();
    }
}

/// Function names are uppercase: `[A-Z][A-Z0-9_]*`.
pub fn is_valid_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn describe(token: &Token) -> String {
    match token.token_type {
        TokenType::Eof => "end of expression".to_string(),
        TokenType::Comma
        | TokenType::LeftParen
        | TokenType::RightParen
        | TokenType::LeftBracket
        | TokenType::RightBracket => format!("'{}'", token.text),
        other => format!("{} '{}'", other.describe(), token.text),
    }
}

fn eof_after(last: Option<&Token>) -> Token {
    let (offset, line, column) = match last {
        None => (0, 1, 1),
        Some(token) => match token.text.rfind('\n') {
            Some(nl) => (
                token.end,
                token.line + token.text.matches('\n').count(),
                token.text[nl + 1..].chars().count() + 1,
            ),
            None => (
                token.end,
                token.line,
                token.column + token.text.chars().count(),
            ),
        },
    };
    Token {
        token_type: TokenType::Eof,
        text: String::new(),
        start: offset,
        end: offset,
        line,
        column,
        is_valid: true,
    }
}
