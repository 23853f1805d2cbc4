//! Canonical pretty-printer for expressions.
//!
//! Formatting works on the syntax tree, so only valid expressions are
//! rewritten; anything with errors comes back untouched.
//!
//! ```text
//! [a]+FUNC([b]*2,[c]/3)>[d]&&[e]!=[f]
//! ```
//!
//! becomes, with the default 40 column limit:
//!
//! ```text
//! [a] + FUNC([b] * 2, [c] / 3) > [d]
//!   && [e] != [f]
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    analyzer::Analyzer,
    ast::{Expr, ExprKind},
};

/// Layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per indentation level.
    pub indent_size: usize,
    /// Column limit that triggers line breaking.
    pub max_line_length: usize,
    /// Put one space on each side of binary operators.
    pub space_around_ops: bool,
    /// Break long logical chains and argument lists over several lines.
    pub break_long_expressions: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indent_size: 2,
            max_line_length: 40,
            space_around_ops: true,
            break_long_expressions: true,
        }
    }
}

impl FormatOptions {
    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn with_space_around_ops(mut self, space_around_ops: bool) -> Self {
        self.space_around_ops = space_around_ops;
        self
    }

    pub fn with_break_long_expressions(mut self, break_long_expressions: bool) -> Self {
        self.break_long_expressions = break_long_expressions;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
    analyzer: Analyzer,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Formatter {
            options,
            analyzer: Analyzer::new(),
        }
    }

    /// Uses `analyzer` (and its configuration) to parse input.
    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Formats `source`. Empty or invalid input is returned unchanged.
    pub fn format(&self, source: &str) -> String {
        if source.trim().is_empty() {
            return source.to_string();
        }

        let parsed = self.analyzer.parse(source);
        let expr = match parsed.expr {
            Some(expr) if parsed.errors.is_empty() => expr,
            _ => {
                debug!(
                    errors = parsed.errors.len(),
                    "skipping format of invalid expression"
                );
                return source.to_string();
            }
        };

        let mut writer = Writer::new(&self.options, source, self.options.break_long_expressions);
        writer.write(&expr, 0);
        writer.buf
    }
}

/// Accumulates output and tracks the current column for line breaking.
struct Writer<'a> {
    options: &'a FormatOptions,
    source: &'a str,
    allow_breaks: bool,
    buf: String,
    column: usize,
}

impl<'a> Writer<'a> {
    fn new(options: &'a FormatOptions, source: &'a str, allow_breaks: bool) -> Self {
        Writer {
            options,
            source,
            allow_breaks,
            buf: String::new(),
            column: 0,
        }
    }

    fn push(&mut self, text: &str) {
        match text.rfind('\n') {
            Some(nl) => self.column = text[nl + 1..].chars().count(),
            None => self.column += text.chars().count(),
        }
        self.buf.push_str(text);
    }

    fn newline(&mut self, level: usize) {
        let indent = " ".repeat(level * self.options.indent_size);
        self.push("\n");
        self.push(&indent);
    }

    /// Width of `expr` rendered on a single line.
    fn flat_len(&self, expr: &Expr) -> usize {
        let mut flat = Writer::new(self.options, self.source, false);
        flat.write(expr, 0);
        flat.column
    }

    fn operator_padding(&self) -> &'static str {
        if self.options.space_around_ops { " " } else { "" }
    }

    fn write(&mut self, expr: &Expr, indent: usize) {
        match &expr.kind {
            ExprKind::Literal(literal) => self.push(&literal.text),
            ExprKind::ColumnRef(name) => {
                self.push("[");
                self.push(name);
                self.push("]");
            }
            ExprKind::Paren(inner) => {
                self.push("(");
                self.write(inner, indent);
                self.push(")");
            }
            ExprKind::UnaryMinus(operand) => {
                self.push("-");
                self.write(operand, indent);
            }
            ExprKind::BinaryOp { .. } => self.write_chain(expr, indent),
            ExprKind::FunctionCall { name, args } => self.write_call(name, args, indent),
            ExprKind::Error => {
                let text = self
                    .source
                    .get(expr.span.start..expr.span.end)
                    .unwrap_or_default();
                self.push(text);
            }
        }
    }

    /// Writes a run of binary operators. The left spine of an operator
    /// chain is unbounded, so it is walked with a loop.
    fn write_chain(&mut self, expr: &Expr, indent: usize) {
        let mut tail = Vec::new();
        let mut first = expr;
        while let ExprKind::BinaryOp { op, left, right } = &first.kind {
            tail.push((*op, right.as_ref()));
            first = left.as_ref();
        }
        self.write(first, indent);

        let pad = self.operator_padding();
        for (op, right) in tail.into_iter().rev() {
            let symbol = op.symbol();

            if self.allow_breaks && op.is_logical() {
                let needed = pad.len() * 2 + symbol.len() + self.flat_len(right);
                if self.column + needed > self.options.max_line_length {
                    self.newline(indent + 1);
                    self.push(symbol);
                    self.push(pad);
                    self.write(right, indent);
                    continue;
                }
            }

            self.push(pad);
            self.push(symbol);
            self.push(pad);
            self.write(right, indent);
        }
    }

    fn write_call(&mut self, name: &str, args: &[Expr], indent: usize) {
        self.push(name);
        self.push("(");

        let should_break = self.allow_breaks && args.len() > 1 && {
            let args_len: usize =
                args.iter().map(|arg| self.flat_len(arg)).sum::<usize>() + 2 * (args.len() - 1);
            // +1 for the closing paren
            self.column + args_len + 1 > self.options.max_line_length
        };

        if should_break {
            for (i, arg) in args.iter().enumerate() {
                self.newline(indent + 1);
                self.write(arg, indent + 1);
                if i + 1 < args.len() {
                    self.push(",");
                }
            }
            self.newline(indent);
        } else {
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.write(arg, indent);
            }
        }

        self.push(")");
    }
}
