use crate::ast::{BinOp, Span};

/// Kind of a literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Integer,
    Float,
    Boolean,
}

/// Literal as written in the source.
///
/// The raw text is kept so tools can echo the user's spelling
/// (`'It''s'`, `1.5E3`, `TRUE`) without re-encoding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

/// Syntax tree node with the byte span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Shape of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal value
    ///
    /// # Example
    /// ```text
    /// 'active'
    /// 42
    /// ```
    Literal(Literal),

    /// Column reference, stored without brackets
    ///
    /// # Example
    /// ```text
    /// [age]      // ColumnRef("age")
    /// ```
    ColumnRef(String),

    /// Function call
    ///
    /// # Examples
    /// ```text
    /// NOW()
    /// MAX([a], [b])
    /// ```
    FunctionCall { name: String, args: Vec<Expr> },

    /// Parenthesized expression, kept so formatting preserves the user's grouping
    Paren(Box<Expr>),

    /// Unary negation (`-[value]`)
    UnaryMinus(Box<Expr>),

    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Placeholder for a region that failed to parse. The matching
    /// diagnostic has already been recorded.
    Error,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn error(span: Span) -> Self {
        Expr {
            kind: ExprKind::Error,
            span,
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        let span = left.span.cover(right.span);
        Expr {
            kind: ExprKind::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error)
    }

    /// True if this node or any descendant failed to parse.
    pub fn contains_error(&self) -> bool {
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match &expr.kind {
                ExprKind::Error => return true,
                ExprKind::Literal(_) | ExprKind::ColumnRef(_) => {}
                ExprKind::FunctionCall { args, .. } => pending.extend(args),
                ExprKind::Paren(inner) | ExprKind::UnaryMinus(inner) => {
                    pending.push(inner.as_ref());
                }
                ExprKind::BinaryOp { left, right, .. } => {
                    pending.push(left.as_ref());
                    pending.push(right.as_ref());
                }
            }
        }
        false
    }
}

/// Operator chains (`1 + 1 + ... + 1`) nest one box per operator with no
/// depth limit, so children are unlinked onto a heap stack and dropped
/// one at a time.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.kind.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.kind.detach_children(&mut pending);
        }
    }
}

impl ExprKind {
    fn detach_children(&mut self, into: &mut Vec<Expr>) {
        match std::mem::replace(self, ExprKind::Error) {
            ExprKind::FunctionCall { args, .. } => into.extend(args),
            ExprKind::Paren(inner) | ExprKind::UnaryMinus(inner) => into.push(*inner),
            ExprKind::BinaryOp { left, right, .. } => {
                into.push(*left);
                into.push(*right);
            }
            ExprKind::Literal(_) | ExprKind::ColumnRef(_) | ExprKind::Error => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(offset: usize) -> Expr {
        Expr::new(
            ExprKind::Literal(Literal {
                kind: LiteralKind::Integer,
                text: "1".to_string(),
            }),
            Span::new(offset, offset + 1),
        )
    }

    #[test]
    fn test_long_chain_drops_without_recursion() {
        let mut expr = one(0);
        for i in 1..200_000 {
            expr = Expr::binary(BinOp::Add, expr, one(i * 2));
        }
        assert!(!expr.contains_error());
        drop(expr);
    }

    #[test]
    fn test_contains_error_finds_nested_error() {
        let call = Expr::new(
            ExprKind::FunctionCall {
                name: "F".to_string(),
                args: vec![one(2), Expr::error(Span::new(4, 5))],
            },
            Span::new(0, 6),
        );
        let expr = Expr::binary(BinOp::Multiply, one(8), call);
        assert!(expr.contains_error());
    }
}
