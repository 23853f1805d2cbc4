//! Display-oriented syntax tree.
//!
//! [`ParseTreeNode`] flattens [`Expr`] into uniform nodes that carry their
//! source text, for editors and the `tree` CLI command.

use serde::Serialize;

use crate::{
    ast::{BinOp, Expr, ExprKind},
    error::SyntaxError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    /// Root of every tree
    Expression,
    Literal,
    ColumnReference,
    FunctionCall,
    ParenExpr,
    UnaryMinus,
    Power,
    /// `*`, `/` and `%`
    MulDiv,
    AddSub,
    Comparison,
    And,
    Or,
    Error,
}

impl NodeType {
    fn for_operator(op: BinOp) -> NodeType {
        match op {
            BinOp::Or => NodeType::Or,
            BinOp::And => NodeType::And,
            BinOp::Power => NodeType::Power,
            BinOp::Multiply | BinOp::Divide | BinOp::Modulo => NodeType::MulDiv,
            BinOp::Add | BinOp::Subtract => NodeType::AddSub,
            _ => NodeType::Comparison,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTreeNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Source text covered by the node.
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub children: Vec<ParseTreeNode>,
}

impl ParseTreeNode {
    /// Builds a tree rooted at an `Expression` node.
    pub fn from_expr(expr: &Expr, source: &str) -> ParseTreeNode {
        let child = Self::build(expr, source);
        ParseTreeNode {
            node_type: NodeType::Expression,
            text: child.text.clone(),
            start: child.start,
            end: child.end,
            children: vec![child],
        }
    }

    fn build(expr: &Expr, source: &str) -> ParseTreeNode {
        let (node_type, children) = match &expr.kind {
            ExprKind::Literal(_) => (NodeType::Literal, Vec::new()),
            ExprKind::ColumnRef(_) => (NodeType::ColumnReference, Vec::new()),
            ExprKind::FunctionCall { args, .. } => (
                NodeType::FunctionCall,
                args.iter().map(|arg| Self::build(arg, source)).collect(),
            ),
            ExprKind::Paren(inner) => (NodeType::ParenExpr, vec![Self::build(inner, source)]),
            ExprKind::UnaryMinus(inner) => (NodeType::UnaryMinus, vec![Self::build(inner, source)]),
            ExprKind::BinaryOp { op, .. } => {
                let node_type = NodeType::for_operator(*op);
                let children = chain_operands(expr, node_type)
                    .into_iter()
                    .map(|operand| Self::build(operand, source))
                    .collect();
                (node_type, children)
            }
            ExprKind::Error => (NodeType::Error, Vec::new()),
        };

        ParseTreeNode {
            node_type,
            text: source
                .get(expr.span.start..expr.span.end)
                .unwrap_or_default()
                .to_string(),
            start: expr.span.start,
            end: expr.span.end,
            children,
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ParseTreeNode::node_count).sum::<usize>()
    }
}

/// Operands of a left-associative run of same-level operators, in source
/// order: `[a] + [b] - [c]` yields `[a]`, `[b]`, `[c]`.
fn chain_operands(expr: &Expr, node_type: NodeType) -> Vec<&Expr> {
    let mut operands = Vec::new();
    let mut node = expr;
    while let ExprKind::BinaryOp { op, left, right } = &node.kind {
        if NodeType::for_operator(*op) != node_type {
            break;
        }
        operands.push(right.as_ref());
        node = left.as_ref();
    }
    operands.push(node);
    operands.reverse();
    operands
}

/// Tree (only for valid input) plus the diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseTreeResult {
    pub tree: Option<ParseTreeNode>,
    pub errors: Vec<SyntaxError>,
}
