//! # Expression Language - Tokens and Syntax Tree
//!
//! This module defines the lexical tokens and the syntax tree for the formula
//! expression language: bracketed column references, literals, uppercase
//! function calls and infix operators.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Positioned tokens produced by the lexer
//! - **[expressions]** - Expression nodes built by the parser
//! - **[operators]** - Binary operators and their precedence
//!
//! ## Quick Start
//!
//! ```text
//! AND([age] > 18, OR([status] == 'active', [status] == 'premium'))
//! ```
//!
//! This expression checks that a record is an adult with an active or
//! premium status.
//!
//! ## Core Concepts
//!
//! ### Column References
//!
//! Data fields are always written in brackets: `[age]`, `[first_name]`.
//! A bare word such as `age` is not a column reference and is rejected.
//!
//! ### Functions
//!
//! Function names are uppercase and immediately followed by an argument
//! list: `SUM([price])`, `NOW()`, `MAX([a], [b], 10)`.
//!
//! ### Operators
//!
//! From lowest to highest precedence:
//!
//! | Level          | Operators                          | Associativity |
//! |----------------|------------------------------------|---------------|
//! | Logical OR     | `\|\|`, `OR`                       | left          |
//! | Logical AND    | `&&`, `AND`                        | left          |
//! | Comparison     | `==` `!=` `<` `<=` `>` `>=`        | left          |
//! | Additive       | `+` `-`                            | left          |
//! | Multiplicative | `*` `/` `%`                        | left          |
//! | Power          | `^`                                | right         |
//! | Unary          | `-`                                | prefix        |
//!
//! ### Literals
//!
//! ```text
//! 'single' "double" 'It''s' "say \"hi\""   // strings
//! 42 3.14 1.5e-3 2E10                       // numbers
//! true FALSE                                // booleans, any case
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, ExprKind, Literal, LiteralKind};
pub use operators::BinOp;
pub use tokens::{Span, Token, TokenType};
