//! Documentation content for the exprcheck CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Functions,
    Literals,
    Columns,
    Errors,
}

impl DocCategory {
    pub const ALL: [DocCategory; 6] = [
        DocCategory::Syntax,
        DocCategory::Operators,
        DocCategory::Functions,
        DocCategory::Literals,
        DocCategory::Columns,
        DocCategory::Errors,
    ];

    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" | "precedence" => Some(Self::Operators),
            "functions" | "function" | "calls" => Some(Self::Functions),
            "literals" | "literal" | "strings" | "numbers" => Some(Self::Literals),
            "columns" | "column" | "column_references" => Some(Self::Columns),
            "errors" | "error" | "diagnostics" => Some(Self::Errors),
            _ => None,
        }
    }

    pub fn content(self) -> &'static str {
        match self {
            DocCategory::Syntax => SYNTAX_DOC,
            DocCategory::Operators => OPERATORS_DOC,
            DocCategory::Functions => FUNCTIONS_DOC,
            DocCategory::Literals => LITERALS_DOC,
            DocCategory::Columns => COLUMNS_DOC,
            DocCategory::Errors => ERRORS_DOC,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"EXPRESSION DOCUMENTATION

Expressions are single formulas over named columns. They combine bracketed
column references, literals, uppercase function calls and infix operators:

  AND([age] > 18, OR([status] == 'active', [status] == 'premium'))

DOCUMENTATION CATEGORIES

  syntax            Overall shape of an expression and whitespace rules
  operators         Arithmetic, comparison and logical operators, precedence
  functions         Function call syntax and naming rules
  literals          Strings, numbers and booleans
  columns           Column reference syntax
  errors            Diagnostics reported by 'exprcheck check'

QUICK REFERENCE

  [column]          Column reference
  'text' "text"     String literal
  42 3.14 1e-3      Numbers
  true false        Booleans
  FUNC(a, b)        Function call
  + - * / % ^       Arithmetic
  == != < <= > >=   Comparison
  && || AND OR      Logical

Run 'exprcheck doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    DocCategory::from_str(name)
        .map(DocCategory::content)
        .ok_or_else(|| CliError::UnknownCategory(name.to_string()))
}

const SYNTAX_DOC: &str = r#"SYNTAX - Shape of an Expression

An expression is exactly one formula. Nothing may follow it:

  [price] * [quantity]          valid
  [price] * [quantity] [tax]    error: unexpected column reference after end of expression

OPERANDS
  [column]        Column reference
  'text'          String
  12  1.5  2e3    Numbers
  true  FALSE     Booleans
  NAME(...)       Function call
  ( ... )         Grouping

WHITESPACE
  Spaces, tabs and newlines may appear between any two tokens and are
  ignored. They may not appear inside a column reference: '[ age ]' is
  rejected.

POSITIONS
  Diagnostics report 1-based line and column numbers. Columns count
  characters, so non-ASCII text in strings does not shift them.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Arithmetic, Comparison, Logical

PRECEDENCE (lowest to highest)
  || OR                 logical or            left associative
  && AND                logical and           left associative
  == != < <= > >=       comparison            left associative
  + -                   additive              left associative
  * / %                 multiplicative        left associative
  ^                     power                 right associative
  -                     unary minus           prefix

  Examples:
    [a] + [b] * 2        means  [a] + ([b] * 2)
    2 ^ 3 ^ 2            means  2 ^ (3 ^ 2)
    -[a] ^ 2             means  (-[a]) ^ 2
    [a] > 1 AND [b] < 2  means  ([a] > 1) && ([b] < 2)

KEYWORD OPERATORS
  AND and OR are accepted in any letter case. Directly followed by '(' at
  the start of an operand they are function calls instead:

    AND([a] > 1, [b] < 2)     function call
    [a] > 1 AND ([b] < 2)     infix operator

COMMON MISTAKES
  [a] = 1      error: unexpected '=' (did you mean '=='?)
  [a] & [b]    error: unexpected '&' (did you mean '&&'?)
  1 + + 2      error: missing operand between '+' and '+'
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS - Call Syntax

  NAME(argument, argument, ...)

    Function names are uppercase letters, digits and underscores, starting
    with a letter: SUM, DATE_DIFF, LOG10. Any expression may be passed as an
    argument, including other calls.

    Examples:
      NOW()
      SUM([price])
      IF([qty] > 0, [price] / [qty], 0)
      ROUND(AVG([a], [b]), 2)

  Whitespace between the name and '(' is allowed: 'SUM ([a])'.

  Function names are not checked against a catalogue; only their spelling
  and the shape of the argument list are validated.

ERRORS
  sum([a])        function names must be uppercase
  SUM([a],)       trailing comma
  SUM(, [a])      missing argument
  SUM([a]         missing ')' for function call 'SUM'
"#;

const LITERALS_DOC: &str = r#"LITERALS - Strings, Numbers, Booleans

STRINGS
  'single'  "double"

  Escapes:
    \'  \"  \\  \n   backslash followed by any character
    'It''s'          a doubled quote inside the same quote style

  A string without its closing quote is reported from the opening quote to
  the end of the input.

NUMBERS
  42              integer
  3.14            decimal
  1.5e-3  2E10    exponent

  Digits running into letters are rejected: '123abc'.

BOOLEANS
  true  false  TRUE  False      any letter case
"#;

const COLUMNS_DOC: &str = r#"COLUMNS - Column References

  [name]

    Names start with a letter or underscore and continue with letters,
    digits and underscores: [age], [first_name], [_id], [q4_total].

    Examples:
      [age] >= 18
      [first_name] == 'Ada'

  Bare names are not column references:

    age > 18        error: column references must be enclosed in brackets

ERRORS
  [age > 18       missing closing bracket ']' for column reference 'age'
  []              empty column reference
  [123]           expected a column name after '['
  [ age ]         expected a column name after '['
"#;

const ERRORS_DOC: &str = r#"ERRORS - Diagnostics

'exprcheck check' lists every problem it finds, not just the first one,
ordered by position:

  $ exprcheck check "invalid expression >"
  1:1: Unexpected identifier 'invalid': column references must be enclosed in brackets, e.g. [invalid]
  ...

Each diagnostic has a kind (shown by 'exprcheck check --json'):

  LEXICAL
    unexpected_character        character no rule accepts
    unterminated_string         missing closing quote
    invalid_number              digits followed by letters
    unclosed_column_reference   '[name' without ']'
    bare_identifier             name outside brackets

  STRUCTURAL
    unexpected_token            token where it cannot appear
    missing_operand             operator without an operand
    unexpected_eof              input ended too early
    unmatched_paren             ')' without '('
    unclosed_paren              '(' without ')'
    unmatched_bracket           ']' without '['
    invalid_column_reference    '[' not followed by a name
    empty_parentheses           '()'
    trailing_comma              'F(a,)'
    missing_argument            'F(,a)'
    invalid_function_name       lowercase function name
    empty_expression            nothing to analyze

  LIMITS
    nesting_too_deep            more nested groups than 'max_depth'
    lexer_stalled               internal scanner failure

EXIT CODES
  0   expression is valid
  1   expression is invalid, or the command failed
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_resolves() {
        for category in DocCategory::ALL {
            assert!(!category.content().is_empty());
        }
        assert_eq!(DocCategory::from_str("OPS"), Some(DocCategory::Operators));
        assert_eq!(
            DocCategory::from_str("column-references"),
            Some(DocCategory::Columns)
        );
    }

    #[test]
    fn unknown_category_is_an_error() {
        let err = get_doc_category("tutorial").unwrap_err();
        assert!(err.to_string().contains("'tutorial'"));
    }
}
