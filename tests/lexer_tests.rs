// tests/lexer_tests.rs

use expression_analyzer::ast::{Token, TokenType};
use expression_analyzer::error::SyntaxErrorKind;
use expression_analyzer::lexer::Lexer;

fn significant(input: &str) -> Vec<Token> {
    Lexer::tokenize(input)
        .0
        .into_iter()
        .filter(|t| !t.is_trivia() && !t.is(TokenType::Eof))
        .collect()
}

fn single(input: &str) -> Token {
    let tokens = significant(input);
    assert_eq!(tokens.len(), 1, "expected one token for {input:?}, got {tokens:?}");
    tokens.into_iter().next().unwrap()
}

fn error_kinds(input: &str) -> Vec<SyntaxErrorKind> {
    Lexer::tokenize(input).1.into_iter().map(|e| e.kind).collect()
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_literal_tokens() {
    let test_cases = vec![
        ("'active'", TokenType::String),
        ("\"active\"", TokenType::String),
        ("''", TokenType::String),
        ("'It''s'", TokenType::String),
        (r#""say \"hi\"""#, TokenType::String),
        (r"'a\\'", TokenType::String),
        ("0", TokenType::Integer),
        ("18", TokenType::Integer),
        ("3.14", TokenType::Float),
        ("1.5e-3", TokenType::Float),
        ("2E10", TokenType::Float),
        ("6e+2", TokenType::Float),
        ("true", TokenType::Boolean),
        ("FALSE", TokenType::Boolean),
        ("True", TokenType::Boolean),
    ];

    for (input, expected) in test_cases {
        let token = single(input);
        assert_eq!(token.token_type, expected, "Failed for input: {}", input);
        assert_eq!(token.text, input);
        assert!(token.is_valid);
    }
}

#[test]
fn test_string_keeps_other_quote_style() {
    let token = single(r#""It's""#);
    assert_eq!(token.token_type, TokenType::String);

    let token = single(r#"'say "hi"'"#);
    assert_eq!(token.token_type, TokenType::String);
}

#[test]
fn test_unterminated_string_runs_to_end() {
    let (tokens, errors) = Lexer::tokenize("[a] == 'open + 1");
    let error_token = tokens.iter().find(|t| t.is(TokenType::Error)).unwrap();
    assert_eq!(error_token.text, "'open + 1");
    assert_eq!(error_token.end, 16);
    assert!(!error_token.is_valid);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::UnterminatedString);
    assert_eq!((errors[0].start, errors[0].end), (7, 16));
}

#[test]
fn test_escaped_quote_at_end_is_unterminated() {
    assert_eq!(error_kinds(r"'abc\'"), vec![SyntaxErrorKind::UnterminatedString]);
}

#[test]
fn test_number_edge_cases() {
    // Exponent without digits is not part of the number
    let types: Vec<TokenType> = significant("1e").iter().map(|t| t.token_type).collect();
    assert_eq!(types, vec![TokenType::Error]);

    // Trailing dot leaves the dot behind
    let tokens = significant("1.");
    assert_eq!(tokens[0].token_type, TokenType::Integer);
    assert_eq!(tokens[1].token_type, TokenType::Error);
    assert_eq!(tokens[1].text, ".");
}

#[test]
fn test_invalid_number() {
    let token = single("123abc");
    assert_eq!(token.token_type, TokenType::Error);
    assert_eq!(token.text, "123abc");
    assert_eq!(error_kinds("123abc"), vec![SyntaxErrorKind::InvalidNumber]);
}

// ============================================================================
// Column References
// ============================================================================

#[test]
fn test_column_references() {
    let test_cases = vec!["[age]", "[first_name]", "[_id]", "[q4_total]", "[A1]"];

    for input in test_cases {
        let token = single(input);
        assert_eq!(token.token_type, TokenType::ColumnReference, "Failed for input: {}", input);
        assert_eq!(token.text, input);
        assert!(token.is_valid);
    }
}

#[test]
fn test_unclosed_column_reference() {
    let (tokens, errors) = Lexer::tokenize("[age > 18");

    assert_eq!(tokens[0].token_type, TokenType::ColumnReference);
    assert_eq!(tokens[0].text, "[age");
    assert!(!tokens[0].is_valid);

    // Lexing continues after the name
    let rest: Vec<TokenType> = tokens[1..]
        .iter()
        .filter(|t| !t.is_trivia())
        .map(|t| t.token_type)
        .collect();
    assert_eq!(
        rest,
        vec![TokenType::Operator, TokenType::Integer, TokenType::Eof]
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::UnclosedColumnReference);
    assert_eq!((errors[0].start, errors[0].end), (0, 4));
    assert!(errors[0].message.contains("']'"));
}

#[test]
fn test_brackets_without_column_name() {
    let test_cases = vec![
        ("[]", vec![TokenType::LeftBracket, TokenType::RightBracket]),
        (
            "[ age ]",
            vec![TokenType::LeftBracket, TokenType::Error, TokenType::RightBracket],
        ),
        (
            "[123]",
            vec![TokenType::LeftBracket, TokenType::Integer, TokenType::RightBracket],
        ),
        ("]", vec![TokenType::RightBracket]),
    ];

    for (input, expected) in test_cases {
        let types: Vec<TokenType> = significant(input).iter().map(|t| t.token_type).collect();
        assert_eq!(types, expected, "Failed for input: {}", input);
    }
}

// ============================================================================
// Words: functions, booleans, keyword operators, bare identifiers
// ============================================================================

#[test]
fn test_function_names() {
    let test_cases = vec!["SUM(", "NOW (", "sum(", "AND(", "OR  ("];

    for input in test_cases {
        let token = &significant(input)[0];
        assert_eq!(token.token_type, TokenType::Function, "Failed for input: {}", input);
    }
}

#[test]
fn test_keyword_operators() {
    let test_cases = vec!["[a] AND [b]", "[a] and [b]", "[a] OR [b]", "[a] Or [b]"];

    for input in test_cases {
        let token = &significant(input)[1];
        assert_eq!(token.token_type, TokenType::Operator, "Failed for input: {}", input);
    }
}

#[test]
fn test_keyword_before_group_after_operand() {
    let types: Vec<TokenType> = significant("[a] > 1 AND ([b] < 2)")
        .iter()
        .map(|t| t.token_type)
        .collect();
    assert_eq!(types[3], TokenType::Operator);
    assert_eq!(types[4], TokenType::LeftParen);
}

#[test]
fn test_bare_identifier() {
    let (tokens, errors) = Lexer::tokenize("age > 18");
    assert_eq!(tokens[0].token_type, TokenType::Error);
    assert_eq!(tokens[0].text, "age");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::BareIdentifier);
    assert!(errors[0].message.contains("[age]"));
}

// ============================================================================
// Operators and delimiters
// ============================================================================

#[test]
fn test_operators_longest_match() {
    let test_cases = vec![
        "==", "!=", "<=", ">=", "&&", "||", "<", ">", "+", "-", "*", "/", "%", "^",
    ];

    for input in test_cases {
        let token = single(input);
        assert_eq!(token.token_type, TokenType::Operator, "Failed for input: {}", input);
        assert_eq!(token.text, input);
    }

    let texts: Vec<String> = significant("<==").into_iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["<=", "="]);
}

#[test]
fn test_lone_operator_characters() {
    let test_cases = vec![("=", "'=='"), ("!", "'!='"), ("&", "'&&'"), ("|", "'||'")];

    for (input, hint) in test_cases {
        let (tokens, errors) = Lexer::tokenize(input);
        assert_eq!(tokens[0].token_type, TokenType::Error, "Failed for input: {}", input);
        assert_eq!(errors[0].kind, SyntaxErrorKind::UnexpectedCharacter);
        assert!(errors[0].message.contains(hint), "missing hint for {input}");
    }
}

#[test]
fn test_delimiters() {
    let types: Vec<TokenType> = significant("F(1, 2)").iter().map(|t| t.token_type).collect();
    assert_eq!(
        types,
        vec![
            TokenType::Function,
            TokenType::LeftParen,
            TokenType::Integer,
            TokenType::Comma,
            TokenType::Integer,
            TokenType::RightParen,
        ]
    );
}

#[test]
fn test_unexpected_characters() {
    for input in ["#", "@", "$", "é", "{", ";"] {
        let (tokens, errors) = Lexer::tokenize(input);
        assert_eq!(tokens.len(), 2, "Failed for input: {}", input);
        assert_eq!(tokens[0].token_type, TokenType::Error);
        assert_eq!(tokens[0].text, input);
        assert_eq!(errors[0].kind, SyntaxErrorKind::UnexpectedCharacter);
    }
}

// ============================================================================
// Positions and coverage
// ============================================================================

#[test]
fn test_whitespace_runs() {
    let (tokens, _) = Lexer::tokenize("1 \t\n 2");
    assert_eq!(tokens[1].token_type, TokenType::Whitespace);
    assert_eq!(tokens[1].text, " \t\n ");
    assert_eq!(tokens.len(), 4);
}

#[test]
fn test_line_and_column() {
    let (tokens, _) = Lexer::tokenize("[a] +\n  'é' + [b]");
    let significant: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();

    let positions: Vec<(&str, usize, usize)> = significant
        .iter()
        .map(|t| (t.text.as_str(), t.line, t.column))
        .collect();
    assert_eq!(
        positions,
        vec![
            ("[a]", 1, 1),
            ("+", 1, 5),
            ("'é'", 2, 3),
            ("+", 2, 7),
            ("[b]", 2, 9),
            ("", 2, 12),
        ]
    );

    // Byte offsets account for the two-byte 'é'
    assert_eq!(significant[3].start, 13);
}

#[test]
fn test_tokens_cover_input() {
    let inputs = vec![
        "AND([age] > 18, OR([status] == 'active', [status] == 'premium'))",
        "[age > 18 #",
        "  'unterminated",
        "12abc + [x",
        "",
    ];

    for input in inputs {
        let (tokens, _) = Lexer::tokenize(input);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, input);

        let eof = tokens.last().unwrap();
        assert_eq!(eof.token_type, TokenType::Eof);
        assert_eq!((eof.start, eof.end), (input.len(), input.len()));
    }
}

#[test]
fn test_iterator_yields_single_eof() {
    let tokens: Vec<Token> = Lexer::new("1").collect();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].token_type, TokenType::Eof);
}
