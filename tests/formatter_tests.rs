// tests/formatter_tests.rs

use expression_analyzer::{AnalyzerConfig, Analyzer, FormatOptions, Formatter};

fn format_with(options: FormatOptions, input: &str) -> String {
    Formatter::new(options).format(input)
}

fn narrow(max_line_length: usize) -> FormatOptions {
    FormatOptions::default().with_max_line_length(max_line_length)
}

// ============================================================================
// Spacing
// ============================================================================

#[test]
fn test_operator_spacing() {
    let test_cases = vec![
        ("[a]+[b]*2", "[a] + [b] * 2"),
        ("[a]<[b]&&[c]>=[d]", "[a] < [b] && [c] >= [d]"),
        ("[a]||[b]&&[c]", "[a] || [b] && [c]"),
        ("[a]^2+[b]^3", "[a] ^ 2 + [b] ^ 3"),
        ("-[a]+[b]", "-[a] + [b]"),
        ("[a]==[b]&&[c]!=[d]", "[a] == [b] && [c] != [d]"),
        ("[a]^[b]^[c]", "[a] ^ [b] ^ [c]"),
        ("-[a]+[b]^2/([c]-[d])*[e]", "-[a] + [b] ^ 2 / ([c] - [d]) * [e]"),
        ("123+456", "123 + 456"),
        ("1e5+2E-3", "1e5 + 2E-3"),
        ("-123+-4.56", "-123 + -4.56"),
        ("'single'==[column]", "'single' == [column]"),
        ("true&&false||[column]", "true && false || [column]"),
        ("[Column_Name]+[another_column]", "[Column_Name] + [another_column]"),
    ];

    let formatter = Formatter::default();
    for (input, expected) in test_cases {
        assert_eq!(formatter.format(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_function_calls_single_line() {
    let test_cases = vec![
        ("FUNC([a])", "FUNC([a])"),
        ("FUNC([a],[b],[c])", "FUNC([a], [b], [c])"),
        (
            "FUNC([column1],[column2],123,\"text\")",
            "FUNC([column1], [column2], 123, \"text\")",
        ),
        ("FUNC  ([a],[b])", "FUNC([a], [b])"),
        (
            "SUM(MIN([a],[b]),MAX([c],[d]),[e])",
            "SUM(MIN([a], [b]), MAX([c], [d]), [e])",
        ),
        ("[a]+FUNC([b],[c])*[d]", "[a] + FUNC([b], [c]) * [d]"),
        ("NOW()", "NOW()"),
        ("FUNC(-1,-2.5,[a])", "FUNC(-1, -2.5, [a])"),
        ("FUNC([a] ,  [b]  ,   [c] )", "FUNC([a], [b], [c])"),
        ("FUNC(\"\",'',[column])", "FUNC(\"\", '', [column])"),
    ];

    let formatter = Formatter::default();
    for (input, expected) in test_cases {
        assert_eq!(formatter.format(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_parentheses_preserved() {
    let test_cases = vec![
        ("((([a]+[b]))*([c]))", "((([a] + [b])) * ([c]))"),
        ("([a]+[b])*[c]", "([a] + [b]) * [c]"),
        ("( [a] + [b] )", "([a] + [b])"),
        ("FUNC( [a], [b] )", "FUNC([a], [b])"),
    ];

    let formatter = Formatter::default();
    for (input, expected) in test_cases {
        assert_eq!(formatter.format(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_keyword_operators_become_symbols() {
    assert_eq!(
        Formatter::default().format("[a] > 1 and ([b] < 2) OR [c]"),
        "[a] > 1 && ([b] < 2) || [c]"
    );
}

// ============================================================================
// Argument list breaking
// ============================================================================

#[test]
fn test_long_call_breaks_arguments() {
    let input = "FUNC([column1],[column2],[column3],\"long string value\",123)";
    let expected = "FUNC(
  [column1],
  [column2],
  [column3],
  \"long string value\",
  123
)";
    assert_eq!(format_with(narrow(30), input), expected);
}

#[test]
fn test_nested_calls_break_independently() {
    let input = "FUNC(SUM([a],[b]),MAX([c],[d],[e]),[f])";
    let expected = "FUNC(
  SUM([a], [b]),
  MAX([c], [d], [e]),
  [f]
)";
    assert_eq!(format_with(narrow(30), input), expected);

    let input =
        "CALC(SUM([sales],[tax]),AVG([price],[discount],[quantity]),FILTER([region],\"APAC\"))";
    let expected = "CALC(
  SUM([sales], [tax]),
  AVG(
    [price],
    [discount],
    [quantity]
  ),
  FILTER([region], \"APAC\")
)";
    assert_eq!(format_with(narrow(30), input), expected);
}

#[test]
fn test_deeply_nested_calls() {
    let input = "CALC(SUM(MIN([a],[b]),MIN([c],[d])),MAX(MIN([e],[f]),MIN([g],[h])),[i])";
    let expected = "CALC(
  SUM(
    MIN([a], [b]),
    MIN([c], [d])
  ),
  MAX(
    MIN([e], [f]),
    MIN([g], [h])
  ),
  [i]
)";
    assert_eq!(format_with(narrow(30), input), expected);
}

#[test]
fn test_call_exactly_at_limit_stays_inline() {
    // 51 columns wide with the closing paren
    let input = "CALCULATE([sales],[tax],[discount],[commission])";
    let expected = "CALCULATE(
  [sales],
  [tax],
  [discount],
  [commission]
)";
    assert_eq!(format_with(narrow(50), input), expected);
    assert_eq!(
        format_with(narrow(51), input),
        "CALCULATE([sales], [tax], [discount], [commission])"
    );
}

#[test]
fn test_single_argument_never_breaks() {
    let input = "ROUND([a_very_long_column_name_indeed])";
    assert_eq!(format_with(narrow(10), input), input);
}

#[test]
fn test_indent_size() {
    let options = FormatOptions::default()
        .with_indent_size(4)
        .with_max_line_length(20);
    assert_eq!(format_with(options.clone(), "FUNC([a],[b],[c])"), "FUNC([a], [b], [c])");
    assert_eq!(
        format_with(options, "FUNC([aa],[bb],[cc])"),
        "FUNC(\n    [aa],\n    [bb],\n    [cc]\n)"
    );
}

// ============================================================================
// Logical chain breaking
// ============================================================================

#[test]
fn test_break_before_logical_operators() {
    let test_cases = vec![
        (
            "[col1]+[col2]*3>10&&FUNC([col3],[col4])",
            "[col1] + [col2] * 3 > 10
  && FUNC([col3], [col4])",
        ),
        (
            "[a]+FUNC([b]*2,[c]/3)>[d]&&[e]!=[f]",
            "[a] + FUNC([b] * 2, [c] / 3) > [d]
  && [e] != [f]",
        ),
        (
            "[column1]+[column2]*3>10&&FUNC([col3],[col4])&&[column6]==\"value\"",
            "[column1] + [column2] * 3 > 10
  && FUNC([col3], [col4])
  && [column6] == \"value\"",
        ),
        (
            "([column1]+[column2])*3>10&&(FUNC([col3],[col4],[col5])||[column6]==\"value\")&&[column7]<100",
            "([column1] + [column2]) * 3 > 10
  && (FUNC([col3], [col4], [col5])
  || [column6] == \"value\")
  && [column7] < 100",
        ),
    ];

    let formatter = Formatter::default();
    for (input, expected) in test_cases {
        assert_eq!(formatter.format(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_short_logical_chain_stays_inline() {
    assert_eq!(
        Formatter::default().format("[a]>[b]&&[c]<[d]||[e]==[f]"),
        "[a] > [b] && [c] < [d] || [e] == [f]"
    );
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_compact_operators() {
    let options = FormatOptions::default()
        .with_space_around_ops(false)
        .with_max_line_length(80);
    assert_eq!(format_with(options.clone(), "[a] + [b] * [c]"), "[a]+[b]*[c]");
    assert_eq!(format_with(options, "[a] > 1 && [b]"), "[a]>1&&[b]");
}

#[test]
fn test_no_line_breaking() {
    let options = FormatOptions::default().with_break_long_expressions(false);
    let input = "[column1]+[column2]*3>10&&FUNC([col3],[col4])&&[column6]==\"value\"";
    assert_eq!(
        format_with(options, input),
        "[column1] + [column2] * 3 > 10 && FUNC([col3], [col4]) && [column6] == \"value\""
    );
}

#[test]
fn test_options_deserialize_with_defaults() {
    let options: FormatOptions = serde_json::from_str(r#"{"indent_size": 4}"#).unwrap();
    assert_eq!(options.indent_size, 4);
    assert_eq!(options.max_line_length, 40);
    assert!(options.space_around_ops);
    assert!(options.break_long_expressions);
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_invalid_input_is_returned_unchanged() {
    let test_cases = vec!["", "   ", "([a]+[b]", "[a]++[b]", "age > 18", "sum([a])"];

    let formatter = Formatter::default();
    for input in test_cases {
        assert_eq!(formatter.format(input), input, "Failed for input: {:?}", input);
    }
}

#[test]
fn test_single_operands() {
    let formatter = Formatter::default();
    for input in ["[column]", "123", "\"text\"", "true"] {
        assert_eq!(formatter.format(input), input);
    }
}

#[test]
fn test_formatting_is_idempotent() {
    let inputs = vec![
        "[a]+FUNC([b]*2,[c]/3)>[d]&&[e]!=[f]",
        "CALC(SUM(MIN([a],[b]),MIN([c],[d])),MAX(MIN([e],[f]),MIN([g],[h])),[i])",
        "([column1]+[column2])*3>10&&(FUNC([col3],[col4],[col5])||[column6]==\"value\")&&[column7]<100",
    ];

    let formatter = Formatter::new(narrow(30));
    for input in inputs {
        let once = formatter.format(input);
        assert_eq!(formatter.format(&once), once, "Failed for input: {}", input);
    }
}

#[test]
fn test_formatter_uses_analyzer_config() {
    let analyzer = Analyzer::with_config(AnalyzerConfig::default().with_max_depth(1));
    let input = "(([a]))";

    // Too deep for this analyzer, so it is left alone
    assert_eq!(analyzer.format(input, &FormatOptions::default()), input);
    assert_eq!(Formatter::default().format("(( [a] ))"), "(([a]))");
}
