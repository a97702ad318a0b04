// tests/parser_tests.rs

use aggfn_lang::ast::{FunctionDef, Interval, TimeUnit, TokenKind};
use aggfn_lang::functions::{ExtractTarget, FunctionKind};
use aggfn_lang::lexer::{LexError, Lexer};
use aggfn_lang::metrics::GaugeKind;
use aggfn_lang::parser::{FunctionRegistry, ParseError, Parser};
use aggfn_lang::{TypeTag, parse, parse_definition};

// ============================================================================
// Built-in Functions
// ============================================================================

#[test]
fn test_max_and_min() {
    for (formula, kind) in [("max()", FunctionKind::Max), ("min()", FunctionKind::Min)] {
        let function = parse(formula).unwrap();
        assert_eq!(function.kind(), kind);
        assert_eq!(function.arity(), 0);
        assert_eq!(function.return_type(), TypeTag::Double);
    }
}

#[test]
fn test_sum_with_and_without_comma() {
    let expected = FunctionDef::Sum {
        interval: Interval::new(10, TimeUnit::Seconds),
    };
    assert_eq!(parse_definition("sum(10, sec)").unwrap(), expected);
    assert_eq!(parse_definition("sum(10 sec)").unwrap(), expected);
    assert_eq!(parse_definition("sum(10,sec)").unwrap(), expected);
}

#[test]
fn test_avg() {
    assert_eq!(
        parse_definition("avg(5, m)").unwrap(),
        FunctionDef::Average {
            interval: Interval::new(5, TimeUnit::Minutes)
        }
    );
}

#[test]
fn test_percentile() {
    assert_eq!(
        parse_definition("percentile(90,1,m)").unwrap(),
        FunctionDef::Percentile {
            percentile: 90,
            interval: Interval::new(1, TimeUnit::Minutes)
        }
    );
    assert_eq!(
        parse_definition("percentile(50, 2 h)").unwrap(),
        FunctionDef::Percentile {
            percentile: 50,
            interval: Interval::new(2, TimeUnit::Hours)
        }
    );
}

#[test]
fn test_correl() {
    assert_eq!(
        parse_definition("correl($requests)").unwrap(),
        FunctionDef::Correlation {
            operand: "requests".to_string()
        }
    );
    let function = parse("correl( $ requests )").unwrap();
    assert_eq!(function.arity(), 1);
    assert_eq!(function.return_type(), TypeTag::Double);
}

#[test]
fn test_time_unit_synonyms() {
    let test_cases = vec![
        ("s", TimeUnit::Seconds),
        ("sec", TimeUnit::Seconds),
        ("seconds", TimeUnit::Seconds),
        ("ms", TimeUnit::Milliseconds),
        ("millis", TimeUnit::Milliseconds),
        ("ns", TimeUnit::Nanoseconds),
        ("nanos", TimeUnit::Nanoseconds),
        ("m", TimeUnit::Minutes),
        ("minutes", TimeUnit::Minutes),
        ("h", TimeUnit::Hours),
        ("hours", TimeUnit::Hours),
        ("d", TimeUnit::Days),
        ("days", TimeUnit::Days),
    ];

    for (unit, expected) in test_cases {
        let formula = format!("sum(3, {})", unit);
        assert_eq!(
            parse_definition(&formula).unwrap(),
            FunctionDef::Sum {
                interval: Interval::new(3, expected)
            },
            "Failed for unit: {}",
            unit
        );
    }
}

#[test]
fn test_extract_paths() {
    assert_eq!(
        parse_definition("extract_double(memory, used)").unwrap(),
        FunctionDef::Extract {
            target: ExtractTarget::Double,
            path: vec!["memory".to_string(), "used".to_string()]
        }
    );
    assert_eq!(
        parse("extract_int(count)").unwrap().return_type(),
        TypeTag::Int
    );
    assert_eq!(
        parse("extract_string(name)").unwrap().return_type(),
        TypeTag::String
    );
}

#[test]
fn test_recorders() {
    assert_eq!(parse_definition("flag()").unwrap(), FunctionDef::Flag);
    assert_eq!(
        parse_definition("gauge_fp()").unwrap(),
        FunctionDef::Gauge(GaugeKind::Fp)
    );
    assert_eq!(
        parse_definition("ranged_gauge_int(0, 100)").unwrap(),
        FunctionDef::Gauge(GaugeKind::RangedInt {
            lower: 0,
            upper: 100
        })
    );
    let gauge = parse("ranged_gauge_fp(1, 5)").unwrap();
    assert_eq!(gauge.kind(), FunctionKind::RangedGaugeFp);
    assert_eq!(gauge.return_type(), TypeTag::Composite);
}

// ============================================================================
// Canonical Text
// ============================================================================

#[test]
fn test_display_is_canonical_and_reparses() {
    let test_cases = vec![
        ("max( )", "max()"),
        ("avg( 5 ,seconds )", "avg(5, sec)"),
        ("sum(10 millis)", "sum(10, ms)"),
        ("percentile(90,1,minutes)", "percentile(90, 1, m)"),
        ("correl( $ x )", "correl($x)"),
        ("extract_int(a,b,c)", "extract_int(a, b, c)"),
        ("ranged_gauge_fp(0,10)", "ranged_gauge_fp(0, 10)"),
    ];

    for (input, canonical) in test_cases {
        let def = parse_definition(input).unwrap();
        assert_eq!(def.to_string(), canonical);
        assert_eq!(parse_definition(canonical).unwrap(), def);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_function() {
    let err = parse_definition("bogus()").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownFunction {
            name: "bogus".to_string(),
            position: 0
        }
    );
    assert!(err.to_string().contains("bogus"));
}

#[test]
fn test_unknown_time_unit() {
    let err = parse_definition("sum(1,xyz)").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownTimeUnit {
            unit: "xyz".to_string(),
            position: 6
        }
    );
    assert!(err.to_string().contains("xyz"));
}

#[test]
fn test_expression_that_is_not_a_function() {
    assert_eq!(
        parse_definition("42").unwrap_err(),
        ParseError::ExpectedFunction {
            found: "42".to_string()
        }
    );
    let err = parse_definition("$load").unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected function definition but found expression $load"
    );
}

#[test]
fn test_leading_punctuation() {
    assert!(matches!(
        parse_definition("(max)").unwrap_err(),
        ParseError::UnexpectedToken { position: 0, .. }
    ));
}

#[test]
fn test_empty_formula() {
    assert_eq!(
        parse_definition("").unwrap_err(),
        ParseError::Lex(LexError::UnexpectedEnd {
            expected: TokenKind::Name,
            position: 0
        })
    );
}

#[test]
fn test_unterminated_parameters() {
    assert_eq!(
        parse_definition("max(").unwrap_err(),
        ParseError::Lex(LexError::UnexpectedEnd {
            expected: TokenKind::RightBracket,
            position: 4
        })
    );
}

#[test]
fn test_unexpected_parameter() {
    match parse_definition("max(1)").unwrap_err() {
        ParseError::Lex(LexError::UnexpectedToken {
            expected, position, ..
        }) => {
            assert_eq!(expected, TokenKind::RightBracket);
            assert_eq!(position, 4);
        }
        other => panic!("Expected UnexpectedToken, got {:?}", other),
    }
}

#[test]
fn test_trailing_input() {
    assert!(matches!(
        parse_definition("max() min()").unwrap_err(),
        ParseError::UnexpectedToken { position: 6, .. }
    ));
}

#[test]
fn test_correl_requires_dollar() {
    assert!(matches!(
        parse_definition("correl(other)").unwrap_err(),
        ParseError::Lex(LexError::UnexpectedToken {
            expected: TokenKind::Dollar,
            ..
        })
    ));
}

#[test]
fn test_percentile_out_of_range() {
    assert!(matches!(
        parse_definition("percentile(101, 1, m)").unwrap_err(),
        ParseError::InvalidArgument { position: 11, .. }
    ));
}

#[test]
fn test_integer_overflow() {
    assert!(matches!(
        parse_definition("sum(99999999999999999999999, sec)").unwrap_err(),
        ParseError::InvalidInteger { position: 4, .. }
    ));
}

#[test]
fn test_extract_needs_a_field() {
    assert!(parse_definition("extract_double()").is_err());
    assert!(parse_definition("extract_double(a,)").is_err());
}

#[test]
fn test_lex_error_surfaces_through_parser() {
    assert!(matches!(
        parse_definition("avg(5.5, sec)").unwrap_err(),
        ParseError::Lex(LexError::UnexpectedCharacter { ch: '.', .. })
    ));
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_alias() {
    let mut registry = FunctionRegistry::builtin();
    registry.register("average", |p| {
        p.interval_parameters()
            .map(|interval| FunctionDef::Average { interval })
    });

    let mut parser = Parser::with_registry(Lexer::new("average(5, s)"), &registry);
    assert_eq!(
        parser.parse().unwrap(),
        FunctionDef::Average {
            interval: Interval::new(5, TimeUnit::Seconds)
        }
    );
}

#[test]
fn test_empty_registry_knows_nothing() {
    let registry = FunctionRegistry::empty();
    let mut parser = Parser::with_registry(Lexer::new("max()"), &registry);
    assert!(matches!(
        parser.parse().unwrap_err(),
        ParseError::UnknownFunction { .. }
    ));
}

#[test]
fn test_builtin_names() {
    let registry = FunctionRegistry::builtin();
    for name in ["max", "min", "sum", "avg", "percentile", "correl"] {
        assert!(registry.contains(name), "Missing builtin: {}", name);
    }
    let names = registry.names();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}
