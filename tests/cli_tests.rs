// tests/cli_tests.rs

use aggfn_lang::cli::{
    CheckOptions, CliError, RunOptions, execute_check, execute_run, get_doc_category,
    get_docs_overview, json_to_value, value_to_json,
};
use aggfn_lang::{CompositeValue, FunctionKind, TypeTag, Value};
use serde_json::json;

fn run(formula: &str, input: &str) -> Result<Vec<serde_json::Value>, CliError> {
    execute_run(&RunOptions {
        formula: formula.to_string(),
        input: Some(input.to_string()),
        ..Default::default()
    })
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_report() {
    let report = execute_check(&CheckOptions {
        formula: "sum(10 seconds)".to_string(),
    })
    .unwrap();

    assert_eq!(report.kind, FunctionKind::Sum);
    assert_eq!(report.return_type, TypeTag::Double);
    assert_eq!(report.arity, 0);
    assert!(report.accepts.contains(&TypeTag::Long));
    assert!(!report.accepts.contains(&TypeTag::String));

    let text = report.to_string();
    assert!(text.contains("formula:  sum(10, sec)"));
    assert!(text.contains("returns:  double"));
}

#[test]
fn test_check_correl_arity() {
    let report = execute_check(&CheckOptions {
        formula: "correl($load)".to_string(),
    })
    .unwrap();
    assert_eq!(report.arity, 1);
}

#[test]
fn test_check_rejects_bad_formula() {
    let err = execute_check(&CheckOptions {
        formula: "median()".to_string(),
    })
    .unwrap_err();
    assert!(matches!(err, CliError::Parse(_)));
    assert!(err.to_string().contains("median"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_sum() {
    let results = run("sum(1, h)", "1\n2\n\n3.5\n").unwrap();
    assert_eq!(results, vec![json!(1.0), json!(3.0), json!(6.5)]);
}

#[test]
fn test_run_max() {
    let results = run("max()", "4\n-1\n9").unwrap();
    assert_eq!(results, vec![json!(4.0), json!(4.0), json!(9.0)]);
}

#[test]
fn test_run_extract() {
    let input = r#"{"memory": {"used": 512}}
{"memory": {"used": "1024"}}"#;
    let results = run("extract_int(memory, used)", input).unwrap();
    assert_eq!(results, vec![json!(512), json!(1024)]);
}

#[test]
fn test_run_flag_snapshot() {
    let results = run("flag()", "true\nfalse").unwrap();
    let last = results.last().unwrap();
    assert_eq!(last["flips"], json!(1));
    assert_eq!(last["value"], json!(false));
    assert_eq!(last["true_ratio"], json!(0.5));
}

#[test]
fn test_run_nan_is_null() {
    let results = run("correl($x)", "").unwrap();
    assert!(results.is_empty());

    let results = execute_run(&RunOptions {
        formula: "correl($x)".to_string(),
        input: Some("1".to_string()),
        operands: vec!["x=2".to_string()],
        ..Default::default()
    })
    .unwrap();
    assert_eq!(results, vec![serde_json::Value::Null]);
}

#[test]
fn test_run_with_operands() {
    let input = r#"{"sample": 1, "operands": {"x": 2}}
{"sample": 2, "operands": {"x": 4}}
{"sample": 3, "operands": {"x": 6}}"#;
    let results = execute_run(&RunOptions {
        formula: "correl($x)".to_string(),
        input: Some(input.to_string()),
        with_operands: true,
        ..Default::default()
    })
    .unwrap();

    let last = results.last().and_then(|v| v.as_f64()).unwrap();
    assert!((last - 1.0).abs() < 1e-9, "got {}", last);
}

#[test]
fn test_run_envelope_operands_do_not_carry_over() {
    let input = r#"{"sample": 1, "operands": {"x": 2}}
{"sample": 2}"#;
    let err = execute_run(&RunOptions {
        formula: "correl($x)".to_string(),
        input: Some(input.to_string()),
        with_operands: true,
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, CliError::Eval { line: 2, .. }));
}

#[test]
fn test_run_envelope_falls_back_to_bindings() {
    let input = r#"{"sample": 1, "operands": {"x": 5}}
{"sample": 2}
{"sample": 3}"#;
    let results = execute_run(&RunOptions {
        formula: "correl($x)".to_string(),
        input: Some(input.to_string()),
        operands: vec!["x=1".to_string()],
        with_operands: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(results.len(), 3);
    let last = results[2].as_f64().unwrap();
    assert!(last < 0.0, "got {}", last);
}

#[test]
fn test_run_rejects_sample_type() {
    let err = run("sum(1, h)", "1\n\"two\"").unwrap_err();
    match err {
        CliError::Rejected {
            line,
            function,
            found,
        } => {
            assert_eq!(line, 2);
            assert_eq!(function, FunctionKind::Sum);
            assert_eq!(found, "string");
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

#[test]
fn test_run_gauge_int_beyond_long_range() {
    let results = run("gauge_int()", "18446744073709551615\n7").unwrap();
    assert_eq!(results[0]["value"], json!(i64::MAX));
    assert_eq!(results[1]["value"], json!(7));
    assert_eq!(results[1]["max"], json!(i64::MAX));
}

#[test]
fn test_run_rejects_null_sample() {
    assert!(matches!(
        run("max()", "null").unwrap_err(),
        CliError::Rejected { line: 1, .. }
    ));
}

#[test]
fn test_run_eval_error_carries_line() {
    let err = run("extract_double(a)", "{\"a\": 1}\n{\"b\": 1}").unwrap_err();
    assert!(matches!(err, CliError::Eval { line: 2, .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_run_missing_operand() {
    assert!(matches!(
        run("correl($x)", "1").unwrap_err(),
        CliError::Eval { line: 1, .. }
    ));
}

#[test]
fn test_run_without_input() {
    let err = execute_run(&RunOptions {
        formula: "max()".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, CliError::NoInput));
}

#[test]
fn test_run_bad_binding() {
    let err = execute_run(&RunOptions {
        formula: "correl($x)".to_string(),
        input: Some("1".to_string()),
        operands: vec!["=3".to_string()],
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, CliError::Operand(_)));
}

#[test]
fn test_run_invalid_json() {
    assert!(matches!(run("max()", "{oops").unwrap_err(), CliError::Json(_)));
}

// ============================================================================
// conversion
// ============================================================================

#[test]
fn test_json_numbers() {
    assert_eq!(json_to_value(json!(3)).unwrap(), Value::Long(3));
    assert_eq!(json_to_value(json!(3.5)).unwrap(), Value::Double(3.5));
    assert_eq!(
        json_to_value(json!(u64::MAX)).unwrap(),
        Value::BigInt(i128::from(u64::MAX))
    );
}

#[test]
fn test_json_object_to_composite() {
    let value = json_to_value(json!({"a": {"b": true}})).unwrap();
    let inner = value
        .as_composite()
        .and_then(|c| c.get("a"))
        .and_then(Value::as_composite)
        .unwrap();
    assert_eq!(inner.get("b"), Some(&Value::Bool(true)));
}

#[test]
fn test_json_arrays() {
    let value = json_to_value(json!([1, 2, 3])).unwrap();
    assert_eq!(value.type_tag().map(|t| t.name()), Some("long[]".to_string()));

    let value = json_to_value(json!([1, 2.5])).unwrap();
    assert_eq!(value.type_name(), "double[]");

    assert!(matches!(
        json_to_value(json!([1, "x"])).unwrap_err(),
        CliError::Conversion(_)
    ));
}

#[test]
fn test_value_to_json() {
    let record = CompositeValue::new("gauge")
        .with_field("mean", f64::NAN)
        .with_field("count", 2_i64);
    assert_eq!(
        value_to_json(&Value::Composite(record)),
        json!({"mean": null, "count": 2})
    );
}

// ============================================================================
// docs
// ============================================================================

#[test]
fn test_docs() {
    assert!(get_docs_overview().contains("DOCUMENTATION CATEGORIES"));
    for category in ["syntax", "functions", "time-units", "types", "operands"] {
        assert!(get_doc_category(category).is_ok(), "Missing: {}", category);
    }
    assert!(get_doc_category("TIME_UNITS").unwrap().contains("millis"));
    assert!(matches!(
        get_doc_category("nope").unwrap_err(),
        CliError::UnknownCategory(_)
    ));
}
