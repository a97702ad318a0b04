// tests/extract_tests.rs

use aggfn_lang::functions::{AggregationFunction, EvalError, ExtractFunction, ExtractTarget};
use aggfn_lang::{CompositeValue, FunctionKind, TypeTag, Value, parse};
use rust_decimal::Decimal;

fn host_record() -> Value {
    let memory = CompositeValue::new("memory")
        .with_field("used", Value::Long(512))
        .with_field("ratio", Value::Double(0.75))
        .with_field("label", "heap")
        .with_field("limit", "2048")
        .with_field("note", "n/a")
        .with_field("spare", Value::Null);
    let host = CompositeValue::new("host")
        .with_field("name", "db-1")
        .with_field("up", true)
        .with_field("memory", memory);
    Value::Composite(host)
}

fn extract(formula: &str, sample: &Value) -> Result<Value, EvalError> {
    parse(formula).unwrap().eval_sample(sample)
}

#[test]
fn test_nested_path() {
    let record = host_record();
    assert_eq!(
        extract("extract_double(memory, used)", &record).unwrap(),
        Value::Double(512.0)
    );
    assert_eq!(
        extract("extract_int(memory, used)", &record).unwrap(),
        Value::Int(512)
    );
    assert_eq!(
        extract("extract_string(memory, label)", &record).unwrap(),
        Value::String("heap".to_string())
    );
    assert_eq!(
        extract("extract_string(memory, used)", &record).unwrap(),
        Value::String("512".to_string())
    );
}

#[test]
fn test_top_level_field() {
    assert_eq!(
        extract("extract_string(name)", &host_record()).unwrap(),
        Value::String("db-1".to_string())
    );
    assert_eq!(
        extract("extract_int(up)", &host_record()).unwrap(),
        Value::Int(1)
    );
}

#[test]
fn test_missing_field() {
    let err = extract("extract_double(memory, free)", &host_record()).unwrap_err();
    assert_eq!(
        err,
        EvalError::FieldNotFound {
            field: "free".to_string(),
            path: "memory.free".to_string()
        }
    );
    assert!(err.to_string().contains("memory.free"));
}

#[test]
fn test_path_through_scalar() {
    let err = extract("extract_double(name, first)", &host_record()).unwrap_err();
    assert!(matches!(err, EvalError::FieldNotFound { field, .. } if field == "first"));
}

#[test]
fn test_string_leaf_is_parsed() {
    assert_eq!(
        extract("extract_int(memory, limit)", &host_record()).unwrap(),
        Value::Int(2048)
    );
    assert_eq!(
        extract("extract_double(memory, limit)", &host_record()).unwrap(),
        Value::Double(2048.0)
    );
}

#[test]
fn test_unparseable_string_leaf() {
    let err = extract("extract_double(memory, note)", &host_record()).unwrap_err();
    assert_eq!(
        err,
        EvalError::NumberFormat {
            value: "n/a".to_string(),
            target: TypeTag::Double
        }
    );
}

#[test]
fn test_null_leaf_gives_fallback() {
    let record = host_record();
    let spare = extract("extract_double(memory, spare)", &record).unwrap();
    assert!(matches!(spare, Value::Double(n) if n.is_nan()));
    assert_eq!(
        extract("extract_int(memory, spare)", &record).unwrap(),
        Value::Int(0)
    );
    assert_eq!(
        extract("extract_string(memory, spare)", &record).unwrap(),
        Value::String(String::new())
    );
}

#[test]
fn test_no_sample_gives_fallback() {
    let function = parse("extract_string(name)").unwrap();
    assert_eq!(
        function.eval(&aggfn_lang::NoOperands, &[]).unwrap(),
        Value::String(String::new())
    );
}

#[test]
fn test_empty_path_gives_fallback() {
    let function = ExtractFunction::new(ExtractTarget::Double, Vec::new());
    let no_args = function.eval(&aggfn_lang::NoOperands, &[]).unwrap();
    assert!(matches!(no_args, Value::Double(n) if n.is_nan()));

    let scalar = function.eval_sample(&Value::Double(3.0)).unwrap();
    assert!(matches!(scalar, Value::Double(n) if n.is_nan()));

    let record = function.eval_sample(&host_record()).unwrap();
    assert!(matches!(record, Value::Double(n) if n.is_nan()));
}

#[test]
fn test_non_composite_sample() {
    let err = extract("extract_double(used)", &Value::Double(1.0)).unwrap_err();
    assert_eq!(
        err,
        EvalError::TypeMismatch {
            function: FunctionKind::ExtractDouble,
            index: 0,
            found: "double".to_string()
        }
    );
}

#[test]
fn test_int_truncates_and_checks_range() {
    let record = Value::Composite(
        CompositeValue::new("r")
            .with_field("ratio", Value::Double(7.9))
            .with_field("huge", Value::Long(i64::MAX))
            .with_field("precise", Value::BigDecimal(Decimal::new(12345, 2))),
    );
    assert_eq!(extract("extract_int(ratio)", &record).unwrap(), Value::Int(7));
    assert_eq!(
        extract("extract_int(precise)", &record).unwrap(),
        Value::Int(123)
    );
    assert!(matches!(
        extract("extract_int(huge)", &record),
        Err(EvalError::NumberFormat {
            target: TypeTag::Int,
            ..
        })
    ));
    match extract("extract_double(precise)", &record).unwrap() {
        Value::Double(n) => assert!((n - 123.45).abs() < 1e-9, "got {}", n),
        other => panic!("Expected double, got {:?}", other),
    }
}

#[test]
fn test_signature() {
    let function = parse("extract_int(a, b)").unwrap();
    assert_eq!(function.kind(), FunctionKind::ExtractInt);
    assert_eq!(function.arity(), 0);
    assert!(function.can_accept(0, TypeTag::Composite));
    assert!(!function.can_accept(0, TypeTag::Double));
}
