use crate::functions::{AggregationFunction, EvalError, FunctionKind, type_mismatch};
use crate::resolver::OperandResolver;
use crate::value::{TypeTag, Value};

/// Result type of an [`ExtractFunction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractTarget {
    String,
    Int,
    Double,
}

impl ExtractTarget {
    pub fn type_tag(self) -> TypeTag {
        match self {
            ExtractTarget::String => TypeTag::String,
            ExtractTarget::Int => TypeTag::Int,
            ExtractTarget::Double => TypeTag::Double,
        }
    }

    /// Value returned when there is nothing to extract: `""`, `0` or NaN.
    pub fn fallback(self) -> Value {
        match self {
            ExtractTarget::String => Value::String(String::new()),
            ExtractTarget::Int => Value::Int(0),
            ExtractTarget::Double => Value::Double(f64::NAN),
        }
    }

    fn kind(self) -> FunctionKind {
        match self {
            ExtractTarget::String => FunctionKind::ExtractString,
            ExtractTarget::Int => FunctionKind::ExtractInt,
            ExtractTarget::Double => FunctionKind::ExtractDouble,
        }
    }

    fn convert(self, leaf: &Value) -> Result<Value, EvalError> {
        if leaf.is_null() {
            return Ok(self.fallback());
        }
        let converted = match self {
            ExtractTarget::String => Some(Value::String(leaf.to_string())),
            ExtractTarget::Int => to_int(leaf).map(Value::Int),
            ExtractTarget::Double => to_double(leaf).map(Value::Double),
        };
        converted.ok_or_else(|| EvalError::NumberFormat {
            value: leaf.to_string(),
            target: self.type_tag(),
        })
    }
}

fn to_int(leaf: &Value) -> Option<i32> {
    match leaf {
        Value::Bool(b) => Some(i32::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Float(_) | Value::Double(_) | Value::BigDecimal(_) => {
            let n = leaf.as_f64()?.trunc();
            (n.is_finite() && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX))
                .then_some(n as i32)
        }
        _ => leaf.as_i64().and_then(|n| i32::try_from(n).ok()),
    }
}

fn to_double(leaf: &Value) -> Option<f64> {
    match leaf {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => leaf.as_f64(),
    }
}

/// `extract_string(..)`, `extract_int(..)`, `extract_double(..)`: read a
/// nested field out of a composite sample.
///
/// The path is walked one field at a time; each intermediate value must be
/// a composite holding the next field.
#[derive(Debug, Clone)]
pub struct ExtractFunction {
    target: ExtractTarget,
    path: Vec<String>,
}

impl ExtractFunction {
    pub fn new(target: ExtractTarget, path: Vec<String>) -> Self {
        ExtractFunction { target, path }
    }

    pub fn target(&self) -> ExtractTarget {
        self.target
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    fn walk<'a>(&self, root: &'a Value) -> Result<&'a Value, EvalError> {
        let mut current = root;
        for field in &self.path {
            current = current
                .as_composite()
                .and_then(|record| record.get(field))
                .ok_or_else(|| EvalError::FieldNotFound {
                    field: field.clone(),
                    path: self.dotted_path(),
                })?;
        }
        Ok(current)
    }
}

impl AggregationFunction for ExtractFunction {
    fn kind(&self) -> FunctionKind {
        self.target.kind()
    }

    fn return_type(&self) -> TypeTag {
        self.target.type_tag()
    }

    fn can_accept(&self, index: usize, tag: TypeTag) -> bool {
        index == 0 && tag == TypeTag::Composite
    }

    fn eval(&self, _resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError> {
        let Some(root) = args.first() else {
            return Ok(self.target.fallback());
        };
        if self.path.is_empty() {
            return Ok(self.target.fallback());
        }
        if root.as_composite().is_none() {
            return Err(type_mismatch(self.kind(), 0, root));
        }
        let leaf = self.walk(root)?;
        self.target.convert(leaf)
    }

    fn reset(&self) {}
}
