use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Element type of arrays and buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

/// Closed set of value types understood by the function library.
///
/// Functions declare which tags they accept per argument position and which
/// tag they produce, so wiring can be validated before any sample flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Date,
    BigInt,
    BigDecimal,
    Char,
    /// Record with named fields
    Composite,
    /// Fixed array of primitives
    Array(PrimitiveKind),
    /// Buffer of primitives
    Buffer(PrimitiveKind),
}

impl TypeTag {
    /// True for every integral and floating kind, big numbers included.
    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating()
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            TypeTag::Byte | TypeTag::Short | TypeTag::Int | TypeTag::Long | TypeTag::BigInt
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, TypeTag::Float | TypeTag::Double | TypeTag::BigDecimal)
    }

    pub fn name(self) -> String {
        match self {
            TypeTag::Bool => "bool".into(),
            TypeTag::Byte => "byte".into(),
            TypeTag::Short => "short".into(),
            TypeTag::Int => "int".into(),
            TypeTag::Long => "long".into(),
            TypeTag::Float => "float".into(),
            TypeTag::Double => "double".into(),
            TypeTag::String => "string".into(),
            TypeTag::Date => "date".into(),
            TypeTag::BigInt => "bigint".into(),
            TypeTag::BigDecimal => "bigdecimal".into(),
            TypeTag::Char => "char".into(),
            TypeTag::Composite => "composite".into(),
            TypeTag::Array(kind) => format!("{}[]", TypeTag::from(kind).name()),
            TypeTag::Buffer(kind) => format!("buffer<{}>", TypeTag::from(kind).name()),
        }
    }
}

impl From<PrimitiveKind> for TypeTag {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Bool => TypeTag::Bool,
            PrimitiveKind::Byte => TypeTag::Byte,
            PrimitiveKind::Short => TypeTag::Short,
            PrimitiveKind::Int => TypeTag::Int,
            PrimitiveKind::Long => TypeTag::Long,
            PrimitiveKind::Float => TypeTag::Float,
            PrimitiveKind::Double => TypeTag::Double,
            PrimitiveKind::Char => TypeTag::Char,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Errors raised while building structured values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("array of {expected} cannot hold element {index} of type {found}")]
    ElementType {
        expected: TypeTag,
        found: String,
        index: usize,
    },
}

/// A sample, operand or result flowing through the function library.
///
/// # Examples
///
/// ```
/// use aggfn_lang::{CompositeValue, TypeTag, Value};
///
/// let sample = Value::Double(42.5);
/// assert_eq!(sample.type_tag(), Some(TypeTag::Double));
///
/// let record = CompositeValue::new("memory")
///     .with_field("used", Value::Long(512))
///     .with_field("max", Value::Long(1024));
/// assert_eq!(record.get("used"), Some(&Value::Long(512)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    Date(DateTime<Utc>),
    BigInt(i128),
    BigDecimal(Decimal),
    Composite(CompositeValue),
    Array(ArrayValue),
    Buffer(ArrayValue),
}

impl Value {
    /// Type of the active payload; `None` for `Null`.
    pub fn type_tag(&self) -> Option<TypeTag> {
        let tag = match self {
            Value::Null => return None,
            Value::Bool(_) => TypeTag::Bool,
            Value::Byte(_) => TypeTag::Byte,
            Value::Short(_) => TypeTag::Short,
            Value::Int(_) => TypeTag::Int,
            Value::Long(_) => TypeTag::Long,
            Value::Float(_) => TypeTag::Float,
            Value::Double(_) => TypeTag::Double,
            Value::Char(_) => TypeTag::Char,
            Value::String(_) => TypeTag::String,
            Value::Date(_) => TypeTag::Date,
            Value::BigInt(_) => TypeTag::BigInt,
            Value::BigDecimal(_) => TypeTag::BigDecimal,
            Value::Composite(_) => TypeTag::Composite,
            Value::Array(array) => TypeTag::Array(array.kind()),
            Value::Buffer(buffer) => TypeTag::Buffer(buffer.kind()),
        };
        Some(tag)
    }

    /// Name of the payload type, `"null"` included.
    pub fn type_name(&self) -> String {
        self.type_tag()
            .map(TypeTag::name)
            .unwrap_or_else(|| "null".to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric payload widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(n) => Some(f64::from(*n)),
            Value::Short(n) => Some(f64::from(*n)),
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            Value::BigInt(n) => Some(*n as f64),
            Value::BigDecimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Integral payload as `i64`; floating values are not truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Short(n) => Some(i64::from(*n)),
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            Value::BigInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeValue> {
        match self {
            Value::Composite(c) => Some(c),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<CompositeValue> for Value {
    fn from(c: CompositeValue) -> Self {
        Value::Composite(c)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(n) => write!(f, "{}", n),
            Value::Short(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => f.write_str(&d.to_rfc3339()),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::BigDecimal(d) => write!(f, "{}", d),
            Value::Composite(c) => write!(f, "{}", c),
            Value::Array(a) | Value::Buffer(a) => write!(f, "{}", a),
        }
    }
}

/// Record value with named fields.
///
/// Fields are kept sorted by name so snapshots render deterministically.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeValue {
    type_name: String,
    fields: BTreeMap<String, Value>,
}

impl CompositeValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        CompositeValue {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for CompositeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Homogeneous sequence of primitive values, backing both arrays and buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    kind: PrimitiveKind,
    items: Vec<Value>,
}

impl ArrayValue {
    /// Build an array, checking that every element matches `kind`.
    pub fn new(kind: PrimitiveKind, items: Vec<Value>) -> Result<Self, ValueError> {
        let expected = TypeTag::from(kind);
        for (index, item) in items.iter().enumerate() {
            if item.type_tag() != Some(expected) {
                return Err(ValueError::ElementType {
                    expected,
                    found: item.type_name(),
                    index,
                });
            }
        }
        Ok(ArrayValue { kind, items })
    }

    pub fn from_f64s(values: impl IntoIterator<Item = f64>) -> Self {
        ArrayValue {
            kind: PrimitiveKind::Double,
            items: values.into_iter().map(Value::Double).collect(),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", item)?;
        }
        f.write_str("]")
    }
}
