//! Validate formulas and report their signature

use std::fmt;

use crate::{FunctionDef, FunctionKind, TypeTag, parse_definition};

use super::CliError;

/// Sample types probed when reporting what a function accepts
const PROBED_TYPES: [TypeTag; 13] = [
    TypeTag::Bool,
    TypeTag::Byte,
    TypeTag::Short,
    TypeTag::Int,
    TypeTag::Long,
    TypeTag::Float,
    TypeTag::Double,
    TypeTag::BigInt,
    TypeTag::BigDecimal,
    TypeTag::String,
    TypeTag::Char,
    TypeTag::Date,
    TypeTag::Composite,
];

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The formula to validate
    pub formula: String,
}

/// Result of a successful check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub definition: FunctionDef,
    pub kind: FunctionKind,
    pub return_type: TypeTag,
    pub arity: usize,
    /// Sample types accepted at argument 0
    pub accepts: Vec<TypeTag>,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accepts: Vec<String> = self.accepts.iter().map(|t| t.name()).collect();
        writeln!(f, "formula:  {}", self.definition)?;
        writeln!(f, "returns:  {}", self.return_type)?;
        writeln!(f, "operands: {}", self.arity)?;
        write!(f, "accepts:  {}", accepts.join(", "))
    }
}

/// Parse a formula and describe the function it builds
pub fn execute_check(options: &CheckOptions) -> Result<CheckReport, CliError> {
    let definition = parse_definition(&options.formula)?;
    let function = definition.instantiate(&Default::default());

    let accepts = PROBED_TYPES
        .into_iter()
        .filter(|tag| function.can_accept(0, *tag))
        .collect();

    Ok(CheckReport {
        kind: function.kind(),
        return_type: function.return_type(),
        arity: function.arity(),
        accepts,
        definition,
    })
}
