//! CLI support for aggfn-lang
//!
//! Provides programmatic access to the `aggfn` commands so they can be
//! embedded in other tools or driven from tests.

mod check;
mod convert;
mod docs;
mod run;

pub use check::{CheckOptions, CheckReport, execute_check};
pub use convert::{json_to_value, value_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use run::{RunOptions, execute_run};

use std::io;

use thiserror::Error;

use crate::value::TypeTag;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    /// Evaluation failed on an input line (1-based)
    #[error("Evaluation error on line {line}: {source}")]
    Eval {
        line: usize,
        #[source]
        source: crate::EvalError,
    },

    /// Sample type not accepted by the function
    #[error("Line {line}: {function} does not accept samples of type {found}")]
    Rejected {
        line: usize,
        function: crate::FunctionKind,
        found: String,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON that has no equivalent value
    #[error("Unsupported input: {0}")]
    Conversion(String),

    /// Malformed `--operand` binding
    #[error("Invalid operand binding '{0}', expected name=<json>")]
    Operand(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe samples to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'aggfn docs' to see available categories.")]
    UnknownCategory(String),
}

impl CliError {
    fn rejected(line: usize, function: crate::FunctionKind, found: Option<TypeTag>) -> Self {
        CliError::Rejected {
            line,
            function,
            found: found.map(TypeTag::name).unwrap_or_else(|| "null".to_string()),
        }
    }
}
