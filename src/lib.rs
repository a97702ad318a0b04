pub mod ast;
pub mod cli;
pub mod config;
pub mod functions;
pub mod lexer;
pub mod metrics;
pub mod parser;
pub mod resolver;
pub mod stats;
pub mod value;

pub use ast::{Expression, FunctionDef, Interval, TimeUnit, Token, TokenKind};
pub use config::{EngineConfig, ExtremumSeed};
pub use functions::{AggregationFunction, EvalError, FunctionKind};
pub use lexer::{LexError, Lexer};
pub use parser::{FunctionRegistry, ParseError, Parser, parse, parse_definition, parse_with};
pub use resolver::{MapResolver, NoOperands, OperandResolver, ResolutionError};
pub use value::{ArrayValue, CompositeValue, PrimitiveKind, TypeTag, Value};
