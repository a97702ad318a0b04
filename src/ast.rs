//! # Aggregation Formula Language - Syntax Model
//!
//! This module defines what the lexer and parser produce for the formula
//! language: a tiny, fixed grammar that names one stateful aggregation
//! function together with its parameters.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[time_unit]** - Time units and window intervals for windowed functions
//! - **[expression]** - Parsed expressions and function plans
//!
//! ## Quick Start
//!
//! ```text
//! avg(5, sec)
//! ```
//!
//! This formula averages every sample received within a 5 second window.
//!
//! ## Grammar
//!
//! ```text
//! expr        := NAME '(' args ')'
//! args(max)   := ε
//! args(min)   := ε
//! args(sum)   := INTEGER ','? timeunit
//! args(avg)   := INTEGER ','? timeunit
//! args(pct)   := INTEGER ',' INTEGER ','? timeunit
//! args(corr)  := '$' NAME
//! timeunit    := 's'|'sec'|'seconds'|'ms'|'millis'|'ns'|'nanos'
//!              | 'm'|'minutes'|'h'|'hours'|'d'|'days'
//! ```
//!
//! The metric recorders and field extractors use the same shape:
//!
//! ```text
//! flag()
//! gauge_fp()
//! ranged_gauge_int(0, 100)
//! extract_double(memory, used)
//! ```
//!
//! Whitespace is insignificant between tokens. There is no quoting, no
//! escaping, and no nesting.
pub mod expression;
pub mod time_unit;
pub mod tokens;

pub use expression::{Expression, FunctionDef};
pub use time_unit::{Interval, TimeUnit};
pub use tokens::{Token, TokenKind};
