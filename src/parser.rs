use std::collections::HashMap;
use std::sync::LazyLock;

use log::debug;
use thiserror::Error;

use crate::{
    ast::{Expression, FunctionDef, Interval, TimeUnit, Token, TokenKind},
    config::EngineConfig,
    functions::{AggregationFunction, ExtractTarget},
    lexer::{LexError, Lexer},
    metrics::GaugeKind,
};

/// Errors raised while parsing a formula. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unknown function name '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },

    #[error("unknown time unit '{unit}' at position {position}")]
    UnknownTimeUnit { unit: String, position: usize },

    /// A complete expression that is not a function call
    #[error("expected function definition but found expression {found}")]
    ExpectedFunction { found: String },

    #[error("unexpected token {found} at position {position}")]
    UnexpectedToken { found: Token, position: usize },

    #[error("integer '{literal}' at position {position} is out of range")]
    InvalidInteger { literal: String, position: usize },

    #[error("invalid argument {value} at position {position}: {reason}")]
    InvalidArgument {
        value: String,
        position: usize,
        reason: String,
    },
}

impl ParseError {
    fn unexpected(token: Token) -> Self {
        ParseError::UnexpectedToken {
            position: token.position(),
            found: token,
        }
    }
}

/// Routine consuming a function's parameter list, starting at its `(`.
pub type ArgumentParser = fn(&mut Parser<'_>) -> Result<FunctionDef, ParseError>;

/// Maps function names to the routine that parses their parameters.
///
/// [`FunctionRegistry::builtin`] knows every built-in function. Extra names
/// (aliases, or new routines composed from [`Parser`]'s public helpers) can
/// be added with [`register`](FunctionRegistry::register).
#[derive(Clone)]
pub struct FunctionRegistry {
    entries: HashMap<String, ArgumentParser>,
}

static BUILTIN: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::builtin);

impl FunctionRegistry {
    pub fn empty() -> Self {
        FunctionRegistry {
            entries: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("max", |p| p.empty_parameters().map(|_| FunctionDef::Max));
        registry.register("min", |p| p.empty_parameters().map(|_| FunctionDef::Min));
        registry.register("sum", |p| {
            p.interval_parameters()
                .map(|interval| FunctionDef::Sum { interval })
        });
        registry.register("avg", |p| {
            p.interval_parameters()
                .map(|interval| FunctionDef::Average { interval })
        });
        registry.register("percentile", |p| p.percentile_parameters());
        registry.register("correl", |p| p.correlation_parameters());
        registry.register("extract_string", |p| p.extract_parameters(ExtractTarget::String));
        registry.register("extract_int", |p| p.extract_parameters(ExtractTarget::Int));
        registry.register("extract_double", |p| p.extract_parameters(ExtractTarget::Double));
        registry.register("flag", |p| p.empty_parameters().map(|_| FunctionDef::Flag));
        registry.register("gauge_fp", |p| {
            p.empty_parameters()
                .map(|_| FunctionDef::Gauge(GaugeKind::Fp))
        });
        registry.register("gauge_int", |p| {
            p.empty_parameters()
                .map(|_| FunctionDef::Gauge(GaugeKind::Int))
        });
        registry.register("ranged_gauge_fp", |p| {
            let (lower, upper) = p.range_parameters()?;
            Ok(FunctionDef::Gauge(GaugeKind::RangedFp {
                lower: lower as f64,
                upper: upper as f64,
            }))
        });
        registry.register("ranged_gauge_int", |p| {
            let (lower, upper) = p.range_parameters()?;
            Ok(FunctionDef::Gauge(GaugeKind::RangedInt { lower, upper }))
        });
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, parser: ArgumentParser) {
        self.entries.insert(name.into(), parser);
    }

    pub fn get(&self, name: &str) -> Option<ArgumentParser> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Recursive-descent parser over a single formula.
pub struct Parser<'r> {
    lexer: Lexer,
    registry: &'r FunctionRegistry,
}

impl Parser<'static> {
    pub fn new(lexer: Lexer) -> Self {
        Parser {
            lexer,
            registry: &BUILTIN,
        }
    }
}

impl<'r> Parser<'r> {
    pub fn with_registry(lexer: Lexer, registry: &'r FunctionRegistry) -> Self {
        Parser { lexer, registry }
    }

    /// Parse one expression starting at the current token.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let token = self.lexer.next_required(TokenKind::Name)?;
        match token.kind() {
            TokenKind::Name => {
                let routine = self.registry.get(token.text()).ok_or_else(|| {
                    ParseError::UnknownFunction {
                        name: token.text().to_string(),
                        position: token.position(),
                    }
                })?;
                routine(self).map(Expression::Function)
            }
            TokenKind::Integer => Ok(Expression::Integer(Self::integer_value(&token)?)),
            TokenKind::Dollar => {
                let name = self.lexer.expect(TokenKind::Name)?;
                Ok(Expression::Operand(name.into_text()))
            }
            _ => Err(ParseError::unexpected(token)),
        }
    }

    /// Parse a complete formula: exactly one function call and nothing else.
    pub fn parse(&mut self) -> Result<FunctionDef, ParseError> {
        match self.parse_expression()? {
            Expression::Function(def) => {
                if let Some(token) = self.lexer.next_token()? {
                    return Err(ParseError::unexpected(token));
                }
                Ok(def)
            }
            other => Err(ParseError::ExpectedFunction {
                found: other.to_string(),
            }),
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        Ok(self.lexer.expect(kind)?)
    }

    fn integer_value(token: &Token) -> Result<u64, ParseError> {
        token
            .text()
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidInteger {
                literal: token.text().to_string(),
                position: token.position(),
            })
    }

    /// Consume an integer token.
    pub fn integer(&mut self) -> Result<u64, ParseError> {
        let token = self.expect(TokenKind::Integer)?;
        Self::integer_value(&token)
    }

    /// Consume a time unit name, allowing one leading comma.
    pub fn time_unit(&mut self) -> Result<TimeUnit, ParseError> {
        let mut token = self.lexer.next_required(TokenKind::Name)?;
        if token.kind() == TokenKind::Comma {
            token = self.expect(TokenKind::Name)?;
        }
        if token.kind() != TokenKind::Name {
            return Err(ParseError::unexpected(token));
        }
        TimeUnit::from_name(token.text()).ok_or_else(|| ParseError::UnknownTimeUnit {
            unit: token.text().to_string(),
            position: token.position(),
        })
    }

    /// `( )`
    pub fn empty_parameters(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::LeftBracket)?;
        self.expect(TokenKind::RightBracket)?;
        Ok(())
    }

    /// `( INTEGER ','? unit )`
    pub fn interval_parameters(&mut self) -> Result<Interval, ParseError> {
        self.expect(TokenKind::LeftBracket)?;
        let amount = self.integer()?;
        let unit = self.time_unit()?;
        self.expect(TokenKind::RightBracket)?;
        Ok(Interval::new(amount, unit))
    }

    /// `( INTEGER ',' INTEGER ','? unit )`
    fn percentile_parameters(&mut self) -> Result<FunctionDef, ParseError> {
        self.expect(TokenKind::LeftBracket)?;
        let token = self.expect(TokenKind::Integer)?;
        let percentile = Self::integer_value(&token)?;
        let percentile = u8::try_from(percentile)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| ParseError::InvalidArgument {
                value: token.text().to_string(),
                position: token.position(),
                reason: "percentile must be between 0 and 100".to_string(),
            })?;
        self.expect(TokenKind::Comma)?;
        let amount = self.integer()?;
        let unit = self.time_unit()?;
        self.expect(TokenKind::RightBracket)?;
        Ok(FunctionDef::Percentile {
            percentile,
            interval: Interval::new(amount, unit),
        })
    }

    /// `( '$' NAME )`
    fn correlation_parameters(&mut self) -> Result<FunctionDef, ParseError> {
        self.expect(TokenKind::LeftBracket)?;
        self.expect(TokenKind::Dollar)?;
        let operand = self.expect(TokenKind::Name)?.into_text();
        self.expect(TokenKind::RightBracket)?;
        Ok(FunctionDef::Correlation { operand })
    }

    /// `( NAME (',' NAME)* )`
    fn extract_parameters(&mut self, target: ExtractTarget) -> Result<FunctionDef, ParseError> {
        self.expect(TokenKind::LeftBracket)?;
        let mut path = vec![self.expect(TokenKind::Name)?.into_text()];
        loop {
            let token = self.lexer.next_required(TokenKind::RightBracket)?;
            match token.kind() {
                TokenKind::Comma => path.push(self.expect(TokenKind::Name)?.into_text()),
                TokenKind::RightBracket => break,
                _ => return Err(ParseError::unexpected(token)),
            }
        }
        Ok(FunctionDef::Extract { target, path })
    }

    /// `( INTEGER ',' INTEGER )`
    fn range_parameters(&mut self) -> Result<(i64, i64), ParseError> {
        self.expect(TokenKind::LeftBracket)?;
        let lower = self.bound()?;
        self.expect(TokenKind::Comma)?;
        let upper = self.bound()?;
        self.expect(TokenKind::RightBracket)?;
        Ok((lower, upper))
    }

    fn bound(&mut self) -> Result<i64, ParseError> {
        let token = self.expect(TokenKind::Integer)?;
        Self::integer_value(&token)
            .ok()
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| ParseError::InvalidInteger {
                literal: token.text().to_string(),
                position: token.position(),
            })
    }
}

/// Parse a formula into its function plan without instantiating it.
pub fn parse_definition(input: &str) -> Result<FunctionDef, ParseError> {
    let mut parser = Parser::new(Lexer::new(input));
    let result = parser.parse();
    match &result {
        Ok(def) => debug!("parsed formula '{}' as {}", input, def),
        Err(e) => debug!("rejected formula '{}': {}", input, e),
    }
    result
}

/// Parse a formula and build its function with the default configuration.
///
/// # Examples
///
/// ```
/// use aggfn_lang::{Value, parse};
///
/// let max = parse("max()").unwrap();
/// max.eval_sample(&Value::Double(3.0)).unwrap();
/// let result = max.eval_sample(&Value::Long(7)).unwrap();
/// assert_eq!(result, Value::Double(7.0));
/// ```
pub fn parse(input: &str) -> Result<Box<dyn AggregationFunction>, ParseError> {
    parse_with(input, &EngineConfig::default())
}

/// Parse a formula and build its function under `config`.
pub fn parse_with(
    input: &str,
    config: &EngineConfig,
) -> Result<Box<dyn AggregationFunction>, ParseError> {
    Ok(parse_definition(input)?.instantiate(config))
}
