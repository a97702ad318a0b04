//! Feed newline-delimited JSON samples through a formula

use log::{debug, warn};

use crate::{EngineConfig, MapResolver, Value, parse_with};

use super::{CliError, json_to_value, value_to_json};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The formula to evaluate
    pub formula: String,
    /// Newline-delimited JSON samples
    pub input: Option<String>,
    /// Fixed operand bindings, `name=<json>`
    pub operands: Vec<String>,
    /// Lines are `{"sample": .., "operands": {..}}` envelopes
    pub with_operands: bool,
    pub config: EngineConfig,
}

fn parse_binding(binding: &str) -> Result<(String, Value), CliError> {
    let (name, json) = binding
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| CliError::Operand(binding.to_string()))?;
    let value = json_to_value(serde_json::from_str(json)?)?;
    Ok((name.trim().to_string(), value))
}

fn split_envelope(
    line: serde_json::Value,
    resolver: &mut MapResolver,
) -> Result<serde_json::Value, CliError> {
    let serde_json::Value::Object(mut envelope) = line else {
        return Err(CliError::Conversion(
            "expected {\"sample\": .., \"operands\": {..}}".to_string(),
        ));
    };
    if let Some(operands) = envelope.remove("operands") {
        let serde_json::Value::Object(operands) = operands else {
            return Err(CliError::Conversion("operands must be an object".to_string()));
        };
        for (name, value) in operands {
            resolver.insert(name, json_to_value(value)?);
        }
    }
    Ok(envelope.remove("sample").unwrap_or(serde_json::Value::Null))
}

/// Evaluate every sample in order and collect one JSON result per sample
pub fn execute_run(options: &RunOptions) -> Result<Vec<serde_json::Value>, CliError> {
    let function = parse_with(&options.formula, &options.config)?;
    let input = options.input.as_ref().ok_or(CliError::NoInput)?;

    let mut bindings = MapResolver::new();
    for binding in &options.operands {
        let (name, value) = parse_binding(binding)?;
        bindings.insert(name, value);
    }

    let mut results = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let mut json: serde_json::Value = serde_json::from_str(raw)?;
        // envelope operands apply to their own line only
        let mut resolver = bindings.clone();
        if options.with_operands {
            json = split_envelope(json, &mut resolver)?;
        }

        let sample = json_to_value(json)?;
        let accepted = sample
            .type_tag()
            .is_some_and(|tag| function.can_accept(0, tag));
        if !accepted {
            warn!("line {}: rejected {} sample", line, sample.type_name());
            return Err(CliError::rejected(line, function.kind(), sample.type_tag()));
        }

        let result = function
            .eval(&resolver, std::slice::from_ref(&sample))
            .map_err(|source| CliError::Eval { line, source })?;
        debug!("line {}: {} -> {}", line, sample, result);
        results.push(value_to_json(&result));
    }
    Ok(results)
}
