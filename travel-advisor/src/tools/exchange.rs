use super::ToolOutcome;
use adk_core::{AdkError, Result, Tool, ToolContext};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base: String,
    pub target: String,
    pub rate: f64,
    pub report: String,
}

// Units of each currency per one US dollar.
const UNITS_PER_USD: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 150.0),
    ("KRW", 1380.0),
    ("LAK", 21500.0),
    ("THB", 36.5),
    ("CNY", 7.2),
];

fn units_per_usd(code: &str) -> Option<f64> {
    UNITS_PER_USD.iter().find(|(c, _)| *c == code).map(|(_, units)| *units)
}

fn parse_code(input: &str) -> Option<String> {
    let code = input.trim();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Returns the (mock) exchange rate from `base_currency` to `target_currency`.
///
/// Codes are three-letter ISO-4217 style, case-insensitive. Rates are derived
/// from a fixed USD table, so any pair of listed currencies is supported.
pub fn get_exchange_rate(base_currency: &str, target_currency: &str) -> ToolOutcome<ExchangeRate> {
    let (Some(base), Some(target)) = (parse_code(base_currency), parse_code(target_currency))
    else {
        return ToolOutcome::error(format!(
            "Currency codes must be three letters, got '{}' and '{}'.",
            base_currency.trim(),
            target_currency.trim()
        ));
    };

    let rate = if base == target {
        Some(1.0)
    } else {
        units_per_usd(&base)
            .zip(units_per_usd(&target))
            .map(|(base_units, target_units)| round6(target_units / base_units))
    };

    match rate {
        Some(rate) => ToolOutcome::success(ExchangeRate {
            report: format!("1 {base} = {rate} {target}"),
            base,
            target,
            rate,
        }),
        None => ToolOutcome::not_found(format!("No exchange rate available for {base}/{target}.")),
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeParams {
    base_currency: String,
    target_currency: String,
}

/// `get_exchange_rate` as an agent tool.
pub struct ExchangeRateTool;

#[async_trait]
impl Tool for ExchangeRateTool {
    fn name(&self) -> &str {
        "get_exchange_rate"
    }

    fn description(&self) -> &str {
        "Gets the exchange rate between two currencies given as three-letter codes \
         (e.g. USD, KRW, LAK). Returns status 'success' with the rate, \
         or status 'not_found' for unsupported currency pairs."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "base_currency": {
                    "type": "string",
                    "description": "Currency to convert from, e.g. 'USD'"
                },
                "target_currency": {
                    "type": "string",
                    "description": "Currency to convert to, e.g. 'LAK'"
                }
            },
            "required": ["base_currency", "target_currency"]
        }))
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let params: ExchangeParams = serde_json::from_value(args)
            .map_err(|e| AdkError::Tool(format!("get_exchange_rate: invalid arguments: {e}")))?;
        let outcome = get_exchange_rate(&params.base_currency, &params.target_currency);
        tracing::debug!(
            tool = "get_exchange_rate",
            base = %params.base_currency,
            target = %params.target_currency,
            status = outcome.status.as_str(),
            "tool executed"
        );
        serde_json::to_value(outcome).map_err(|e| AdkError::Tool(e.to_string()))
    }
}
