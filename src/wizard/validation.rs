// src/wizard/validation.rs

use crate::domain::flow::{FlowType, StepDefinition};
use crate::domain::schema::{fields_for, is_blank, FieldDescriptor, FieldKind};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// The first field that blocks leaving a step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StepValidationError {
    pub step_id: &'static str,
    /// Input to focus when the step is re-rendered.
    pub field_key: &'static str,
    pub field_name: &'static str,
    pub message: String,
}

/// Checks the visible fields of one step, in declaration order.
///
/// Hidden fields never block, even when required.
pub fn validate_step(
    flow: FlowType,
    step: &StepDefinition,
    values: &Map<String, Value>,
) -> Result<(), StepValidationError> {
    for field in fields_for(flow, step.kind) {
        if !field.is_visible(values) {
            continue;
        }

        let value = values.get(field.key);
        if is_blank(value) {
            if field.required {
                return Err(failure(step, field, format!("Please fill in {}", field.display_name())));
            }
            continue;
        }

        if let Some(message) = value.and_then(|value| kind_mismatch(field, value)) {
            return Err(failure(step, field, message));
        }
    }
    Ok(())
}

fn failure(step: &StepDefinition, field: &FieldDescriptor, message: String) -> StepValidationError {
    StepValidationError {
        step_id: step.id,
        field_key: field.key,
        field_name: field.display_name(),
        message,
    }
}

fn kind_mismatch(field: &FieldDescriptor, value: &Value) -> Option<String> {
    match field.kind {
        FieldKind::Number => {
            let amount = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => parse_amount(s),
                _ => None,
            };
            match amount {
                None => Some(format!("{} must be a number", field.display_name())),
                Some(n) if n < 0.0 => Some(format!("{} cannot be negative", field.display_name())),
                Some(_) => None,
            }
        }
        FieldKind::Choice(options) => {
            let chosen = value.as_str().map(str::trim).unwrap_or_default();
            let known = options.iter().any(|o| o.eq_ignore_ascii_case(chosen));
            (!known).then(|| format!("Please choose a valid {}", field.display_name()))
        }
        FieldKind::Text | FieldKind::LongText => None,
    }
}

/// Finite number with thousands separators allowed: "1,050" and "12.5" parse,
/// "NaN" and "inf" do not.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Turns a raw form input into the JSON value stored for `field`.
/// Numbers are stored as numbers when they parse; anything else is kept as text
/// so validation can point at it.
pub fn coerce_input(field: &FieldDescriptor, raw: &str) -> Value {
    let trimmed = raw.trim();
    match field.kind {
        FieldKind::Number if !trimmed.is_empty() => {
            let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
            if let Ok(n) = cleaned.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = cleaned.parse::<f64>().ok().and_then(Number::from_f64) {
                Value::Number(n)
            } else {
                Value::String(trimmed.to_string())
            }
        }
        FieldKind::LongText => Value::String(raw.trim_end().to_string()),
        _ => Value::String(trimmed.to_string()),
    }
}
