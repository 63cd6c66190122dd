// src/domain/form.rs

use crate::domain::flow::{Category, FlowType, ListingType};
use crate::domain::schema::is_blank;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Which flow produced a piece of form data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMarker {
    pub category: Category,
    pub listing_type: ListingType,
    pub flow_type: FlowType,
}

impl From<FlowType> for FlowMarker {
    fn from(flow: FlowType) -> Self {
        Self {
            category: flow.category(),
            listing_type: flow.listing_type(),
            flow_type: flow,
        }
    }
}

/// Accumulated values of one listing.
///
/// `steps` holds one object per step id. Flat top-level `fields` (`rentAmount`,
/// `bhkType`, `city`, ...) are kept alongside for readers of the older layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowMarker>,
    #[serde(default)]
    pub steps: BTreeMap<String, Map<String, Value>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl FormData {
    pub fn mark_flow(&mut self, flow: FlowType) {
        self.flow = Some(flow.into());
    }

    pub fn flow_type(&self) -> Option<FlowType> {
        self.flow.map(|marker| marker.flow_type)
    }

    pub fn step(&self, step_id: &str) -> Option<&Map<String, Value>> {
        self.steps.get(step_id)
    }

    /// Writes one step value and mirrors it into the flat legacy field when one is named.
    pub fn set_step_value(
        &mut self,
        step_id: &str,
        key: &str,
        value: Value,
        legacy_key: Option<&str>,
    ) {
        if let Some(legacy) = legacy_key {
            self.fields.insert(legacy.to_string(), value.clone());
        }
        self.steps
            .entry(step_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Non-blank text for `key`: the flat field first, then the first step section holding it.
    pub fn text_value(&self, key: &str) -> Option<String> {
        std::iter::once(self.fields.get(key))
            .chain(self.steps.values().map(|section| section.get(key)))
            .find(|value| !is_blank(*value))
            .flatten()
            .and_then(value_to_text)
    }
}

pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "Yes".into() } else { "No".into() }),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Null | Value::Object(_) => None,
    }
}
