// src/domain/cleaning.rs
//
// Reconciles a form against the flow it is being submitted under.

use crate::domain::catalog::{step_sequence, valid_step_ids};
use crate::domain::flow::FlowType;
use crate::domain::form::FormData;
use crate::domain::schema::{fields_for, is_blank};
use serde_json::Value;
use std::collections::BTreeSet;

/// Sections written by older versions of the wizard under un-prefixed ids.
/// Their contents move into the current flow's step whose id contains the same name.
pub const LEGACY_SECTIONS: [&str; 2] = ["features", "basic_details"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleaningReport {
    /// (orphaned section, section it was merged into)
    pub merged: Vec<(String, String)>,
    pub removed: Vec<String>,
    pub initialized: Vec<String>,
    /// Flat legacy fields that only another flow declares.
    pub dropped_fields: Vec<String>,
}

impl CleaningReport {
    pub fn is_noop(&self) -> bool {
        self.merged.is_empty()
            && self.removed.is_empty()
            && self.initialized.is_empty()
            && self.dropped_fields.is_empty()
    }
}

/// `(step id, field key, flat key)` for every field of `flow` mirrored into a flat key.
fn mirrored_fields(
    flow: FlowType,
) -> impl Iterator<Item = (&'static str, &'static str, &'static str)> {
    step_sequence(flow).iter().flat_map(move |step| {
        fields_for(flow, step.kind)
            .iter()
            .filter_map(move |field| field.legacy_key.map(|flat| (step.id, field.key, flat)))
    })
}

/// Drops step sections that do not belong to `flow`, migrating the two legacy
/// sections first, and makes sure every step id of `flow` has a section.
///
/// Flat fields follow the same rule: a flat key only another flow mirrors into is
/// removed, and the ones `flow` mirrors into are refreshed from its step values.
/// Flat values without a step counterpart (older rows, publish defaults) stay.
///
/// Running it twice against the same flow changes nothing the second time.
pub fn clean_steps(form: &mut FormData, flow: FlowType) -> CleaningReport {
    let valid: Vec<&'static str> = valid_step_ids(flow).collect();
    let mut report = CleaningReport::default();

    let orphaned: Vec<String> = form
        .steps
        .keys()
        .filter(|id| !valid.contains(&id.as_str()))
        .cloned()
        .collect();

    for id in orphaned {
        let Some(section) = form.steps.remove(&id) else {
            continue;
        };

        let target = LEGACY_SECTIONS
            .contains(&id.as_str())
            .then(|| valid.iter().find(|candidate| candidate.contains(id.as_str())))
            .flatten();

        match target {
            Some(target) => {
                let dest = form.steps.entry((*target).to_string()).or_default();
                for (key, value) in section {
                    let keep_existing = dest.get(&key).is_some_and(|v| !is_blank(Some(v)));
                    if !keep_existing {
                        dest.insert(key, value);
                    }
                }
                report.merged.push((id, (*target).to_string()));
            }
            None => report.removed.push(id),
        }
    }

    let declared: BTreeSet<&str> = mirrored_fields(flow).map(|(_, _, flat)| flat).collect();
    let foreign: BTreeSet<&str> = FlowType::ALL
        .into_iter()
        .flat_map(mirrored_fields)
        .map(|(_, _, flat)| flat)
        .filter(|flat| !declared.contains(flat))
        .collect();
    for flat in foreign {
        if form.fields.remove(flat).is_some() {
            report.dropped_fields.push(flat.to_string());
        }
    }

    for (step_id, key, flat) in mirrored_fields(flow) {
        let current = form
            .steps
            .get(step_id)
            .and_then(|section| section.get(key))
            .filter(|value| !is_blank(Some(*value)))
            .cloned();
        if let Some(value) = current {
            form.fields.insert(flat.to_string(), value);
        }
    }

    for id in &valid {
        if !form.steps.contains_key(*id) {
            form.steps.insert((*id).to_string(), Default::default());
            report.initialized.push((*id).to_string());
        }
    }

    if !report.is_noop() {
        tracing::debug!(
            flow = %flow,
            merged = ?report.merged,
            removed = ?report.removed,
            dropped_fields = ?report.dropped_fields,
            initialized = report.initialized.len(),
            "cleaned form sections"
        );
    }

    report
}

/// Completions applied right before publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishDefaults {
    pub default_city: String,
    pub fallback_title: String,
}

impl Default for PublishDefaults {
    fn default() -> Self {
        Self {
            default_city: "Bangalore".to_string(),
            fallback_title: "Property Listing".to_string(),
        }
    }
}

/// Fills `title`, `city` and `description` when they are empty so the published
/// row never lacks them. Returns the names of the fields that were filled.
pub fn apply_publish_defaults(form: &mut FormData, defaults: &PublishDefaults) -> Vec<&'static str> {
    let mut applied = Vec::new();

    let title = match form.text_value("title") {
        Some(title) => title,
        None => {
            let title = match form.text_value("propertyType") {
                Some(property_type) => match form
                    .text_value("locality")
                    .or_else(|| form.text_value("city"))
                {
                    Some(place) => format!("{property_type} in {place}"),
                    None => format!("{property_type} Listing"),
                },
                None => defaults.fallback_title.clone(),
            };
            form.set_field("title", title.clone());
            applied.push("title");
            title
        }
    };

    if form.text_value("city").is_none() && form.text_value("locality").is_none() {
        form.set_field("city", defaults.default_city.clone());
        applied.push("city");
    }

    if form.text_value("description").is_none() {
        form.set_field(
            "description",
            Value::String(format!("{title}. Contact the owner for more details.")),
        );
        applied.push("description");
    }

    applied
}
