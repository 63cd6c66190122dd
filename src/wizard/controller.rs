// src/wizard/controller.rs
//
// One listing session: which flow, which step, and the values typed so far.
// All state changes go through the methods below; the HTTP layer only loads,
// calls and stores.

use crate::db::properties::{save_and_publish, save_draft};
use crate::domain::catalog::{find_step, step_sequence, summary_sections, SummarySection};
use crate::domain::cleaning::{apply_publish_defaults, clean_steps, CleaningReport, PublishDefaults};
use crate::domain::flow::{FlowType, StepDefinition, StepKind};
use crate::domain::form::{value_to_text, FormData};
use crate::domain::property::{ListingStatus, PropertyRecord, StoredProperty};
use crate::domain::schema::{fields_for, find_field};
use crate::errors::ServerError;
use crate::wizard::validation::{coerce_input, validate_step, StepValidationError};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("choose a property category and listing type first")]
    NoFlowSelected,
    #[error("`{0}` is not a step of this listing")]
    UnknownStep(String),
    #[error("complete the earlier steps before opening `{0}`")]
    StepNotReached(String),
    #[error(transparent)]
    Validation(#[from] StepValidationError),
    #[error("there is no step after `{0}`")]
    NoNextStep(&'static str),
    #[error("listings can only be published from the review step")]
    PublishRequiresReview,
    #[error("this listing was already submitted")]
    Closed,
    #[error("listing {property_id} is a {flow} listing; start a new listing to use another type")]
    FlowLocked { property_id: i64, flow: FlowType },
}

impl WizardError {
    /// Errors caused by the session being in the wrong state rather than by bad input.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            WizardError::StepNotReached(_)
                | WizardError::PublishRequiresReview
                | WizardError::Closed
                | WizardError::FlowLocked { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardMode {
    Create,
    Edit { property_id: i64 },
}

impl WizardMode {
    pub fn property_id(&self) -> Option<i64> {
        match self {
            WizardMode::Create => None,
            WizardMode::Edit { property_id } => Some(*property_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    TypeSelection,
    Step { index: usize },
    Review { index: usize },
    Submitted { property_id: i64, status: ListingStatus },
}

impl Stage {
    fn at(flow: FlowType, index: usize) -> Stage {
        match step_sequence(flow).get(index) {
            Some(step) if step.kind == StepKind::Review => Stage::Review { index },
            _ => Stage::Step { index },
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Stage::Step { index } | Stage::Review { index } => Some(*index),
            Stage::TypeSelection | Stage::Submitted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    SaveDraft,
    Publish,
}

impl SubmitAction {
    pub fn status(&self) -> ListingStatus {
        match self {
            SubmitAction::SaveDraft => ListingStatus::Draft,
            SubmitAction::Publish => ListingStatus::Published,
        }
    }
}

/// Result of a navigation call. `from` is `None` when leaving type selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Option<&'static str>,
    pub to: &'static StepDefinition,
}

impl Transition {
    pub fn moved(&self) -> bool {
        self.from != Some(self.to.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub property_id: i64,
    pub status: ListingStatus,
    pub cleaning: CleaningReport,
    pub defaults_applied: Vec<&'static str>,
}

/// A labelled value shown on the review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSession {
    pub mode: WizardMode,
    pub flow: Option<FlowType>,
    pub stage: Stage,
    pub form: FormData,
    /// Highest step index reached; `jump_to` may not go past it.
    pub furthest: usize,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    /// A fresh listing that still needs a category and listing type.
    pub fn new() -> Self {
        Self {
            mode: WizardMode::Create,
            flow: None,
            stage: Stage::TypeSelection,
            form: FormData::default(),
            furthest: 0,
        }
    }

    /// A fresh listing whose flow is already known; type selection is skipped.
    pub fn for_flow(flow: FlowType) -> Self {
        let mut session = Self::new();
        session.enter_flow(flow);
        session
    }

    /// Reopens a stored listing. Every step is reachable since it was filled before.
    pub fn edit(stored: StoredProperty) -> Self {
        let last = step_sequence(stored.flow).len().saturating_sub(1);
        let mut form = stored.form;
        form.mark_flow(stored.flow);
        Self {
            mode: WizardMode::Edit {
                property_id: stored.id,
            },
            flow: Some(stored.flow),
            stage: Stage::at(stored.flow, 0),
            form,
            furthest: last,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.stage, Stage::Submitted { .. })
    }

    pub fn current_step(&self) -> Option<&'static StepDefinition> {
        let flow = self.flow?;
        step_sequence(flow).get(self.stage.index()?)
    }

    /// Whether the Next/Previous bar is shown for the current step.
    pub fn shows_navigation(&self) -> bool {
        self.current_step()
            .map(StepDefinition::shows_navigation)
            .unwrap_or(false)
    }

    /// Chooses (or changes) the flow and starts at its first step.
    /// Values already typed are kept; sections of other flows are dropped on submit.
    /// A stored listing keeps the flow it was saved with.
    pub fn select_flow(&mut self, flow: FlowType) -> Result<Transition, WizardError> {
        self.ensure_open()?;
        if let (WizardMode::Edit { property_id }, Some(current)) = (self.mode, self.flow) {
            if current != flow {
                return Err(WizardError::FlowLocked {
                    property_id,
                    flow: current,
                });
            }
        }
        let from = self.current_step().map(|step| step.id);
        let previous = self.flow;
        let to = self.enter_flow(flow);
        tracing::debug!(?previous, flow = %flow, "wizard flow selected");
        Ok(Transition { from, to })
    }

    fn enter_flow(&mut self, flow: FlowType) -> &'static StepDefinition {
        self.flow = Some(flow);
        self.form.mark_flow(flow);
        self.stage = Stage::at(flow, 0);
        self.furthest = 0;
        &step_sequence(flow)[0]
    }

    /// Stores raw inputs for `step_id`. Keys the step does not declare are ignored.
    /// Returns how many fields were written.
    pub fn update_step<K, V>(
        &mut self,
        step_id: &str,
        inputs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<usize, WizardError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.ensure_open()?;
        let (flow, _, step) = self.reachable_step(step_id)?;

        let mut written = 0;
        for (key, raw) in inputs {
            let Some(field) = find_field(flow, step.kind, key.as_ref()) else {
                continue;
            };
            let value = coerce_input(field, raw.as_ref());
            self.form
                .set_step_value(step.id, field.key, value, field.legacy_key);
            written += 1;
        }
        Ok(written)
    }

    /// Validates the current step and moves to the next one.
    pub fn advance(&mut self) -> Result<Transition, WizardError> {
        self.ensure_open()?;
        let (flow, index, step) = self.position()?;

        let empty = Map::new();
        let values = self.form.step(step.id).unwrap_or(&empty);
        if let Err(err) = validate_step(flow, step, values) {
            tracing::debug!(step = step.id, field = err.field_key, "step blocked by validation");
            return Err(err.into());
        }

        let next = step_sequence(flow)
            .get(index + 1)
            .ok_or(WizardError::NoNextStep(step.id))?;
        self.stage = Stage::at(flow, index + 1);
        self.furthest = self.furthest.max(index + 1);
        tracing::debug!(from = step.id, to = next.id, "wizard advanced");
        Ok(Transition {
            from: Some(step.id),
            to: next,
        })
    }

    /// Moves one step back without validating. At the first step nothing changes.
    pub fn retreat(&mut self) -> Result<Transition, WizardError> {
        self.ensure_open()?;
        let (flow, index, step) = self.position()?;
        let target = index.saturating_sub(1);
        self.stage = Stage::at(flow, target);
        Ok(Transition {
            from: Some(step.id),
            to: &step_sequence(flow)[target],
        })
    }

    /// Opens a step that has already been reached.
    pub fn jump_to(&mut self, step_id: &str) -> Result<Transition, WizardError> {
        self.ensure_open()?;
        let from = self.current_step().map(|step| step.id);
        let (flow, index, step) = self.reachable_step(step_id)?;
        self.stage = Stage::at(flow, index);
        Ok(Transition { from, to: step })
    }

    /// Cleans the form, completes it when publishing and upserts the listing.
    ///
    /// Drafts may be saved from any step; publishing needs the review step.
    /// When storage fails the session is left exactly as it was.
    pub fn submit(
        &mut self,
        conn: &Connection,
        owner_id: i64,
        action: SubmitAction,
        defaults: &PublishDefaults,
        now: i64,
    ) -> Result<Submission, ServerError> {
        self.ensure_open()?;
        let flow = self.flow.ok_or(WizardError::NoFlowSelected)?;
        if action == SubmitAction::Publish && !matches!(self.stage, Stage::Review { .. }) {
            return Err(WizardError::PublishRequiresReview.into());
        }

        let mut form = self.form.clone();
        let cleaning = clean_steps(&mut form, flow);
        let defaults_applied = match action {
            SubmitAction::Publish => apply_publish_defaults(&mut form, defaults),
            SubmitAction::SaveDraft => Vec::new(),
        };
        form.mark_flow(flow);

        let record = PropertyRecord::from_form(self.mode.property_id(), flow, &form);
        let saved = match action {
            SubmitAction::SaveDraft => save_draft(conn, owner_id, &record, now),
            SubmitAction::Publish => save_and_publish(conn, owner_id, &record, now),
        };
        let property_id = match saved {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(%err, flow = %flow, ?action, "listing submit failed");
                return Err(err);
            }
        };

        let status = action.status();
        self.form = form;
        self.mode = WizardMode::Edit { property_id };
        self.stage = Stage::Submitted {
            property_id,
            status,
        };
        tracing::info!(property_id, owner_id, flow = %flow, %status, "listing saved");

        Ok(Submission {
            property_id,
            status,
            cleaning,
            defaults_applied,
        })
    }

    /// Review sections for the current flow with their non-empty values.
    pub fn review_summary(&self) -> Vec<(SummarySection, Vec<ReviewRow>)> {
        let Some(flow) = self.flow else {
            return Vec::new();
        };

        summary_sections(flow)
            .iter()
            .map(|section| {
                let rows = step_sequence(flow)
                    .iter()
                    .filter(|step| section.source_kinds().contains(&step.kind))
                    .flat_map(|step| {
                        let values = self.form.step(step.id);
                        fields_for(flow, step.kind).iter().filter_map(move |field| {
                            let value = values?.get(field.key).and_then(value_to_text)?;
                            (!value.is_empty()).then(|| ReviewRow {
                                label: field.display_name(),
                                value,
                            })
                        })
                    })
                    .collect();
                (*section, rows)
            })
            .collect()
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.is_submitted() {
            return Err(WizardError::Closed);
        }
        Ok(())
    }

    fn position(&self) -> Result<(FlowType, usize, &'static StepDefinition), WizardError> {
        let flow = self.flow.ok_or(WizardError::NoFlowSelected)?;
        let index = self.stage.index().ok_or(WizardError::NoFlowSelected)?;
        let step = step_sequence(flow)
            .get(index)
            .ok_or_else(|| WizardError::UnknownStep(index.to_string()))?;
        Ok((flow, index, step))
    }

    fn reachable_step(
        &self,
        step_id: &str,
    ) -> Result<(FlowType, usize, &'static StepDefinition), WizardError> {
        let flow = self.flow.ok_or(WizardError::NoFlowSelected)?;
        let (index, step) =
            find_step(flow, step_id).ok_or_else(|| WizardError::UnknownStep(step_id.to_string()))?;
        if index > self.furthest {
            return Err(WizardError::StepNotReached(step.id.to_string()));
        }
        Ok((flow, index, step))
    }
}
