// templates/pages/wizard_step.rs

use crate::config::SiteConfig;
use crate::domain::catalog::step_sequence;
use crate::domain::detector::ModeFlags;
use crate::domain::flow::{FlowType, StepDefinition, StepKind};
use crate::domain::schema::fields_for;
use crate::templates::components::{error_box, field_input, nav_bar, notice_box};
use crate::templates::desktop_layout;
use crate::wizard::{StepValidationError, WizardSession};
use maud::{html, Markup};
use serde_json::Map;

pub struct StepPageVm<'a> {
    pub site: &'a SiteConfig,
    pub owner_email: &'a str,
    pub session: &'a WizardSession,
    pub flow: FlowType,
    pub step: &'static StepDefinition,
    pub index: usize,
    pub invalid: Option<&'a StepValidationError>,
    /// Failure not tied to a field, e.g. a save that did not go through.
    pub error: Option<&'a str>,
    pub notice: Option<&'a str>,
}

pub fn wizard_step_page(vm: &StepPageVm<'_>) -> Markup {
    desktop_layout(
        vm.site,
        vm.step.label,
        Some(vm.owner_email),
        html! {
            main class="container wizard" {
                p class="microcopy" { (vm.flow.label()) }
                (progress(vm))

                h1 { (vm.step.label) }
                @if vm.index == 0 {
                    @if let Some(hint) = flow_hint(ModeFlags::for_flow(vm.flow)) {
                        p class="microcopy" { (hint) }
                    }
                }

                @if let Some(message) = vm.notice {
                    (notice_box(message))
                }
                @if let Some(message) = vm.error {
                    (error_box(message))
                }

                form method="post" action=(vm.flow.step_path(vm.step.id)) class="wizard-form" {
                    (step_fields(vm))

                    @if vm.session.shows_navigation() {
                        (nav_bar(vm.index > 0))
                    } @else if vm.step.kind == StepKind::Photos {
                        div class="wizard-nav" {
                            button type="submit" name="action" value="previous" formnovalidate class="btn" { "Back" }
                            button type="submit" name="action" value="next" class="btn primary" { "Continue to review" }
                        }
                    }
                }
            }
        },
    )
}

fn step_fields(vm: &StepPageVm<'_>) -> Markup {
    let empty = Map::new();
    let values = vm.session.form.step(vm.step.id).unwrap_or(&empty);

    html! {
        @for field in fields_for(vm.flow, vm.step.kind) {
            @let invalid = vm.invalid.filter(|e| e.field_key == field.key);
            (field_input(field, values, invalid.is_some(), invalid.map(|e| e.message.as_str())))
        }
    }
}

fn flow_hint(flags: ModeFlags) -> Option<&'static str> {
    if flags.is_land_sale_mode {
        Some("Plots are listed for sale only. Area can be given in sq.ft, sq.yd or acres.")
    } else if flags.is_coworking_mode {
        Some("Tell seekers how many seats you have and when the space is open.")
    } else if flags.is_pg_hostel_mode {
        Some("Rent is entered per bed in the room details step.")
    } else if flags.is_flatmates_mode {
        Some("You are listing a room in a shared home.")
    } else if flags.is_commercial_rent_mode || flags.is_commercial_sale_mode {
        Some("Commercial listings are shown to business seekers only.")
    } else {
        None
    }
}

/// Step list; steps already reached are links.
pub fn progress(vm: &StepPageVm<'_>) -> Markup {
    html! {
        ol class="wizard-progress" {
            @for (i, step) in step_sequence(vm.flow).iter().enumerate() {
                li class=[(i == vm.index).then_some("current")] {
                    @if i <= vm.session.furthest && i != vm.index {
                        a href=(vm.flow.step_path(step.id)) { (step.label) }
                    } @else {
                        (step.label)
                    }
                }
            }
        }
    }
}
