// templates/pages/review.rs

use crate::domain::catalog::step_sequence;
use crate::templates::components::{card, error_box, notice_box};
use crate::templates::desktop_layout;
use crate::templates::pages::wizard_step::{progress, StepPageVm};
use maud::{html, Markup};

/// Read-only summary with the two submit actions.
pub fn review_page(vm: &StepPageVm<'_>) -> Markup {
    let summary = vm.session.review_summary();

    desktop_layout(
        vm.site,
        "Review your listing",
        Some(vm.owner_email),
        html! {
            main class="container wizard" {
                p class="microcopy" { (vm.flow.label()) }
                (progress(vm))

                h1 { "Review your listing" }

                @if let Some(message) = vm.notice {
                    (notice_box(message))
                }

                @for (section, rows) in &summary {
                    @let edit_href = step_sequence(vm.flow)
                        .iter()
                        .find(|step| section.source_kinds().contains(&step.kind))
                        .map(|step| vm.flow.step_path(step.id));
                    (card(section.title(), html! {
                        @if rows.is_empty() {
                            p class="microcopy" { "Nothing added yet." }
                        } @else {
                            dl {
                                @for row in rows {
                                    dt { (row.label) }
                                    dd { (row.value) }
                                }
                            }
                        }
                        @if let Some(href) = &edit_href {
                            a href=(href) { "Edit" }
                        }
                    }))
                }

                @if let Some(message) = vm.error {
                    (error_box(message))
                }

                form method="post" action=(vm.flow.step_path(vm.step.id)) class="wizard-submit" {
                    button type="submit" name="action" value="previous" class="btn" { "Back" }
                    button type="submit" name="action" value="save_draft" class="btn btn-secondary" { "Save as draft" }
                    button type="submit" name="action" value="publish" class="btn primary" { "Save and publish" }
                }
            }
        },
    )
}
