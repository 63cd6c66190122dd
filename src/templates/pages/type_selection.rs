// templates/pages/type_selection.rs

use crate::config::SiteConfig;
use crate::domain::flow::{Category, FlowType};
use crate::templates::{components::card, desktop_layout};
use maud::{html, Markup};

/// Category / listing-type picker. `resume` points at an unfinished listing.
pub fn type_selection_page(
    site: &SiteConfig,
    owner_email: &str,
    resume: Option<(FlowType, String)>,
) -> Markup {
    desktop_layout(
        site,
        "What are you listing?",
        Some(owner_email),
        html! {
            main class="container" {
                h1 { "What are you listing?" }

                @if let Some((flow, href)) = &resume {
                    (card("Pick up where you left off", html! {
                        p { "You have an unfinished " (flow.label()) " listing." }
                        a href=(href) class="btn primary" { "Continue" }
                    }))
                }

                div class="category-grid" {
                    @for category in Category::ALL {
                        (card(category.label(), html! {
                            ul class="listing-types" {
                                @for listing_type in FlowType::listing_types_for(category) {
                                    @if let Ok(flow) = FlowType::from_parts(category, listing_type) {
                                        li { a href=(flow.wizard_path()) { (listing_type.label()) } }
                                    }
                                }
                            }
                        }))
                    }
                }
            }
        },
    )
}
