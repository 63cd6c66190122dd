// templates/pages/home.rs

use crate::config::SiteConfig;
use crate::templates::{components::card, desktop_layout};
use maud::{html, Markup};

pub fn home_page(site: &SiteConfig) -> Markup {
    desktop_layout(
        site,
        "Home",
        None,
        html! {
            main class="container" {
                h1 { "List your property in a few steps" }

                (card("Rent, sell or share", html! {
                    p { "Residential homes, PGs and flatmates, offices, coworking spaces and plots." }
                    a href="/properties/list" class="btn primary" { "Post a property" }
                }))

                (card("Already listed?", html! {
                    a href="/properties/mine" { "See your listings" }
                }))
            }
        },
    )
}
