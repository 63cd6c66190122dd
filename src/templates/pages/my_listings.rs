// templates/pages/my_listings.rs

use crate::config::SiteConfig;
use crate::domain::property::{ListingStatus, PropertySummary};
use crate::templates::components::notice_box;
use crate::templates::desktop_layout;
use chrono::DateTime;
use maud::{html, Markup};

pub struct MyListingsVm<'a> {
    pub site: &'a SiteConfig,
    pub owner_email: &'a str,
    pub listings: &'a [PropertySummary],
    pub notice: Option<String>,
}

pub fn my_listings_page(vm: &MyListingsVm<'_>) -> Markup {
    desktop_layout(
        vm.site,
        "My listings",
        Some(vm.owner_email),
        html! {
            main class="container" {
                h1 { "My listings" }

                @if let Some(message) = &vm.notice {
                    (notice_box(message))
                }

                @if vm.listings.is_empty() {
                    p { "You have not listed anything yet." }
                    a href="/properties/list" class="btn primary" { "Post a property" }
                } @else {
                    table class="listings" {
                        thead {
                            tr {
                                th { "Title" }
                                th { "Type" }
                                th { "City" }
                                th { "Price" }
                                th { "Status" }
                                th { "Updated" }
                                th {}
                            }
                        }
                        tbody {
                            @for listing in vm.listings {
                                tr {
                                    td { (listing.display_title()) }
                                    td {
                                        @match &listing.flow {
                                            Ok(flow) => (flow.label()),
                                            Err(_) => "Unknown",
                                        }
                                    }
                                    td { (listing.city.as_deref().unwrap_or("—")) }
                                    td {
                                        @match listing.price {
                                            Some(price) => { "₹" (price) }
                                            None => "—",
                                        }
                                    }
                                    td {
                                        @match listing.status {
                                            ListingStatus::Published => span class="badge badge-live" { "Published" },
                                            ListingStatus::Draft => span class="badge" { "Draft" },
                                        }
                                    }
                                    td { (format_date(listing.updated_at)) }
                                    td { a href=(format!("/properties/{}/edit", listing.id)) { "Edit" } }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn format_date(unix: i64) -> String {
    DateTime::from_timestamp(unix, 0)
        .map(|dt| dt.format("%d %b %Y").to_string())
        .unwrap_or_default()
}
