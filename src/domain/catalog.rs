// src/domain/catalog.rs
//
// Static step and review-section tables for every flow.

use crate::domain::flow::{FlowType, StepDefinition, StepKind};
use serde::Serialize;

use StepKind::*;

const RESIDENTIAL_RENT: &[StepDefinition] = &[
    StepDefinition::new("res_rent_basic_details", "Basic Details", BasicDetails),
    StepDefinition::new("res_rent_location", "Location", Location),
    StepDefinition::new("res_rent_rental", "Rental Details", Rental),
    StepDefinition::new("res_rent_features", "Amenities", Features),
    StepDefinition::new("res_rent_photos", "Photos", Photos),
    StepDefinition::new("res_rent_review", "Review", Review),
];

const RESIDENTIAL_SALE: &[StepDefinition] = &[
    StepDefinition::new("res_sale_basic_details", "Basic Details", BasicDetails),
    StepDefinition::new("res_sale_location", "Location", Location),
    StepDefinition::new("res_sale_sale_details", "Sale Details", SaleDetails),
    StepDefinition::new("res_sale_features", "Amenities", Features),
    StepDefinition::new("res_sale_photos", "Photos", Photos),
    StepDefinition::new("res_sale_review", "Review", Review),
];

const RESIDENTIAL_FLATMATES: &[StepDefinition] = &[
    StepDefinition::new("flatmate_basic_details", "Basic Details", BasicDetails),
    StepDefinition::new("flatmate_location", "Location", Location),
    StepDefinition::new("flatmate_room_details", "Room Details", RoomDetails),
    StepDefinition::new("flatmate_preferences", "Flatmate Preferences", Preferences),
    StepDefinition::new("flatmate_features", "Amenities", Features),
    StepDefinition::new("flatmate_photos", "Photos", Photos),
    StepDefinition::new("flatmate_review", "Review", Review),
];

const RESIDENTIAL_PG_HOSTEL: &[StepDefinition] = &[
    StepDefinition::new("pg_basic_details", "PG Details", BasicDetails),
    StepDefinition::new("pg_location", "Location", Location),
    StepDefinition::new("pg_room_details", "Room Details", RoomDetails),
    StepDefinition::new("pg_house_rules", "House Rules", HouseRules),
    StepDefinition::new("pg_features", "Amenities", Features),
    StepDefinition::new("pg_photos", "Photos", Photos),
    StepDefinition::new("pg_review", "Review", Review),
];

const COMMERCIAL_RENT: &[StepDefinition] = &[
    StepDefinition::new("com_rent_basic_details", "Basic Details", BasicDetails),
    StepDefinition::new("com_rent_location", "Location", Location),
    StepDefinition::new("com_rent_rental", "Rental Details", Rental),
    StepDefinition::new("com_rent_features", "Amenities", Features),
    StepDefinition::new("com_rent_photos", "Photos", Photos),
    StepDefinition::new("com_rent_review", "Review", Review),
];

const COMMERCIAL_SALE: &[StepDefinition] = &[
    StepDefinition::new("com_sale_basic_details", "Basic Details", BasicDetails),
    StepDefinition::new("com_sale_location", "Location", Location),
    StepDefinition::new("com_sale_sale_details", "Sale Details", SaleDetails),
    StepDefinition::new("com_sale_features", "Amenities", Features),
    StepDefinition::new("com_sale_photos", "Photos", Photos),
    StepDefinition::new("com_sale_review", "Review", Review),
];

const COMMERCIAL_COWORKING: &[StepDefinition] = &[
    StepDefinition::new("coworking_basic_details", "Space Overview", BasicDetails),
    StepDefinition::new("coworking_location", "Location", Location),
    StepDefinition::new("coworking_space_details", "Space Details", SpaceDetails),
    StepDefinition::new("coworking_pricing", "Pricing", Pricing),
    StepDefinition::new("coworking_features", "Amenities", Features),
    StepDefinition::new("coworking_photos", "Photos", Photos),
    StepDefinition::new("coworking_review", "Review", Review),
];

const LAND_SALE: &[StepDefinition] = &[
    StepDefinition::new("land_sale_basic_details", "Plot Details", BasicDetails),
    StepDefinition::new("land_sale_location", "Location", Location),
    StepDefinition::new("land_sale_land_features", "Land Features", LandFeatures),
    StepDefinition::new("land_sale_sale_details", "Sale Details", SaleDetails),
    StepDefinition::new("land_sale_photos", "Photos", Photos),
    StepDefinition::new("land_sale_review", "Review", Review),
];

/// Ordered wizard steps of a flow.
pub fn step_sequence(flow: FlowType) -> &'static [StepDefinition] {
    match flow {
        FlowType::ResidentialRent => RESIDENTIAL_RENT,
        FlowType::ResidentialSale => RESIDENTIAL_SALE,
        FlowType::ResidentialFlatmates => RESIDENTIAL_FLATMATES,
        FlowType::ResidentialPgHostel => RESIDENTIAL_PG_HOSTEL,
        FlowType::CommercialRent => COMMERCIAL_RENT,
        FlowType::CommercialSale => COMMERCIAL_SALE,
        FlowType::CommercialCoworking => COMMERCIAL_COWORKING,
        FlowType::LandSale => LAND_SALE,
    }
}

/// Lenient lookup by raw flow key. Unknown keys resolve to the residential-rent
/// sequence; the returned `FlowType` tells the caller which flow was actually used.
pub fn step_sequence_or_default(key: &str) -> (FlowType, &'static [StepDefinition]) {
    match FlowType::from_key(key) {
        Ok(flow) => (flow, step_sequence(flow)),
        Err(err) => {
            tracing::warn!(%err, "falling back to residential_rent steps");
            (FlowType::ResidentialRent, RESIDENTIAL_RENT)
        }
    }
}

pub fn find_step(flow: FlowType, step_id: &str) -> Option<(usize, &'static StepDefinition)> {
    step_sequence(flow)
        .iter()
        .enumerate()
        .find(|(_, step)| step.id == step_id)
}

pub fn valid_step_ids(flow: FlowType) -> impl Iterator<Item = &'static str> {
    step_sequence(flow).iter().map(|step| step.id)
}

/// Read-only review sections. Each is filled from the steps of the listed kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySection {
    Overview,
    Location,
    RentalTerms,
    SaleTerms,
    RoomSetup,
    HouseRules,
    FlatmatePreferences,
    Workspace,
    Plans,
    PlotFeatures,
    Amenities,
    Photos,
}

impl SummarySection {
    pub fn id(&self) -> &'static str {
        match self {
            SummarySection::Overview => "overview",
            SummarySection::Location => "location",
            SummarySection::RentalTerms => "rental_terms",
            SummarySection::SaleTerms => "sale_terms",
            SummarySection::RoomSetup => "room_setup",
            SummarySection::HouseRules => "house_rules",
            SummarySection::FlatmatePreferences => "flatmate_preferences",
            SummarySection::Workspace => "workspace",
            SummarySection::Plans => "plans",
            SummarySection::PlotFeatures => "plot_features",
            SummarySection::Amenities => "amenities",
            SummarySection::Photos => "photos",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SummarySection::Overview => "Overview",
            SummarySection::Location => "Location",
            SummarySection::RentalTerms => "Rental Terms",
            SummarySection::SaleTerms => "Sale Terms",
            SummarySection::RoomSetup => "Rooms",
            SummarySection::HouseRules => "House Rules",
            SummarySection::FlatmatePreferences => "Flatmate Preferences",
            SummarySection::Workspace => "Workspace",
            SummarySection::Plans => "Plans & Pricing",
            SummarySection::PlotFeatures => "Plot Features",
            SummarySection::Amenities => "Amenities",
            SummarySection::Photos => "Photos",
        }
    }

    pub fn source_kinds(&self) -> &'static [StepKind] {
        match self {
            SummarySection::Overview => &[BasicDetails],
            SummarySection::Location => &[Location],
            SummarySection::RentalTerms => &[Rental],
            SummarySection::SaleTerms => &[SaleDetails],
            SummarySection::RoomSetup => &[RoomDetails],
            SummarySection::HouseRules => &[HouseRules],
            SummarySection::FlatmatePreferences => &[Preferences],
            SummarySection::Workspace => &[SpaceDetails],
            SummarySection::Plans => &[Pricing],
            SummarySection::PlotFeatures => &[LandFeatures],
            SummarySection::Amenities => &[Features],
            SummarySection::Photos => &[Photos],
        }
    }
}

pub fn summary_sections(flow: FlowType) -> &'static [SummarySection] {
    use SummarySection as S;
    match flow {
        FlowType::ResidentialRent | FlowType::CommercialRent => &[
            S::Overview,
            S::Location,
            S::RentalTerms,
            S::Amenities,
            S::Photos,
        ],
        FlowType::ResidentialSale | FlowType::CommercialSale => &[
            S::Overview,
            S::Location,
            S::SaleTerms,
            S::Amenities,
            S::Photos,
        ],
        FlowType::ResidentialFlatmates => &[
            S::Overview,
            S::Location,
            S::RoomSetup,
            S::FlatmatePreferences,
            S::Amenities,
            S::Photos,
        ],
        FlowType::ResidentialPgHostel => &[
            S::Overview,
            S::Location,
            S::RoomSetup,
            S::HouseRules,
            S::Amenities,
            S::Photos,
        ],
        FlowType::CommercialCoworking => &[
            S::Overview,
            S::Location,
            S::Workspace,
            S::Plans,
            S::Amenities,
            S::Photos,
        ],
        FlowType::LandSale => &[
            S::Overview,
            S::Location,
            S::PlotFeatures,
            S::SaleTerms,
            S::Photos,
        ],
    }
}
