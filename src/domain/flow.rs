// src/domain/flow.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failures while turning raw category / listing-type / flow strings into a `FlowType`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("unknown flow `{0}`")]
    UnknownFlow(String),
    #[error("unknown property category `{0}`")]
    UnknownCategory(String),
    #[error("unknown listing type `{0}`")]
    UnknownListingType(String),
    #[error("{listing_type} listings are not offered for {category} properties")]
    UnsupportedCombination {
        category: Category,
        listing_type: ListingType,
    },
    #[error("a listing type is required when a category is given (and vice versa)")]
    IncompleteSignal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Residential,
    Commercial,
    Land,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Residential, Category::Commercial, Category::Land];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Residential => "residential",
            Category::Commercial => "commercial",
            Category::Land => "land",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Residential => "Residential",
            Category::Commercial => "Commercial",
            Category::Land => "Land / Plot",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "residential" => Ok(Category::Residential),
            "commercial" => Ok(Category::Commercial),
            "land" | "plot" => Ok(Category::Land),
            other => Err(FlowError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
    Flatmates,
    #[serde(rename = "pghostel")]
    PgHostel,
    Coworking,
}

impl ListingType {
    /// URL slug, also the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
            ListingType::Flatmates => "flatmates",
            ListingType::PgHostel => "pghostel",
            ListingType::Coworking => "coworking",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingType::Rent => "Rent",
            ListingType::Sale => "Sale",
            ListingType::Flatmates => "Flatmates",
            ListingType::PgHostel => "PG / Hostel",
            ListingType::Coworking => "Coworking",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rent" => Ok(ListingType::Rent),
            "sale" | "sell" => Ok(ListingType::Sale),
            "flatmates" | "flatmate" => Ok(ListingType::Flatmates),
            "pghostel" | "pg_hostel" | "pg-hostel" | "pg" | "hostel" => Ok(ListingType::PgHostel),
            "coworking" | "co-working" => Ok(ListingType::Coworking),
            other => Err(FlowError::UnknownListingType(other.to_string())),
        }
    }
}

/// The closed set of wizard flows: one per supported (category, listing type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowType {
    #[serde(rename = "residential_rent")]
    ResidentialRent,
    #[serde(rename = "residential_sale")]
    ResidentialSale,
    #[serde(rename = "residential_flatmates")]
    ResidentialFlatmates,
    #[serde(rename = "residential_pghostel")]
    ResidentialPgHostel,
    #[serde(rename = "commercial_rent")]
    CommercialRent,
    #[serde(rename = "commercial_sale")]
    CommercialSale,
    #[serde(rename = "commercial_coworking")]
    CommercialCoworking,
    #[serde(rename = "land_sale")]
    LandSale,
}

impl FlowType {
    pub const ALL: [FlowType; 8] = [
        FlowType::ResidentialRent,
        FlowType::ResidentialSale,
        FlowType::ResidentialFlatmates,
        FlowType::ResidentialPgHostel,
        FlowType::CommercialRent,
        FlowType::CommercialSale,
        FlowType::CommercialCoworking,
        FlowType::LandSale,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FlowType::ResidentialRent => "residential_rent",
            FlowType::ResidentialSale => "residential_sale",
            FlowType::ResidentialFlatmates => "residential_flatmates",
            FlowType::ResidentialPgHostel => "residential_pghostel",
            FlowType::CommercialRent => "commercial_rent",
            FlowType::CommercialSale => "commercial_sale",
            FlowType::CommercialCoworking => "commercial_coworking",
            FlowType::LandSale => "land_sale",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            FlowType::ResidentialRent
            | FlowType::ResidentialSale
            | FlowType::ResidentialFlatmates
            | FlowType::ResidentialPgHostel => Category::Residential,
            FlowType::CommercialRent | FlowType::CommercialSale | FlowType::CommercialCoworking => {
                Category::Commercial
            }
            FlowType::LandSale => Category::Land,
        }
    }

    pub fn listing_type(&self) -> ListingType {
        match self {
            FlowType::ResidentialRent | FlowType::CommercialRent => ListingType::Rent,
            FlowType::ResidentialSale | FlowType::CommercialSale | FlowType::LandSale => {
                ListingType::Sale
            }
            FlowType::ResidentialFlatmates => ListingType::Flatmates,
            FlowType::ResidentialPgHostel => ListingType::PgHostel,
            FlowType::CommercialCoworking => ListingType::Coworking,
        }
    }

    pub fn label(&self) -> String {
        format!("{} · {}", self.category().label(), self.listing_type().label())
    }

    /// Strict lookup by flow key (`residential_rent`, `land_sale`, ...).
    pub fn from_key(key: &str) -> Result<FlowType, FlowError> {
        let wanted = key.trim().to_lowercase();
        FlowType::ALL
            .into_iter()
            .find(|flow| flow.key() == wanted)
            .ok_or(FlowError::UnknownFlow(wanted))
    }

    /// Resolves a (category, listing type) pair. Pairs the product does not offer are errors.
    pub fn from_parts(category: Category, listing_type: ListingType) -> Result<FlowType, FlowError> {
        match (category, listing_type) {
            (Category::Residential, ListingType::Rent) => Ok(FlowType::ResidentialRent),
            (Category::Residential, ListingType::Sale) => Ok(FlowType::ResidentialSale),
            (Category::Residential, ListingType::Flatmates) => Ok(FlowType::ResidentialFlatmates),
            (Category::Residential, ListingType::PgHostel) => Ok(FlowType::ResidentialPgHostel),
            (Category::Commercial, ListingType::Rent) => Ok(FlowType::CommercialRent),
            (Category::Commercial, ListingType::Sale) => Ok(FlowType::CommercialSale),
            (Category::Commercial, ListingType::Coworking) => Ok(FlowType::CommercialCoworking),
            (Category::Land, ListingType::Sale) => Ok(FlowType::LandSale),
            (category, listing_type) => Err(FlowError::UnsupportedCombination {
                category,
                listing_type,
            }),
        }
    }

    /// Listing types offered for a category, in menu order.
    pub fn listing_types_for(category: Category) -> Vec<ListingType> {
        FlowType::ALL
            .iter()
            .filter(|flow| flow.category() == category)
            .map(|flow| flow.listing_type())
            .collect()
    }

    /// Base URL of this flow's wizard: `/properties/list/{category}/{listingType}`.
    pub fn wizard_path(&self) -> String {
        format!(
            "/properties/list/{}/{}",
            self.category().as_str(),
            self.listing_type().as_str()
        )
    }

    pub fn step_path(&self, step_id: &str) -> String {
        format!("{}/{}", self.wizard_path(), step_id)
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FlowType {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlowType::from_key(s)
    }
}

/// What a wizard screen is for. Step ids are flow-specific, kinds are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    BasicDetails,
    Location,
    Rental,
    SaleDetails,
    RoomDetails,
    HouseRules,
    Preferences,
    SpaceDetails,
    Pricing,
    LandFeatures,
    Features,
    Photos,
    Review,
}

impl StepKind {
    /// Photos and review screens drive their own progression and hide the Next/Previous bar.
    pub fn is_self_paced(&self) -> bool {
        matches!(self, StepKind::Photos | StepKind::Review)
    }
}

/// One screen of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: StepKind,
}

impl StepDefinition {
    pub const fn new(id: &'static str, label: &'static str, kind: StepKind) -> Self {
        Self { id, label, kind }
    }

    pub fn shows_navigation(&self) -> bool {
        !self.kind.is_self_paced()
    }
}
