// src/domain/schema.rs
//
// Field registry for every wizard step. Validation and rendering both read
// from here instead of inspecting markup.

use crate::domain::flow::{Category, FlowType, StepKind};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    LongText,
    Choice(&'static [&'static str]),
}

/// Conditional rendering rule, evaluated against the step's own values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Always,
    WhenEquals {
        field: &'static str,
        value: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: &'static str,
    /// May be empty, in which case the placeholder names the field.
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub kind: FieldKind,
    pub required: bool,
    pub visibility: Visibility,
    /// Flat top-level key this value is mirrored into for older readers.
    pub legacy_key: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn required(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            placeholder: None,
            kind,
            required: true,
            visibility: Visibility::Always,
            legacy_key: None,
        }
    }

    pub const fn optional(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        let mut field = Self::required(key, label, kind);
        field.required = false;
        field
    }

    pub const fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = Some(text);
        self
    }

    pub const fn shown_when(mut self, field: &'static str, value: &'static str) -> Self {
        self.visibility = Visibility::WhenEquals { field, value };
        self
    }

    pub const fn legacy(mut self, key: &'static str) -> Self {
        self.legacy_key = Some(key);
        self
    }

    /// Human name used in validation messages: label, else placeholder, else key.
    pub fn display_name(&self) -> &'static str {
        if !self.label.trim().is_empty() {
            self.label
        } else {
            self.placeholder
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(self.key)
        }
    }

    pub fn is_visible(&self, values: &Map<String, Value>) -> bool {
        match self.visibility {
            Visibility::Always => true,
            Visibility::WhenEquals { field, value } => values
                .get(field)
                .and_then(Value::as_str)
                .map(|current| current.trim().eq_ignore_ascii_case(value))
                .unwrap_or(false),
        }
    }
}

/// Empty means absent, null, whitespace-only text, or an empty list/object.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

use FieldKind::{Choice, LongText, Number, Text};

const YES_NO: &[&str] = &["Yes", "No"];

const TITLE: FieldDescriptor = FieldDescriptor::optional("title", "Listing title", Text)
    .placeholder("e.g. Sunny 2BHK near the metro")
    .legacy("title");
const DESCRIPTION: FieldDescriptor =
    FieldDescriptor::optional("description", "Description", LongText).legacy("description");

const RESIDENTIAL_BASIC: &[FieldDescriptor] = &[
    TITLE,
    FieldDescriptor::required(
        "propertyType",
        "Property type",
        Choice(&["Apartment", "Independent House", "Villa", "Builder Floor"]),
    )
    .legacy("propertyType"),
    FieldDescriptor::required(
        "bhkType",
        "BHK type",
        Choice(&["1 RK", "1 BHK", "2 BHK", "3 BHK", "4+ BHK"]),
    )
    .legacy("bhkType"),
    FieldDescriptor::required("builtUpArea", "Built-up area (sq.ft)", Number).legacy("builtUpArea"),
    FieldDescriptor::optional(
        "furnishing",
        "Furnishing",
        Choice(&["Unfurnished", "Semi-furnished", "Fully furnished"]),
    ),
    DESCRIPTION,
];

const COMMERCIAL_BASIC: &[FieldDescriptor] = &[
    TITLE,
    FieldDescriptor::required(
        "propertyType",
        "Property type",
        Choice(&["Office Space", "Shop", "Showroom", "Warehouse", "Industrial Building"]),
    )
    .legacy("propertyType"),
    FieldDescriptor::required("builtUpArea", "Built-up area (sq.ft)", Number).legacy("builtUpArea"),
    FieldDescriptor::optional("floor", "Floor", Text),
    DESCRIPTION,
];

const COWORKING_BASIC: &[FieldDescriptor] = &[
    FieldDescriptor::optional("title", "Space name", Text).legacy("title"),
    FieldDescriptor::required(
        "propertyType",
        "Space type",
        Choice(&["Coworking Space", "Private Office", "Virtual Office"]),
    )
    .legacy("propertyType"),
    FieldDescriptor::required("totalSeats", "Total seats", Number),
    DESCRIPTION,
];

const PG_BASIC: &[FieldDescriptor] = &[
    FieldDescriptor::optional("title", "PG / hostel name", Text).legacy("title"),
    FieldDescriptor::required(
        "propertyType",
        "Accommodation type",
        Choice(&["PG", "Hostel", "Co-living"]),
    )
    .legacy("propertyType"),
    FieldDescriptor::required("pgFor", "Available for", Choice(&["Boys", "Girls", "Anyone"])),
    DESCRIPTION,
];

const LAND_BASIC: &[FieldDescriptor] = &[
    TITLE,
    FieldDescriptor::required(
        "propertyType",
        "Plot type",
        Choice(&["Residential Plot", "Commercial Plot", "Agricultural Land"]),
    )
    .legacy("propertyType"),
    FieldDescriptor::required("plotArea", "Plot area", Number).legacy("plotArea"),
    FieldDescriptor::required("areaUnit", "Area unit", Choice(&["sq.ft", "sq.yd", "acre"])),
    DESCRIPTION,
];

const LOCATION: &[FieldDescriptor] = &[
    FieldDescriptor::required("city", "City", Text).legacy("city"),
    FieldDescriptor::required("locality", "Locality", Text).legacy("locality"),
    FieldDescriptor::optional("address", "Street address", Text).legacy("address"),
    FieldDescriptor::optional("landmark", "", Text).placeholder("Nearby landmark"),
    FieldDescriptor::optional("pincode", "PIN code", Text),
];

const RESIDENTIAL_RENTAL: &[FieldDescriptor] = &[
    FieldDescriptor::required("rentAmount", "Monthly rent", Number).legacy("rentAmount"),
    FieldDescriptor::required("securityDeposit", "Security deposit", Number)
        .legacy("securityDeposit"),
    FieldDescriptor::required("maintenance", "Maintenance", Choice(&["Included", "Extra"])),
    FieldDescriptor::required("maintenanceAmount", "Maintenance amount", Number)
        .shown_when("maintenance", "Extra"),
    FieldDescriptor::required("availableFrom", "", Text).placeholder("Available from (YYYY-MM-DD)"),
    FieldDescriptor::optional(
        "preferredTenants",
        "Preferred tenants",
        Choice(&["Anyone", "Family", "Bachelors", "Company"]),
    ),
];

const COMMERCIAL_RENTAL: &[FieldDescriptor] = &[
    FieldDescriptor::required("rentAmount", "Monthly rent", Number).legacy("rentAmount"),
    FieldDescriptor::required("securityDeposit", "Security deposit", Number)
        .legacy("securityDeposit"),
    FieldDescriptor::required("maintenance", "Maintenance", Choice(&["Included", "Extra"])),
    FieldDescriptor::required("maintenanceAmount", "Maintenance amount", Number)
        .shown_when("maintenance", "Extra"),
    FieldDescriptor::optional("lockInMonths", "Lock-in period (months)", Number),
    FieldDescriptor::required("availableFrom", "", Text).placeholder("Available from (YYYY-MM-DD)"),
];

const SALE_DETAILS: &[FieldDescriptor] = &[
    FieldDescriptor::required("expectedPrice", "Expected price", Number).legacy("expectedPrice"),
    FieldDescriptor::optional("priceNegotiable", "Price negotiable", Choice(YES_NO)),
    FieldDescriptor::required(
        "ownership",
        "Ownership",
        Choice(&["Freehold", "Leasehold", "Co-operative Society", "Power of Attorney"]),
    ),
    FieldDescriptor::required(
        "possession",
        "Possession status",
        Choice(&["Ready to Move", "Under Construction"]),
    ),
    FieldDescriptor::required("possessionDate", "Expected possession date", Text)
        .shown_when("possession", "Under Construction"),
];

const ROOM_DETAILS: &[FieldDescriptor] = &[
    FieldDescriptor::required(
        "roomType",
        "Room type",
        Choice(&["Single", "Double", "Triple", "Dormitory"]),
    ),
    FieldDescriptor::required("rentAmount", "Monthly rent per bed", Number).legacy("rentAmount"),
    FieldDescriptor::required("securityDeposit", "Security deposit", Number)
        .legacy("securityDeposit"),
    FieldDescriptor::optional("mealsIncluded", "Meals included", Choice(YES_NO)),
];

const HOUSE_RULES: &[FieldDescriptor] = &[
    FieldDescriptor::required("visitorsAllowed", "Visitors allowed", Choice(YES_NO)),
    FieldDescriptor::optional("curfew", "Gate closing time applies", Choice(YES_NO)),
    FieldDescriptor::required("gateClosingTime", "Gate closing time", Text)
        .shown_when("curfew", "Yes"),
    FieldDescriptor::optional("smokingAllowed", "Smoking allowed", Choice(YES_NO)),
    FieldDescriptor::optional("nonVegAllowed", "Non-veg food allowed", Choice(YES_NO)),
];

const PREFERENCES: &[FieldDescriptor] = &[
    FieldDescriptor::required(
        "genderPreference",
        "Looking for",
        Choice(&["Any", "Male", "Female"]),
    ),
    FieldDescriptor::optional(
        "occupation",
        "Occupation",
        Choice(&["Any", "Student", "Working Professional"]),
    ),
    FieldDescriptor::optional("nonVegAllowed", "Non-veg food allowed", Choice(YES_NO)),
];

const SPACE_DETAILS: &[FieldDescriptor] = &[
    FieldDescriptor::required("openingTime", "Opens at", Text).placeholder("09:00"),
    FieldDescriptor::required("closingTime", "Closes at", Text).placeholder("20:00"),
    FieldDescriptor::required(
        "operatingDays",
        "Operating days",
        Choice(&["Weekdays", "Monday to Saturday", "All days"]),
    ),
    FieldDescriptor::optional("meetingRooms", "Meeting rooms", Number),
];

const PRICING: &[FieldDescriptor] = &[
    FieldDescriptor::required("pricePerSeat", "Price per seat (monthly)", Number)
        .legacy("pricePerSeat"),
    FieldDescriptor::optional(
        "minimumTerm",
        "Minimum term",
        Choice(&["Daily", "Weekly", "Monthly"]),
    ),
];

const LAND_FEATURES: &[FieldDescriptor] = &[
    FieldDescriptor::required("boundaryWall", "Boundary wall", Choice(YES_NO)),
    FieldDescriptor::optional("cornerPlot", "Corner plot", Choice(YES_NO)),
    FieldDescriptor::optional("roadWidth", "Facing road width (ft)", Number),
    FieldDescriptor::optional("approvals", "Approvals", Text).placeholder("e.g. DTCP, RERA"),
];

const FEATURES: &[FieldDescriptor] = &[
    FieldDescriptor::required("parking", "Parking available", Choice(YES_NO)),
    FieldDescriptor::required("parkingCount", "Parking slots", Number).shown_when("parking", "Yes"),
    FieldDescriptor::optional(
        "powerBackup",
        "Power backup",
        Choice(&["None", "Partial", "Full"]),
    ),
    FieldDescriptor::optional("lift", "Lift", Choice(YES_NO)),
    FieldDescriptor::optional("amenities", "Other amenities", LongText)
        .placeholder("Gym, pool, security, ..."),
];

const PHOTOS: &[FieldDescriptor] = &[FieldDescriptor::optional("photoUrls", "Photo links", LongText)
    .placeholder("One image URL per line")];

/// Fields rendered and validated for a step kind within a flow.
pub fn fields_for(flow: FlowType, kind: StepKind) -> &'static [FieldDescriptor] {
    match kind {
        StepKind::BasicDetails => match flow {
            FlowType::ResidentialPgHostel => PG_BASIC,
            FlowType::CommercialCoworking => COWORKING_BASIC,
            _ => match flow.category() {
                Category::Residential => RESIDENTIAL_BASIC,
                Category::Commercial => COMMERCIAL_BASIC,
                Category::Land => LAND_BASIC,
            },
        },
        StepKind::Location => LOCATION,
        StepKind::Rental => match flow.category() {
            Category::Commercial => COMMERCIAL_RENTAL,
            _ => RESIDENTIAL_RENTAL,
        },
        StepKind::SaleDetails => SALE_DETAILS,
        StepKind::RoomDetails => ROOM_DETAILS,
        StepKind::HouseRules => HOUSE_RULES,
        StepKind::Preferences => PREFERENCES,
        StepKind::SpaceDetails => SPACE_DETAILS,
        StepKind::Pricing => PRICING,
        StepKind::LandFeatures => LAND_FEATURES,
        StepKind::Features => FEATURES,
        StepKind::Photos => PHOTOS,
        StepKind::Review => &[],
    }
}

pub fn find_field(flow: FlowType, kind: StepKind, key: &str) -> Option<&'static FieldDescriptor> {
    fields_for(flow, kind).iter().find(|field| field.key == key)
}
