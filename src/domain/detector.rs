// src/domain/detector.rs

use crate::domain::flow::{Category, FlowError, FlowType, ListingType};
use serde::Serialize;

/// Raw inputs the wizard can use to work out which flow applies.
#[derive(Debug, Clone, Default)]
pub struct FlowSignals<'a> {
    pub category: Option<&'a str>,
    pub listing_type: Option<&'a str>,
    /// A full flow key such as `commercial_sale`, e.g. read back from a stored listing.
    pub flow_type: Option<&'a str>,
    pub path: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    Explicit,
    Path,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub flow: FlowType,
    pub source: DetectionSource,
}

/// Resolves the active flow.
///
/// Explicit values win and must be valid; otherwise the path is classified;
/// with no usable signal the result is `residential_rent` marked as `Default`.
pub fn detect(signals: &FlowSignals<'_>) -> Result<Detection, FlowError> {
    if let Some(flow) = explicit_flow(signals)? {
        return Ok(Detection {
            flow,
            source: DetectionSource::Explicit,
        });
    }

    if let Some(path) = signals.path {
        if let Some(flow) = classify_path(path) {
            return Ok(Detection {
                flow,
                source: DetectionSource::Path,
            });
        }
    }

    Ok(Detection {
        flow: FlowType::ResidentialRent,
        source: DetectionSource::Default,
    })
}

fn explicit_flow(signals: &FlowSignals<'_>) -> Result<Option<FlowType>, FlowError> {
    if let Some(key) = non_blank(signals.flow_type) {
        return FlowType::from_key(key).map(Some);
    }

    match (non_blank(signals.category), non_blank(signals.listing_type)) {
        (Some(category), Some(listing_type)) => {
            let category: Category = category.parse()?;
            let listing_type: ListingType = listing_type.parse()?;
            FlowType::from_parts(category, listing_type).map(Some)
        }
        (None, None) => Ok(None),
        _ => Err(FlowError::IncompleteSignal),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Path-based modes in precedence order. Exactly one is produced per path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathMode {
    PgHostel,
    CommercialRent,
    CommercialSale,
    Coworking,
    LandSale,
    Flatmates,
    Sale,
    Rent,
}

impl PathMode {
    fn flow(self) -> FlowType {
        match self {
            PathMode::PgHostel => FlowType::ResidentialPgHostel,
            PathMode::CommercialRent => FlowType::CommercialRent,
            PathMode::CommercialSale => FlowType::CommercialSale,
            PathMode::Coworking => FlowType::CommercialCoworking,
            PathMode::LandSale => FlowType::LandSale,
            PathMode::Flatmates => FlowType::ResidentialFlatmates,
            PathMode::Sale => FlowType::ResidentialSale,
            PathMode::Rent => FlowType::ResidentialRent,
        }
    }
}

/// Classifies a URL path by its lowercase alphanumeric tokens.
/// Returns `None` when the path carries no flow signal at all.
pub fn classify_path(path: &str) -> Option<FlowType> {
    let lowered = path.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let has = |words: &[&str]| tokens.iter().any(|t| words.contains(t));

    let commercial = has(&["commercial"]);
    let rent = has(&["rent", "rental", "lease"]);
    let sale = has(&["sale", "sell", "buy"]);
    let coworking = has(&["coworking"]) || lowered.contains("co-working");

    let mode = if has(&["pg", "pghostel", "hostel"]) {
        PathMode::PgHostel
    } else if commercial && rent {
        PathMode::CommercialRent
    } else if commercial && sale {
        PathMode::CommercialSale
    } else if coworking {
        PathMode::Coworking
    } else if has(&["land", "plot", "plots"]) {
        PathMode::LandSale
    } else if has(&["flatmates", "flatmate"]) {
        PathMode::Flatmates
    } else if sale {
        PathMode::Sale
    } else if rent {
        PathMode::Rent
    } else {
        return None;
    };

    Some(mode.flow())
}

/// Derived per-flow booleans used by templates for conditional rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeFlags {
    pub is_land_sale_mode: bool,
    pub is_coworking_mode: bool,
    pub is_pg_hostel_mode: bool,
    pub is_commercial_rent_mode: bool,
    pub is_commercial_sale_mode: bool,
    pub is_flatmates_mode: bool,
}

impl ModeFlags {
    pub fn for_flow(flow: FlowType) -> Self {
        Self {
            is_land_sale_mode: flow == FlowType::LandSale,
            is_coworking_mode: flow == FlowType::CommercialCoworking,
            is_pg_hostel_mode: flow == FlowType::ResidentialPgHostel,
            is_commercial_rent_mode: flow == FlowType::CommercialRent,
            is_commercial_sale_mode: flow == FlowType::CommercialSale,
            is_flatmates_mode: flow == FlowType::ResidentialFlatmates,
        }
    }

    pub fn any(&self) -> bool {
        self.is_land_sale_mode
            || self.is_coworking_mode
            || self.is_pg_hostel_mode
            || self.is_commercial_rent_mode
            || self.is_commercial_sale_mode
            || self.is_flatmates_mode
    }
}
