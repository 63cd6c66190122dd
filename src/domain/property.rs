// src/domain/property.rs

use crate::domain::catalog::step_sequence;
use crate::domain::flow::{FlowError, FlowType};
use crate::domain::form::{value_to_text, FormData};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Draft,
    Published,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "draft",
            ListingStatus::Published => "published",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ListingStatus::Draft),
            "published" => Ok(ListingStatus::Published),
            other => Err(format!("unknown listing status `{other}`")),
        }
    }
}

/// Form key holding the headline price of `flow`.
pub fn price_key(flow: FlowType) -> &'static str {
    match flow {
        FlowType::ResidentialRent
        | FlowType::CommercialRent
        | FlowType::ResidentialFlatmates
        | FlowType::ResidentialPgHostel => "rentAmount",
        FlowType::ResidentialSale | FlowType::CommercialSale | FlowType::LandSale => {
            "expectedPrice"
        }
        FlowType::CommercialCoworking => "pricePerSeat",
    }
}

/// A listing row as it is written to storage. The denormalized columns are
/// read from the form; `details` is the whole form.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub id: Option<i64>,
    pub flow: FlowType,
    pub title: Option<String>,
    pub price: Option<i64>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub property_type: Option<String>,
    pub details: FormData,
}

impl PropertyRecord {
    pub fn from_form(id: Option<i64>, flow: FlowType, form: &FormData) -> Self {
        // The flow's own steps first, then the flat field of older rows.
        let key = price_key(flow);
        let price = step_sequence(flow)
            .iter()
            .filter_map(|step| form.step(step.id)?.get(key))
            .chain(form.fields.get(key))
            .filter_map(value_to_text)
            .find_map(|text| parse_price(&text));

        Self {
            id,
            flow,
            title: form.text_value("title"),
            price,
            city: form.text_value("city"),
            locality: form.text_value("locality"),
            property_type: form.text_value("propertyType"),
            details: form.clone(),
        }
    }
}

/// Accepts "25000", "25,000" and "25000.50" (truncated).
/// Negative, non-finite and out-of-range amounts give `None`.
fn parse_price(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    let price = match cleaned.parse::<i64>() {
        Ok(whole) => whole,
        Err(_) => whole_amount(cleaned.parse::<f64>().ok()?)?,
    };
    (price >= 0).then_some(price)
}

fn whole_amount(value: f64) -> Option<i64> {
    // 2^63 (`i64::MAX as f64`) is the first float past the range.
    if !value.is_finite() || value < 0.0 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

/// A listing read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProperty {
    pub id: i64,
    pub owner_id: i64,
    pub flow: FlowType,
    pub status: ListingStatus,
    pub form: FormData,
    pub updated_at: i64,
}

/// One row of an owner's listings page.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySummary {
    pub id: i64,
    pub title: Option<String>,
    pub flow: Result<FlowType, FlowError>,
    pub status: ListingStatus,
    pub price: Option<i64>,
    pub city: Option<String>,
    pub updated_at: i64,
}

impl PropertySummary {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled listing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_reads_denormalized_columns_from_the_form() {
        let mut form = FormData::default();
        form.mark_flow(FlowType::ResidentialRent);
        form.set_step_value("res_rent_rental", "rentAmount", json!("32,000"), Some("rentAmount"));
        form.set_step_value("res_rent_location", "city", json!("Pune"), Some("city"));
        form.set_field("title", "2BHK in Baner");

        let record = PropertyRecord::from_form(None, FlowType::ResidentialRent, &form);

        assert_eq!(record.price, Some(32000));
        assert_eq!(record.city.as_deref(), Some("Pune"));
        assert_eq!(record.title.as_deref(), Some("2BHK in Baner"));
        assert_eq!(record.locality, None);
        assert_eq!(record.details, form);
    }

    #[test]
    fn price_follows_the_flow_not_leftover_keys() {
        let mut form = FormData::default();
        form.set_step_value("res_rent_rental", "rentAmount", json!(30000), Some("rentAmount"));
        form.set_step_value(
            "res_sale_sale_details",
            "expectedPrice",
            json!(9_000_000),
            Some("expectedPrice"),
        );

        let sale = PropertyRecord::from_form(None, FlowType::ResidentialSale, &form);
        assert_eq!(sale.price, Some(9_000_000));

        let rent = PropertyRecord::from_form(None, FlowType::ResidentialRent, &form);
        assert_eq!(rent.price, Some(30000));

        let coworking = PropertyRecord::from_form(None, FlowType::CommercialCoworking, &form);
        assert_eq!(coworking.price, None);
    }

    #[test]
    fn non_finite_negative_and_huge_prices_are_dropped() {
        for text in ["NaN", "inf", "-inf", "-5", "-12.5", "1e30", "9223372036854775808"] {
            assert_eq!(parse_price(text), None, "{text}");
        }
        assert_eq!(parse_price(" 25,000.75 "), Some(25000));
        assert_eq!(parse_price("0"), Some(0));

        let mut form = FormData::default();
        form.set_step_value("res_rent_rental", "rentAmount", json!("NaN"), Some("rentAmount"));
        let record = PropertyRecord::from_form(None, FlowType::ResidentialRent, &form);
        assert_eq!(record.price, None);
    }

    #[test]
    fn sale_price_is_read_from_older_flat_rows() {
        let mut form = FormData::default();
        form.set_field("expectedPrice", 8_500_000);
        let record = PropertyRecord::from_form(Some(4), FlowType::LandSale, &form);
        assert_eq!(record.price, Some(8_500_000));
        assert_eq!(record.id, Some(4));
    }

    #[test]
    fn unparseable_prices_are_dropped() {
        let mut form = FormData::default();
        form.set_field("rentAmount", "call me");
        let record = PropertyRecord::from_form(None, FlowType::ResidentialRent, &form);
        assert_eq!(record.price, None);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [ListingStatus::Draft, ListingStatus::Published] {
            assert_eq!(status.as_str().parse::<ListingStatus>(), Ok(status));
        }
        assert!("archived".parse::<ListingStatus>().is_err());
    }
}
