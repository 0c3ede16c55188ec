use std::collections::BTreeMap;

use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A sellable catalog entry: a hotel stay, flight, transport run, activity
/// or a multi-component package composed from inventory items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub code: String,
    pub name: String,
    pub slug: String,
    pub offer_type: OfferType,
    #[serde(default)]
    pub status: OfferStatus,
    pub description: Option<String>,
    pub destination: Option<String>,
    #[serde(default)]
    pub duration: Duration,
    pub markup: Option<Markup>,
    #[serde(default)]
    pub items: Vec<OfferItem>,
    #[serde(default)]
    pub pricing: OfferPricing,
    #[serde(default)]
    pub rules: OfferRules,
    #[serde(default)]
    pub availability: Availability,
    pub created_by: ObjectId,
    pub updated_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Hotel,
    Flight,
    Transport,
    Activity,
    Package,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Nights are authoritative; days is always derived as nights + 1 and is
/// never written independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub nights: Option<u32>,
    #[serde(default)]
    pub days: u32,
}

impl Duration {
    pub fn from_nights(nights: Option<u32>) -> Self {
        Self {
            nights,
            days: nights.map(|n| n + 1).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Markup {
    pub markup_type: MarkupType,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupType {
    Percentage,
    Fixed,
}

/// A component reference inside an offer. The detail payloads are mutually
/// exclusive; which one is populated follows `resource_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferItem {
    pub resource_id: ObjectId,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_details: Option<HotelItemDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_details: Option<FlightItemDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_details: Option<TransportItemDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Hotel,
    Flight,
    Transport,
    Activity,
}

/// Per-passenger-type price points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PassengerPrices {
    #[serde(default)]
    pub adult: f64,
    #[serde(default)]
    pub child: f64,
    #[serde(default)]
    pub infant: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotelItemDetails {
    pub hotel_name: Option<String>,
    /// Room selections with per-capacity price tiers. BTreeMap keeps the
    /// fallback order ("double", else first key) deterministic.
    #[serde(default)]
    pub selected_rooms: Vec<RoomSelection>,
    /// Flat per-person pricing, used when no room tiers are selected.
    pub pricing: Option<PassengerPrices>,
    #[serde(default)]
    pub capacity_adjustments: BTreeMap<String, f64>,
    #[serde(default)]
    pub feature_adjustments: BTreeMap<String, f64>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomSelection {
    pub room_name: String,
    #[serde(default)]
    pub capacity_prices: BTreeMap<String, PassengerPrices>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightItemDetails {
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub route: Option<Route>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub cabin_class: Option<String>,
    pub pricing: Option<PassengerPrices>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportItemDetails {
    pub transport_type: Option<String>,
    pub route: Option<Route>,
    pub departure: Option<String>,
    pub pricing: Option<PassengerPrices>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferPricing {
    pub currency: String,
    /// Flat per-passenger base table for package pricing.
    pub base: Option<PassengerPrices>,
    /// Cached values recomputed from items + markup, not live formulas.
    pub base_price: Option<f64>,
    pub final_price: Option<f64>,
}

impl Default for OfferPricing {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            base: None,
            base_price: None,
            final_price: None,
        }
    }
}

/// What a buyer may alter after selecting the offer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OfferRules {
    #[serde(default)]
    pub allow_room_change: bool,
    #[serde(default)]
    pub allow_feature_change: bool,
    #[serde(default)]
    pub allow_date_change: bool,
    #[serde(default)]
    pub allow_seat_selection: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub availability_type: AvailabilityType,
    pub quantity: Option<u32>,
    pub min_pax: Option<u32>,
    pub max_pax: Option<u32>,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            availability_type: AvailabilityType::InventoryBased,
            quantity: None,
            min_pax: None,
            max_pax: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityType {
    Limited,
    InventoryBased,
    Quota,
}

impl Offer {
    pub const COLLECTION: &'static str = "offers";
}
