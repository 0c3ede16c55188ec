//! Offer pricing: markup application and the per-unit quote over an
//! offer's component items.
//!
//! `quote` answers "what does one qualifying unit cost" for a buyer's
//! selected options. Headcount multiplication happens at booking time,
//! never here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tripdesk_db::models::{
    Markup, MarkupType, Offer, OfferItem, PassengerPrices, ResourceType,
};

/// Buyer-selected options for a quote: a room capacity key and a list of
/// feature keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectedOptions {
    pub capacity: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Derive a selling price from a supplier cost. Applied once at
/// composition/data-entry time; the result is a stored snapshot, never a
/// live formula over the current inventory cost.
pub fn apply_markup(cost: f64, markup: &Markup) -> f64 {
    match markup.markup_type {
        MarkupType::Percentage => cost * (1.0 + markup.value / 100.0),
        MarkupType::Fixed => cost + markup.value,
    }
}

/// Sum the per-unit contribution of every item for the given selection.
///
/// Missing or absent nested pricing contributes zero. Published offers are
/// fenced against that by `validate_for_publish`.
pub fn quote(items: &[OfferItem], options: &SelectedOptions) -> f64 {
    let mut total = 0.0;

    for item in items {
        match item.resource_type {
            ResourceType::Hotel => {
                let Some(hotel) = &item.hotel_details else {
                    continue;
                };
                if !hotel.selected_rooms.is_empty() {
                    for room in &hotel.selected_rooms {
                        if let Some(tier) =
                            resolve_capacity(&room.capacity_prices, options.capacity.as_deref())
                        {
                            total += tier.adult;
                        }
                    }
                } else if let Some(pricing) = &hotel.pricing {
                    total += pricing.adult;
                    if let Some(capacity) = options.capacity.as_deref() {
                        if let Some(adjustment) = hotel.capacity_adjustments.get(capacity) {
                            total += adjustment;
                        }
                    }
                    for feature in &options.features {
                        if let Some(adjustment) = hotel.feature_adjustments.get(feature) {
                            total += adjustment;
                        }
                    }
                }
            }
            ResourceType::Flight => {
                total += item
                    .flight_details
                    .as_ref()
                    .and_then(|d| d.pricing.as_ref())
                    .map(|p| p.adult)
                    .unwrap_or(0.0);
            }
            ResourceType::Transport | ResourceType::Activity => {
                total += item
                    .transport_details
                    .as_ref()
                    .and_then(|d| d.pricing.as_ref())
                    .map(|p| p.adult)
                    .unwrap_or(0.0);
            }
        }
    }

    total
}

/// Capacity tier resolution, in explicit priority order: the requested
/// key, then "double", then the lexicographically-first key of the map.
fn resolve_capacity<'a>(
    prices: &'a BTreeMap<String, PassengerPrices>,
    requested: Option<&str>,
) -> Option<&'a PassengerPrices> {
    requested
        .and_then(|key| prices.get(key))
        .or_else(|| prices.get("double"))
        .or_else(|| prices.values().next())
}

/// Required-pricing rules checked before an offer may transition to
/// Published, so a published offer can never silently quote a zero
/// contribution.
pub fn validate_for_publish(offer: &Offer) -> Vec<String> {
    let mut problems = Vec::new();

    if offer.pricing.currency.is_empty() {
        problems.push("pricing.currency is required".to_string());
    }
    if offer.items.is_empty() && offer.pricing.base.is_none() {
        problems.push("offer needs at least one item or a base price table".to_string());
    }

    for (idx, item) in offer.items.iter().enumerate() {
        match item.resource_type {
            ResourceType::Hotel => {
                let ok = item.hotel_details.as_ref().is_some_and(|h| {
                    let has_tiers = !h.selected_rooms.is_empty()
                        && h.selected_rooms
                            .iter()
                            .all(|r| !r.capacity_prices.is_empty());
                    let has_flat = h.pricing.is_some_and(|p| p.adult > 0.0);
                    has_tiers || has_flat
                });
                if !ok {
                    problems.push(format!(
                        "items[{idx}]: hotel item needs room price tiers or flat adult pricing"
                    ));
                }
            }
            ResourceType::Flight => {
                let ok = item
                    .flight_details
                    .as_ref()
                    .and_then(|d| d.pricing)
                    .is_some_and(|p| p.adult > 0.0);
                if !ok {
                    problems.push(format!("items[{idx}]: flight item needs adult pricing"));
                }
            }
            ResourceType::Transport | ResourceType::Activity => {
                let ok = item
                    .transport_details
                    .as_ref()
                    .and_then(|d| d.pricing)
                    .is_some_and(|p| p.adult > 0.0);
                if !ok {
                    problems.push(format!("items[{idx}]: transport item needs adult pricing"));
                }
            }
        }
    }

    problems
}
