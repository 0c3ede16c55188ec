use std::collections::BTreeMap;

use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    pub city: String,
    pub country: String,
    pub stars: Option<u8>,
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    pub supplier_id: Option<ObjectId>,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    pub created_by: ObjectId,
    pub updated_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// A bookable room configuration. `cost` is the supplier-facing rate;
/// `price` is the selling rate derived from cost + markup at data-entry
/// time and refreshed manually, never recomputed live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomType {
    pub name: String,
    /// Per-capacity supplier cost (e.g. "single", "double", "triple").
    #[serde(default)]
    pub capacity_costs: BTreeMap<String, f64>,
    /// Per-capacity selling price.
    #[serde(default)]
    pub capacity_prices: BTreeMap<String, f64>,
    #[serde(default)]
    pub features: Vec<String>,
}

fn bool_true() -> bool {
    true
}

impl Hotel {
    pub const COLLECTION: &'static str = "hotels";
}
