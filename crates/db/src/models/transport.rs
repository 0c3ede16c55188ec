use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::Route;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub transport_type: TransportType,
    pub route: Option<Route>,
    pub departure_time: Option<String>,
    /// Supplier-facing cost per adult seat.
    pub cost: f64,
    /// Selling price per adult seat, derived from cost + markup at
    /// data-entry time.
    pub price: f64,
    pub capacity: Option<u32>,
    pub supplier_id: Option<ObjectId>,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    pub created_by: ObjectId,
    pub updated_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Bus,
    Van,
    Car,
    Ferry,
    Activity,
}

fn bool_true() -> bool {
    true
}

impl Transport {
    pub const COLLECTION: &'static str = "transports";
}
