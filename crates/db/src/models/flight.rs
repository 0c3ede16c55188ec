use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::Route;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub airline: String,
    pub flight_number: String,
    pub route: Route,
    pub schedule: FlightSchedule,
    #[serde(default)]
    pub cabins: Vec<Cabin>,
    pub supplier_id: Option<ObjectId>,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    pub created_by: ObjectId,
    pub updated_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSchedule {
    pub departure_time: String,
    pub arrival_time: String,
    /// ISO weekday numbers (1 = Monday) the flight operates on.
    #[serde(default)]
    pub days_of_week: Vec<u8>,
}

/// Cabin class with supplier cost and selling price per passenger type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cabin {
    pub class: String,
    pub cost_adult: f64,
    pub price_adult: f64,
    #[serde(default)]
    pub cost_child: f64,
    #[serde(default)]
    pub price_child: f64,
    #[serde(default)]
    pub seats: Option<u32>,
}

fn bool_true() -> bool {
    true
}

impl Flight {
    pub const COLLECTION: &'static str = "flights";
}
