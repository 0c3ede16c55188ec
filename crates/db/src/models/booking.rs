use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::OfferType;

/// A point-in-time purchase record. Passenger and pricing data are
/// snapshots taken at creation and are never re-derived from the offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub booking_number: String,
    pub offer_id: ObjectId,
    pub offer_name: String,
    pub booking_type: OfferType,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Internal operator who took the booking, if any.
    pub agent_id: Option<ObjectId>,
    pub contact: ContactInfo,
    pub passengers: Vec<Passenger>,
    pub pricing: BookingPricing,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub destination: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// The only legal status transitions. Bookings are never deleted; a
    /// cancelled or completed booking is terminal.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub full_name: String,
    pub passenger_type: PassengerType,
    pub document_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerType {
    Adult,
    Child,
    Infant,
}

/// Snapshot totals agreed at confirmation time, independent of later
/// catalog or offer price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPricing {
    pub currency: String,
    pub unit_price: f64,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub total: f64,
}

impl Booking {
    pub const COLLECTION: &'static str = "bookings";
}
