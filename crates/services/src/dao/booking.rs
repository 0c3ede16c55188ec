use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use nanoid::nanoid;
use tripdesk_db::models::{
    Booking, BookingPricing, BookingStatus, ContactInfo, Offer, Passenger, PassengerType,
    PaymentStatus,
};

use crate::pricing::{self, SelectedOptions};

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

const BOOKING_NUMBER_ALPHABET: [char; 32] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K',
    'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

pub struct BookingDao {
    pub base: BaseDao<Booking>,
}

pub struct NewBooking {
    pub contact: ContactInfo,
    pub passengers: Vec<Passenger>,
    pub selected: SelectedOptions,
    pub agent_id: Option<ObjectId>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
}

impl BookingDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Booking::COLLECTION),
        }
    }

    /// Creates a booking against an offer, snapshotting the price at this
    /// moment. Later changes to the offer never touch the stored totals.
    pub async fn create(&self, offer: &Offer, new: NewBooking) -> DaoResult<Booking> {
        let offer_id = offer.id.ok_or(DaoError::NotFound)?;

        if new.passengers.is_empty() {
            return Err(DaoError::Validation(
                "Booking needs at least one passenger".to_string(),
            ));
        }

        let adults = count_type(&new.passengers, PassengerType::Adult);
        let children = count_type(&new.passengers, PassengerType::Child);
        let infants = count_type(&new.passengers, PassengerType::Infant);
        if adults == 0 {
            return Err(DaoError::Validation(
                "Booking needs at least one adult passenger".to_string(),
            ));
        }

        let pricing = snapshot_pricing(offer, &new.selected, adults, children, infants);

        let now = DateTime::now();
        let booking = Booking {
            id: None,
            booking_number: format!("BK-{}", nanoid!(8, &BOOKING_NUMBER_ALPHABET)),
            offer_id,
            offer_name: offer.name.clone(),
            booking_type: offer.offer_type,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            agent_id: new.agent_id,
            contact: new.contact,
            passengers: new.passengers,
            pricing,
            check_in: new.check_in,
            check_out: new.check_out,
            destination: offer.destination.clone(),
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&booking).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_number(&self, booking_number: &str) -> DaoResult<Booking> {
        self.base
            .find_one(doc! { "booking_number": booking_number })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn list(
        &self,
        status: Option<BookingStatus>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Booking>> {
        let mut filter = Document::new();
        if let Some(status) = status {
            filter.insert(
                "status",
                bson::to_bson(&status)?,
            );
        }
        self.base.find_paginated(filter, None, params).await
    }

    /// Status changes go through the transition table; anything else is a
    /// validation error.
    pub async fn transition(&self, id: ObjectId, next: BookingStatus) -> DaoResult<Booking> {
        let booking = self.base.find_by_id(id).await?;
        if !booking.status.can_transition_to(next) {
            return Err(DaoError::Validation(format!(
                "Invalid status transition: {:?} -> {:?}",
                booking.status, next
            )));
        }

        self.base
            .update_by_id(
                id,
                doc! { "$set": { "status": bson::to_bson(&next)? } },
            )
            .await?;
        self.base.find_by_id(id).await
    }

    pub async fn set_payment_status(
        &self,
        id: ObjectId,
        payment_status: PaymentStatus,
    ) -> DaoResult<Booking> {
        self.base
            .update_by_id(
                id,
                doc! { "$set": {
                    "payment_status": bson::to_bson(&payment_status)?,
                } },
            )
            .await?;
        self.base.find_by_id(id).await
    }
}

fn count_type(passengers: &[Passenger], passenger_type: PassengerType) -> u32 {
    passengers
        .iter()
        .filter(|p| p.passenger_type == passenger_type)
        .count() as u32
}

/// Per-person unit prices multiplied by headcount. The offer's base table
/// is used when present; otherwise the buyer's own selection is quoted at
/// this moment, the quoted unit applies to adults and children, and infants
/// travel free. The cached `pricing.final_price` is a display value and
/// never prices a booking.
fn snapshot_pricing(
    offer: &Offer,
    selected: &SelectedOptions,
    adults: u32,
    children: u32,
    infants: u32,
) -> BookingPricing {
    let (adult_unit, child_unit, infant_unit) = match &offer.pricing.base {
        Some(base) => (base.adult, base.child, base.infant),
        None => {
            let unit = pricing::quote(&offer.items, selected);
            (unit, unit, 0.0)
        }
    };

    let total =
        adult_unit * adults as f64 + child_unit * children as f64 + infant_unit * infants as f64;

    BookingPricing {
        currency: offer.pricing.currency.clone(),
        unit_price: adult_unit,
        adults,
        children,
        infants,
        total,
    }
}
