use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use tripdesk_db::models::{Cabin, Flight, FlightSchedule, Route};

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct FlightDao {
    pub base: BaseDao<Flight>,
}

pub struct NewFlight {
    pub airline: String,
    pub flight_number: String,
    pub route: Route,
    pub schedule: FlightSchedule,
    pub cabins: Vec<Cabin>,
    pub supplier_id: Option<ObjectId>,
}

impl FlightDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Flight::COLLECTION),
        }
    }

    pub async fn create(&self, new: NewFlight, created_by: ObjectId) -> DaoResult<Flight> {
        let now = DateTime::now();
        let flight = Flight {
            id: None,
            airline: new.airline,
            flight_number: new.flight_number,
            route: new.route,
            schedule: new.schedule,
            cabins: new.cabins,
            supplier_id: new.supplier_id,
            is_active: true,
            created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&flight).await?;
        self.base.find_by_id(id).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        set: Document,
        updated_by: ObjectId,
    ) -> DaoResult<Flight> {
        let mut set = set;
        set.insert("updated_by", updated_by);
        self.base.update_by_id(id, doc! { "$set": set }).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Flight>> {
        let mut filter = doc! { "is_active": true };
        if let Some(from) = from {
            filter.insert("route.from", from);
        }
        if let Some(to) = to {
            filter.insert("route.to", to);
        }
        self.base.find_paginated(filter, None, params).await
    }

    pub async fn deactivate(&self, id: ObjectId, updated_by: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(
                id,
                doc! { "$set": { "is_active": false, "updated_by": updated_by } },
            )
            .await
    }
}
