use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use tripdesk_db::models::{Markup, Route, Transport, TransportType};

use crate::pricing;

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct TransportDao {
    pub base: BaseDao<Transport>,
}

pub struct NewTransport {
    pub name: String,
    pub transport_type: TransportType,
    pub route: Option<Route>,
    pub departure_time: Option<String>,
    pub cost: f64,
    /// Explicit selling price; when absent, derived from cost + markup at
    /// entry time (snapshot, not a live formula).
    pub price: Option<f64>,
    pub markup: Option<Markup>,
    pub capacity: Option<u32>,
    pub supplier_id: Option<ObjectId>,
}

impl TransportDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Transport::COLLECTION),
        }
    }

    pub async fn create(&self, new: NewTransport, created_by: ObjectId) -> DaoResult<Transport> {
        let price = new.price.unwrap_or_else(|| {
            new.markup
                .as_ref()
                .map(|m| pricing::apply_markup(new.cost, m))
                .unwrap_or(new.cost)
        });

        let now = DateTime::now();
        let transport = Transport {
            id: None,
            name: new.name,
            transport_type: new.transport_type,
            route: new.route,
            departure_time: new.departure_time,
            cost: new.cost,
            price,
            capacity: new.capacity,
            supplier_id: new.supplier_id,
            is_active: true,
            created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&transport).await?;
        self.base.find_by_id(id).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        set: Document,
        updated_by: ObjectId,
    ) -> DaoResult<Transport> {
        let mut set = set;
        set.insert("updated_by", updated_by);
        self.base.update_by_id(id, doc! { "$set": set }).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(
        &self,
        transport_type: Option<TransportType>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Transport>> {
        let mut filter = doc! { "is_active": true };
        if let Some(transport_type) = transport_type {
            filter.insert(
                "transport_type",
                bson::to_bson(&transport_type)?,
            );
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
