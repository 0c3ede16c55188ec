use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use tripdesk_db::models::{Hotel, RoomType};

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct HotelDao {
    pub base: BaseDao<Hotel>,
}

pub struct NewHotel {
    pub name: String,
    pub slug: String,
    pub city: String,
    pub country: String,
    pub stars: Option<u8>,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub room_types: Vec<RoomType>,
    pub supplier_id: Option<ObjectId>,
}

impl HotelDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Hotel::COLLECTION),
        }
    }

    pub async fn create(&self, new: NewHotel, created_by: ObjectId) -> DaoResult<Hotel> {
        let now = DateTime::now();
        let hotel = Hotel {
            id: None,
            name: new.name,
            slug: new.slug,
            city: new.city,
            country: new.country,
            stars: new.stars,
            description: new.description,
            amenities: new.amenities,
            room_types: new.room_types,
            supplier_id: new.supplier_id,
            is_active: true,
            created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&hotel).await?;
        self.base.find_by_id(id).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        set: Document,
        updated_by: ObjectId,
    ) -> DaoResult<Hotel> {
        let mut set = set;
        set.insert("updated_by", updated_by);
        self.base.update_by_id(id, doc! { "$set": set }).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(
        &self,
        city: Option<&str>,
        search: Option<&str>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Hotel>> {
        let mut filter = doc! { "is_active": true };
        if let Some(city) = city {
            filter.insert("city", city);
        }
        if let Some(search) = search {
            filter.insert("name", doc! { "$regex": search, "$options": "i" });
        }
        self.base.find_paginated(filter, None, params).await
    }

    /// Deactivate rather than delete; offers may still reference the
    /// document by id.
    pub async fn deactivate(&self, id: ObjectId, updated_by: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(
                id,
                doc! { "$set": { "is_active": false, "updated_by": updated_by } },
            )
            .await
    }
}
