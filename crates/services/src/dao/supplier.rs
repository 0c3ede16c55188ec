use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use tripdesk_db::models::Supplier;

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct SupplierDao {
    pub base: BaseDao<Supplier>,
}

pub struct NewSupplier {
    pub name: String,
    pub code: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

impl SupplierDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Supplier::COLLECTION),
        }
    }

    pub async fn create(&self, new: NewSupplier, created_by: ObjectId) -> DaoResult<Supplier> {
        let now = DateTime::now();
        let supplier = Supplier {
            id: None,
            name: new.name,
            code: new.code,
            contact_name: new.contact_name,
            contact_email: new.contact_email,
            contact_phone: new.contact_phone,
            payment_terms: new.payment_terms,
            notes: new.notes,
            is_active: true,
            created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&supplier).await?;
        self.base.find_by_id(id).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        set: Document,
        updated_by: ObjectId,
    ) -> DaoResult<Supplier> {
        let mut set = set;
        set.insert("updated_by", updated_by);
        self.base.update_by_id(id, doc! { "$set": set }).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Supplier>> {
        let mut filter = doc! { "is_active": true };
        if let Some(search) = search {
            filter.insert("name", doc! { "$regex": search, "$options": "i" });
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
