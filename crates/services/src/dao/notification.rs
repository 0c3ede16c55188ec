use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use tripdesk_db::models::Notification;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct NotificationDao {
    pub base: BaseDao<Notification>,
}

impl NotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    pub async fn create(&self, notification: &Notification) -> DaoResult<Notification> {
        let id = self.base.insert_one(notification).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list_for_user(
        &self,
        user_id: ObjectId,
        unread_only: bool,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Notification>> {
        let mut filter: Document = doc! { "user_id": user_id };
        if unread_only {
            filter.insert("is_read", false);
        }
        self.base.find_paginated(filter, None, params).await
    }

    pub async fn unread_count(&self, user_id: ObjectId) -> DaoResult<u64> {
        self.base
            .count(doc! { "user_id": user_id, "is_read": false })
            .await
    }

    /// One-way: notifications are never flipped back to unread.
    pub async fn mark_read(&self, user_id: ObjectId, id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": id, "user_id": user_id },
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await
    }

    pub async fn mark_all_read(&self, user_id: ObjectId) -> DaoResult<u64> {
        let result = self
            .base
            .collection()
            .update_many(
                doc! { "user_id": user_id, "is_read": false },
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await?;
        Ok(result.modified_count)
    }

    pub async fn toggle_pin(&self, user_id: ObjectId, id: ObjectId) -> DaoResult<Notification> {
        let notification = self.owned(user_id, id).await?;
        self.base
            .update_by_id(
                id,
                doc! { "$set": { "is_pinned": !notification.is_pinned } },
            )
            .await?;
        self.base.find_by_id(id).await
    }

    pub async fn delete(&self, user_id: ObjectId, id: ObjectId) -> DaoResult<()> {
        self.owned(user_id, id).await?;
        self.base.delete_by_id(id).await?;
        Ok(())
    }

    async fn owned(&self, user_id: ObjectId, id: ObjectId) -> DaoResult<Notification> {
        self.base
            .find_one(doc! { "_id": id, "user_id": user_id })
            .await?
            .ok_or(DaoError::NotFound)
    }
}
