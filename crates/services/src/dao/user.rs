use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use tripdesk_db::models::{Role, User};

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        email: String,
        full_name: String,
        password_hash: String,
        role: Role,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            email,
            full_name,
            password_hash: Some(password_hash),
            role,
            is_active: true,
            phone: None,
            avatar: None,
            fcm_tokens: Vec::new(),
            last_active_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn update_profile(
        &self,
        user_id: ObjectId,
        full_name: Option<String>,
        phone: Option<String>,
        avatar: Option<String>,
    ) -> DaoResult<bool> {
        let mut update = bson::Document::new();
        if let Some(name) = full_name {
            update.insert("full_name", name);
        }
        if let Some(phone) = phone {
            update.insert("phone", phone);
        }
        if let Some(avatar) = avatar {
            update.insert("avatar", avatar);
        }

        if update.is_empty() {
            return Ok(false);
        }

        self.base
            .update_by_id(user_id, doc! { "$set": update })
            .await
    }

    pub async fn list(&self, params: &PaginationParams) -> DaoResult<PaginatedResult<User>> {
        self.base.find_paginated(doc! {}, None, params).await
    }

    pub async fn set_role(&self, user_id: ObjectId, role: Role) -> DaoResult<bool> {
        self.base
            .update_by_id(
                user_id,
                doc! { "$set": { "role": bson::to_bson(&role)? } },
            )
            .await
    }

    pub async fn set_active(&self, user_id: ObjectId, is_active: bool) -> DaoResult<bool> {
        self.base
            .update_by_id(user_id, doc! { "$set": { "is_active": is_active } })
            .await
    }

    /// Device opt-in: append a push token, deduplicated.
    pub async fn add_fcm_token(&self, user_id: ObjectId, token: &str) -> DaoResult<bool> {
        self.base
            .update_by_id(
                user_id,
                doc! { "$addToSet": { "fcm_tokens": token } },
            )
            .await
    }

    /// Prune tokens the push provider reported as invalid or unregistered.
    /// A single atomic `$pull`; a token re-registered concurrently may be
    /// removed too and comes back on the next device opt-in.
    pub async fn remove_fcm_tokens(&self, user_id: ObjectId, tokens: &[String]) -> DaoResult<bool> {
        if tokens.is_empty() {
            return Ok(false);
        }
        self.base
            .update_by_id(
                user_id,
                doc! { "$pull": { "fcm_tokens": { "$in": tokens } } },
            )
            .await
    }

    pub async fn count_all(&self) -> DaoResult<u64> {
        self.base.count(doc! {}).await
    }
}
