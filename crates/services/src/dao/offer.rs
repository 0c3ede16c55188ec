use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use tripdesk_db::models::{
    Availability, Duration, Markup, Offer, OfferItem, OfferPricing, OfferRules, OfferStatus,
    OfferType,
};

use crate::pricing::{self, SelectedOptions};

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct OfferDao {
    pub base: BaseDao<Offer>,
}

pub struct NewOffer {
    pub code: String,
    pub name: String,
    pub slug: String,
    pub offer_type: OfferType,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub nights: Option<u32>,
    pub markup: Option<Markup>,
    pub items: Vec<OfferItem>,
    pub pricing: OfferPricing,
    pub rules: OfferRules,
    pub availability: Availability,
}

#[derive(Default)]
pub struct OfferPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub nights: Option<Option<u32>>,
    pub markup: Option<Markup>,
    pub items: Option<Vec<OfferItem>>,
    pub pricing: Option<OfferPricing>,
    pub rules: Option<OfferRules>,
    pub availability: Option<Availability>,
}

#[derive(Debug, Clone, Default)]
pub struct OfferFilter {
    pub status: Option<OfferStatus>,
    pub offer_type: Option<OfferType>,
    pub destination: Option<String>,
    pub search: Option<String>,
}

impl OfferDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Offer::COLLECTION),
        }
    }

    pub async fn create(&self, new: NewOffer, created_by: ObjectId) -> DaoResult<Offer> {
        let now = DateTime::now();
        let offer = Offer {
            id: None,
            code: new.code,
            name: new.name,
            slug: new.slug,
            offer_type: new.offer_type,
            status: OfferStatus::Draft,
            description: new.description,
            destination: new.destination,
            duration: Duration::from_nights(new.nights),
            markup: new.markup,
            items: new.items,
            pricing: new.pricing,
            rules: new.rules,
            availability: new.availability,
            created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&offer).await?;
        self.base.find_by_id(id).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        patch: OfferPatch,
        updated_by: ObjectId,
    ) -> DaoResult<Offer> {
        let mut set = Document::new();
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(description) = patch.description {
            set.insert("description", description);
        }
        if let Some(destination) = patch.destination {
            set.insert("destination", destination);
        }
        if let Some(nights) = patch.nights {
            // days is derived, never written independently
            let duration = Duration::from_nights(nights);
            set.insert("duration", bson::to_bson(&duration)?);
        }
        if let Some(markup) = patch.markup {
            set.insert("markup", bson::to_bson(&markup)?);
        }
        if let Some(items) = patch.items {
            set.insert("items", bson::to_bson(&items)?);
        }
        if let Some(pricing) = patch.pricing {
            set.insert("pricing", bson::to_bson(&pricing)?);
        }
        if let Some(rules) = patch.rules {
            set.insert("rules", bson::to_bson(&rules)?);
        }
        if let Some(availability) = patch.availability {
            set.insert(
                "availability",
                bson::to_bson(&availability)?,
            );
        }
        set.insert("updated_by", updated_by);

        self.base.update_by_id(id, doc! { "$set": set }).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> DaoResult<Offer> {
        self.base
            .find_one(doc! { "slug": slug })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> DaoResult<Offer> {
        self.base
            .find_one(doc! { "slug": slug, "status": "published" })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn list(
        &self,
        filter: &OfferFilter,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Offer>> {
        self.base
            .find_paginated(filter_doc(filter), None, params)
            .await
    }

    /// Public storefront listing: published offers only.
    pub async fn list_published(
        &self,
        filter: &OfferFilter,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Offer>> {
        let mut doc = filter_doc(filter);
        doc.insert("status", "published");
        self.base.find_paginated(doc, None, params).await
    }

    /// Draft → Published, gated on the required-pricing rules so a
    /// published offer can never silently quote zero.
    pub async fn publish(&self, id: ObjectId, updated_by: ObjectId) -> DaoResult<Offer> {
        let offer = self.base.find_by_id(id).await?;
        if offer.status == OfferStatus::Published {
            return Ok(offer);
        }

        let problems = pricing::validate_for_publish(&offer);
        if !problems.is_empty() {
            return Err(DaoError::Validation(problems.join("; ")));
        }

        self.base
            .update_by_id(
                id,
                doc! { "$set": { "status": "published", "updated_by": updated_by } },
            )
            .await?;
        self.base.find_by_id(id).await
    }

    pub async fn archive(&self, id: ObjectId, updated_by: ObjectId) -> DaoResult<Offer> {
        self.base
            .update_by_id(
                id,
                doc! { "$set": { "status": "archived", "updated_by": updated_by } },
            )
            .await?;
        self.base.find_by_id(id).await
    }

    /// Hard delete is rejected while the offer is published; archiving
    /// first is the only path to permanent deletion.
    pub async fn delete(&self, id: ObjectId) -> DaoResult<()> {
        let offer = self.base.find_by_id(id).await?;
        if offer.status == OfferStatus::Published {
            return Err(DaoError::Validation(
                "Cannot delete a published offer; archive it first".to_string(),
            ));
        }
        self.base.delete_by_id(id).await?;
        Ok(())
    }

    /// Runs the pricing quote for the given selection and caches the
    /// result into `pricing.final_price`.
    pub async fn refresh_final_price(
        &self,
        id: ObjectId,
        options: &SelectedOptions,
    ) -> DaoResult<f64> {
        let offer = self.base.find_by_id(id).await?;
        let total = pricing::quote(&offer.items, options);

        self.base
            .update_by_id(id, doc! { "$set": { "pricing.final_price": total } })
            .await?;
        Ok(total)
    }
}

fn filter_doc(filter: &OfferFilter) -> Document {
    let mut doc = Document::new();
    if let Some(status) = filter.status {
        doc.insert(
            "status",
            bson::to_bson(&status).unwrap_or(bson::Bson::Null),
        );
    }
    if let Some(offer_type) = filter.offer_type {
        doc.insert(
            "offer_type",
            bson::to_bson(&offer_type).unwrap_or(bson::Bson::Null),
        );
    }
    if let Some(destination) = &filter.destination {
        doc.insert("destination", destination);
    }
    if let Some(search) = &filter.search {
        doc.insert(
            "name",
            doc! { "$regex": search, "$options": "i" },
        );
    }
    doc
}
