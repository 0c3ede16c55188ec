use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tripdesk_db::models::{
    Availability, Duration, FlightItemDetails, HotelItemDetails, Markup, Offer, OfferItem,
    OfferPricing, OfferRules, OfferStatus, OfferType, ResourceType, TransportItemDetails,
    capabilities,
};
use tripdesk_services::dao::base::PaginationParams;
use tripdesk_services::dao::offer::{NewOffer, OfferFilter, OfferPatch};
use tripdesk_services::pricing::SelectedOptions;
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct OfferItemRequest {
    pub resource_id: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub mandatory: bool,
    pub hotel_details: Option<HotelItemDetails>,
    pub flight_details: Option<FlightItemDetails>,
    pub transport_details: Option<TransportItemDetails>,
}

impl OfferItemRequest {
    fn into_item(self) -> Result<OfferItem, ApiError> {
        let resource_id = ObjectId::parse_str(&self.resource_id)
            .map_err(|_| ApiError::BadRequest("Invalid resource_id".to_string()))?;
        Ok(OfferItem {
            resource_id,
            resource_type: self.resource_type,
            mandatory: self.mandatory,
            hotel_details: self.hotel_details,
            flight_details: self.flight_details,
            transport_details: self.transport_details,
        })
    }
}

fn into_items(items: Vec<OfferItemRequest>) -> Result<Vec<OfferItem>, ApiError> {
    items.into_iter().map(OfferItemRequest::into_item).collect()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOfferRequest {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub slug: String,
    pub offer_type: OfferType,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub nights: Option<u32>,
    pub markup: Option<Markup>,
    #[serde(default)]
    pub items: Vec<OfferItemRequest>,
    #[serde(default)]
    pub pricing: OfferPricing,
    #[serde(default)]
    pub rules: OfferRules,
    #[serde(default)]
    pub availability: Availability,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOfferRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub nights: Option<u32>,
    pub markup: Option<Markup>,
    pub items: Option<Vec<OfferItemRequest>>,
    pub pricing: Option<OfferPricing>,
    pub rules: Option<OfferRules>,
    pub availability: Option<Availability>,
}

#[derive(Debug, Serialize)]
pub struct OfferItemResponse {
    pub resource_id: String,
    pub resource_type: ResourceType,
    pub mandatory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_details: Option<HotelItemDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_details: Option<FlightItemDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_details: Option<TransportItemDetails>,
}

#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub slug: String,
    pub offer_type: OfferType,
    pub status: OfferStatus,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub duration: Duration,
    pub markup: Option<Markup>,
    pub items: Vec<OfferItemResponse>,
    pub pricing: OfferPricing,
    pub rules: OfferRules,
    pub availability: Availability,
    pub created_at: String,
}

impl From<Offer> for OfferResponse {
    fn from(offer: Offer) -> Self {
        Self {
            id: offer.id.map(|id| id.to_hex()).unwrap_or_default(),
            code: offer.code,
            name: offer.name,
            slug: offer.slug,
            offer_type: offer.offer_type,
            status: offer.status,
            description: offer.description,
            destination: offer.destination,
            duration: offer.duration,
            markup: offer.markup,
            items: offer
                .items
                .into_iter()
                .map(|item| OfferItemResponse {
                    resource_id: item.resource_id.to_hex(),
                    resource_type: item.resource_type,
                    mandatory: item.mandatory,
                    hotel_details: item.hotel_details,
                    flight_details: item.flight_details,
                    transport_details: item.transport_details,
                })
                .collect(),
            pricing: offer.pricing,
            rules: offer.rules,
            availability: offer.availability,
            created_at: offer
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListOffersQuery {
    pub status: Option<OfferStatus>,
    pub offer_type: Option<OfferType>,
    pub destination: Option<String>,
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListOffersQuery>,
) -> Result<Json<PagedResponse<OfferResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;

    let filter = OfferFilter {
        status: query.status,
        offer_type: query.offer_type,
        destination: query.destination,
        search: query.q,
    };
    let result = state.offers.list(&filter, &query.pagination).await?;
    Ok(paged(result.map(OfferResponse::from)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OfferResponse>>), ApiError> {
    auth.require(capabilities::MANAGE_OFFERS)?;
    body.validate()?;

    let new = NewOffer {
        code: body.code,
        name: body.name,
        slug: body.slug,
        offer_type: body.offer_type,
        description: body.description,
        destination: body.destination,
        nights: body.nights,
        markup: body.markup,
        items: into_items(body.items)?,
        pricing: body.pricing,
        rules: body.rules,
        availability: body.availability,
    };
    let offer = state.offers.create(new, auth.user_id).await?;
    Ok((StatusCode::CREATED, ok(offer.into())))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<String>,
) -> Result<Json<ApiResponse<OfferResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let id = parse_id(&offer_id)?;
    let offer = state.offers.base.find_by_id(id).await?;
    Ok(ok(offer.into()))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<String>,
    Json(body): Json<UpdateOfferRequest>,
) -> Result<Json<ApiResponse<OfferResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_OFFERS)?;
    let id = parse_id(&offer_id)?;

    let patch = OfferPatch {
        name: body.name,
        description: body.description,
        destination: body.destination,
        nights: body.nights.map(Some),
        markup: body.markup,
        items: body.items.map(into_items).transpose()?,
        pricing: body.pricing,
        rules: body.rules,
        availability: body.availability,
    };
    let offer = state.offers.update(id, patch, auth.user_id).await?;
    Ok(ok(offer.into()))
}

/// Hard delete; rejected while the offer is published.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    auth.require(capabilities::MANAGE_OFFERS)?;
    let id = parse_id(&offer_id)?;
    state.offers.delete(id).await?;
    Ok(ok(true))
}

pub async fn publish(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<String>,
) -> Result<Json<ApiResponse<OfferResponse>>, ApiError> {
    auth.require(capabilities::PUBLISH_OFFERS)?;
    let id = parse_id(&offer_id)?;
    let offer = state.offers.publish(id, auth.user_id).await?;
    Ok(ok(offer.into()))
}

pub async fn archive(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<String>,
) -> Result<Json<ApiResponse<OfferResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_OFFERS)?;
    let id = parse_id(&offer_id)?;
    let offer = state.offers.archive(id, auth.user_id).await?;
    Ok(ok(offer.into()))
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub total: f64,
    pub currency: String,
}

/// Quote the offer for the selected options and cache the result into
/// `pricing.final_price`.
pub async fn price(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<String>,
    Json(options): Json<SelectedOptions>,
) -> Result<Json<ApiResponse<QuoteResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let id = parse_id(&offer_id)?;
    let offer = state.offers.base.find_by_id(id).await?;
    let total = state.offers.refresh_final_price(id, &options).await?;
    Ok(ok(QuoteResponse {
        total,
        currency: offer.pricing.currency,
    }))
}

pub(crate) fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid id".to_string()))
}
