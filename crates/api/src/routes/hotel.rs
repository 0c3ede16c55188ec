use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::Document;
use serde::{Deserialize, Serialize};
use tripdesk_db::models::{Hotel, RoomType, capabilities};
use tripdesk_services::dao::base::PaginationParams;
use tripdesk_services::dao::hotel::NewHotel;
use validator::Validate;

use crate::routes::offer::parse_id;
use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHotelRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub slug: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub country: String,
    pub stars: Option<u8>,
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    pub supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHotelRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub stars: Option<u8>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub room_types: Option<Vec<RoomType>>,
}

#[derive(Debug, Serialize)]
pub struct HotelResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub city: String,
    pub country: String,
    pub stars: Option<u8>,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub room_types: Vec<RoomType>,
    pub supplier_id: Option<String>,
    pub is_active: bool,
}

impl From<Hotel> for HotelResponse {
    fn from(hotel: Hotel) -> Self {
        Self {
            id: hotel.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: hotel.name,
            slug: hotel.slug,
            city: hotel.city,
            country: hotel.country,
            stars: hotel.stars,
            description: hotel.description,
            amenities: hotel.amenities,
            room_types: hotel.room_types,
            supplier_id: hotel.supplier_id.map(|id| id.to_hex()),
            is_active: hotel.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListHotelsQuery {
    pub city: Option<String>,
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListHotelsQuery>,
) -> Result<Json<PagedResponse<HotelResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let result = state
        .hotels
        .list(query.city.as_deref(), query.q.as_deref(), &query.pagination)
        .await?;
    Ok(paged(result.map(HotelResponse::from)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateHotelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<HotelResponse>>), ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    body.validate()?;

    let supplier_id = body.supplier_id.as_deref().map(parse_id).transpose()?;
    let hotel = state
        .hotels
        .create(
            NewHotel {
                name: body.name,
                slug: body.slug,
                city: body.city,
                country: body.country,
                stars: body.stars,
                description: body.description,
                amenities: body.amenities,
                room_types: body.room_types,
                supplier_id,
            },
            auth.user_id,
        )
        .await?;
    Ok((StatusCode::CREATED, ok(hotel.into())))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(hotel_id): Path<String>,
) -> Result<Json<ApiResponse<HotelResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let id = parse_id(&hotel_id)?;
    let hotel = state.hotels.base.find_by_id(id).await?;
    Ok(ok(hotel.into()))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(hotel_id): Path<String>,
    Json(body): Json<UpdateHotelRequest>,
) -> Result<Json<ApiResponse<HotelResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    let id = parse_id(&hotel_id)?;

    let mut set = Document::new();
    if let Some(name) = body.name {
        set.insert("name", name);
    }
    if let Some(city) = body.city {
        set.insert("city", city);
    }
    if let Some(country) = body.country {
        set.insert("country", country);
    }
    if let Some(stars) = body.stars {
        set.insert("stars", stars as i32);
    }
    if let Some(description) = body.description {
        set.insert("description", description);
    }
    if let Some(amenities) = body.amenities {
        set.insert("amenities", amenities);
    }
    if let Some(room_types) = body.room_types {
        set.insert(
            "room_types",
            bson::to_bson(&room_types).map_err(|e| ApiError::Internal(e.to_string()))?,
        );
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let hotel = state.hotels.update(id, set, auth.user_id).await?;
    Ok(ok(hotel.into()))
}

/// Hotels referenced by offers are deactivated, never hard-deleted.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(hotel_id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    let id = parse_id(&hotel_id)?;
    let deactivated = state.hotels.deactivate(id, auth.user_id).await?;
    Ok(ok(deactivated))
}
