use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::Document;
use serde::{Deserialize, Serialize};
use tripdesk_db::models::{Markup, Route, Transport, TransportType, capabilities};
use tripdesk_services::dao::base::PaginationParams;
use tripdesk_services::dao::transport::NewTransport;
use validator::Validate;

use crate::routes::offer::parse_id;
use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransportRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub transport_type: TransportType,
    pub route: Option<Route>,
    pub departure_time: Option<String>,
    pub cost: f64,
    /// Explicit selling price; when omitted the markup (if any) is
    /// applied to cost once, at entry time.
    pub price: Option<f64>,
    pub markup: Option<Markup>,
    pub capacity: Option<u32>,
    pub supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransportRequest {
    pub name: Option<String>,
    pub route: Option<Route>,
    pub departure_time: Option<String>,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub capacity: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TransportResponse {
    pub id: String,
    pub name: String,
    pub transport_type: TransportType,
    pub route: Option<Route>,
    pub departure_time: Option<String>,
    pub cost: f64,
    pub price: f64,
    pub capacity: Option<u32>,
    pub supplier_id: Option<String>,
    pub is_active: bool,
}

impl From<Transport> for TransportResponse {
    fn from(transport: Transport) -> Self {
        Self {
            id: transport.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: transport.name,
            transport_type: transport.transport_type,
            route: transport.route,
            departure_time: transport.departure_time,
            cost: transport.cost,
            price: transport.price,
            capacity: transport.capacity,
            supplier_id: transport.supplier_id.map(|id| id.to_hex()),
            is_active: transport.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTransportsQuery {
    pub transport_type: Option<TransportType>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransportsQuery>,
) -> Result<Json<PagedResponse<TransportResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let result = state
        .transports
        .list(query.transport_type, &query.pagination)
        .await?;
    Ok(paged(result.map(TransportResponse::from)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateTransportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransportResponse>>), ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    body.validate()?;

    let supplier_id = body.supplier_id.as_deref().map(parse_id).transpose()?;
    let transport = state
        .transports
        .create(
            NewTransport {
                name: body.name,
                transport_type: body.transport_type,
                route: body.route,
                departure_time: body.departure_time,
                cost: body.cost,
                price: body.price,
                markup: body.markup,
                capacity: body.capacity,
                supplier_id,
            },
            auth.user_id,
        )
        .await?;
    Ok((StatusCode::CREATED, ok(transport.into())))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transport_id): Path<String>,
) -> Result<Json<ApiResponse<TransportResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let id = parse_id(&transport_id)?;
    let transport = state.transports.base.find_by_id(id).await?;
    Ok(ok(transport.into()))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transport_id): Path<String>,
    Json(body): Json<UpdateTransportRequest>,
) -> Result<Json<ApiResponse<TransportResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    let id = parse_id(&transport_id)?;

    let mut set = Document::new();
    if let Some(name) = body.name {
        set.insert("name", name);
    }
    if let Some(route) = body.route {
        set.insert(
            "route",
            bson::to_bson(&route).map_err(|e| ApiError::Internal(e.to_string()))?,
        );
    }
    if let Some(departure_time) = body.departure_time {
        set.insert("departure_time", departure_time);
    }
    if let Some(cost) = body.cost {
        set.insert("cost", cost);
    }
    if let Some(price) = body.price {
        set.insert("price", price);
    }
    if let Some(capacity) = body.capacity {
        set.insert("capacity", capacity as i64);
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let transport = state.transports.update(id, set, auth.user_id).await?;
    Ok(ok(transport.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transport_id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    let id = parse_id(&transport_id)?;
    let deactivated = state.transports.deactivate(id, auth.user_id).await?;
    Ok(ok(deactivated))
}
