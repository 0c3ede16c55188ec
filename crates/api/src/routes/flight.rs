use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::Document;
use serde::{Deserialize, Serialize};
use tripdesk_db::models::{Cabin, Flight, FlightSchedule, Route, capabilities};
use tripdesk_services::dao::base::PaginationParams;
use tripdesk_services::dao::flight::NewFlight;
use validator::Validate;

use crate::routes::offer::parse_id;
use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFlightRequest {
    #[validate(length(min = 1))]
    pub airline: String,
    #[validate(length(min = 1))]
    pub flight_number: String,
    pub route: Route,
    pub schedule: FlightSchedule,
    #[serde(default)]
    pub cabins: Vec<Cabin>,
    pub supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlightRequest {
    pub airline: Option<String>,
    pub route: Option<Route>,
    pub schedule: Option<FlightSchedule>,
    pub cabins: Option<Vec<Cabin>>,
}

#[derive(Debug, Serialize)]
pub struct FlightResponse {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub route: Route,
    pub schedule: FlightSchedule,
    pub cabins: Vec<Cabin>,
    pub supplier_id: Option<String>,
    pub is_active: bool,
}

impl From<Flight> for FlightResponse {
    fn from(flight: Flight) -> Self {
        Self {
            id: flight.id.map(|id| id.to_hex()).unwrap_or_default(),
            airline: flight.airline,
            flight_number: flight.flight_number,
            route: flight.route,
            schedule: flight.schedule,
            cabins: flight.cabins,
            supplier_id: flight.supplier_id.map(|id| id.to_hex()),
            is_active: flight.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListFlightsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFlightsQuery>,
) -> Result<Json<PagedResponse<FlightResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let result = state
        .flights
        .list(query.from.as_deref(), query.to.as_deref(), &query.pagination)
        .await?;
    Ok(paged(result.map(FlightResponse::from)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateFlightRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FlightResponse>>), ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    body.validate()?;

    let supplier_id = body.supplier_id.as_deref().map(parse_id).transpose()?;
    let flight = state
        .flights
        .create(
            NewFlight {
                airline: body.airline,
                flight_number: body.flight_number,
                route: body.route,
                schedule: body.schedule,
                cabins: body.cabins,
                supplier_id,
            },
            auth.user_id,
        )
        .await?;
    Ok((StatusCode::CREATED, ok(flight.into())))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(flight_id): Path<String>,
) -> Result<Json<ApiResponse<FlightResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let id = parse_id(&flight_id)?;
    let flight = state.flights.base.find_by_id(id).await?;
    Ok(ok(flight.into()))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(flight_id): Path<String>,
    Json(body): Json<UpdateFlightRequest>,
) -> Result<Json<ApiResponse<FlightResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    let id = parse_id(&flight_id)?;

    let mut set = Document::new();
    if let Some(airline) = body.airline {
        set.insert("airline", airline);
    }
    if let Some(route) = body.route {
        set.insert(
            "route",
            bson::to_bson(&route).map_err(|e| ApiError::Internal(e.to_string()))?,
        );
    }
    if let Some(schedule) = body.schedule {
        set.insert(
            "schedule",
            bson::to_bson(&schedule).map_err(|e| ApiError::Internal(e.to_string()))?,
        );
    }
    if let Some(cabins) = body.cabins {
        set.insert(
            "cabins",
            bson::to_bson(&cabins).map_err(|e| ApiError::Internal(e.to_string()))?,
        );
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let flight = state.flights.update(id, set, auth.user_id).await?;
    Ok(ok(flight.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(flight_id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    auth.require(capabilities::MANAGE_INVENTORY)?;
    let id = parse_id(&flight_id)?;
    let deactivated = state.flights.deactivate(id, auth.user_id).await?;
    Ok(ok(deactivated))
}
