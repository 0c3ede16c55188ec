use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tripdesk_db::models::{ContactInfo, OfferType, Passenger};
use tripdesk_services::dao::base::PaginationParams;
use tripdesk_services::dao::booking::NewBooking;
use tripdesk_services::dao::offer::OfferFilter;
use tripdesk_services::pricing::{self, SelectedOptions};
use validator::Validate;

use crate::routes::booking::BookingResponse;
use crate::routes::offer::{OfferResponse, QuoteResponse};
use crate::{
    error::ApiError,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct StorefrontQuery {
    pub offer_type: Option<OfferType>,
    pub destination: Option<String>,
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Public storefront listing. Only published offers are visible.
pub async fn list_offers(
    State(state): State<AppState>,
    Query(query): Query<StorefrontQuery>,
) -> Result<Json<PagedResponse<OfferResponse>>, ApiError> {
    let filter = OfferFilter {
        status: None,
        offer_type: query.offer_type,
        destination: query.destination,
        search: query.q,
    };
    let result = state
        .offers
        .list_published(&filter, &query.pagination)
        .await?;
    Ok(paged(result.map(OfferResponse::from)))
}

pub async fn get_offer(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<OfferResponse>>, ApiError> {
    let offer = state.offers.find_published_by_slug(&slug).await?;
    Ok(ok(offer.into()))
}

/// Quote a published offer for the buyer's selection. Read-only: the
/// public path never writes the cached final price.
pub async fn quote_offer(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(options): Json<SelectedOptions>,
) -> Result<Json<ApiResponse<QuoteResponse>>, ApiError> {
    let offer = state.offers.find_published_by_slug(&slug).await?;
    let total = pricing::quote(&offer.items, &options);
    Ok(ok(QuoteResponse {
        total,
        currency: offer.pricing.currency,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PublicBookingRequest {
    #[validate(length(min = 1))]
    pub offer_slug: String,
    pub contact: ContactInfo,
    pub passengers: Vec<Passenger>,
    #[serde(default)]
    pub selected: SelectedOptions,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
}

/// Public checkout: creates a pending booking against a published offer.
/// The price is snapshotted at this moment.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(body): Json<PublicBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), ApiError> {
    body.validate()?;

    let offer = state.offers.find_published_by_slug(&body.offer_slug).await?;
    let booking = state
        .bookings
        .create(
            &offer,
            NewBooking {
                contact: body.contact,
                passengers: body.passengers,
                selected: body.selected,
                agent_id: None,
                check_in: body.check_in,
                check_out: body.check_out,
                notes: body.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, ok(booking.into())))
}
