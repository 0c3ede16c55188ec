use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tripdesk_db::models::{
    Booking, BookingPricing, BookingStatus, ContactInfo, OfferType, Passenger, PaymentStatus,
    capabilities,
};
use tripdesk_services::dao::base::PaginationParams;
use tripdesk_services::dao::booking::NewBooking;
use tripdesk_services::notify::NotifyEvent;
use tripdesk_services::pricing::SelectedOptions;

use crate::routes::offer::parse_id;
use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub offer_id: String,
    pub contact: ContactInfo,
    pub passengers: Vec<Passenger>,
    #[serde(default)]
    pub selected: SelectedOptions,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub booking_number: String,
    pub offer_id: String,
    pub offer_name: String,
    pub booking_type: OfferType,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub contact: ContactInfo,
    pub passengers: Vec<Passenger>,
    pub pricing: BookingPricing,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub destination: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            booking_number: booking.booking_number,
            offer_id: booking.offer_id.to_hex(),
            offer_name: booking.offer_name,
            booking_type: booking.booking_type,
            status: booking.status,
            payment_status: booking.payment_status,
            contact: booking.contact,
            passengers: booking.passengers,
            pricing: booking.pricing,
            check_in: booking.check_in,
            check_out: booking.check_out,
            destination: booking.destination,
            notes: booking.notes,
            created_at: booking
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<BookingStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<PagedResponse<BookingResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let result = state.bookings.list(query.status, &query.pagination).await?;
    Ok(paged(result.map(BookingResponse::from)))
}

/// Internal booking intake. Snapshots the price and fires the
/// booking-created notification; notification failures never block the
/// booking.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), ApiError> {
    auth.require(capabilities::MANAGE_BOOKINGS)?;

    let offer_id = parse_id(&body.offer_id)?;
    let offer = state.offers.base.find_by_id(offer_id).await?;

    let booking = state
        .bookings
        .create(
            &offer,
            NewBooking {
                contact: body.contact,
                passengers: body.passengers,
                selected: body.selected,
                agent_id: Some(auth.user_id),
                check_in: body.check_in,
                check_out: body.check_out,
                notes: body.notes,
            },
        )
        .await?;

    if let Err(e) = state
        .notifier
        .dispatch(NotifyEvent::booking_created(auth.user_id, &booking), true)
        .await
    {
        tracing::warn!(error = %e, "Booking notification failed");
    }

    Ok((StatusCode::CREATED, ok(booking.into())))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let id = parse_id(&booking_id)?;
    let booking = state.bookings.base.find_by_id(id).await?;
    Ok(ok(booking.into()))
}

/// Confirmation sends the booking-confirmation email (best-effort) and
/// notifies the handling agent.
pub async fn confirm(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    auth.require(capabilities::CONFIRM_BOOKINGS)?;
    let id = parse_id(&booking_id)?;
    let booking = state
        .bookings
        .transition(id, BookingStatus::Confirmed)
        .await?;

    state.notifier.send_booking_confirmation(&booking).await;

    let recipient = booking.agent_id.unwrap_or(auth.user_id);
    if let Err(e) = state
        .notifier
        .dispatch(NotifyEvent::booking_confirmed(recipient, &booking), true)
        .await
    {
        tracing::warn!(error = %e, "Booking notification failed");
    }

    Ok(ok(booking.into()))
}

pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_BOOKINGS)?;
    let id = parse_id(&booking_id)?;
    let booking = state
        .bookings
        .transition(id, BookingStatus::Cancelled)
        .await?;

    let recipient = booking.agent_id.unwrap_or(auth.user_id);
    if let Err(e) = state
        .notifier
        .dispatch(NotifyEvent::booking_cancelled(recipient, &booking), true)
        .await
    {
        tracing::warn!(error = %e, "Booking notification failed");
    }

    Ok(ok(booking.into()))
}

pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_BOOKINGS)?;
    let id = parse_id(&booking_id)?;
    let booking = state
        .bookings
        .transition(id, BookingStatus::Completed)
        .await?;
    Ok(ok(booking.into()))
}

#[derive(Debug, Deserialize)]
pub struct PaymentUpdateRequest {
    pub payment_status: PaymentStatus,
    pub amount: Option<f64>,
}

pub async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
    Json(body): Json<PaymentUpdateRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_BOOKINGS)?;
    let id = parse_id(&booking_id)?;
    let booking = state
        .bookings
        .set_payment_status(id, body.payment_status)
        .await?;

    if matches!(
        body.payment_status,
        PaymentStatus::Partial | PaymentStatus::Paid
    ) {
        let amount = body.amount.unwrap_or(booking.pricing.total);
        let recipient = booking.agent_id.unwrap_or(auth.user_id);
        if let Err(e) = state
            .notifier
            .dispatch(
                NotifyEvent::payment_received(recipient, &booking, amount),
                true,
            )
            .await
        {
            tracing::warn!(error = %e, "Payment notification failed");
        }
    }

    Ok(ok(booking.into()))
}
