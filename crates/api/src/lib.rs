pub mod error;
pub mod extractors;
pub mod response;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/me", get(routes::auth::me))
        .route("/me", put(routes::auth::update_me))
        .route("/fcm-token", post(routes::auth::add_fcm_token))
        .route("/fcm-token", delete(routes::auth::remove_fcm_token));

    let offer_routes = Router::new()
        .route("/", get(routes::offer::list))
        .route("/", post(routes::offer::create))
        .route("/{offer_id}", get(routes::offer::get))
        .route("/{offer_id}", put(routes::offer::update))
        .route("/{offer_id}", delete(routes::offer::delete))
        .route("/{offer_id}/publish", post(routes::offer::publish))
        .route("/{offer_id}/archive", post(routes::offer::archive))
        .route("/{offer_id}/price", post(routes::offer::price));

    let booking_routes = Router::new()
        .route("/", get(routes::booking::list))
        .route("/", post(routes::booking::create))
        .route("/{booking_id}", get(routes::booking::get))
        .route("/{booking_id}/confirm", post(routes::booking::confirm))
        .route("/{booking_id}/cancel", post(routes::booking::cancel))
        .route("/{booking_id}/complete", post(routes::booking::complete))
        .route("/{booking_id}/payment", put(routes::booking::update_payment));

    let hotel_routes = Router::new()
        .route("/", get(routes::hotel::list))
        .route("/", post(routes::hotel::create))
        .route("/{hotel_id}", get(routes::hotel::get))
        .route("/{hotel_id}", put(routes::hotel::update))
        .route("/{hotel_id}", delete(routes::hotel::delete));

    let flight_routes = Router::new()
        .route("/", get(routes::flight::list))
        .route("/", post(routes::flight::create))
        .route("/{flight_id}", get(routes::flight::get))
        .route("/{flight_id}", put(routes::flight::update))
        .route("/{flight_id}", delete(routes::flight::delete));

    let transport_routes = Router::new()
        .route("/", get(routes::transport::list))
        .route("/", post(routes::transport::create))
        .route("/{transport_id}", get(routes::transport::get))
        .route("/{transport_id}", put(routes::transport::update))
        .route("/{transport_id}", delete(routes::transport::delete));

    let supplier_routes = Router::new()
        .route("/", get(routes::supplier::list))
        .route("/", post(routes::supplier::create))
        .route("/{supplier_id}", get(routes::supplier::get))
        .route("/{supplier_id}", put(routes::supplier::update))
        .route("/{supplier_id}", delete(routes::supplier::delete));

    let notification_routes = Router::new()
        .route("/", get(routes::notification::list))
        .route("/unread-count", get(routes::notification::unread_count))
        .route("/read-all", put(routes::notification::mark_all_read))
        .route(
            "/{notification_id}/read",
            put(routes::notification::mark_read),
        )
        .route(
            "/{notification_id}/pin",
            put(routes::notification::toggle_pin),
        )
        .route("/{notification_id}", delete(routes::notification::delete));

    let user_routes = Router::new()
        .route("/", get(routes::user::list))
        .route("/", post(routes::user::create))
        .route("/{user_id}", get(routes::user::get))
        .route("/{user_id}/role", put(routes::user::set_role))
        .route("/{user_id}/active", put(routes::user::set_active));

    // Storefront: no authentication, published offers only
    let public_routes = Router::new()
        .route("/offers", get(routes::public::list_offers))
        .route("/offers/{slug}", get(routes::public::get_offer))
        .route("/offers/{slug}/quote", post(routes::public::quote_offer))
        .route("/bookings", post(routes::public::create_booking));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/offers", offer_routes)
        .nest("/bookings", booking_routes)
        .nest("/hotels", hotel_routes)
        .nest("/flights", flight_routes)
        .nest("/transports", transport_routes)
        .nest("/suppliers", supplier_routes)
        .nest("/notifications", notification_routes)
        .nest("/users", user_routes)
        .nest("/public", public_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
