use axum::http::{header, HeaderValue};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{admin, booking, destinations, health_check, notifications, promos, tickets};
use crate::state::AppState;

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/tourism-attractions/booking/check", post(booking::check_booking))
        .route("/tourism-attractions/booking", post(booking::purchase))
        .route("/tourism-attractions/:id", get(destinations::get_destination))
        .route(
            "/carbonfootprints/:destination_id",
            get(destinations::carbon_footprint),
        )
        .route(
            "/tourism-attractions/cancel/:invoice_number",
            delete(booking::cancel),
        )
        .route("/user/tickets", get(tickets::list_own_tickets))
        .route("/user/tickets/:invoice_number", get(tickets::get_own_ticket))
        .route("/user/points", get(tickets::points_history))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/:id", put(notifications::mark_read))
        .route("/promos", get(promos::list_promos))
        .route("/promos/:id", get(promos::get_promo))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/promos", post(admin::create_voucher))
        .route("/tourism-attractions", post(admin::create_destination))
        .route("/tourism-attractions/:id", put(admin::update_destination))
        .route("/tickets", get(admin::list_tickets))
        .route(
            "/tickets/:invoice_number",
            get(admin::get_ticket)
                .put(admin::settle_ticket)
                .delete(admin::delete_ticket),
        )
}

pub fn create_routes(state: AppState) -> Router {
    let cors = create_cors_layer(&state.config);
    let security_headers = create_security_headers_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .merge(user_routes())
        .nest("/admin", admin_routes())
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(security_headers)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
