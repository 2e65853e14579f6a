use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::auth::AuthUser;
use crate::booking::QuoteRequest;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// Prices a booking without reserving anything.
pub async fn check_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let quote = state.bookings.preview(user.id, &request).await?;
    Ok(success(quote, "Ticket price calculated"))
}

pub async fn purchase(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let purchase = state.bookings.purchase(user.id, &request).await?;
    Ok(created(purchase, "Ticket purchased successfully"))
}

pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    invoice_number: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(invoice_number) = invoice_number?;
    let ticket = state.bookings.cancel(user.id, &invoice_number).await?;
    Ok(success(ticket, "Ticket cancelled successfully"))
}
