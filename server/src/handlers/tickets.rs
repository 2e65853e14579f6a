use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::booking::PointsEntry;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
struct PointsSummary {
    balance: i64,
    history: Vec<PointsEntry>,
}

pub async fn list_own_tickets(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    let tickets = state.bookings.tickets_for_user(user.id).await?;
    Ok(success(tickets, "Ticket history retrieved"))
}

pub async fn get_own_ticket(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    invoice_number: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(invoice_number) = invoice_number?;
    let ticket = state.bookings.ticket_for_user(user.id, &invoice_number).await?;
    Ok(success(ticket, "Ticket retrieved"))
}

pub async fn points_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    let history = state.bookings.points_history(user.id).await?;
    let summary = PointsSummary {
        balance: user.points,
        history,
    };
    Ok(success(summary, "Points history retrieved"))
}
