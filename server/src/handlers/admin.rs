use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::catalog::{CreateDestinationRequest, UpdateDestinationRequest};
use crate::promo::{create_promo, CreatePromoRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub paid: bool,
}

pub async fn create_voucher(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    payload: Result<Json<CreatePromoRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let voucher = request.validate(Utc::now())?;
    let created_voucher = create_promo(state.store.as_ref(), voucher).await?;
    info!(admin_id = %admin.id, voucher_id = %created_voucher.id, "Admin created promo");
    Ok(created(created_voucher, "Promo created successfully"))
}

pub async fn create_destination(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    payload: Result<Json<CreateDestinationRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let destination = request.validate()?;
    let created_destination = state.store.create_destination(destination).await?;
    info!(
        admin_id = %admin.id,
        destination_id = %created_destination.id,
        "Admin created destination"
    );
    Ok(created(created_destination, "Destination created successfully"))
}

/// Edits price, inventory or location; omitted fields keep their value.
pub async fn update_destination(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateDestinationRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let update = request.validate()?;
    let destination = state
        .store
        .update_destination(id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Destination '{}' was not found", id)))?;
    info!(admin_id = %admin.id, destination_id = %id, "Admin updated destination");
    Ok(success(destination, "Destination updated successfully"))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Response, AppError> {
    let tickets = state.bookings.all_tickets().await?;
    Ok(success(tickets, "Tickets retrieved"))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    invoice_number: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(invoice_number) = invoice_number?;
    let ticket = state.bookings.ticket(&invoice_number).await?;
    Ok(success(ticket, "Ticket retrieved"))
}

/// Records the payment outcome of a pending ticket.
pub async fn settle_ticket(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    invoice_number: Result<Path<String>, PathRejection>,
    payload: Result<Json<SettleRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(invoice_number) = invoice_number?;
    let Json(request) = payload?;
    let ticket = state.bookings.settle(&invoice_number, request.paid).await?;
    Ok(success(ticket, "Paid status updated successfully"))
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    invoice_number: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(invoice_number) = invoice_number?;
    state.bookings.delete(&invoice_number).await?;
    Ok(empty_success("Ticket deleted successfully"))
}
