use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::catalog::DestinationDetail;
use crate::models::Destination;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
struct CarbonFootprint {
    destination_id: Uuid,
    total_carbon_footprint: f64,
}

async fn load_destination(state: &AppState, id: Uuid) -> Result<Destination, AppError> {
    state
        .store
        .find_destination(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Destination '{}' was not found", id)))
}

pub async fn get_destination(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let destination = load_destination(&state, id).await?;
    let total_carbon_footprint = state.store.total_carbon_footprint(id).await?;
    let detail = DestinationDetail {
        destination,
        total_carbon_footprint,
    };
    Ok(success(detail, "Destination retrieved"))
}

/// Carbon footprint of every paid ticket to a destination, in grams of CO2.
pub async fn carbon_footprint(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    load_destination(&state, id).await?;
    let total_carbon_footprint = state.store.total_carbon_footprint(id).await?;
    let body = CarbonFootprint {
        destination_id: id,
        total_carbon_footprint,
    };
    Ok(success(body, "Total carbon footprint retrieved"))
}
