use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::promo::PromoView;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

const DEFAULT_PER_PAGE: usize = 10;
const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PromoQuery {
    pub name: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Serialize)]
struct Pagination {
    current_page: usize,
    per_page: usize,
    last_page: usize,
    total: usize,
}

#[derive(Serialize)]
struct PromoPage {
    promos: Vec<PromoView>,
    pagination: Pagination,
}

pub async fn list_promos(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    query: Result<Query<PromoQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let needle = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_lowercase);

    let now = Utc::now();
    let matching: Vec<_> = state
        .store
        .list_vouchers()
        .await?
        .into_iter()
        .filter(|v| match &needle {
            Some(needle) => v.name.to_lowercase().contains(needle),
            None => true,
        })
        .collect();

    let total = matching.len();
    let promos = matching
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .map(|v| PromoView::new(v, now))
        .collect();

    let body = PromoPage {
        promos,
        pagination: Pagination {
            current_page: page,
            per_page,
            last_page: total.div_ceil(per_page),
            total,
        },
    };
    Ok(success(body, "Promos retrieved"))
}

pub async fn get_promo(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let voucher = state
        .store
        .find_voucher(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promo '{}' was not found", id)))?;
    Ok(success(PromoView::new(voucher, Utc::now()), "Promo retrieved"))
}
