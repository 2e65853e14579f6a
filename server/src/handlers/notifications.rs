use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::Notification;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

#[derive(Serialize)]
struct NotificationView {
    #[serde(flatten)]
    notification: Notification,
    label: &'static str,
}

impl From<Notification> for NotificationView {
    fn from(notification: Notification) -> Self {
        let label = if notification.is_promo() {
            "Promo"
        } else {
            "Pembayaran"
        };
        Self {
            notification,
            label,
        }
    }
}

pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    let notifications: Vec<NotificationView> = state
        .store
        .list_notifications(user.id)
        .await?
        .into_iter()
        .map(NotificationView::from)
        .collect();
    Ok(success(notifications, "Notifications retrieved"))
}

pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    if !state.store.mark_notification_read(user.id, id).await? {
        return Err(AppError::NotFound(format!("Notification '{}' was not found", id)));
    }
    Ok(empty_success("Notification marked as read"))
}
