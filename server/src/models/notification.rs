use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub invoice_number: Option<String>,
    pub voucher_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_promo(&self) -> bool {
        self.voucher_id.is_some()
    }
}

/// Notification content before it is addressed to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub invoice_number: Option<String>,
    pub voucher_id: Option<Uuid>,
}

impl NotificationDraft {
    pub fn payment_success(invoice_number: &str, destination_title: &str) -> Self {
        Self {
            title: "Transaksi Sukses".to_string(),
            message: format!(
                "Tiket untuk wisata {} berhasil dibayar. Selamat liburan!",
                destination_title
            ),
            invoice_number: Some(invoice_number.to_string()),
            voucher_id: None,
        }
    }

    pub fn new_promo(voucher_id: Uuid, voucher_title: &str) -> Self {
        Self {
            title: format!("Promo {}", voucher_title),
            message: "Ada promo menarik buat kamu yang suka healing".to_string(),
            invoice_number: None,
            voucher_id: Some(voucher_id),
        }
    }

    pub fn addressed_to(&self, user_id: Uuid, now: DateTime<Utc>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            title: self.title.clone(),
            message: self.message.clone(),
            invoice_number: self.invoice_number.clone(),
            voucher_id: self.voucher_id,
            read: false,
            created_at: now,
        }
    }
}
