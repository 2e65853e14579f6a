use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Promotional voucher ("promo") redeemable by code at booking time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Voucher {
    pub id: Uuid,
    pub title: String,
    pub name: String,
    pub code: String,
    pub percent: i32,
    pub active: bool,
    pub expires_at: DateTime<Utc>,
    pub description: String,
    pub terms: String,
    pub created_at: DateTime<Utc>,
}

impl Voucher {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewVoucher {
    pub title: String,
    pub name: String,
    pub code: String,
    pub percent: i32,
    pub active: bool,
    pub expires_at: DateTime<Utc>,
    pub description: String,
    pub terms: String,
}

impl NewVoucher {
    pub fn into_voucher(self, id: Uuid, now: DateTime<Utc>) -> Voucher {
        Voucher {
            id,
            title: self.title,
            name: self.name,
            code: self.code,
            percent: self.percent,
            active: self.active,
            expires_at: self.expires_at,
            description: self.description,
            terms: self.terms,
            created_at: now,
        }
    }
}
