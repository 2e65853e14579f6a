//! Admin-managed vouchers ("promos").

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::booking::quote::CHECKIN_DATE_FORMAT;
use crate::models::{NewVoucher, Voucher};
use crate::store::{BookingStore, StoreError};

#[derive(Debug, Error, PartialEq)]
pub enum PromoError {
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("percent must be between 1 and 100")]
    Percent,

    #[error("Invalid expires_at format. Use YYYY-MM-DD")]
    ExpiryFormat,

    #[error("expires_at must be a future date")]
    ExpiryNotInFuture,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromoRequest {
    pub title: String,
    pub name: String,
    pub code: String,
    pub percent: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    pub expires_at: String,
    pub description: String,
    pub terms: String,
}

fn default_active() -> bool {
    true
}

fn check_length(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), PromoError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(PromoError::Length { field, min, max });
    }
    Ok(())
}

impl CreatePromoRequest {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<NewVoucher, PromoError> {
        let title = self.title.trim();
        let name = self.name.trim();
        let code = self.code.trim();
        check_length("title", title, 5, 100)?;
        check_length("name", name, 5, 100)?;
        check_length("code", code, 5, 40)?;
        check_length("description", &self.description, 10, 2000)?;
        check_length("terms", &self.terms, 10, 2000)?;

        if !(1..=100).contains(&self.percent) {
            return Err(PromoError::Percent);
        }

        let expiry_date = NaiveDate::parse_from_str(self.expires_at.trim(), CHECKIN_DATE_FORMAT)
            .map_err(|_| PromoError::ExpiryFormat)?;
        let expires_at = expiry_date.and_time(NaiveTime::MIN).and_utc();
        if expires_at <= now {
            return Err(PromoError::ExpiryNotInFuture);
        }

        Ok(NewVoucher {
            title: title.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            percent: self.percent,
            active: self.active,
            expires_at,
            description: self.description.clone(),
            terms: self.terms.clone(),
        })
    }
}

/// Voucher as listed to users; an expired voucher is shown inactive.
#[derive(Debug, Clone, Serialize)]
pub struct PromoView {
    #[serde(flatten)]
    pub voucher: Voucher,
    pub expired: bool,
}

impl PromoView {
    pub fn new(mut voucher: Voucher, now: DateTime<Utc>) -> Self {
        let expired = voucher.is_expired_at(now);
        if expired {
            voucher.active = false;
        }
        Self { voucher, expired }
    }
}

/// Stores the voucher and tells every user about it, as one store write.
pub async fn create_promo(
    store: &dyn BookingStore,
    voucher: NewVoucher,
) -> Result<Voucher, StoreError> {
    let (created, notified) = store.create_voucher_and_broadcast(voucher).await?;
    info!(voucher_id = %created.id, code = %created.code, notified, "Promo created");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::quote::tests::{user, voucher};
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn request() -> CreatePromoRequest {
        CreatePromoRequest {
            title: "Promo Akhir Tahun".into(),
            name: "Akhir Tahun".into(),
            code: "AKHIR2024".into(),
            percent: 25,
            active: true,
            expires_at: (Utc::now() + Duration::days(30))
                .date_naive()
                .format(CHECKIN_DATE_FORMAT)
                .to_string(),
            description: "Diskon akhir tahun untuk semua destinasi".into(),
            terms: "Berlaku untuk satu transaksi".into(),
        }
    }

    #[test]
    fn test_valid_request() {
        let voucher = request().validate(Utc::now()).unwrap();
        assert_eq!(voucher.code, "AKHIR2024");
        assert_eq!(voucher.percent, 25);
    }

    #[test]
    fn test_field_bounds() {
        let mut req = request();
        req.code = "ABC".into();
        assert_eq!(
            req.validate(Utc::now()),
            Err(PromoError::Length {
                field: "code",
                min: 5,
                max: 40
            })
        );

        let mut req = request();
        req.percent = 0;
        assert_eq!(req.validate(Utc::now()), Err(PromoError::Percent));
        req.percent = 101;
        assert_eq!(req.validate(Utc::now()), Err(PromoError::Percent));

        let mut req = request();
        req.description = "pendek".into();
        assert!(matches!(
            req.validate(Utc::now()),
            Err(PromoError::Length { field: "description", .. })
        ));
    }

    #[test]
    fn test_expiry_must_be_future_date() {
        let now = Utc::now();
        let mut req = request();
        req.expires_at = "31-12-2030".into();
        assert_eq!(req.validate(now), Err(PromoError::ExpiryFormat));

        req.expires_at = now.date_naive().format(CHECKIN_DATE_FORMAT).to_string();
        assert_eq!(req.validate(now), Err(PromoError::ExpiryNotInFuture));
    }

    #[test]
    fn test_expired_promo_shown_inactive() {
        let mut v = voucher("LAMA2020", 10);
        v.expires_at = Utc::now() - Duration::days(1);
        let view = PromoView::new(v, Utc::now());
        assert!(view.expired);
        assert!(!view.voucher.active);
    }

    #[tokio::test]
    async fn test_create_broadcasts_to_every_user() {
        let store = MemoryStore::new();
        let (a, b) = (user(0), user(5));
        store.insert_user(a.clone()).await;
        store.insert_user(b.clone()).await;

        let created = create_promo(&store, request().validate(Utc::now()).unwrap())
            .await
            .unwrap();

        for id in [a.id, b.id] {
            let notes = store.list_notifications(id).await.unwrap();
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].voucher_id, Some(created.id));
            assert!(notes[0].is_promo());
        }

        let duplicate = create_promo(&store, request().validate(Utc::now()).unwrap()).await;
        assert!(matches!(duplicate, Err(StoreError::DuplicateVoucherCode)));
        for id in [a.id, b.id] {
            assert_eq!(store.list_notifications(id).await.unwrap().len(), 1);
        }
    }
}
