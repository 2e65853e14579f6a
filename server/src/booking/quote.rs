use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::emissions::carbon_footprint;
use super::error::BookingError;
use super::points::{points_earned, redeem, PointsRequest};
use super::voucher::evaluate_voucher;
use crate::models::{Destination, User, Voucher};

pub const CHECKIN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Body of both the price check and the purchase request.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub destination_id: Uuid,
    #[serde(default)]
    pub voucher_code: String,
    #[serde(default)]
    pub use_all_points: bool,
    #[serde(default)]
    pub used_points: i64,
    pub quantity: i32,
    pub checkin_date: String,
}

impl QuoteRequest {
    pub fn points_request(&self) -> PointsRequest {
        PointsRequest::from_parts(self.use_all_points, self.used_points)
    }

    pub fn voucher_code(&self) -> &str {
        self.voucher_code.trim()
    }
}

/// A fully priced booking. Previews return it as-is; purchases persist it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub destination_id: Uuid,
    pub destination_title: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub price_before_discount: i64,
    pub voucher_code: Option<String>,
    pub voucher_discount: i64,
    pub voucher_applied: bool,
    /// Price after the voucher, before points.
    pub running_total: i64,
    pub use_all_points: bool,
    pub points_redeemed: i64,
    pub points_discount: i64,
    pub total_cost: i64,
    pub points_earned: i64,
    pub carbon_footprint: f64,
    pub checkin_date: NaiveDate,
    pub point_message: &'static str,
}

pub fn parse_checkin_date(raw: &str, now: DateTime<Utc>) -> Result<NaiveDate, BookingError> {
    let date = NaiveDate::parse_from_str(raw.trim(), CHECKIN_DATE_FORMAT)
        .map_err(|_| BookingError::InvalidDate(raw.to_string()))?;
    if date < now.date_naive() {
        return Err(BookingError::PastCheckin);
    }
    Ok(date)
}

/// Prices a booking without touching storage.
///
/// `voucher` is whatever the store returned for the request's voucher code.
pub fn build_quote(
    user: &User,
    destination: &Destination,
    voucher: Option<&Voucher>,
    request: &QuoteRequest,
    now: DateTime<Utc>,
) -> Result<Quote, BookingError> {
    if request.quantity <= 0 {
        return Err(BookingError::InvalidQuantity);
    }
    let checkin_date = parse_checkin_date(&request.checkin_date, now)?;

    let price_before_discount = destination
        .unit_price
        .checked_mul(i64::from(request.quantity))
        .ok_or(BookingError::InvalidQuantity)?;

    let code = request.voucher_code();
    let voucher_outcome = evaluate_voucher(code, voucher, price_before_discount, now)?;
    let running_total = price_before_discount - voucher_outcome.discount;

    let redemption = redeem(request.points_request(), running_total, user.points)?;
    let total_cost = running_total - redemption.discount;

    if destination.available_tickets < request.quantity {
        return Err(BookingError::InsufficientInventory);
    }

    let carbon_footprint = carbon_footprint(user.coordinates(), destination.coordinates());
    let points_earned = points_earned(price_before_discount, voucher_outcome.applied);

    let point_message = if points_earned == 0 && voucher_outcome.applied {
        "Points not earned due to voucher"
    } else {
        "Points earned"
    };

    Ok(Quote {
        destination_id: destination.id,
        destination_title: destination.title.clone(),
        quantity: request.quantity,
        unit_price: destination.unit_price,
        price_before_discount,
        voucher_code: (!code.is_empty()).then(|| code.to_string()),
        voucher_discount: voucher_outcome.discount,
        voucher_applied: voucher_outcome.applied,
        running_total,
        use_all_points: request.use_all_points,
        points_redeemed: redemption.points,
        points_discount: redemption.discount,
        total_cost,
        points_earned,
        carbon_footprint,
        checkin_date,
        point_message,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub(crate) fn user(points: i64) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "budi".into(),
            email: "budi@example.com".into(),
            points,
            is_admin: false,
            latitude: -6.2,
            longitude: 106.8,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn destination(unit_price: i64, available_tickets: i32) -> Destination {
        let now = Utc::now();
        Destination {
            id: Uuid::new_v4(),
            title: "Candi Borobudur".into(),
            location: "Magelang".into(),
            city: "Magelang".into(),
            unit_price,
            available_tickets,
            latitude: -7.6,
            longitude: 110.2,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn voucher(code: &str, percent: i32) -> Voucher {
        let now = Utc::now();
        Voucher {
            id: Uuid::new_v4(),
            title: "Promo Liburan".into(),
            name: "Promo Liburan".into(),
            code: code.into(),
            percent,
            active: true,
            expires_at: now + Duration::days(7),
            description: "Diskon untuk liburan".into(),
            terms: "Berlaku hingga akhir bulan".into(),
            created_at: now,
        }
    }

    fn request(destination: &Destination, quantity: i32) -> QuoteRequest {
        QuoteRequest {
            destination_id: destination.id,
            voucher_code: String::new(),
            use_all_points: false,
            used_points: 0,
            quantity,
            checkin_date: (Utc::now() + Duration::days(3))
                .date_naive()
                .format(CHECKIN_DATE_FORMAT)
                .to_string(),
        }
    }

    #[test]
    fn test_plain_purchase_earns_points() {
        let d = destination(50_000, 10);
        let quote = build_quote(&user(0), &d, None, &request(&d, 1), Utc::now()).unwrap();
        assert_eq!(quote.total_cost, 50_000);
        assert_eq!(quote.points_earned, 5);
        assert_eq!(quote.voucher_code, None);
        assert_eq!(quote.point_message, "Points earned");
    }

    #[test]
    fn test_voucher_then_all_points() {
        let d = destination(100_000, 10);
        let v = voucher("HEMAT10", 10);
        let mut req = request(&d, 2);
        req.voucher_code = "HEMAT10".into();
        req.use_all_points = true;

        let quote = build_quote(&user(1_000), &d, Some(&v), &req, Utc::now()).unwrap();
        assert_eq!(quote.price_before_discount, 200_000);
        assert_eq!(quote.voucher_discount, 20_000);
        assert_eq!(quote.running_total, 180_000);
        assert_eq!(quote.points_redeemed, 180);
        assert_eq!(quote.points_discount, 180_000);
        assert_eq!(quote.total_cost, 0);
        assert_eq!(quote.points_earned, 0);
        assert_eq!(quote.point_message, "Points not earned due to voucher");
    }

    #[test]
    fn test_quantity_checked_before_date() {
        let d = destination(100_000, 10);
        let mut req = request(&d, 0);
        req.checkin_date = "not-a-date".into();
        let err = build_quote(&user(0), &d, None, &req, Utc::now()).unwrap_err();
        assert!(matches!(err, BookingError::InvalidQuantity));
    }

    #[test]
    fn test_date_validation() {
        let d = destination(100_000, 10);
        let mut req = request(&d, 1);
        req.checkin_date = "2024/01/01".into();
        assert!(matches!(
            build_quote(&user(0), &d, None, &req, Utc::now()),
            Err(BookingError::InvalidDate(_))
        ));

        let now = Utc::now();
        req.checkin_date = (now - Duration::days(1))
            .date_naive()
            .format(CHECKIN_DATE_FORMAT)
            .to_string();
        assert!(matches!(
            build_quote(&user(0), &d, None, &req, now),
            Err(BookingError::PastCheckin)
        ));

        req.checkin_date = now.date_naive().format(CHECKIN_DATE_FORMAT).to_string();
        assert!(build_quote(&user(0), &d, None, &req, now).is_ok());
    }

    #[test]
    fn test_inventory_is_checked_after_pricing() {
        let d = destination(100_000, 1);
        let mut req = request(&d, 2);
        req.used_points = 500;
        // pricing failure wins over the inventory failure
        assert!(matches!(
            build_quote(&user(1_000), &d, None, &req, Utc::now()),
            Err(BookingError::InsufficientRunningTotal { .. })
        ));

        req.used_points = 0;
        assert!(matches!(
            build_quote(&user(0), &d, None, &req, Utc::now()),
            Err(BookingError::InsufficientInventory)
        ));
    }

    #[test]
    fn test_price_overflow_is_rejected() {
        let d = destination(i64::MAX / 2, 10);
        let err = build_quote(&user(0), &d, None, &request(&d, 3), Utc::now()).unwrap_err();
        assert!(matches!(err, BookingError::InvalidQuantity));
    }
}
