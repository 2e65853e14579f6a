use chrono::{Duration, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use wisata_server::booking::points::POINT_VALUE;
use wisata_server::booking::{build_quote, BookingError, QuoteRequest};
use wisata_server::models::{Destination, User, Voucher};

fn user(points: i64) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: "sari".into(),
        email: "sari@example.com".into(),
        points,
        is_admin: false,
        latitude: -6.9,
        longitude: 107.6,
        created_at: now,
        updated_at: now,
    }
}

fn destination(unit_price: i64) -> Destination {
    let now = Utc::now();
    Destination {
        id: Uuid::new_v4(),
        title: "Kawah Putih".into(),
        location: "Ciwidey".into(),
        city: "Bandung".into(),
        unit_price,
        available_tickets: 1_000,
        latitude: -7.16,
        longitude: 107.4,
        created_at: now,
        updated_at: now,
    }
}

fn voucher(percent: i32) -> Voucher {
    let now = Utc::now();
    Voucher {
        id: Uuid::new_v4(),
        title: "Promo Akhir Pekan".into(),
        name: "Akhir Pekan".into(),
        code: "PEKAN".into(),
        percent,
        active: true,
        expires_at: now + Duration::days(3),
        description: "Diskon akhir pekan".into(),
        terms: "Sabtu dan Minggu".into(),
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
        checkin_date: (Utc::now() + Duration::days(1))
            .date_naive()
            .format("%Y-%m-%d")
            .to_string(),
    }
}

proptest! {
    #[test]
    fn non_positive_quantity_is_rejected(quantity in i32::MIN..=0) {
        let d = destination(25_000);
        let result = build_quote(&user(0), &d, None, &request(&d, quantity), Utc::now());
        prop_assert!(matches!(result, Err(BookingError::InvalidQuantity)));
    }

    #[test]
    fn voucher_discount_is_floored_and_stops_earning(
        unit_price in 0i64..5_000_000,
        quantity in 1i32..20,
        percent in 1i32..=100,
    ) {
        let d = destination(unit_price);
        let v = voucher(percent);
        let mut req = request(&d, quantity);
        req.voucher_code = v.code.clone();

        let quote = build_quote(&user(0), &d, Some(&v), &req, Utc::now()).unwrap();
        let base = unit_price * i64::from(quantity);
        prop_assert_eq!(quote.voucher_discount, base * i64::from(percent) / 100);
        prop_assert_eq!(quote.points_earned, 0);
    }

    #[test]
    fn use_all_points_stays_within_bounds(
        unit_price in 0i64..5_000_000,
        quantity in 1i32..20,
        balance in 0i64..100_000,
    ) {
        let d = destination(unit_price);
        let mut req = request(&d, quantity);
        req.use_all_points = true;

        let quote = build_quote(&user(balance), &d, None, &req, Utc::now()).unwrap();
        prop_assert!(quote.points_redeemed <= balance.min(quote.running_total / POINT_VALUE));
        prop_assert!(quote.total_cost >= 0);
        prop_assert_eq!(quote.total_cost, quote.running_total - quote.points_discount);
    }

    #[test]
    fn explicit_points_above_running_total_conflict(
        unit_price in 0i64..500_000,
        extra in 1i64..1_000,
    ) {
        let d = destination(unit_price);
        let mut req = request(&d, 1);
        req.used_points = unit_price / POINT_VALUE + extra;

        let result = build_quote(&user(i64::MAX), &d, None, &req, Utc::now());
        prop_assert!(
            matches!(result, Err(BookingError::InsufficientRunningTotal { .. })),
            "got {:?}",
            result
        );
    }
}
