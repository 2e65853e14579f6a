use super::error::BookingError;

/// Currency value of one redeemed point.
pub const POINT_VALUE: i64 = 1_000;

/// One point is earned per this much spent, before discounts.
pub const EARNING_STEP: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsRequest {
    /// Redeem as many points as the balance and the price allow.
    UseAll,
    /// Redeem exactly this many points.
    Explicit(i64),
}

impl PointsRequest {
    pub fn from_parts(use_all_points: bool, used_points: i64) -> Self {
        if use_all_points {
            PointsRequest::UseAll
        } else {
            PointsRequest::Explicit(used_points)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Redemption {
    pub points: i64,
    pub discount: i64,
}

/// Works out how many points to redeem against `running_total`, the price
/// after the voucher discount.
pub fn redeem(
    request: PointsRequest,
    running_total: i64,
    balance: i64,
) -> Result<Redemption, BookingError> {
    match request {
        PointsRequest::UseAll => {
            let points = (running_total / POINT_VALUE).min(balance.max(0)).max(0);
            Ok(Redemption {
                points,
                discount: points * POINT_VALUE,
            })
        }
        PointsRequest::Explicit(points) => {
            if points < 0 {
                return Err(BookingError::InvalidPoints);
            }
            let discount = points.checked_mul(POINT_VALUE).unwrap_or(i64::MAX);
            if discount > running_total {
                return Err(BookingError::InsufficientRunningTotal {
                    discount,
                    running_total,
                });
            }
            if points > balance {
                return Err(BookingError::InsufficientPoints);
            }
            Ok(Redemption { points, discount })
        }
    }
}

/// Points credited when the ticket is paid. Any applied voucher forfeits them.
pub fn points_earned(price_before_discount: i64, voucher_applied: bool) -> i64 {
    if voucher_applied {
        0
    } else {
        price_before_discount.max(0) / EARNING_STEP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_all_is_capped_by_price() {
        let r = redeem(PointsRequest::UseAll, 180_000, 1_000).unwrap();
        assert_eq!(r, Redemption { points: 180, discount: 180_000 });
    }

    #[test]
    fn test_use_all_is_capped_by_balance() {
        let r = redeem(PointsRequest::UseAll, 180_000, 25).unwrap();
        assert_eq!(r, Redemption { points: 25, discount: 25_000 });
    }

    #[test]
    fn test_use_all_ignores_sub_point_remainder() {
        let r = redeem(PointsRequest::UseAll, 1_999, 10).unwrap();
        assert_eq!(r.points, 1);
        assert_eq!(r.discount, 1_000);
    }

    #[test]
    fn test_explicit_may_not_exceed_running_total() {
        let err = redeem(PointsRequest::Explicit(6), 5_000, 100).unwrap_err();
        assert!(matches!(
            err,
            BookingError::InsufficientRunningTotal {
                discount: 6_000,
                running_total: 5_000
            }
        ));
    }

    #[test]
    fn test_explicit_may_not_exceed_balance() {
        let err = redeem(PointsRequest::Explicit(4), 50_000, 3).unwrap_err();
        assert!(matches!(err, BookingError::InsufficientPoints));
    }

    #[test]
    fn test_explicit_rejects_negative_and_overflow() {
        assert!(matches!(
            redeem(PointsRequest::Explicit(-1), 50_000, 3),
            Err(BookingError::InvalidPoints)
        ));
        assert!(matches!(
            redeem(PointsRequest::Explicit(i64::MAX), 50_000, i64::MAX),
            Err(BookingError::InsufficientRunningTotal { .. })
        ));
    }

    #[test]
    fn test_explicit_zero_is_free() {
        let r = redeem(PointsRequest::Explicit(0), 0, 0).unwrap();
        assert_eq!(r, Redemption::default());
    }

    #[test]
    fn test_earning() {
        assert_eq!(points_earned(50_000, false), 5);
        assert_eq!(points_earned(59_999, false), 5);
        assert_eq!(points_earned(9_999, false), 0);
        assert_eq!(points_earned(1_000_000, true), 0);
    }
}
