use chrono::{DateTime, Utc};

use super::error::BookingError;
use crate::models::Voucher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoucherOutcome {
    pub discount: i64,
    /// A voucher was accepted. Suppresses point earning even when the
    /// discount is zero.
    pub applied: bool,
}

/// Applies the voucher identified by `code` to `base_price`.
///
/// `voucher` is the result of looking `code` up; it is ignored when `code` is
/// empty.
pub fn evaluate_voucher(
    code: &str,
    voucher: Option<&Voucher>,
    base_price: i64,
    now: DateTime<Utc>,
) -> Result<VoucherOutcome, BookingError> {
    if code.is_empty() {
        return Ok(VoucherOutcome::default());
    }

    let voucher = voucher.ok_or(BookingError::InvalidVoucher)?;
    if !voucher.active {
        return Err(BookingError::VoucherNotActive);
    }
    if voucher.is_expired_at(now) {
        return Err(BookingError::VoucherExpired);
    }

    Ok(VoucherOutcome {
        discount: percent_of(base_price, voucher.percent),
        applied: true,
    })
}

/// `floor(amount * percent / 100)` with the percentage clamped to 0..=100.
pub fn percent_of(amount: i64, percent: i32) -> i64 {
    let percent = i128::from(percent.clamp(0, 100));
    (i128::from(amount) * percent / 100) as i64
}
