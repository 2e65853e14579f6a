use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Order status of a booked ticket.
///
/// `Pending` is the only non-terminal state; `Success` and `Cancelled` have no
/// outgoing transitions. The wire and storage form of `Cancelled` is
/// `"dibatalkan"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "dibatalkan")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Success => "success",
            OrderStatus::Cancelled => "dibatalkan",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "success" => Ok(OrderStatus::Success),
            "dibatalkan" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub invoice_number: String,
    pub destination_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub price_before_discount: i64,
    pub voucher_code: Option<String>,
    pub voucher_discount: i64,
    pub points_discount: i64,
    pub points_redeemed: i64,
    pub use_all_points: bool,
    pub points_earned: i64,
    pub total_cost: i64,
    /// Grams of CO2-equivalent, computed when the booking was quoted.
    pub carbon_footprint: f64,
    pub checkin_date: NaiveDate,
    pub payment_deadline: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database shape of [`Ticket`]; `status` is stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct TicketRow {
    pub id: Uuid,
    pub invoice_number: String,
    pub destination_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub price_before_discount: i64,
    pub voucher_code: Option<String>,
    pub voucher_discount: i64,
    pub points_discount: i64,
    pub points_redeemed: i64,
    pub use_all_points: bool,
    pub points_earned: i64,
    pub total_cost: i64,
    pub carbon_footprint: f64,
    pub checkin_date: NaiveDate,
    pub payment_deadline: Option<DateTime<Utc>>,
    pub status: String,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = String;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            status: row.status.parse()?,
            id: row.id,
            invoice_number: row.invoice_number,
            destination_id: row.destination_id,
            user_id: row.user_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            price_before_discount: row.price_before_discount,
            voucher_code: row.voucher_code,
            voucher_discount: row.voucher_discount,
            points_discount: row.points_discount,
            points_redeemed: row.points_redeemed,
            use_all_points: row.use_all_points,
            points_earned: row.points_earned,
            total_cost: row.total_cost,
            carbon_footprint: row.carbon_footprint,
            checkin_date: row.checkin_date,
            payment_deadline: row.payment_deadline,
            paid: row.paid,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A priced booking ready to be persisted. Always starts `pending` and unpaid.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub invoice_number: String,
    pub destination_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub price_before_discount: i64,
    pub voucher_code: Option<String>,
    pub voucher_discount: i64,
    pub points_discount: i64,
    pub points_redeemed: i64,
    pub use_all_points: bool,
    pub points_earned: i64,
    pub total_cost: i64,
    pub carbon_footprint: f64,
    pub checkin_date: NaiveDate,
    pub payment_deadline: DateTime<Utc>,
}

impl NewTicket {
    pub fn into_ticket(self, id: Uuid, now: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            invoice_number: self.invoice_number,
            destination_id: self.destination_id,
            user_id: self.user_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            price_before_discount: self.price_before_discount,
            voucher_code: self.voucher_code,
            voucher_discount: self.voucher_discount,
            points_discount: self.points_discount,
            points_redeemed: self.points_redeemed,
            use_all_points: self.use_all_points,
            points_earned: self.points_earned,
            total_cost: self.total_cost,
            carbon_footprint: self.carbon_footprint,
            checkin_date: self.checkin_date,
            payment_deadline: Some(self.payment_deadline),
            status: OrderStatus::Pending,
            paid: false,
            created_at: now,
            updated_at: now,
        }
    }
}
