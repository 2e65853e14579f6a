use thiserror::Error;

use crate::models::OrderStatus;
use crate::store::StoreError;

/// Coarse failure category, used to pick the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    #[error("Invalid checkin date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Checkin date must be today or later")]
    PastCheckin,

    #[error("Used points must not be negative")]
    InvalidPoints,

    #[error("Invalid voucher code")]
    InvalidVoucher,

    #[error("Voucher is not active")]
    VoucherNotActive,

    #[error("Voucher has expired")]
    VoucherExpired,

    #[error("Points discount of {discount} exceeds the remaining price of {running_total}")]
    InsufficientRunningTotal { discount: i64, running_total: i64 },

    #[error("Not enough points to use")]
    InsufficientPoints,

    #[error("Not enough available tickets")]
    InsufficientInventory,

    #[error("Destination not found")]
    DestinationNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Ticket not found")]
    TicketNotFound,

    #[error("Ticket has already been cancelled")]
    AlreadyCancelled,

    #[error("Cannot cancel ticket with status '{0}'")]
    InvalidStateForCancel(OrderStatus),

    #[error("Cannot update paid status for a cancelled ticket")]
    TicketCancelled,

    #[error("Ticket has already been paid")]
    AlreadySettled,

    #[error("Only pending tickets can be deleted, ticket is '{0}'")]
    NotDeletable(OrderStatus),

    #[error("Ticket was modified concurrently, retry the request")]
    StaleTicket,

    #[error("Storage failure")]
    Store(#[source] StoreError),
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::InvalidQuantity
            | BookingError::InvalidDate(_)
            | BookingError::PastCheckin
            | BookingError::InvalidPoints => ErrorKind::Validation,

            BookingError::InvalidVoucher
            | BookingError::DestinationNotFound
            | BookingError::UserNotFound
            | BookingError::TicketNotFound => ErrorKind::NotFound,

            BookingError::VoucherNotActive
            | BookingError::VoucherExpired
            | BookingError::InsufficientRunningTotal { .. }
            | BookingError::InsufficientPoints
            | BookingError::InsufficientInventory
            | BookingError::AlreadyCancelled
            | BookingError::InvalidStateForCancel(_)
            | BookingError::TicketCancelled
            | BookingError::AlreadySettled
            | BookingError::NotDeletable(_)
            | BookingError::StaleTicket => ErrorKind::Conflict,

            BookingError::Store(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BookingError::InvalidQuantity => "INVALID_QUANTITY",
            BookingError::InvalidDate(_) => "INVALID_DATE",
            BookingError::PastCheckin => "PAST_CHECKIN",
            BookingError::InvalidPoints => "INVALID_POINTS",
            BookingError::InvalidVoucher => "INVALID_VOUCHER",
            BookingError::VoucherNotActive => "VOUCHER_NOT_ACTIVE",
            BookingError::VoucherExpired => "VOUCHER_EXPIRED",
            BookingError::InsufficientRunningTotal { .. } => "INSUFFICIENT_RUNNING_TOTAL",
            BookingError::InsufficientPoints => "INSUFFICIENT_POINTS",
            BookingError::InsufficientInventory => "INSUFFICIENT_INVENTORY",
            BookingError::DestinationNotFound => "DESTINATION_NOT_FOUND",
            BookingError::UserNotFound => "USER_NOT_FOUND",
            BookingError::TicketNotFound => "TICKET_NOT_FOUND",
            BookingError::AlreadyCancelled => "ALREADY_CANCELLED",
            BookingError::InvalidStateForCancel(_) => "INVALID_STATE_FOR_CANCEL",
            BookingError::TicketCancelled => "TICKET_CANCELLED",
            BookingError::AlreadySettled => "ALREADY_SETTLED",
            BookingError::NotDeletable(_) => "NOT_DELETABLE",
            BookingError::StaleTicket => "STALE_TICKET",
            BookingError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientInventory => BookingError::InsufficientInventory,
            StoreError::InsufficientPoints => BookingError::InsufficientPoints,
            StoreError::Conflict => BookingError::StaleTicket,
            other => BookingError::Store(other),
        }
    }
}
