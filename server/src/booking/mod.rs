//! Booking & pricing engine: quoting, committing, cancelling and settling
//! ticket purchases.

pub mod emissions;
pub mod error;
pub mod lifecycle;
pub mod points;
pub mod quote;
pub mod service;
pub mod voucher;

pub use error::{BookingError, ErrorKind};
pub use quote::{build_quote, Quote, QuoteRequest};
pub use service::{BookingService, PointsEntry, Purchase, TicketDetail};
