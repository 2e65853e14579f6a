//! Order status transitions.
//!
//! Transitions are planned here as plain values and applied by the store with
//! a compare-and-swap on the status they were planned from.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::error::BookingError;
use crate::models::{NotificationDraft, OrderStatus, Ticket};

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub paid: bool,
    pub payment_deadline: Option<DateTime<Utc>>,
    /// Points credited to the ticket owner.
    pub points_credit: i64,
    /// Tickets returned to the destination's inventory.
    pub inventory_restore: i32,
    pub notification: Option<NotificationDraft>,
}

/// Payment is due at the start of the check-in day.
pub fn payment_deadline_for(checkin_date: NaiveDate) -> DateTime<Utc> {
    checkin_date.and_time(NaiveTime::MIN).and_utc()
}

/// Owner-initiated cancellation of an unpaid booking.
pub fn plan_cancel(ticket: &Ticket) -> Result<Transition, BookingError> {
    match ticket.status {
        OrderStatus::Pending => Ok(Transition {
            from: OrderStatus::Pending,
            to: OrderStatus::Cancelled,
            paid: ticket.paid,
            payment_deadline: ticket.payment_deadline,
            points_credit: ticket.points_redeemed,
            inventory_restore: ticket.quantity,
            notification: None,
        }),
        OrderStatus::Cancelled => Err(BookingError::AlreadyCancelled),
        status @ OrderStatus::Success => Err(BookingError::InvalidStateForCancel(status)),
    }
}

/// Admin payment settlement.
///
/// Marking a pending ticket paid completes it and credits its earned points,
/// except to admin accounts. Marking it unpaid keeps it pending and resets the
/// deadline to the check-in date.
pub fn plan_settle(
    ticket: &Ticket,
    paid: bool,
    owner_is_admin: bool,
    destination_title: &str,
) -> Result<Transition, BookingError> {
    match ticket.status {
        OrderStatus::Cancelled => Err(BookingError::TicketCancelled),
        OrderStatus::Success => Err(BookingError::AlreadySettled),
        OrderStatus::Pending if paid => Ok(Transition {
            from: OrderStatus::Pending,
            to: OrderStatus::Success,
            paid: true,
            payment_deadline: None,
            points_credit: if owner_is_admin { 0 } else { ticket.points_earned },
            inventory_restore: 0,
            notification: Some(NotificationDraft::payment_success(
                &ticket.invoice_number,
                destination_title,
            )),
        }),
        OrderStatus::Pending => Ok(Transition {
            from: OrderStatus::Pending,
            to: OrderStatus::Pending,
            paid: false,
            payment_deadline: Some(payment_deadline_for(ticket.checkin_date)),
            points_credit: 0,
            inventory_restore: 0,
            notification: None,
        }),
    }
}

/// Status a reader should see, without writing anything back.
///
/// A pending ticket already flagged paid resolves to `success`, or to
/// `dibatalkan` when its payment deadline had lapsed.
pub fn effective_status(ticket: &Ticket, now: DateTime<Utc>) -> OrderStatus {
    match ticket.status {
        OrderStatus::Pending if ticket.paid => match ticket.payment_deadline {
            Some(deadline) if now > deadline => OrderStatus::Cancelled,
            _ => OrderStatus::Success,
        },
        status => status,
    }
}

/// Copy of `ticket` as presented to readers.
pub fn present(ticket: &Ticket, now: DateTime<Utc>) -> Ticket {
    let status = effective_status(ticket, now);
    let mut view = ticket.clone();
    if status != ticket.status {
        view.status = status;
        view.payment_deadline = None;
    }
    view
}
