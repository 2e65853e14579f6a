use std::fmt::Write;

use super::EmailMessage;
use crate::models::{Destination, Ticket, User};

/// Purchase confirmation sent after a booking is committed.
pub fn purchase_receipt(user: &User, destination: &Destination, ticket: &Ticket) -> EmailMessage {
    let mut body = String::new();
    let _ = writeln!(body, "Successful Ticket Purchase");
    let _ = writeln!(body);
    let _ = writeln!(body, "Invoice Number: {}", ticket.invoice_number);
    let _ = writeln!(body, "Destination: {}", destination.title);
    let _ = writeln!(body, "Quantity: {}", ticket.quantity);
    let _ = writeln!(body, "Check-in Date: {}", ticket.checkin_date.format("%Y-%m-%d"));
    let _ = writeln!(body, "Total Price: Rp. {}", ticket.total_cost);
    if let Some(code) = &ticket.voucher_code {
        let _ = writeln!(body, "Voucher Code: {}", code);
    }
    let _ = writeln!(body, "Points Earned: {}", ticket.points_earned);
    let _ = writeln!(body, "Used Points: {}", ticket.points_redeemed);
    let _ = writeln!(body, "Carbon Footprint: {:.2} grams CO2", ticket.carbon_footprint);
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "Please complete payment before {}.",
        ticket.checkin_date.format("%Y-%m-%d")
    );

    EmailMessage {
        to: user.email.clone(),
        subject: format!(
            "Pembelian Tiket Wisata Berhasil - Invoice No: {}",
            ticket.invoice_number
        ),
        body,
    }
}
