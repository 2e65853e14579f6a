use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::error::BookingError;
use super::lifecycle::{payment_deadline_for, plan_cancel, plan_settle, present};
use super::quote::{build_quote, Quote, QuoteRequest};
use crate::models::{Destination, NewTicket, Ticket, User};
use crate::notify::{dispatch, purchase_receipt, Mailer};
use crate::store::BookingStore;

#[derive(Debug, Clone, Serialize)]
pub struct DestinationSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Destination> for DestinationSummary {
    fn from(d: &Destination) -> Self {
        Self {
            id: d.id,
            title: d.title.clone(),
            location: d.location.clone(),
            city: d.city.clone(),
            latitude: d.latitude,
            longitude: d.longitude,
        }
    }
}

/// A ticket as shown to readers: effective status plus destination details.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub destination: Option<DestinationSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub ticket: Ticket,
    pub quote: Quote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsMovement {
    Earned,
    Used,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointsEntry {
    pub invoice_number: String,
    pub destination_title: Option<String>,
    pub movement: PointsMovement,
    pub points: i64,
    pub message: &'static str,
}

pub fn generate_invoice_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "INV-{}-{}",
        now.format("%Y%m%d"),
        suffix[..12].to_ascii_uppercase()
    )
}

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    mailer: Arc<dyn Mailer>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    async fn load_user(&self, user_id: Uuid) -> Result<User, BookingError> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or(BookingError::UserNotFound)
    }

    async fn load_ticket(&self, invoice_number: &str) -> Result<Ticket, BookingError> {
        self.store
            .find_ticket(invoice_number)
            .await?
            .ok_or(BookingError::TicketNotFound)
    }

    /// Ticket owned by `user_id`; other users' tickets are reported as missing.
    async fn load_owned_ticket(
        &self,
        user_id: Uuid,
        invoice_number: &str,
    ) -> Result<Ticket, BookingError> {
        let ticket = self.load_ticket(invoice_number).await?;
        if ticket.user_id != user_id {
            return Err(BookingError::TicketNotFound);
        }
        Ok(ticket)
    }

    async fn price(
        &self,
        user: &User,
        request: &QuoteRequest,
        now: DateTime<Utc>,
    ) -> Result<(Destination, Quote), BookingError> {
        let destination = self
            .store
            .find_destination(request.destination_id)
            .await?
            .ok_or(BookingError::DestinationNotFound)?;

        let code = request.voucher_code();
        let voucher = if code.is_empty() {
            None
        } else {
            self.store.find_voucher_by_code(code).await?
        };

        let quote = build_quote(user, &destination, voucher.as_ref(), request, now)?;
        Ok((destination, quote))
    }

    #[instrument(skip(self, request), fields(destination_id = %request.destination_id))]
    pub async fn preview(&self, user_id: Uuid, request: &QuoteRequest) -> Result<Quote, BookingError> {
        let user = self.load_user(user_id).await?;
        let (_, quote) = self.price(&user, request, Utc::now()).await?;
        Ok(quote)
    }

    #[instrument(skip(self, request), fields(destination_id = %request.destination_id))]
    pub async fn purchase(
        &self,
        user_id: Uuid,
        request: &QuoteRequest,
    ) -> Result<Purchase, BookingError> {
        let now = Utc::now();
        let user = self.load_user(user_id).await?;
        let (destination, quote) = self.price(&user, request, now).await?;

        let new_ticket = NewTicket {
            invoice_number: generate_invoice_number(now),
            destination_id: destination.id,
            user_id: user.id,
            quantity: quote.quantity,
            unit_price: quote.unit_price,
            price_before_discount: quote.price_before_discount,
            voucher_code: quote.voucher_code.clone(),
            voucher_discount: quote.voucher_discount,
            points_discount: quote.points_discount,
            points_redeemed: quote.points_redeemed,
            use_all_points: quote.use_all_points,
            points_earned: quote.points_earned,
            total_cost: quote.total_cost,
            carbon_footprint: quote.carbon_footprint,
            checkin_date: quote.checkin_date,
            payment_deadline: payment_deadline_for(quote.checkin_date),
        };

        let ticket = self.store.commit_booking(new_ticket).await?;
        info!(
            invoice_number = %ticket.invoice_number,
            total_cost = ticket.total_cost,
            points_redeemed = ticket.points_redeemed,
            "Ticket purchased"
        );

        dispatch(
            self.mailer.clone(),
            purchase_receipt(&user, &destination, &ticket),
        );

        Ok(Purchase { ticket, quote })
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, user_id: Uuid, invoice_number: &str) -> Result<Ticket, BookingError> {
        let ticket = self.load_owned_ticket(user_id, invoice_number).await?;
        let transition = plan_cancel(&ticket)?;
        let cancelled = self.store.apply_transition(&ticket, &transition).await?;
        info!(points_refunded = transition.points_credit, "Ticket cancelled");
        Ok(cancelled)
    }

    #[instrument(skip(self))]
    pub async fn settle(&self, invoice_number: &str, paid: bool) -> Result<Ticket, BookingError> {
        let ticket = self.load_ticket(invoice_number).await?;
        let owner = self.load_user(ticket.user_id).await?;
        let destination = self
            .store
            .find_destination(ticket.destination_id)
            .await?
            .ok_or(BookingError::DestinationNotFound)?;

        let transition = plan_settle(&ticket, paid, owner.is_admin, &destination.title)?;
        let settled = self.store.apply_transition(&ticket, &transition).await?;
        info!(
            status = %settled.status,
            points_credited = transition.points_credit,
            "Paid status updated"
        );
        Ok(settled)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, invoice_number: &str) -> Result<(), BookingError> {
        let ticket = self.load_ticket(invoice_number).await?;
        if ticket.status.is_terminal() {
            return Err(BookingError::NotDeletable(ticket.status));
        }
        self.store.delete_pending_ticket(&ticket).await?;
        info!("Pending ticket deleted");
        Ok(())
    }

    async fn describe(&self, tickets: Vec<Ticket>) -> Result<Vec<TicketDetail>, BookingError> {
        let now = Utc::now();
        let mut destinations: HashMap<Uuid, Option<DestinationSummary>> = HashMap::new();
        let mut details = Vec::with_capacity(tickets.len());

        for ticket in tickets {
            if !destinations.contains_key(&ticket.destination_id) {
                let summary = self
                    .store
                    .find_destination(ticket.destination_id)
                    .await?
                    .as_ref()
                    .map(DestinationSummary::from);
                if summary.is_none() {
                    warn!(destination_id = %ticket.destination_id, "Ticket references a missing destination");
                }
                destinations.insert(ticket.destination_id, summary);
            }
            details.push(TicketDetail {
                destination: destinations.get(&ticket.destination_id).cloned().flatten(),
                ticket: present(&ticket, now),
            });
        }
        Ok(details)
    }

    pub async fn tickets_for_user(&self, user_id: Uuid) -> Result<Vec<TicketDetail>, BookingError> {
        let tickets = self.store.list_tickets_for_user(user_id).await?;
        self.describe(tickets).await
    }

    pub async fn ticket_for_user(
        &self,
        user_id: Uuid,
        invoice_number: &str,
    ) -> Result<TicketDetail, BookingError> {
        let ticket = self.load_owned_ticket(user_id, invoice_number).await?;
        let mut details = self.describe(vec![ticket]).await?;
        details.pop().ok_or(BookingError::TicketNotFound)
    }

    pub async fn all_tickets(&self) -> Result<Vec<TicketDetail>, BookingError> {
        let tickets = self.store.list_tickets().await?;
        self.describe(tickets).await
    }

    pub async fn ticket(&self, invoice_number: &str) -> Result<TicketDetail, BookingError> {
        let ticket = self.load_ticket(invoice_number).await?;
        let mut details = self.describe(vec![ticket]).await?;
        details.pop().ok_or(BookingError::TicketNotFound)
    }

    /// Point movements of paid tickets, newest first.
    pub async fn points_history(&self, user_id: Uuid) -> Result<Vec<PointsEntry>, BookingError> {
        let paid = self
            .store
            .list_tickets_for_user(user_id)
            .await?
            .into_iter()
            .filter(|t| t.paid && (t.points_earned > 0 || t.points_redeemed > 0))
            .collect();

        let mut entries = Vec::new();
        for detail in self.describe(paid).await? {
            let title = detail.destination.as_ref().map(|d| d.title.clone());
            let ticket = detail.ticket;
            if ticket.points_earned > 0 {
                entries.push(PointsEntry {
                    invoice_number: ticket.invoice_number.clone(),
                    destination_title: title.clone(),
                    movement: PointsMovement::Earned,
                    points: ticket.points_earned,
                    message: "Poin bertambah",
                });
            }
            if ticket.points_redeemed > 0 {
                entries.push(PointsEntry {
                    invoice_number: ticket.invoice_number.clone(),
                    destination_title: title,
                    movement: PointsMovement::Used,
                    points: ticket.points_redeemed,
                    message: "Poin berkurang",
                });
            }
        }
        Ok(entries)
    }
}
