use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::booking::lifecycle::Transition;
use crate::models::{
    Destination, DestinationUpdate, NewDestination, NewTicket, NewVoucher, Notification, Ticket,
    User, Voucher,
};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use seed::{Seed, SeedError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not enough available tickets")]
    InsufficientInventory,

    #[error("not enough points")]
    InsufficientPoints,

    #[error("record was modified concurrently")]
    Conflict,

    #[error("voucher code already exists")]
    DuplicateVoucherCode,

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence used by the booking engine.
///
/// Every mutating method is atomic: either all of its effects are visible
/// afterwards or none are.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_destination(&self, id: Uuid) -> Result<Option<Destination>, StoreError>;

    async fn find_voucher(&self, id: Uuid) -> Result<Option<Voucher>, StoreError>;

    async fn find_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, StoreError>;

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, StoreError>;

    /// Stores the voucher and sends a promo notification to every user;
    /// returns the voucher and how many users were notified.
    ///
    /// Fails with [`StoreError::DuplicateVoucherCode`] if the code is taken,
    /// in which case nobody is notified.
    async fn create_voucher_and_broadcast(
        &self,
        voucher: NewVoucher,
    ) -> Result<(Voucher, u64), StoreError>;

    async fn create_destination(
        &self,
        destination: NewDestination,
    ) -> Result<Destination, StoreError>;

    /// Returns `None` when there is no such destination.
    async fn update_destination(
        &self,
        id: Uuid,
        update: &DestinationUpdate,
    ) -> Result<Option<Destination>, StoreError>;

    /// Sum of the carbon footprint recorded on paid tickets for a destination.
    async fn total_carbon_footprint(&self, destination_id: Uuid) -> Result<f64, StoreError>;

    /// Decrements inventory, debits redeemed points and inserts the ticket.
    ///
    /// Fails with [`StoreError::InsufficientInventory`] or
    /// [`StoreError::InsufficientPoints`] without applying anything when a
    /// guard does not hold at write time.
    async fn commit_booking(&self, ticket: NewTicket) -> Result<Ticket, StoreError>;

    async fn find_ticket(&self, invoice_number: &str) -> Result<Option<Ticket>, StoreError>;

    async fn list_tickets_for_user(&self, user_id: Uuid) -> Result<Vec<Ticket>, StoreError>;

    async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Applies `transition` if the ticket is still in `transition.from`,
    /// otherwise fails with [`StoreError::Conflict`].
    async fn apply_transition(
        &self,
        ticket: &Ticket,
        transition: &Transition,
    ) -> Result<Ticket, StoreError>;

    /// Removes a pending ticket, giving back its inventory and redeemed points.
    async fn delete_pending_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Newest first.
    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError>;

    /// Returns false when the user owns no such notification.
    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}
