//! In-process store for tests and local runs without Postgres.
//!
//! All state sits behind one async mutex, so each trait method is a single
//! critical section and observes the same guards the Postgres store enforces.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{BookingStore, Seed, StoreError};
use crate::booking::lifecycle::Transition;
use crate::models::{
    Destination, DestinationUpdate, NewDestination, NewTicket, NewVoucher, Notification,
    NotificationDraft, OrderStatus, Ticket, User, Voucher,
};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    destinations: HashMap<Uuid, Destination>,
    vouchers: Vec<Voucher>,
    tickets: Vec<Ticket>,
    notifications: Vec<Notification>,
}

impl State {
    fn credit_points(&mut self, user_id: Uuid, points: i64) {
        if let Some(user) = self.users.get_mut(&user_id) {
            user.points += points;
        }
    }

    fn restore_inventory(&mut self, destination_id: Uuid, quantity: i32) {
        if let Some(destination) = self.destinations.get_mut(&destination_id) {
            destination.available_tickets += quantity;
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.state.lock().await.users.insert(user.id, user);
    }

    pub async fn insert_destination(&self, destination: Destination) {
        self.state
            .lock()
            .await
            .destinations
            .insert(destination.id, destination);
    }

    pub async fn insert_voucher(&self, voucher: Voucher) {
        self.state.lock().await.vouchers.push(voucher);
    }

    /// Adds the seed's records and returns the seeded users. Records replace
    /// existing ones with the same id; vouchers whose code is taken are skipped.
    pub async fn load_seed(&self, seed: Seed) -> Vec<User> {
        let now = Utc::now();
        let mut state = self.state.lock().await;

        let users: Vec<User> = seed.users.into_iter().map(|u| u.into_user(now)).collect();
        for user in &users {
            state.users.insert(user.id, user.clone());
        }
        for entry in seed.destinations {
            let destination = entry.destination.into_destination(entry.id, now);
            state.destinations.insert(destination.id, destination);
        }
        for entry in seed.vouchers {
            if state.vouchers.iter().any(|v| v.code == entry.voucher.code) {
                warn!(code = %entry.voucher.code, "Skipping seeded voucher with duplicate code");
                continue;
            }
            state.vouchers.retain(|v| v.id != entry.id);
            state.vouchers.push(entry.voucher.into_voucher(entry.id, now));
        }

        info!(
            users = users.len(),
            destinations = state.destinations.len(),
            vouchers = state.vouchers.len(),
            "In-memory store seeded"
        );
        users
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_destination(&self, id: Uuid) -> Result<Option<Destination>, StoreError> {
        Ok(self.state.lock().await.destinations.get(&id).cloned())
    }

    async fn find_voucher(&self, id: Uuid) -> Result<Option<Voucher>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.vouchers.iter().find(|v| v.id == id).cloned())
    }

    async fn find_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.vouchers.iter().find(|v| v.code == code).cloned())
    }

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, StoreError> {
        let state = self.state.lock().await;
        let mut vouchers = state.vouchers.clone();
        vouchers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vouchers)
    }

    async fn create_voucher_and_broadcast(
        &self,
        voucher: NewVoucher,
    ) -> Result<(Voucher, u64), StoreError> {
        let mut state = self.state.lock().await;
        if state.vouchers.iter().any(|v| v.code == voucher.code) {
            return Err(StoreError::DuplicateVoucherCode);
        }
        let now = Utc::now();
        let created = voucher.into_voucher(Uuid::new_v4(), now);
        state.vouchers.push(created.clone());

        let draft = NotificationDraft::new_promo(created.id, &created.title);
        let user_ids: Vec<Uuid> = state.users.keys().copied().collect();
        for user_id in &user_ids {
            let notification = draft.addressed_to(*user_id, now);
            state.notifications.push(notification);
        }
        Ok((created, user_ids.len() as u64))
    }

    async fn create_destination(
        &self,
        destination: NewDestination,
    ) -> Result<Destination, StoreError> {
        let created = destination.into_destination(Uuid::new_v4(), Utc::now());
        self.state
            .lock()
            .await
            .destinations
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_destination(
        &self,
        id: Uuid,
        update: &DestinationUpdate,
    ) -> Result<Option<Destination>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.destinations.get_mut(&id).map(|destination| {
            update.apply_to(destination, Utc::now());
            destination.clone()
        }))
    }

    async fn total_carbon_footprint(&self, destination_id: Uuid) -> Result<f64, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .tickets
            .iter()
            .filter(|t| t.destination_id == destination_id && t.paid)
            .map(|t| t.carbon_footprint)
            .sum())
    }

    async fn commit_booking(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let mut state = self.state.lock().await;

        let available = state
            .destinations
            .get(&ticket.destination_id)
            .map(|d| d.available_tickets)
            .unwrap_or(0);
        if available < ticket.quantity {
            return Err(StoreError::InsufficientInventory);
        }
        if ticket.points_redeemed > 0 {
            let balance = state
                .users
                .get(&ticket.user_id)
                .map(|u| u.points)
                .unwrap_or(0);
            if balance < ticket.points_redeemed {
                return Err(StoreError::InsufficientPoints);
            }
        }

        // guards hold, apply everything
        if let Some(destination) = state.destinations.get_mut(&ticket.destination_id) {
            destination.available_tickets -= ticket.quantity;
        }
        state.credit_points(ticket.user_id, -ticket.points_redeemed);

        let created = ticket.into_ticket(Uuid::new_v4(), Utc::now());
        state.tickets.push(created.clone());
        Ok(created)
    }

    async fn find_ticket(&self, invoice_number: &str) -> Result<Option<Ticket>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .tickets
            .iter()
            .find(|t| t.invoice_number == invoice_number)
            .cloned())
    }

    async fn list_tickets_for_user(&self, user_id: Uuid) -> Result<Vec<Ticket>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .tickets
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.tickets.iter().rev().cloned().collect())
    }

    async fn apply_transition(
        &self,
        ticket: &Ticket,
        transition: &Transition,
    ) -> Result<Ticket, StoreError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let stored = state
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket.id && t.status == transition.from)
            .ok_or(StoreError::Conflict)?;
        stored.status = transition.to;
        stored.paid = transition.paid;
        stored.payment_deadline = transition.payment_deadline;
        stored.updated_at = now;
        let updated = stored.clone();

        state.credit_points(ticket.user_id, transition.points_credit);
        state.restore_inventory(ticket.destination_id, transition.inventory_restore);
        if let Some(draft) = &transition.notification {
            let notification = draft.addressed_to(ticket.user_id, now);
            state.notifications.push(notification);
        }
        Ok(updated)
    }

    async fn delete_pending_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let position = state
            .tickets
            .iter()
            .position(|t| t.id == ticket.id && t.status == OrderStatus::Pending)
            .ok_or(StoreError::Conflict)?;
        let removed = state.tickets.remove(position);

        state.credit_points(removed.user_id, removed.points_redeemed);
        state.restore_inventory(removed.destination_id, removed.quantity);
        Ok(())
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
