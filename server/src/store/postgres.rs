use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{BookingStore, StoreError};
use crate::booking::lifecycle::Transition;
use crate::models::{
    Destination, DestinationUpdate, NewDestination, NewTicket, NewVoucher, Notification,
    NotificationDraft, OrderStatus, Ticket, TicketRow, User, Voucher,
};

/// Postgres-backed store. Guards run as conditional updates inside one
/// transaction per operation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

fn into_ticket(row: TicketRow) -> Result<Ticket, StoreError> {
    Ticket::try_from(row).map_err(StoreError::Corrupt)
}

async fn credit_points(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    points: i64,
) -> Result<(), StoreError> {
    if points > 0 {
        sqlx::query("UPDATE users SET points = points + $1, updated_at = NOW() WHERE id = $2")
            .bind(points)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn restore_inventory(
    tx: &mut Transaction<'_, Postgres>,
    destination_id: Uuid,
    quantity: i32,
) -> Result<(), StoreError> {
    if quantity > 0 {
        sqlx::query(
            "UPDATE destinations SET available_tickets = available_tickets + $1, updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(quantity)
        .bind(destination_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_notification(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    draft: &NotificationDraft,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, title, message, invoice_number, voucher_id) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&draft.title)
    .bind(&draft.message)
    .bind(&draft.invoice_number)
    .bind(draft.voucher_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl BookingStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_destination(&self, id: Uuid) -> Result<Option<Destination>, StoreError> {
        let destination = sqlx::query_as::<_, Destination>("SELECT * FROM destinations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(destination)
    }

    async fn find_voucher(&self, id: Uuid) -> Result<Option<Voucher>, StoreError> {
        let voucher = sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(voucher)
    }

    async fn find_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, StoreError> {
        let voucher = sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(voucher)
    }

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, StoreError> {
        let vouchers =
            sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(vouchers)
    }

    async fn create_voucher_and_broadcast(
        &self,
        voucher: NewVoucher,
    ) -> Result<(Voucher, u64), StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query_as::<_, Voucher>(
            "INSERT INTO vouchers \
             (id, title, name, code, percent, active, expires_at, description, terms) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&voucher.title)
        .bind(&voucher.name)
        .bind(&voucher.code)
        .bind(voucher.percent)
        .bind(voucher.active)
        .bind(voucher.expires_at)
        .bind(&voucher.description)
        .bind(&voucher.terms)
        .fetch_one(&mut *tx)
        .await;

        let created = match result {
            Ok(created) => created,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(StoreError::DuplicateVoucherCode)
            }
            Err(e) => return Err(e.into()),
        };

        let draft = NotificationDraft::new_promo(created.id, &created.title);
        let notified = sqlx::query(
            "INSERT INTO notifications (id, user_id, title, message, invoice_number, voucher_id) \
             SELECT gen_random_uuid(), id, $1, $2, $3, $4 FROM users",
        )
        .bind(&draft.title)
        .bind(&draft.message)
        .bind(&draft.invoice_number)
        .bind(draft.voucher_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok((created, notified))
    }

    async fn create_destination(
        &self,
        destination: NewDestination,
    ) -> Result<Destination, StoreError> {
        let created = sqlx::query_as::<_, Destination>(
            "INSERT INTO destinations \
             (id, title, location, city, unit_price, available_tickets, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&destination.title)
        .bind(&destination.location)
        .bind(&destination.city)
        .bind(destination.unit_price)
        .bind(destination.available_tickets)
        .bind(destination.latitude)
        .bind(destination.longitude)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_destination(
        &self,
        id: Uuid,
        update: &DestinationUpdate,
    ) -> Result<Option<Destination>, StoreError> {
        let updated = sqlx::query_as::<_, Destination>(
            "UPDATE destinations SET \
             title = COALESCE($1, title), \
             location = COALESCE($2, location), \
             city = COALESCE($3, city), \
             unit_price = COALESCE($4, unit_price), \
             available_tickets = COALESCE($5, available_tickets), \
             latitude = COALESCE($6, latitude), \
             longitude = COALESCE($7, longitude), \
             updated_at = NOW() \
             WHERE id = $8 RETURNING *",
        )
        .bind(&update.title)
        .bind(&update.location)
        .bind(&update.city)
        .bind(update.unit_price)
        .bind(update.available_tickets)
        .bind(update.latitude)
        .bind(update.longitude)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn total_carbon_footprint(&self, destination_id: Uuid) -> Result<f64, StoreError> {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(carbon_footprint), 0) FROM tickets \
             WHERE destination_id = $1 AND paid",
        )
        .bind(destination_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn commit_booking(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let mut tx = self.pool.begin().await?;

        let reserved = sqlx::query(
            "UPDATE destinations SET available_tickets = available_tickets - $1, updated_at = NOW() \
             WHERE id = $2 AND available_tickets >= $1",
        )
        .bind(ticket.quantity)
        .bind(ticket.destination_id)
        .execute(&mut *tx)
        .await?;
        if reserved.rows_affected() == 0 {
            return Err(StoreError::InsufficientInventory);
        }

        if ticket.points_redeemed > 0 {
            let debited = sqlx::query(
                "UPDATE users SET points = points - $1, updated_at = NOW() \
                 WHERE id = $2 AND points >= $1",
            )
            .bind(ticket.points_redeemed)
            .bind(ticket.user_id)
            .execute(&mut *tx)
            .await?;
            if debited.rows_affected() == 0 {
                return Err(StoreError::InsufficientPoints);
            }
        }

        let row = sqlx::query_as::<_, TicketRow>(
            "INSERT INTO tickets (id, invoice_number, destination_id, user_id, quantity, unit_price, \
             price_before_discount, voucher_code, voucher_discount, points_discount, points_redeemed, \
             use_all_points, points_earned, total_cost, carbon_footprint, checkin_date, \
             payment_deadline, status, paid) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, FALSE) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&ticket.invoice_number)
        .bind(ticket.destination_id)
        .bind(ticket.user_id)
        .bind(ticket.quantity)
        .bind(ticket.unit_price)
        .bind(ticket.price_before_discount)
        .bind(&ticket.voucher_code)
        .bind(ticket.voucher_discount)
        .bind(ticket.points_discount)
        .bind(ticket.points_redeemed)
        .bind(ticket.use_all_points)
        .bind(ticket.points_earned)
        .bind(ticket.total_cost)
        .bind(ticket.carbon_footprint)
        .bind(ticket.checkin_date)
        .bind(ticket.payment_deadline)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(invoice_number = %row.invoice_number, "Booking committed");
        into_ticket(row)
    }

    async fn find_ticket(&self, invoice_number: &str) -> Result<Option<Ticket>, StoreError> {
        sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets WHERE invoice_number = $1")
            .bind(invoice_number)
            .fetch_optional(&self.pool)
            .await?
            .map(into_ticket)
            .transpose()
    }

    async fn list_tickets_for_user(&self, user_id: Uuid) -> Result<Vec<Ticket>, StoreError> {
        sqlx::query_as::<_, TicketRow>(
            "SELECT * FROM tickets WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(into_ticket)
        .collect()
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(into_ticket)
            .collect()
    }

    async fn apply_transition(
        &self,
        ticket: &Ticket,
        transition: &Transition,
    ) -> Result<Ticket, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TicketRow>(
            "UPDATE tickets SET status = $1, paid = $2, payment_deadline = $3, updated_at = NOW() \
             WHERE id = $4 AND status = $5 RETURNING *",
        )
        .bind(transition.to.as_str())
        .bind(transition.paid)
        .bind(transition.payment_deadline)
        .bind(ticket.id)
        .bind(transition.from.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::Conflict)?;

        credit_points(&mut tx, ticket.user_id, transition.points_credit).await?;
        restore_inventory(&mut tx, ticket.destination_id, transition.inventory_restore).await?;
        if let Some(draft) = &transition.notification {
            insert_notification(&mut tx, ticket.user_id, draft).await?;
        }

        tx.commit().await?;
        into_ticket(row)
    }

    async fn delete_pending_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM tickets WHERE id = $1 AND status = $2")
            .bind(ticket.id)
            .bind(OrderStatus::Pending.as_str())
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }

        credit_points(&mut tx, ticket.user_id, ticket.points_redeemed).await?;
        restore_inventory(&mut tx, ticket.destination_id, ticket.quantity).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
