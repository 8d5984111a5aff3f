//! Ticket lookups and updates.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Ticket, TicketStatus, TicketUpdate};

/// Create a ticket and return its ID.
pub async fn create_ticket(
    pool: &SqlitePool,
    contact_id: i64,
    whatsapp_id: i64,
    company_id: i64,
    status: TicketStatus,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO tickets (contact_id, whatsapp_id, company_id, status)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(contact_id)
    .bind(whatsapp_id)
    .bind(company_id)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get a ticket by ID.
pub async fn get_ticket(pool: &SqlitePool, id: i64) -> Result<Ticket> {
    sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, contact_id, whatsapp_id, company_id, status, last_message
        FROM tickets
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Ticket",
        id: id.to_string(),
    })
}

/// Find the ticket of a contact on a given connection, regardless of status.
///
/// When several match, the most recent one wins.
pub async fn find_ticket(
    pool: &SqlitePool,
    contact_id: i64,
    whatsapp_id: i64,
    company_id: i64,
) -> Result<Option<Ticket>> {
    let record = sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, contact_id, whatsapp_id, company_id, status, last_message
        FROM tickets
        WHERE contact_id = ? AND whatsapp_id = ? AND company_id = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(contact_id)
    .bind(whatsapp_id)
    .bind(company_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Apply a partial update to a ticket.
pub async fn update_ticket(pool: &SqlitePool, id: i64, update: &TicketUpdate) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE tickets
        SET last_message = COALESCE(?, last_message),
            status = COALESCE(?, status),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(update.last_message.as_deref())
    .bind(update.status)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Ticket",
            id: id.to_string(),
        });
    }

    Ok(())
}
