//! Message log persistence.

use sqlx::SqlitePool;

use crate::error::{map_unique_violation, Result};
use crate::models::{Message, NewMessage};

/// Persist a new message. Fails with `AlreadyExists` if the ID is taken.
pub async fn create_message(
    pool: &SqlitePool,
    company_id: i64,
    message: &NewMessage,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO messages
            (id, ticket_id, contact_id, company_id, body, from_me, media_type, read, ack, quoted_msg_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&message.id)
    .bind(message.ticket_id)
    .bind(message.contact_id)
    .bind(company_id)
    .bind(&message.body)
    .bind(message.from_me)
    .bind(&message.media_type)
    .bind(message.read)
    .bind(message.ack)
    .bind(message.quoted_msg_id.as_deref())
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, "Message", message.id.clone()))?;

    tracing::debug!(
        "Stored message {} on ticket {} ({})",
        message.id,
        message.ticket_id,
        message.media_type
    );

    Ok(())
}

/// List the messages of a ticket, oldest first.
pub async fn list_messages(pool: &SqlitePool, ticket_id: i64) -> Result<Vec<Message>> {
    let records = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, ticket_id, contact_id, company_id, body, from_me, media_type,
               read, ack, quoted_msg_id, created_at
        FROM messages
        WHERE ticket_id = ?
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(ticket_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}
