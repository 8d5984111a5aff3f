//! Contacts synced from a WhatsApp session.

use sqlx::SqlitePool;

use crate::models::SessionContact;
use crate::Result;

/// Merge a batch of contacts into the stored set for a connection.
///
/// Rows are keyed by `(whatsapp_id, jid)`. Missing names in the batch keep the
/// stored value. The whole batch is applied in one transaction.
pub async fn upsert_contacts(
    pool: &SqlitePool,
    whatsapp_id: i64,
    contacts: &[SessionContact],
) -> Result<usize> {
    let mut tx = pool.begin().await?;

    for contact in contacts {
        sqlx::query(
            r#"
            INSERT INTO session_contacts (whatsapp_id, jid, name, notify)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(whatsapp_id, jid) DO UPDATE SET
                name = COALESCE(excluded.name, session_contacts.name),
                notify = COALESCE(excluded.notify, session_contacts.notify),
                updated_at = datetime('now')
            "#,
        )
        .bind(whatsapp_id)
        .bind(&contact.jid)
        .bind(contact.name.as_deref())
        .bind(contact.notify.as_deref())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(
        "Synced {} contacts for whatsapp {}",
        contacts.len(),
        whatsapp_id
    );

    Ok(contacts.len())
}

/// List the stored contacts of a connection.
pub async fn list_contacts(pool: &SqlitePool, whatsapp_id: i64) -> Result<Vec<SessionContact>> {
    let records = sqlx::query_as::<_, SessionContact>(
        r#"
        SELECT whatsapp_id, jid, name, notify
        FROM session_contacts
        WHERE whatsapp_id = ?
        ORDER BY jid
        "#,
    )
    .bind(whatsapp_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}
