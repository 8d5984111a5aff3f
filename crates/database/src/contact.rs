//! Contact lookups.

use sqlx::SqlitePool;

use crate::error::{map_unique_violation, Result};
use crate::models::Contact;

/// Create a contact and return its ID.
pub async fn create_contact(
    pool: &SqlitePool,
    company_id: i64,
    number: &str,
    name: &str,
) -> Result<i64> {
    let key = format!("{}/{}", company_id, number);
    let result = sqlx::query(
        r#"
        INSERT INTO contacts (company_id, number, name)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(company_id)
    .bind(number)
    .bind(name)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, "Contact", key))?;

    Ok(result.last_insert_rowid())
}

/// Find a contact by company and phone number.
pub async fn find_contact(
    pool: &SqlitePool,
    company_id: i64,
    number: &str,
) -> Result<Option<Contact>> {
    let record = sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, company_id, number, name
        FROM contacts
        WHERE company_id = ? AND number = ?
        "#,
    )
    .bind(company_id)
    .bind(number)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
