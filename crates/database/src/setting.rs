//! Per-company settings.

use sqlx::SqlitePool;

use crate::models::Setting;
use crate::Result;

/// Get a setting by company and key.
pub async fn get_setting(pool: &SqlitePool, company_id: i64, key: &str) -> Result<Option<Setting>> {
    let record = sqlx::query_as::<_, Setting>(
        r#"
        SELECT company_id, key, value
        FROM settings
        WHERE company_id = ? AND key = ?
        "#,
    )
    .bind(company_id)
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Create or update a setting.
pub async fn upsert_setting(
    pool: &SqlitePool,
    company_id: i64,
    key: &str,
    value: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (company_id, key, value)
        VALUES (?, ?, ?)
        ON CONFLICT(company_id, key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
    )
    .bind(company_id)
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// List all settings of a company.
pub async fn list_settings(pool: &SqlitePool, company_id: i64) -> Result<Vec<Setting>> {
    let records = sqlx::query_as::<_, Setting>(
        r#"
        SELECT company_id, key, value
        FROM settings
        WHERE company_id = ?
        ORDER BY key
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}
