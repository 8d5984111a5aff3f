//! Plan CRUD operations.

use sqlx::SqlitePool;

use crate::error::{map_unique_violation, DatabaseError, Result};
use crate::models::Plan;
use crate::validation::validate_plan;

/// Create a new plan and return its ID. The `id` field of `plan` is ignored.
pub async fn create_plan(pool: &SqlitePool, plan: &Plan) -> Result<i64> {
    validate_plan(plan)?;
    let name = plan.name.trim();

    let result = sqlx::query(
        r#"
        INSERT INTO plans
            (name, users, connections, queues, value, use_campaigns, use_schedules,
             use_internal_chat, use_external_api, use_kanban, use_open_ai, use_integrations)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(plan.users)
    .bind(plan.connections)
    .bind(plan.queues)
    .bind(plan.value)
    .bind(plan.use_campaigns)
    .bind(plan.use_schedules)
    .bind(plan.use_internal_chat)
    .bind(plan.use_external_api)
    .bind(plan.use_kanban)
    .bind(plan.use_open_ai)
    .bind(plan.use_integrations)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, "Plan", name))?;

    Ok(result.last_insert_rowid())
}

/// Get a plan by ID.
pub async fn get_plan(pool: &SqlitePool, id: i64) -> Result<Plan> {
    sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, name, users, connections, queues, value, use_campaigns, use_schedules,
               use_internal_chat, use_external_api, use_kanban, use_open_ai, use_integrations
        FROM plans
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Plan",
        id: id.to_string(),
    })
}

/// List all plans.
pub async fn list_plans(pool: &SqlitePool) -> Result<Vec<Plan>> {
    let plans = sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, name, users, connections, queues, value, use_campaigns, use_schedules,
               use_internal_chat, use_external_api, use_kanban, use_open_ai, use_integrations
        FROM plans
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(plans)
}

/// Update an existing plan.
pub async fn update_plan(pool: &SqlitePool, plan: &Plan) -> Result<()> {
    validate_plan(plan)?;
    let name = plan.name.trim();

    let result = sqlx::query(
        r#"
        UPDATE plans
        SET name = ?, users = ?, connections = ?, queues = ?, value = ?,
            use_campaigns = ?, use_schedules = ?, use_internal_chat = ?,
            use_external_api = ?, use_kanban = ?, use_open_ai = ?, use_integrations = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(plan.users)
    .bind(plan.connections)
    .bind(plan.queues)
    .bind(plan.value)
    .bind(plan.use_campaigns)
    .bind(plan.use_schedules)
    .bind(plan.use_internal_chat)
    .bind(plan.use_external_api)
    .bind(plan.use_kanban)
    .bind(plan.use_open_ai)
    .bind(plan.use_integrations)
    .bind(plan.id)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, "Plan", name))?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Plan",
            id: plan.id.to_string(),
        });
    }

    Ok(())
}

/// Delete a plan by ID.
pub async fn delete_plan(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM plans
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Plan",
            id: id.to_string(),
        });
    }

    Ok(())
}
