use sqlx::{Row, Sqlite, SqlitePool, Transaction};

pub const SQLITE_SCHEMA_SQL: &str = include_str!("../../sql/sqlite_schema.sql");

pub const SCHEMA_VERSION: &str = "1.1.0";

/// Applies the schema once. Reopening a database that already carries a
/// `schema_version` row is a no-op.
///
/// A `words` table created before `updated_at` existed is upgraded in the
/// same transaction, before the version row is written.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    if let Some(version) = current_schema_version(pool).await? {
        tracing::debug!(version = %version, "schema already applied");
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    for stmt in split_sql_statements(SQLITE_SCHEMA_SQL) {
        let sql: String = stmt
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            continue;
        }
        sqlx::query(trimmed).execute(&mut *tx).await?;
    }

    if upgrade_legacy_words(&mut tx).await? {
        tracing::info!("legacy words table upgraded with updated_at");
    }

    sqlx::query(r#"INSERT OR REPLACE INTO "_db_metadata" ("key", "value") VALUES ('schema_version', ?)"#)
        .bind(SCHEMA_VERSION)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(version = SCHEMA_VERSION, "schema applied");
    Ok(true)
}

/// `None` when the metadata table or its version row is missing. Any other
/// failure is returned.
pub async fn current_schema_version(pool: &SqlitePool) -> Result<Option<String>, sqlx::Error> {
    let has_metadata: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM "sqlite_master" WHERE "type" = 'table' AND "name" = '_db_metadata'"#,
    )
    .fetch_one(pool)
    .await?;
    if has_metadata == 0 {
        return Ok(None);
    }

    sqlx::query_scalar(r#"SELECT "value" FROM "_db_metadata" WHERE "key" = 'schema_version'"#)
        .fetch_optional(pool)
        .await
}

/// Adds `updated_at` to a `words` table that predates it and fills the
/// nullable legacy columns. Returns `false` when nothing needed changing.
async fn upgrade_legacy_words(tx: &mut Transaction<'_, Sqlite>) -> Result<bool, sqlx::Error> {
    let columns = sqlx::query(r#"PRAGMA table_info("words")"#)
        .fetch_all(&mut **tx)
        .await?;
    let has_updated_at = columns
        .iter()
        .map(|row| row.try_get::<String, _>("name"))
        .collect::<Result<Vec<_>, _>>()?
        .iter()
        .any(|name| name == "updated_at");
    if has_updated_at {
        return Ok(false);
    }

    sqlx::query(r#"ALTER TABLE "words" ADD COLUMN "updated_at" TEXT"#)
        .execute(&mut **tx)
        .await?;

    let backfilled = sqlx::query(
        r#"
        UPDATE "words"
        SET "created_at" = COALESCE("created_at", CURRENT_TIMESTAMP),
            "updated_at" = COALESCE("created_at", CURRENT_TIMESTAMP),
            "status" = COALESCE("status", 'unknown'),
            "review_count" = COALESCE("review_count", 0)
        "#,
    )
    .execute(&mut **tx)
    .await?
    .rows_affected();

    tracing::debug!(rows = backfilled, "legacy word rows backfilled");
    Ok(true)
}

pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for ch in sql.chars() {
        match ch {
            '\'' if !in_double_quote => in_single_quote = !in_single_quote,
            '"' if !in_single_quote => in_double_quote = !in_double_quote,
            ';' if !in_single_quote && !in_double_quote => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}
