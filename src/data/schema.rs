use anyhow::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS news (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        title        TEXT NOT NULL,
        body         TEXT NOT NULL,
        published_at TEXT NOT NULL,
        image_url    TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        news_id    INTEGER NOT NULL REFERENCES news (id),
        sender     TEXT NOT NULL,
        body       TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS doctors (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        name      TEXT NOT NULL,
        specialty TEXT NOT NULL,
        schedule  TEXT NOT NULL,
        photo_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        doctor_id      INTEGER NOT NULL REFERENCES doctors (id),
        patient_name   TEXT NOT NULL,
        phone          TEXT NOT NULL,
        complaint      TEXT NOT NULL,
        requested_date TEXT NOT NULL,
        status         TEXT NOT NULL DEFAULT 'pending',
        created_at     TEXT NOT NULL
    )
    "#,
];

/// Creates any missing table. Safe to run on every start.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        debug!(statement = statement.trim(), "Applying schema statement");
        sqlx::query(statement).execute(pool).await?;
    }
    info!(tables = SCHEMA.len(), "Database schema ready");
    Ok(())
}
