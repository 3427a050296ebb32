pub mod family;

use std::str::FromStr;

use famtree_common::error::{FamtreeError, FamtreeResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open the SQLite store at `database_url`, creating the file if missing.
///
/// A single connection is enough: every request is served sequentially.
pub async fn create_pool(database_url: &str) -> FamtreeResult<SqlitePool> {
    tracing::info!("opening database");
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| FamtreeError::Config(format!("invalid DATABASE_URL: {e}")))?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| FamtreeError::Database(e.to_string()))
}

const SCHEMA: &[&str] = &[
    "create table if not exists people (
        id integer primary key autoincrement,
        first_name text not null,
        last_name text not null,
        gender text check(gender in ('M', 'F')),
        birth_date text,
        death_date text,
        bio text,
        photo_url text,
        created_at text not null,
        updated_at text not null
    )",
    "create table if not exists relationships (
        id integer primary key autoincrement,
        person1_id integer not null references people (id),
        person2_id integer not null references people (id),
        relationship_type text not null check(relationship_type in ('parent-child', 'spouse')),
        parent_role text check(parent_role in ('father', 'mother')),
        marriage_date text,
        divorce_date text,
        created_at text not null,
        updated_at text not null
    )",
    "create index if not exists relationships_person1_idx on relationships (person1_id, relationship_type)",
    "create index if not exists relationships_person2_idx on relationships (person2_id, relationship_type)",
    // Provisioned for a future login feature; nothing reads or writes it yet.
    "create table if not exists users (
        id integer primary key autoincrement,
        username text not null unique,
        password_hash text not null,
        person_id integer references people (id),
        is_admin integer default 0,
        created_at text not null,
        updated_at text not null
    )",
];

/// Create the tables if they do not exist yet.
pub async fn run_migrations(pool: &SqlitePool) -> FamtreeResult<()> {
    for stmt in SCHEMA {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| FamtreeError::Database(e.to_string()))?;
    }
    tracing::debug!("schema ready");
    Ok(())
}

/// Open the store and make sure the schema exists.
pub async fn open_store(database_url: &str) -> FamtreeResult<SqlitePool> {
    let pool = create_pool(database_url).await?;
    if let Err(e) = run_migrations(&pool).await {
        pool.close().await;
        return Err(e);
    }
    Ok(pool)
}

/// In-memory store with the schema applied. Used by tests across the
/// workspace.
pub async fn create_memory_pool() -> FamtreeResult<SqlitePool> {
    open_store("sqlite::memory:").await
}
