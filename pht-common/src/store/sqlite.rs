//! SQLite-backed document store
//!
//! All collections share one `documents` table keyed by (collection, key)
//! with the JSON body in a TEXT column. Individual statements are atomic;
//! the read-modify-write inside `merge` additionally serializes through an
//! in-process lock so concurrent merges never drop each other's fields.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::info;

use super::{merge_fields, Document, Store};
use crate::{time, Error, Result};

/// Durable store over a single SQLite database file
pub struct SqliteStore {
    pool: SqlitePool,
    merge_lock: Mutex<()>,
}

impl SqliteStore {
    /// Open the database at `db_path`, creating the file and schema if needed
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        // WAL allows concurrent readers while a writer commits
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                key TEXT NOT NULL,
                doc TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, key)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            pool,
            merge_lock: Mutex::new(()),
        })
    }
}

fn encode(doc: &Document) -> Result<String> {
    serde_json::to_string(doc)
        .map_err(|e| Error::Internal(format!("failed to serialize document: {}", e)))
}

fn decode(raw: &str) -> Result<Document> {
    serde_json::from_str(raw).map_err(|e| Error::Internal(format!("corrupt document: {}", e)))
}

/// Escape LIKE metacharacters so `prefix` matches literally, then append
/// the wildcard
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

const UPSERT: &str = r#"
    INSERT INTO documents (collection, key, doc, updated_at)
    VALUES (?, ?, ?, ?)
    ON CONFLICT(collection, key) DO UPDATE SET
        doc = excluded.doc,
        updated_at = excluded.updated_at
"#;

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT doc FROM documents WHERE collection = ? AND key = ?")
                .bind(collection)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|(raw,)| decode(&raw)).transpose()
    }

    async fn set(&self, collection: &str, key: &str, doc: Document) -> Result<()> {
        sqlx::query(UPSERT)
            .bind(collection)
            .bind(key)
            .bind(encode(&doc)?)
            .bind(time::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn merge(&self, collection: &str, key: &str, patch: Document) -> Result<Document> {
        let _guard = self.merge_lock.lock().await;

        let row: Option<(String,)> =
            sqlx::query_as("SELECT doc FROM documents WHERE collection = ? AND key = ?")
                .bind(collection)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        let mut doc = match row {
            Some((raw,)) => decode(&raw)?,
            None => Document::new(),
        };
        merge_fields(&mut doc, patch);

        sqlx::query(UPSERT)
            .bind(collection)
            .bind(key)
            .bind(encode(&doc)?)
            .bind(time::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(doc)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND key = ?")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, doc FROM documents WHERE collection = ? ORDER BY key")
                .bind(collection)
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter()
            .map(|(key, raw)| Ok((key, decode(&raw)?)))
            .collect()
    }

    async fn query_prefix(
        &self,
        collection: &str,
        prefix: &str,
    ) -> Result<Vec<(String, Document)>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT key, doc FROM documents \
             WHERE collection = ? AND key LIKE ? ESCAPE '\\' ORDER BY key",
        )
        .bind(collection)
        .bind(like_prefix(prefix))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|(key, raw)| Ok((key, decode(&raw)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_prefix_escapes_metacharacters() {
        assert_eq!(like_prefix("abc/"), "abc/%");
        assert_eq!(like_prefix("a%b"), "a\\%b%");
        assert_eq!(like_prefix("a_b"), "a\\_b%");
        assert_eq!(like_prefix("a\\b"), "a\\\\b%");
        assert_eq!(like_prefix(""), "%");
    }
}
