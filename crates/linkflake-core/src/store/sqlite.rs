use std::{
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::{Mapping, NewMapping, StoreError, store::MappingStore};

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS url_mappings (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    original_url TEXT    NOT NULL UNIQUE,
    short_code   TEXT    NOT NULL UNIQUE,
    created_at   INTEGER NOT NULL
)
"#;

type MappingRow = (i64, String, String, i64);

/// A [`MappingStore`] persisted in SQLite.
///
/// `created_at` is stored as milliseconds since the Unix epoch. Uniqueness of
/// both the original URL and the short code is enforced by the schema.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connection acquire timeout.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a file-backed connection can remain idle.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Opens (creating if needed) the database at `path` and ensures the
    /// schema exists.
    ///
    /// `path` is a file path, a `sqlite:` URL, or `:memory:` for a private
    /// in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the URL is malformed, the database
    /// cannot be opened, or the schema cannot be created.
    pub async fn connect(path: &str) -> Result<Self, StoreError> {
        let pool = if path == ":memory:" {
            // A uniquely named shared-cache database per call, so parallel
            // stores never see each other's rows.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:linkflake-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true);

            // The database lives only as long as a connection does.
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            let options = if path.starts_with("sqlite:") {
                SqliteConnectOptions::from_str(path)?
            } else {
                SqliteConnectOptions::new().filename(path)
            };
            let options = options.create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .connect_with(options)
                .await?
        };

        info!(path = %path, "Database connected");
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the schema cannot be created.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Get reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn into_mapping(row: MappingRow) -> Result<Mapping, StoreError> {
    let (id, original_url, short_code, created_at) = row;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at).ok_or_else(|| {
        sqlx::Error::Decode(format!("created_at out of range for mapping {id}: {created_at}").into())
    })?;
    Ok(Mapping {
        id,
        original_url,
        short_code,
        created_at,
    })
}

/// Maps a unique-constraint violation to the matching duplicate error.
fn classify_insert_error(err: sqlx::Error, mapping: NewMapping) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let message = db.message();
            if message.contains("short_code") {
                return StoreError::DuplicateCode(mapping.short_code.into_string());
            }
            if message.contains("original_url") {
                return StoreError::DuplicateUrl(mapping.original_url);
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl MappingStore for SqliteStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Mapping>, StoreError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM url_mappings
            WHERE original_url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_mapping).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM url_mappings
            WHERE short_code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_mapping).transpose()
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM url_mappings WHERE short_code = ?)",
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists != 0)
    }

    async fn save(&self, mapping: NewMapping) -> Result<Mapping, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO url_mappings (original_url, short_code, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&mapping.original_url)
        .bind(mapping.short_code.as_str())
        .bind(mapping.created_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(mapping.into_mapping(done.last_insert_rowid())),
            Err(err) => Err(classify_insert_error(err, mapping)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkflake::encode;

    async fn store() -> SqliteStore {
        SqliteStore::connect(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn save_and_lookup_roundtrip() {
        let store = store().await;
        let saved = store
            .save(NewMapping::new("https://a.example/x", encode(4_242)))
            .await
            .unwrap();
        assert_eq!(saved.id, 1);

        let by_url = store.find_by_url("https://a.example/x").await.unwrap();
        let by_code = store.find_by_code(&saved.short_code).await.unwrap();
        assert_eq!(by_url.as_ref(), Some(&saved));
        assert_eq!(by_code.as_ref(), Some(&saved));
        assert!(store.exists_by_code(&saved.short_code).await.unwrap());
    }

    #[tokio::test]
    async fn missing_rows_are_none() {
        let store = store().await;
        assert!(store.find_by_url("https://nope.example").await.unwrap().is_none());
        assert!(store.find_by_code("unknown-code").await.unwrap().is_none());
        assert!(!store.exists_by_code("unknown-code").await.unwrap());
    }

    #[tokio::test]
    async fn unique_violations_are_classified() {
        let store = store().await;
        store
            .save(NewMapping::new("https://a.example", encode(1)))
            .await
            .unwrap();

        let err = store
            .save(NewMapping::new("https://b.example", encode(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateCode(_)), "{err:?}");

        let err = store
            .save(NewMapping::new("https://a.example", encode(2)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUrl(_)), "{err:?}");
    }

    #[tokio::test]
    async fn memory_databases_are_isolated() {
        let a = store().await;
        let b = store().await;
        a.save(NewMapping::new("https://a.example", encode(1)))
            .await
            .unwrap();

        assert!(b.find_by_url("https://a.example").await.unwrap().is_none());
    }
}
