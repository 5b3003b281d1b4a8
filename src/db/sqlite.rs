use crate::config::Config;
use crate::db::models::{DetectionHistory, NewDetection, NewUser, User};
use crate::db::schema::TABLES;
use crate::error::{Result, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

/// Handle to the backing SQLite file.
///
/// Cloning is cheap and every clone shares one pool, so the handle can be
/// passed to any number of tasks. Each operation checks a connection out for
/// its own duration and returns it when done.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    init_timeout: Duration,
}

impl Store {
    /// Open (or create) the database named by `cfg.database_url`.
    pub async fn connect(cfg: &Config) -> Result<Self> {
        let connect_opts =
            SqliteConnectOptions::from_str(cfg.database_url.as_str())?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections.max(1))
            .connect_with(connect_opts)
            .await?;
        debug!(database_url = %cfg.database_url, "sqlite pool ready");
        Ok(Self {
            pool,
            init_timeout: cfg.init_timeout(),
        })
    }

    /// A private in-memory database. Pinned to one connection that is never
    /// recycled, since each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;
        Ok(Self {
            pool,
            init_timeout: Config::default().init_timeout(),
        })
    }

    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a unit of work. Rolled back unless committed.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    pub fn history(&self) -> HistoryStorage {
        HistoryStorage::new(self.pool.clone())
    }

    pub fn users(&self) -> UserStorage {
        UserStorage::new(self.pool.clone())
    }

    /// Create every registered table that does not exist yet.
    ///
    /// Safe to run repeatedly and from concurrent callers. Existing tables are
    /// left exactly as they are, so a column added to the registry later never
    /// reaches a live file.
    pub async fn init_schema(&self) -> Result<()> {
        tokio::time::timeout(self.init_timeout, self.create_tables())
            .await
            .map_err(|_| StoreError::InitTimeout(self.init_timeout))??;
        info!("Database initialized.");
        Ok(())
    }

    async fn create_tables(&self) -> Result<()> {
        // Existence is read outside the transaction: SQLite only waits on a
        // busy write lock while the transaction holds no read lock yet, so the
        // first statement inside it must be the write.
        let mut missing = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            if self.table_exists(table.name).await? {
                debug!(table = table.name, "table exists; left as is");
            } else {
                missing.push(table);
            }
        }
        if missing.is_empty() {
            return Ok(());
        }

        // Guarded DDL turns a table created by a concurrent caller in the
        // meantime into a no-op.
        let mut tx = self.pool.begin().await?;
        for table in missing {
            for stmt in table.ddl {
                sqlx::query(stmt).execute(&mut *tx).await?;
            }
            debug!(table = table.name, "table created");
        }
        tx.commit().await?;
        Ok(())
    }

    async fn table_exists(&self, name: &str) -> Result<bool> {
        let existing: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(existing.is_some())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Initialize the store's schema. See [`Store::init_schema`].
pub async fn init_db(store: &Store) -> Result<()> {
    store.init_schema().await
}

/// Rows of `detection_history`.
#[derive(Clone)]
pub struct HistoryStorage {
    pool: SqlitePool,
}

impl HistoryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a detection event. Returns the assigned id.
    /// `user_email` is stored as given; it need not match any user.
    pub async fn insert(&self, entry: &NewDetection) -> Result<i64> {
        let res = sqlx::query(
            r#"
            INSERT INTO detection_history (
                object_name, advice, image_path, heatmap_path, user_email
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.object_name.as_deref())
        .bind(entry.advice.as_deref())
        .bind(entry.image_path.as_deref())
        .bind(entry.heatmap_path.as_deref())
        .bind(entry.user_email.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn get(&self, id: i64) -> Result<Option<DetectionHistory>> {
        let row = sqlx::query_as::<_, DetectionHistory>(
            r#"SELECT id, object_name, advice, image_path, heatmap_path, user_email
               FROM detection_history WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_all(&self) -> Result<Vec<DetectionHistory>> {
        let rows = sqlx::query_as::<_, DetectionHistory>(
            r#"SELECT id, object_name, advice, image_path, heatmap_path, user_email
               FROM detection_history ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_email(&self, email: &str) -> Result<Vec<DetectionHistory>> {
        let rows = sqlx::query_as::<_, DetectionHistory>(
            r#"SELECT id, object_name, advice, image_path, heatmap_path, user_email
               FROM detection_history WHERE user_email = ? ORDER BY id"#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM detection_history WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

/// Rows of `users`.
#[derive(Clone)]
pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an account. A duplicate `email` or `google_id` comes back as
    /// [`StoreError::UniqueViolation`] naming the column.
    pub async fn insert(&self, user: &NewUser) -> Result<i64> {
        let res = sqlx::query(
            r#"
            INSERT INTO users (
                first_name, last_name, email, password, google_id
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.first_name.as_deref())
        .bind(user.last_name.as_deref())
        .bind(user.email.as_deref())
        .bind(user.password.as_deref())
        .bind(user.google_id.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, password, google_id
               FROM users WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, password, google_id
               FROM users WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, password, google_id
               FROM users WHERE google_id = ?"#,
        )
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
