use crate::models::{Item, ItemForm};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] SqlxError),
}

/// Persistence behind the item handlers.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, ordered by id.
    async fn list(&self) -> Result<Vec<Item>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Item>, StoreError>;

    async fn create(&self, form: ItemForm) -> Result<Item, StoreError>;

    /// Replace the fields of an existing item. `None` if it does not exist.
    async fn update(&self, id: i64, form: ItemForm) -> Result<Option<Item>, StoreError>;

    /// Returns whether an item was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Short label used in readiness output.
    fn kind(&self) -> &'static str;
}

/// Process-local store. Ids are never reused, even after a delete.
#[derive(Debug)]
pub struct MemoryItemStore {
    items: RwLock<BTreeMap<i64, Item>>,
    next_id: AtomicI64,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn create(&self, form: ItemForm) -> Result<Item, StoreError> {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let item = Item {
            id,
            name: form.name,
            description: form.description,
            created_at: now,
            updated_at: now,
        };
        self.items.write().await.insert(id, item.clone());
        debug!("Stored item {} in memory", id);
        Ok(item)
    }

    async fn update(&self, id: i64, form: ItemForm) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write().await;
        Ok(items.get_mut(&id).map(|item| {
            item.name = form.name;
            item.description = form.description;
            item.updated_at = Utc::now();
            item.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.items.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

/// Item Row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// PostgreSQL-backed store
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600)) // Close idle connections after 10 minutes
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        info!("Database connection pool created successfully");

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `items` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ITEMS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create items table: {}", e);
                e
            })?;
        Ok(())
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description, created_at, updated_at FROM items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description, created_at, updated_at FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Item::from))
    }

    async fn create(&self, form: ItemForm) -> Result<Item, StoreError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&form.name)
        .bind(&form.description)
        .fetch_one(&self.pool)
        .await?;
        info!("Inserted item {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: i64, form: ItemForm) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&form.name)
        .bind(&form.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Item::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
