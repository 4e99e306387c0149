//! # Sweet Repository
//!
//! Database operations for the `sweets` table.
//!
//! ## Key Operations
//! - CRUD (insert, get, list, full replace, partial update, delete)
//! - Stock ledger (purchase, restock) inside a transaction
//! - Search, categories and statistics over the current rows
//!
//! ## Ledger Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/sweets/7/purchase {quantity: 3}                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  SELECT ... FROM sweets WHERE id = 7        → Option<Sweet>             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StockChange::Purchase(3).apply(7, row)     ← sweetshop-core rules      │
//! │       │                                                                 │
//! │       ├── Err → ROLLBACK (tx dropped), row untouched                    │
//! │       ▼                                                                 │
//! │  UPDATE sweets SET in_stock = ?, updated_at = ? WHERE id = 7            │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use sweetshop_core::query;
use sweetshop_core::validation::{validate_new_sweet, validate_patch, validate_sweet};
use sweetshop_core::{
    CoreError, InventoryStats, Money, NewSweet, StockChange, Sweet, SweetId, SweetPatch,
    SweetQuery,
};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, category, price_cents, in_stock, created_at, updated_at
    FROM sweets
"#;

/// Repository for sweet database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = SweetRepository::new(pool);
///
/// let sweet = repo.insert(&NewSweet::new("Ladoo", "Dry Sweets", Money::from_cents(1000), 40)).await?;
/// let sweet = repo.purchase(sweet.id, 5).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SweetRepository {
    pool: SqlitePool,
}

impl SweetRepository {
    /// Creates a new SweetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SweetRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists all sweets, newest first.
    ///
    /// Rows created within the same timestamp fall back to id order
    /// (highest id first).
    pub async fn list_all(&self) -> DbResult<Vec<Sweet>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC");
        let records = sqlx::query_as::<_, SweetRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = records.len(), "Listed sweets");
        Ok(records.into_iter().map(Sweet::from).collect())
    }

    /// Gets a sweet by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Sweet))` - Sweet found
    /// * `Ok(None)` - Sweet not found
    pub async fn get_by_id(&self, id: SweetId) -> DbResult<Option<Sweet>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let record = sqlx::query_as::<_, SweetRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Sweet::from))
    }

    /// Runs the query engine over every row.
    ///
    /// The candidate set is `list_all()`, so unsorted results keep the
    /// newest-first order.
    pub async fn search(&self, sweet_query: &SweetQuery) -> DbResult<Vec<Sweet>> {
        let sweets = self.list_all().await?;
        let results = query::run(&sweets, sweet_query);

        debug!(
            candidates = sweets.len(),
            matches = results.len(),
            "Searched sweets"
        );
        Ok(results)
    }

    /// Distinct category labels, sorted.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM sweets ORDER BY category")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Inventory statistics over every row.
    pub async fn stats(&self) -> DbResult<InventoryStats> {
        let sweets = self.list_all().await?;
        Ok(InventoryStats::from_sweets(&sweets))
    }

    /// Number of rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sweets")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a new sweet.
    ///
    /// ## Returns
    /// * `Ok(Sweet)` - Inserted row with its assigned id and timestamps
    /// * `Err(DbError::Core)` - A field failed validation
    pub async fn insert(&self, new: &NewSweet) -> DbResult<Sweet> {
        validate_new_sweet(new).map_err(CoreError::from)?;

        let now = Utc::now();
        let name = new.name.trim();
        let category = new.category.trim();

        let result = sqlx::query(
            r#"
            INSERT INTO sweets (name, category, price_cents, in_stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(new.price.cents())
        .bind(new.in_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, name = %name, "Inserted sweet");

        Ok(Sweet {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price: new.price,
            in_stock: new.in_stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces every field of sweet `id`.
    ///
    /// ## Returns
    /// * `Ok(Sweet)` - The row as stored after the update
    /// * `Err(DbError::Core)` - A field failed validation (checked first)
    /// * `Err(DbError::NotFound)` - No such row
    pub async fn replace(&self, id: SweetId, new: &NewSweet) -> DbResult<Sweet> {
        validate_new_sweet(new).map_err(CoreError::from)?;
        self.update(id, &SweetPatch::from(new.clone())).await
    }

    /// Applies the present fields of `patch` to sweet `id`.
    ///
    /// Read, merge, validate and write happen in one transaction.
    pub async fn update(&self, id: SweetId, patch: &SweetPatch) -> DbResult<Sweet> {
        debug!(id, "Updating sweet");

        let mut tx = self.pool.begin().await?;

        let current = fetch_in_tx(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sweet", id))?;

        validate_patch(patch).map_err(CoreError::from)?;
        let mut merged = current.merged(patch);
        validate_sweet(&merged).map_err(CoreError::from)?;
        merged.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE sweets SET
                name = ?2,
                category = ?3,
                price_cents = ?4,
                in_stock = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&merged.name)
        .bind(&merged.category)
        .bind(merged.price.cents())
        .bind(merged.in_stock)
        .bind(merged.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(merged)
    }

    /// Deletes sweet `id`.
    ///
    /// ## Returns
    /// * `Ok(())` - Row removed
    /// * `Err(DbError::NotFound)` - No such row; nothing changed
    pub async fn delete(&self, id: SweetId) -> DbResult<()> {
        debug!(id, "Deleting sweet");

        let result = sqlx::query("DELETE FROM sweets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sweet", id));
        }

        Ok(())
    }

    /// Removes every row and resets the id counter. Returns the number of
    /// rows deleted.
    pub async fn clear(&self) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM sweets").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'sweets'")
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(deleted = result.rows_affected(), "Cleared sweets");
        Ok(result.rows_affected())
    }

    // =========================================================================
    // Stock Ledger
    // =========================================================================

    /// Sells `quantity` units of sweet `id`.
    ///
    /// ## Errors
    /// Checked in order: not found, `quantity <= 0`, insufficient stock.
    pub async fn purchase(&self, id: SweetId, quantity: i64) -> DbResult<Sweet> {
        self.apply_stock_change(id, StockChange::Purchase(quantity))
            .await
    }

    /// Receives `quantity` units of sweet `id`.
    ///
    /// ## Errors
    /// Checked in order: `quantity <= 0`, not found.
    pub async fn restock(&self, id: SweetId, quantity: i64) -> DbResult<Sweet> {
        self.apply_stock_change(id, StockChange::Restock(quantity))
            .await
    }

    async fn apply_stock_change(&self, id: SweetId, change: StockChange) -> DbResult<Sweet> {
        debug!(id, ?change, "Applying stock change");

        let mut tx = self.pool.begin().await?;

        let current = fetch_in_tx(&mut tx, id).await?;
        let in_stock = change.apply(id, current.as_ref())?;

        let mut sweet = current.ok_or(CoreError::SweetNotFound(id))?;
        sweet.in_stock = in_stock;
        sweet.updated_at = Utc::now();

        sqlx::query("UPDATE sweets SET in_stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(sweet.in_stock)
            .bind(sweet.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(sweet)
    }
}

async fn fetch_in_tx(tx: &mut Transaction<'_, Sqlite>, id: SweetId) -> DbResult<Option<Sweet>> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    let record = sqlx::query_as::<_, SweetRecord>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(record.map(Sweet::from))
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw row from the `sweets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct SweetRecord {
    id: i64,
    name: String,
    category: String,
    price_cents: i64,
    in_stock: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SweetRecord> for Sweet {
    fn from(record: SweetRecord) -> Self {
        Sweet {
            id: record.id,
            name: record.name,
            category: record.category,
            price: Money::from_cents(record.price_cents),
            in_stock: record.in_stock,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
