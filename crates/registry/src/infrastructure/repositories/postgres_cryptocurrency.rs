//! PostgreSQL cryptocurrency repository implementation
//!
//! Uniqueness is enforced by named table constraints; violations are mapped
//! back to the offending field by constraint name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coinvault_core::{
    CoinName, CryptocurrencyRecord, NewCryptocurrency, RecordId, RecordPatch, Symbol, UsdAmount,
};
use coinvault_ports::{
    CryptocurrencyReader, CryptocurrencyWriter, StoreError, StoreResult, UniqueField,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{error, info};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cryptocurrencies (
        id            BIGSERIAL PRIMARY KEY,
        name          VARCHAR(100) NOT NULL,
        symbol        VARCHAR(10) NOT NULL,
        external_id   VARCHAR(255),
        current_price DOUBLE PRECISION NOT NULL,
        market_cap    DOUBLE PRECISION NOT NULL,
        last_updated  TIMESTAMPTZ,
        CONSTRAINT cryptocurrencies_name_key UNIQUE (name),
        CONSTRAINT cryptocurrencies_symbol_key UNIQUE (symbol),
        CONSTRAINT cryptocurrencies_external_id_key UNIQUE (external_id)
    )
"#;

const COLUMNS: &str = "id, name, symbol, external_id, current_price, market_cap, last_updated";

/// Repository backed by a `cryptocurrencies` table
pub struct PostgresCryptocurrencyRepository {
    pool: PgPool,
}

impl PostgresCryptocurrencyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {}", e);
                StoreError::Backend(e.to_string())
            })?;
        Ok(Self::new(pool))
    }

    /// Create the table and its constraints if absent
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        info!("Cryptocurrency schema ready");
        Ok(())
    }
}

fn row_to_record(row: &PgRow) -> StoreResult<CryptocurrencyRecord> {
    let corrupt = |e: coinvault_core::ValueError| StoreError::Backend(format!("Corrupt row: {}", e));

    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(map_sqlx_error)?;
    let symbol: String = row.try_get("symbol").map_err(map_sqlx_error)?;
    let external_id: Option<String> = row.try_get("external_id").map_err(map_sqlx_error)?;
    let current_price: f64 = row.try_get("current_price").map_err(map_sqlx_error)?;
    let market_cap: f64 = row.try_get("market_cap").map_err(map_sqlx_error)?;
    let last_updated: Option<DateTime<Utc>> =
        row.try_get("last_updated").map_err(map_sqlx_error)?;

    Ok(CryptocurrencyRecord {
        id: RecordId::new(id),
        name: CoinName::new(name).map_err(corrupt)?,
        symbol: Symbol::new(symbol).map_err(corrupt)?,
        external_id,
        current_price: UsdAmount::for_field("current_price", current_price).map_err(corrupt)?,
        market_cap: UsdAmount::for_field("market_cap", market_cap).map_err(corrupt)?,
        last_updated,
    })
}

fn rows_to_records(rows: &[PgRow]) -> StoreResult<Vec<CryptocurrencyRecord>> {
    rows.iter().map(row_to_record).collect()
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation(unique_field_for(db_err.constraint()));
        }
    }
    StoreError::Backend(err.to_string())
}

fn unique_field_for(constraint: Option<&str>) -> UniqueField {
    match constraint {
        Some(c) if c.contains("external_id") => UniqueField::ExternalId,
        Some(c) if c.contains("name") => UniqueField::Name,
        _ => UniqueField::Symbol,
    }
}

#[async_trait]
impl CryptocurrencyReader for PostgresCryptocurrencyRepository {
    async fn get(&self, id: RecordId) -> StoreResult<Option<CryptocurrencyRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM cryptocurrencies WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to fetch cryptocurrency {}: {}", id, e);
            map_sqlx_error(e)
        })?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list(&self, offset: usize, limit: usize) -> StoreResult<Vec<CryptocurrencyRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM cryptocurrencies ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(sql_bound(offset))
        .bind(sql_bound(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows_to_records(&rows)
    }

    async fn find_by_name_or_symbol(
        &self,
        name: &CoinName,
        symbol: &Symbol,
    ) -> StoreResult<Vec<CryptocurrencyRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM cryptocurrencies WHERE name = $1 OR symbol = $2 ORDER BY id"
        ))
        .bind(name.as_str())
        .bind(symbol.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows_to_records(&rows)
    }

    async fn list_externally_sourced(&self) -> StoreResult<Vec<CryptocurrencyRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM cryptocurrencies WHERE external_id IS NOT NULL ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows_to_records(&rows)
    }
}

#[async_trait]
impl CryptocurrencyWriter for PostgresCryptocurrencyRepository {
    async fn insert(&self, record: NewCryptocurrency) -> StoreResult<CryptocurrencyRecord> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO cryptocurrencies (name, symbol, external_id, current_price, market_cap)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.name.as_str())
        .bind(record.symbol.as_str())
        .bind(record.external_id.as_deref())
        .bind(record.current_price.value())
        .bind(record.market_cap.value())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row_to_record(&row)
    }

    async fn update(
        &self,
        id: RecordId,
        patch: RecordPatch,
    ) -> StoreResult<Option<CryptocurrencyRecord>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE cryptocurrencies SET
                name = COALESCE($2, name),
                symbol = COALESCE($3, symbol),
                current_price = COALESCE($4, current_price),
                market_cap = COALESCE($5, market_cap),
                last_updated = COALESCE($6, last_updated)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.value())
        .bind(patch.name.as_ref().map(|n| n.as_str()))
        .bind(patch.symbol.as_ref().map(|s| s.as_str()))
        .bind(patch.current_price.map(|p| p.value()))
        .bind(patch.market_cap.map(|m| m.value()))
        .bind(patch.last_updated)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn delete(&self, id: RecordId) -> StoreResult<Option<CryptocurrencyRecord>> {
        let row = sqlx::query(&format!(
            "DELETE FROM cryptocurrencies WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }
}

/// Saturate a page bound into BIGINT range; an out-of-range offset reads an empty page
fn sql_bound(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
