/*
 * Responsibility
 * - products テーブル向けの CRUD (ProductRepo trait)
 * - Postgres 実装 (PgProductRepo)。in-memory 実装は repos::memory
 * - inventoryStatus は TEXT で保存し、InventoryStatus との変換はここで定義
 */
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryStatus {
    #[serde(rename = "INSTOCK")]
    InStock,
    #[serde(rename = "LOWSTOCK")]
    LowStock,
    #[serde(rename = "OUTOFSTOCK")]
    OutOfStock,
}

impl InventoryStatus {
    pub const ALL: [InventoryStatus; 3] = [Self::InStock, Self::LowStock, Self::OutOfStock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "INSTOCK",
            Self::LowStock => "LOWSTOCK",
            Self::OutOfStock => "OUTOFSTOCK",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownInventoryStatus(pub String);

impl FromStr for InventoryStatus {
    type Err = UnknownInventoryStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownInventoryStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    #[sqlx(rename = "productId")]
    pub id: i64,

    pub code: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,

    #[sqlx(rename = "internalReference")]
    pub internal_reference: String,

    #[sqlx(rename = "shellId")]
    pub shell_id: i32,

    #[sqlx(rename = "inventoryStatus")]
    pub inventory_status: String,

    pub rating: i32,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Every writable column. Used for create and full replace.
#[derive(Debug, Clone)]
pub struct ProductData {
    pub code: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,
    pub internal_reference: String,
    pub shell_id: i32,
    pub inventory_status: InventoryStatus,
    pub rating: i32,
}

/// Partial update: `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub internal_reference: Option<String>,
    pub shell_id: Option<i32>,
    pub inventory_status: Option<InventoryStatus>,
    pub rating: Option<i32>,
}

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<ProductRow>>;

    async fn create(&self, data: &ProductData) -> RepoResult<ProductRow>;

    async fn get(&self, id: i64) -> RepoResult<Option<ProductRow>>;

    async fn replace(&self, id: i64, data: &ProductData) -> RepoResult<Option<ProductRow>>;

    async fn update(&self, id: i64, patch: &ProductPatch) -> RepoResult<Option<ProductRow>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

const PRODUCT_COLUMNS: &str = r#""productId", code, name, description, image, category, price,
    quantity, "internalReference", "shellId", "inventoryStatus", rating, "createdAt", "updatedAt""#;

#[derive(Debug, Clone)]
pub struct PgProductRepo {
    pool: PgPool,
}

impl PgProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepo for PgProductRepo {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<ProductRow>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            ORDER BY "productId" ASC
            LIMIT $1 OFFSET $2
            "#
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn create(&self, data: &ProductData) -> RepoResult<ProductRow> {
        let sql = format!(
            r#"
            INSERT INTO products (
                code, name, description, image, category, price, quantity,
                "internalReference", "shellId", "inventoryStatus", rating
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&data.code)
            .bind(&data.name)
            .bind(&data.description)
            .bind(&data.image)
            .bind(&data.category)
            .bind(data.price)
            .bind(data.quantity)
            .bind(&data.internal_reference)
            .bind(data.shell_id)
            .bind(data.inventory_status.as_str())
            .bind(data.rating)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<ProductRow>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE "productId" = $1
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn replace(&self, id: i64, data: &ProductData) -> RepoResult<Option<ProductRow>> {
        let sql = format!(
            r#"
            UPDATE products
            SET
                code = $2,
                name = $3,
                description = $4,
                image = $5,
                category = $6,
                price = $7,
                quantity = $8,
                "internalReference" = $9,
                "shellId" = $10,
                "inventoryStatus" = $11,
                rating = $12,
                "updatedAt" = now()
            WHERE "productId" = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(&data.code)
            .bind(&data.name)
            .bind(&data.description)
            .bind(&data.image)
            .bind(&data.category)
            .bind(data.price)
            .bind(data.quantity)
            .bind(&data.internal_reference)
            .bind(data.shell_id)
            .bind(data.inventory_status.as_str())
            .bind(data.rating)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> RepoResult<Option<ProductRow>> {
        let sql = format!(
            r#"
            UPDATE products
            SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                image = COALESCE($5, image),
                category = COALESCE($6, category),
                price = COALESCE($7, price),
                quantity = COALESCE($8, quantity),
                "internalReference" = COALESCE($9, "internalReference"),
                "shellId" = COALESCE($10, "shellId"),
                "inventoryStatus" = COALESCE($11, "inventoryStatus"),
                rating = COALESCE($12, rating),
                "updatedAt" = now()
            WHERE "productId" = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(patch.code.as_deref())
            .bind(patch.name.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.image.as_deref())
            .bind(patch.category.as_deref())
            .bind(patch.price)
            .bind(patch.quantity)
            .bind(patch.internal_reference.as_deref())
            .bind(patch.shell_id)
            .bind(patch.inventory_status.map(|s| s.as_str()))
            .bind(patch.rating)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE "productId" = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_status_text_form() {
        for status in InventoryStatus::ALL {
            assert_eq!(status.as_str().parse::<InventoryStatus>(), Ok(status));
        }
        assert!("instock".parse::<InventoryStatus>().is_err());
    }

    #[test]
    fn inventory_status_json_form() {
        let json = serde_json::to_string(&InventoryStatus::LowStock).unwrap();
        assert_eq!(json, "\"LOWSTOCK\"");
    }
}
