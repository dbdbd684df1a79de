/*
 * Responsibility
 * - Products の request/response DTO (JSON は camelCase)
 * - validate() で形式チェック、repo 用の型 (ProductData / ProductPatch) へ変換
 * - createdAt / updatedAt はサーバ管理なので request 側では無視する
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::product_repo::{InventoryStatus, ProductData, ProductPatch, ProductRow};

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 30;
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

fn check_text(value: &str, field: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(field);
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), &'static str> {
    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative number");
    }
    Ok(())
}

fn check_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("quantity must be >= 0");
    }
    Ok(())
}

fn check_rating(rating: i32) -> Result<(), &'static str> {
    if !(0..=5).contains(&rating) {
        return Err("rating must be between 0 and 5");
    }
    Ok(())
}

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(default)]
    pub internal_reference: String,
    #[serde(default)]
    pub shell_id: i32,
    pub inventory_status: InventoryStatus,
    #[serde(default)]
    pub rating: i32,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_text(&self.code, "code is required")?;
        check_text(&self.name, "name is required")?;
        check_price(self.price)?;
        check_quantity(self.quantity)?;
        check_rating(self.rating)?;
        Ok(())
    }

    pub fn into_data(self) -> ProductData {
        ProductData {
            code: self.code,
            name: self.name,
            description: self.description,
            image: self.image,
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            internal_reference: self.internal_reference,
            shell_id: self.shell_id,
            inventory_status: self.inventory_status,
            rating: self.rating,
        }
    }
}

/// Body of `PATCH /products/{id}` (merge-patch: missing field = keep).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatchRequest {
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

impl ProductPatchRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(code) = &self.code {
            check_text(code, "code cannot be empty")?;
        }
        if let Some(name) = &self.name {
            check_text(name, "name cannot be empty")?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            check_quantity(quantity)?;
        }
        if let Some(rating) = self.rating {
            check_rating(rating)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            code: self.code,
            name: self.name,
            description: self.description,
            image: self.image,
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            internal_reference: self.internal_reference,
            shell_id: self.shell_id,
            inventory_status: self.inventory_status,
            rating: self.rating,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

impl ListProductsQuery {
    /// (limit, offset). Pages start at 1.
    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self
            .items_per_page
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .clamp(1, MAX_ITEMS_PER_PAGE) as i64;
        let page = self.page.unwrap_or(1).max(1) as i64;
        (per_page, (page - 1) * per_page)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for ProductResponse {
    type Error = String;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let inventory_status = row
            .inventory_status
            .parse::<InventoryStatus>()
            .map_err(|e| format!("product {} has unknown inventory status {:?}", row.id, e.0))?;

        Ok(Self {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            image: row.image,
            category: row.category,
            price: row.price,
            quantity: row.quantity,
            internal_reference: row.internal_reference,
            shell_id: row.shell_id,
            inventory_status,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_accepts_original_payload_shape() {
        let req: ProductRequest = serde_json::from_value(json!({
            "code": "string",
            "name": "string",
            "description": "string",
            "image": "string",
            "category": "string",
            "price": 60,
            "quantity": 10,
            "internalReference": "string",
            "shellId": 0,
            "inventoryStatus": "INSTOCK",
            "rating": 0,
            "createdAt": "2024-12-05T21:08:46.365Z"
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        let data = req.into_data();
        assert_eq!(data.price, 60.0);
        assert_eq!(data.inventory_status, InventoryStatus::InStock);
    }

    #[test]
    fn request_rejects_bad_values() {
        let mut req: ProductRequest = serde_json::from_value(json!({
            "code": "c", "name": "n", "price": -1, "quantity": 1, "inventoryStatus": "LOWSTOCK"
        }))
        .unwrap();
        assert_eq!(req.validate(), Err("price must be a non-negative number"));

        req.price = 1.0;
        req.rating = 6;
        assert_eq!(req.validate(), Err("rating must be between 0 and 5"));

        req.rating = 0;
        req.name = "  ".into();
        assert_eq!(req.validate(), Err("name is required"));
    }

    #[test]
    fn unknown_inventory_status_does_not_parse() {
        let res = serde_json::from_value::<ProductRequest>(json!({
            "code": "c", "name": "n", "price": 1, "quantity": 1, "inventoryStatus": "SOLDOUT"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = ProductPatchRequest {
            quantity: Some(-3),
            ..Default::default()
        };
        assert_eq!(patch.validate(), Err("quantity must be >= 0"));
        assert!(ProductPatchRequest::default().validate().is_ok());
    }

    #[test]
    fn pagination_is_clamped() {
        let q = ListProductsQuery {
            page: Some(3),
            items_per_page: Some(1000),
        };
        assert_eq!(q.limit_offset(), (100, 200));

        let q = ListProductsQuery {
            page: Some(0),
            items_per_page: None,
        };
        assert_eq!(q.limit_offset(), (30, 0));
    }
}
