//! In-process repositories.
//!
//! Used when `DATABASE_URL` is not configured and by the test-suite. They keep
//! the same observable contract as the Postgres implementations (ordering,
//! email uniqueness, `updatedAt` refresh).

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::product_repo::{ProductData, ProductPatch, ProductRepo, ProductRow};
use crate::repos::user_repo::{NewUser, UserRepo, UserRow};

#[derive(Debug, Default)]
struct ProductTable {
    last_id: i64,
    rows: BTreeMap<i64, ProductRow>,
}

#[derive(Debug, Default)]
pub struct MemoryProductRepo {
    table: RwLock<ProductTable>,
}

impl MemoryProductRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_data(row: &mut ProductRow, data: &ProductData) {
    row.code = data.code.clone();
    row.name = data.name.clone();
    row.description = data.description.clone();
    row.image = data.image.clone();
    row.category = data.category.clone();
    row.price = data.price;
    row.quantity = data.quantity;
    row.internal_reference = data.internal_reference.clone();
    row.shell_id = data.shell_id;
    row.inventory_status = data.inventory_status.as_str().to_string();
    row.rating = data.rating;
}

fn apply_patch(row: &mut ProductRow, patch: &ProductPatch) {
    if let Some(v) = &patch.code {
        row.code = v.clone();
    }
    if let Some(v) = &patch.name {
        row.name = v.clone();
    }
    if let Some(v) = &patch.description {
        row.description = v.clone();
    }
    if let Some(v) = &patch.image {
        row.image = v.clone();
    }
    if let Some(v) = &patch.category {
        row.category = v.clone();
    }
    if let Some(v) = patch.price {
        row.price = v;
    }
    if let Some(v) = patch.quantity {
        row.quantity = v;
    }
    if let Some(v) = &patch.internal_reference {
        row.internal_reference = v.clone();
    }
    if let Some(v) = patch.shell_id {
        row.shell_id = v;
    }
    if let Some(v) = patch.inventory_status {
        row.inventory_status = v.as_str().to_string();
    }
    if let Some(v) = patch.rating {
        row.rating = v;
    }
}

#[async_trait]
impl ProductRepo for MemoryProductRepo {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<ProductRow>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, data: &ProductData) -> RepoResult<ProductRow> {
        let mut table = self.table.write().await;
        table.last_id += 1;

        let now = Utc::now();
        let mut row = ProductRow {
            id: table.last_id,
            code: String::new(),
            name: String::new(),
            description: String::new(),
            image: String::new(),
            category: String::new(),
            price: 0.0,
            quantity: 0,
            internal_reference: String::new(),
            shell_id: 0,
            inventory_status: String::new(),
            rating: 0,
            created_at: now,
            updated_at: now,
        };
        apply_data(&mut row, data);

        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<ProductRow>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn replace(&self, id: i64, data: &ProductData) -> RepoResult<Option<ProductRow>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            apply_data(row, data);
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> RepoResult<Option<ProductRow>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            apply_patch(row, patch);
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserRepo {
    // keyed by email
    users: RwLock<BTreeMap<String, UserRow>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, user: &NewUser) -> RepoResult<UserRow> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(RepoError::Conflict);
        }

        let row = UserRow {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            username: user.username.clone(),
            firstname: user.firstname.clone(),
            password_hash: user.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.insert(row.email.clone(), row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        Ok(self.users.read().await.get(email).cloned())
    }
}
