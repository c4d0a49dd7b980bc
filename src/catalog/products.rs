/// Product management
use super::{ensure_non_negative, map_write_error};
use crate::{
    db::{self, models::Product},
    error::{AppError, AppResult},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, manufacturer, stock_quantity, \
     unit_of_measure, serial_number, brand, active, created_at, created_by, updated_at, updated_by";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    #[validate(range(min = 0, message = "stock_quantity cannot be negative"))]
    pub stock_quantity: Option<i64>,
    pub unit_of_measure: Option<String>,
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub active: Option<bool>,
}

/// Partial product update; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    #[validate(range(min = 0, message = "stock_quantity cannot be negative"))]
    pub stock_quantity: Option<i64>,
    pub unit_of_measure: Option<String>,
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub active: Option<bool>,
}

/// Product manager service
pub struct ProductManager {
    db: SqlitePool,
}

impl ProductManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query(&format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS))
            .fetch_all(&self.db)
            .await?;

        rows.iter().map(Product::from_row).collect()
    }

    pub async fn get(&self, id: i64) -> AppResult<Product> {
        let row = sqlx::query(&format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("product {} not found", id)))?;

        Product::from_row(&row)
    }

    /// Create a product on behalf of `actor`
    pub async fn create(&self, request: CreateProductRequest, actor: i64) -> AppResult<Product> {
        request.validate()?;
        ensure_non_negative("price", Some(request.price))?;

        let now = db::format_timestamp(Utc::now());
        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, description, price, category, manufacturer, stock_quantity,
                unit_of_measure, serial_number, brand, active,
                created_at, created_by, updated_at, updated_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price.to_string())
        .bind(&request.category)
        .bind(&request.manufacturer)
        .bind(request.stock_quantity)
        .bind(&request.unit_of_measure)
        .bind(&request.serial_number)
        .bind(&request.brand)
        .bind(request.active.unwrap_or(true))
        .bind(&now)
        .bind(actor)
        .bind(&now)
        .bind(actor)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        let id = result.last_insert_rowid();
        tracing::info!(product_id = id, actor, "Product created");

        self.get(id).await
    }

    /// Apply a partial update on behalf of `actor`
    pub async fn update(
        &self,
        id: i64,
        request: UpdateProductRequest,
        actor: i64,
    ) -> AppResult<Product> {
        request.validate()?;
        ensure_non_negative("price", request.price)?;

        let now = db::format_timestamp(Utc::now());
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                price = COALESCE(?, price),
                category = COALESCE(?, category),
                manufacturer = COALESCE(?, manufacturer),
                stock_quantity = COALESCE(?, stock_quantity),
                unit_of_measure = COALESCE(?, unit_of_measure),
                serial_number = COALESCE(?, serial_number),
                brand = COALESCE(?, brand),
                active = COALESCE(?, active),
                updated_at = ?,
                updated_by = ?
            WHERE id = ?
            "#,
        )
        .bind(request.name)
        .bind(request.description)
        .bind(request.price.map(|p| p.to_string()))
        .bind(request.category)
        .bind(request.manufacturer)
        .bind(request.stock_quantity)
        .bind(request.unit_of_measure)
        .bind(request.serial_number)
        .bind(request.brand)
        .bind(request.active)
        .bind(&now)
        .bind(actor)
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("product {} not found", id)));
        }

        tracing::info!(product_id = id, actor, "Product updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("product {} not found", id)));
        }

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    /// Returns a manager plus the id of an existing account to act as
    async fn setup() -> (ProductManager, i64) {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();

        let actor = sqlx::query(
            "INSERT INTO users (email, password_hash, name, created_at, updated_at) \
             VALUES ('ops@shop.com', 'x', 'Ops', '2024-01-01 00:00:00', '2024-01-01 00:00:00')",
        )
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

        (ProductManager::new(pool), actor)
    }

    fn widget() -> CreateProductRequest {
        CreateProductRequest {
            name: "Widget".to_string(),
            description: Some("A small widget".to_string()),
            price: Decimal::from_str("19.99").unwrap(),
            category: Some("tools".to_string()),
            manufacturer: None,
            stock_quantity: Some(10),
            unit_of_measure: Some("unit".to_string()),
            serial_number: None,
            brand: None,
            active: None,
        }
    }

    #[tokio::test]
    async fn test_create_stamps_actor_and_keeps_exact_price() {
        let (manager, actor) = setup().await;

        let product = manager.create(widget(), actor).await.unwrap();
        assert_eq!(product.price, Decimal::from_str("19.99").unwrap());
        assert_eq!(product.created_by, Some(actor));
        assert_eq!(product.updated_by, Some(actor));
        assert!(product.active);

        assert_eq!(manager.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (manager, actor) = setup().await;
        let product = manager.create(widget(), actor).await.unwrap();

        let updated = manager
            .update(
                product.id,
                UpdateProductRequest {
                    stock_quantity: Some(3),
                    ..Default::default()
                },
                actor,
            )
            .await
            .unwrap();

        assert_eq!(updated.stock_quantity, Some(3));
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.price, product.price);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let (manager, actor) = setup().await;

        let mut negative = widget();
        negative.price = Decimal::from_str("-1.00").unwrap();
        assert!(matches!(
            manager.create(negative, actor).await,
            Err(AppError::Validation(_))
        ));

        let mut unnamed = widget();
        unnamed.name.clear();
        assert!(matches!(
            manager.create(unnamed, actor).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let (manager, actor) = setup().await;

        assert!(matches!(manager.get(5).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            manager.update(5, UpdateProductRequest::default(), actor).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(manager.delete(5).await, Err(AppError::NotFound(_))));
    }
}
