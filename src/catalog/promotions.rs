/// Promotional product management
use super::{ensure_non_negative, map_write_error};
use crate::{
    db::{self, models::PromotionalProduct},
    error::{AppError, AppResult},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

const PROMOTION_COLUMNS: &str = "id, name, description, promotional_price, starts_at, ends_at, \
     serial_number, brand, active, created_at, created_by, updated_at, updated_by";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePromotionRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub promotional_price: Decimal,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePromotionRequest {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub promotional_price: Option<Decimal>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub active: Option<bool>,
}

fn ensure_window(starts_at: Option<DateTime<Utc>>, ends_at: Option<DateTime<Utc>>) -> AppResult<()> {
    match (starts_at, ends_at) {
        (Some(start), Some(end)) if end < start => Err(AppError::validation(
            "ends_at must not be before starts_at",
        )),
        _ => Ok(()),
    }
}

/// Promotional product manager service
pub struct PromotionManager {
    db: SqlitePool,
}

impl PromotionManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<PromotionalProduct>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM promotional_products ORDER BY id",
            PROMOTION_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(PromotionalProduct::from_row).collect()
    }

    pub async fn get(&self, id: i64) -> AppResult<PromotionalProduct> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM promotional_products WHERE id = ?",
            PROMOTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("promotional product {} not found", id)))?;

        PromotionalProduct::from_row(&row)
    }

    pub async fn create(
        &self,
        request: CreatePromotionRequest,
        actor: i64,
    ) -> AppResult<PromotionalProduct> {
        request.validate()?;
        ensure_non_negative("promotional_price", Some(request.promotional_price))?;
        ensure_window(request.starts_at, request.ends_at)?;

        let now = db::format_timestamp(Utc::now());
        let result = sqlx::query(
            r#"
            INSERT INTO promotional_products (
                name, description, promotional_price, starts_at, ends_at,
                serial_number, brand, active,
                created_at, created_by, updated_at, updated_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.promotional_price.to_string())
        .bind(request.starts_at.map(db::format_timestamp))
        .bind(request.ends_at.map(db::format_timestamp))
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
        tracing::info!(promotion_id = id, actor, "Promotional product created");

        self.get(id).await
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdatePromotionRequest,
        actor: i64,
    ) -> AppResult<PromotionalProduct> {
        request.validate()?;
        ensure_non_negative("promotional_price", request.promotional_price)?;

        // The window is checked against the merged values
        let current = self.get(id).await?;
        ensure_window(
            request.starts_at.or(current.starts_at),
            request.ends_at.or(current.ends_at),
        )?;

        let now = db::format_timestamp(Utc::now());
        let result = sqlx::query(
            r#"
            UPDATE promotional_products SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                promotional_price = COALESCE(?, promotional_price),
                starts_at = COALESCE(?, starts_at),
                ends_at = COALESCE(?, ends_at),
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
        .bind(request.promotional_price.map(|p| p.to_string()))
        .bind(request.starts_at.map(db::format_timestamp))
        .bind(request.ends_at.map(db::format_timestamp))
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
            return Err(AppError::not_found(format!("promotional product {} not found", id)));
        }

        tracing::info!(promotion_id = id, actor, "Promotional product updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM promotional_products WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("promotional product {} not found", id)));
        }

        tracing::info!(promotion_id = id, "Promotional product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    async fn setup() -> (PromotionManager, i64) {
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

        (PromotionManager::new(pool), actor)
    }

    fn summer_sale() -> CreatePromotionRequest {
        CreatePromotionRequest {
            name: "Summer sale".to_string(),
            description: None,
            promotional_price: Decimal::from_str("4.50").unwrap(),
            starts_at: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            ends_at: Some(Utc.with_ymd_and_hms(2024, 8, 31, 23, 59, 59).unwrap()),
            serial_number: None,
            brand: Some("Acme".to_string()),
            active: None,
        }
    }

    #[tokio::test]
    async fn test_create_round_trips_window() {
        let (manager, actor) = setup().await;

        let promo = manager.create(summer_sale(), actor).await.unwrap();
        assert_eq!(promo.starts_at, summer_sale().starts_at);
        assert_eq!(promo.ends_at, summer_sale().ends_at);
        assert_eq!(promo.created_by, Some(actor));
    }

    #[tokio::test]
    async fn test_inverted_window_is_rejected() {
        let (manager, actor) = setup().await;
        let promo = manager.create(summer_sale(), actor).await.unwrap();

        let update = UpdatePromotionRequest {
            ends_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(matches!(
            manager.update(promo.id, update, actor).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (manager, actor) = setup().await;
        let promo = manager.create(summer_sale(), actor).await.unwrap();

        let updated = manager
            .update(
                promo.id,
                UpdatePromotionRequest {
                    promotional_price: Some(Decimal::from_str("3.99").unwrap()),
                    ..Default::default()
                },
                actor,
            )
            .await
            .unwrap();
        assert_eq!(updated.promotional_price.to_string(), "3.99");
        assert_eq!(updated.brand.as_deref(), Some("Acme"));

        manager.delete(promo.id).await.unwrap();
        assert!(matches!(manager.get(promo.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(manager.delete(promo.id).await, Err(AppError::NotFound(_))));
    }
}
