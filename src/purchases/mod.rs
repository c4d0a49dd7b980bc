/// Purchases and their line items
///
/// A purchase and all of its details are written in one transaction, so a
/// failed line leaves no partial purchase behind.
use crate::{
    db::{
        self,
        models::{Purchase, PurchaseDetail},
    },
    error::{AppError, AppResult},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

const PURCHASE_COLUMNS: &str = "id, description, customer_name, total_price, total_products, \
     active, created_at, created_by, updated_at, updated_by";

/// One line of a new purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPurchaseLine {
    pub product_id: i64,
    pub line_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseRequest {
    pub description: Option<String>,
    pub customer_name: Option<String>,
    pub total_price: Option<Decimal>,
    #[validate(range(min = 0, message = "total_products cannot be negative"))]
    pub total_products: Option<i64>,
    pub active: Option<bool>,
    #[serde(default)]
    pub details: Vec<NewPurchaseLine>,
}

/// Purchase manager service
pub struct PurchaseManager {
    db: SqlitePool,
}

impl PurchaseManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List purchase headers, without details
    pub async fn list(&self) -> AppResult<Vec<Purchase>> {
        let rows = sqlx::query(&format!("SELECT {} FROM purchases ORDER BY id", PURCHASE_COLUMNS))
            .fetch_all(&self.db)
            .await?;

        rows.iter().map(Purchase::from_row).collect()
    }

    /// Get one purchase with its details
    pub async fn get(&self, id: i64) -> AppResult<Purchase> {
        let row = sqlx::query(&format!("SELECT {} FROM purchases WHERE id = ?", PURCHASE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("purchase {} not found", id)))?;

        let mut purchase = Purchase::from_row(&row)?;

        let detail_rows = sqlx::query(
            "SELECT id, purchase_id, product_id, line_order, created_by, updated_at \
             FROM purchase_details WHERE purchase_id = ? ORDER BY line_order, id",
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        purchase.details = Some(
            detail_rows
                .iter()
                .map(PurchaseDetail::from_row)
                .collect::<AppResult<Vec<_>>>()?,
        );

        Ok(purchase)
    }

    /// Create a purchase and its details on behalf of `actor`
    pub async fn create(&self, request: CreatePurchaseRequest, actor: i64) -> AppResult<Purchase> {
        request.validate()?;
        if matches!(request.total_price, Some(price) if price < Decimal::ZERO) {
            return Err(AppError::validation("total_price cannot be negative"));
        }

        let total_products = request
            .total_products
            .unwrap_or(request.details.len() as i64);
        let now = db::format_timestamp(Utc::now());

        let mut tx = self.db.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO purchases (
                description, customer_name, total_price, total_products, active,
                created_at, created_by, updated_at, updated_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.description)
        .bind(&request.customer_name)
        .bind(request.total_price.map(|p| p.to_string()))
        .bind(total_products)
        .bind(request.active.unwrap_or(true))
        .bind(&now)
        .bind(actor)
        .bind(&now)
        .bind(actor)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "acting account does not exist"))?;

        let purchase_id = result.last_insert_rowid();

        for (index, line) in request.details.iter().enumerate() {
            sqlx::query(
                "INSERT INTO purchase_details (purchase_id, product_id, line_order, created_by, updated_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(purchase_id)
            .bind(line.product_id)
            .bind(line.line_order.unwrap_or(index as i64 + 1))
            .bind(actor)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &format!("product {} does not exist", line.product_id)))?;
        }

        tx.commit().await?;

        tracing::info!(
            purchase_id,
            actor,
            lines = request.details.len(),
            "Purchase created"
        );

        self.get(purchase_id).await
    }
}

fn map_write_error(err: sqlx::Error, foreign_key_message: &str) -> AppError {
    if db::is_foreign_key_violation(&err) {
        AppError::validation(foreign_key_message)
    } else {
        AppError::Database(err)
    }
}
