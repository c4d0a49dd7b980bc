/// Row models for the retail tables
use super::{
    decimal_column, optional_decimal_column, optional_timestamp_column, timestamp_column,
};
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Account row, including the stored password hash
///
/// Never serialized; handlers convert to [`AccountView`] first.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
}

impl AccountRecord {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            name: row.try_get("name")?,
            paternal_surname: row.try_get("paternal_surname")?,
            maternal_surname: row.try_get("maternal_surname")?,
            active: row.try_get("active")?,
            created_at: timestamp_column(row, "created_at")?,
            created_by: row.try_get("created_by")?,
            updated_at: timestamp_column(row, "updated_at")?,
            updated_by: row.try_get("updated_by")?,
        })
    }
}

/// Account as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
}

impl From<AccountRecord> for AccountView {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            paternal_surname: record.paternal_surname,
            maternal_surname: record.maternal_surname,
            active: record.active,
            created_at: record.created_at,
            created_by: record.created_by,
            updated_at: record.updated_at,
            updated_by: record.updated_by,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub stock_quantity: Option<i64>,
    pub unit_of_measure: Option<String>,
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
}

impl Product {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: decimal_column(row, "price")?,
            category: row.try_get("category")?,
            manufacturer: row.try_get("manufacturer")?,
            stock_quantity: row.try_get("stock_quantity")?,
            unit_of_measure: row.try_get("unit_of_measure")?,
            serial_number: row.try_get("serial_number")?,
            brand: row.try_get("brand")?,
            active: row.try_get("active")?,
            created_at: timestamp_column(row, "created_at")?,
            created_by: row.try_get("created_by")?,
            updated_at: timestamp_column(row, "updated_at")?,
            updated_by: row.try_get("updated_by")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PromotionalProduct {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub promotional_price: Decimal,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
}

impl PromotionalProduct {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            promotional_price: decimal_column(row, "promotional_price")?,
            starts_at: optional_timestamp_column(row, "starts_at")?,
            ends_at: optional_timestamp_column(row, "ends_at")?,
            serial_number: row.try_get("serial_number")?,
            brand: row.try_get("brand")?,
            active: row.try_get("active")?,
            created_at: timestamp_column(row, "created_at")?,
            created_by: row.try_get("created_by")?,
            updated_at: timestamp_column(row, "updated_at")?,
            updated_by: row.try_get("updated_by")?,
        })
    }
}

/// Purchase header
///
/// `details` is only populated when a single purchase is fetched.
#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub id: i64,
    pub description: Option<String>,
    pub customer_name: Option<String>,
    pub total_price: Option<Decimal>,
    pub total_products: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<PurchaseDetail>>,
}

impl Purchase {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            description: row.try_get("description")?,
            customer_name: row.try_get("customer_name")?,
            total_price: optional_decimal_column(row, "total_price")?,
            total_products: row.try_get("total_products")?,
            active: row.try_get("active")?,
            created_at: timestamp_column(row, "created_at")?,
            created_by: row.try_get("created_by")?,
            updated_at: timestamp_column(row, "updated_at")?,
            updated_by: row.try_get("updated_by")?,
            details: None,
        })
    }
}

/// Purchase line item
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseDetail {
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: Option<i64>,
    pub line_order: Option<i64>,
    pub created_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseDetail {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            purchase_id: row.try_get("purchase_id")?,
            product_id: row.try_get("product_id")?,
            line_order: row.try_get("line_order")?,
            created_by: row.try_get("created_by")?,
            updated_at: timestamp_column(row, "updated_at")?,
        })
    }
}
