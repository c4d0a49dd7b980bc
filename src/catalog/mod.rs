/// Product catalog: regular and promotional products
mod products;
mod promotions;

pub use products::{CreateProductRequest, ProductManager, UpdateProductRequest};
pub use promotions::{CreatePromotionRequest, PromotionManager, UpdatePromotionRequest};

use crate::{
    db,
    error::{AppError, AppResult},
};
use rust_decimal::Decimal;

fn ensure_non_negative(field: &str, amount: Option<Decimal>) -> AppResult<()> {
    match amount {
        Some(value) if value < Decimal::ZERO => {
            Err(AppError::validation(format!("{} cannot be negative", field)))
        }
        _ => Ok(()),
    }
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if db::is_foreign_key_violation(&err) {
        AppError::validation("acting account does not exist")
    } else {
        AppError::Database(err)
    }
}
