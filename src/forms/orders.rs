use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

const MAX_ITEMS_PER_ORDER: u64 = 200;

pub type OrderFormResult<T> = Result<T, OrderFormError>;

#[derive(Debug, Error)]
pub enum OrderFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("product {product_id} is listed more than once")]
    DuplicateProduct { product_id: i32 },
    #[error("customer and executor canteens must differ")]
    SameCanteen,
}

/// Quantity of a catalog product requested on an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct OrderItemForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Payload of `POST /orders`. `customer_canteen_id` is only honored for admins.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderForm {
    pub customer_canteen_id: Option<i32>,
    pub executor_canteen_id: i32,
    #[validate(length(min = 1, max = MAX_ITEMS_PER_ORDER), nested)]
    pub items: Vec<OrderItemForm>,
}

/// Order lines checked for quantities and duplicates, not yet priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLines(Vec<OrderItemForm>);

impl OrderLines {
    pub fn product_ids(&self) -> Vec<i32> {
        self.0.iter().map(|line| line.product_id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderItemForm> {
        self.0.iter()
    }
}

/// Validated order creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub customer_canteen_id: Option<i32>,
    pub executor_canteen_id: i32,
    pub lines: OrderLines,
}

impl CreateOrderForm {
    pub fn into_order_draft(self) -> OrderFormResult<OrderDraft> {
        self.validate()?;

        if self.customer_canteen_id == Some(self.executor_canteen_id) {
            return Err(OrderFormError::SameCanteen);
        }

        Ok(OrderDraft {
            customer_canteen_id: self.customer_canteen_id,
            executor_canteen_id: self.executor_canteen_id,
            lines: unique_lines(self.items)?,
        })
    }
}

/// Payload of `PUT /orders/{id}/items`: the full new list of lines.
#[derive(Debug, Deserialize, Validate)]
pub struct EditOrderItemsForm {
    #[validate(length(min = 1, max = MAX_ITEMS_PER_ORDER), nested)]
    pub items: Vec<OrderItemForm>,
}

impl EditOrderItemsForm {
    pub fn into_order_lines(self) -> OrderFormResult<OrderLines> {
        self.validate()?;
        unique_lines(self.items)
    }
}

/// Acceptance decision on one order line.
#[derive(Debug, Deserialize)]
pub struct DecideItemForm {
    pub accepted: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangeStatusForm {
    #[validate(range(min = 1))]
    pub status_id: i32,
}

fn unique_lines(items: Vec<OrderItemForm>) -> OrderFormResult<OrderLines> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.product_id) {
            return Err(OrderFormError::DuplicateProduct {
                product_id: item.product_id,
            });
        }
    }
    Ok(OrderLines(items))
}
