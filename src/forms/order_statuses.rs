use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order_status::{NewOrderStatus, UpdateOrderStatus};
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN: u64 = 64;

pub type OrderStatusFormResult<T> = Result<T, OrderStatusFormError>;

#[derive(Debug, Error)]
pub enum OrderStatusFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("status name cannot be empty")]
    EmptyName,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddOrderStatusForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[serde(default)]
    pub is_initial: bool,
    #[serde(default)]
    pub is_fulfilled: bool,
}

impl AddOrderStatusForm {
    pub fn into_new_order_status(self) -> OrderStatusFormResult<NewOrderStatus> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(OrderStatusFormError::EmptyName);
        }

        let mut status = NewOrderStatus::new(name);
        if self.is_initial {
            status = status.initial();
        }
        if self.is_fulfilled {
            status = status.fulfilled();
        }

        Ok(status)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditOrderStatusForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: Option<String>,
    pub is_initial: Option<bool>,
    pub is_fulfilled: Option<bool>,
}

impl EditOrderStatusForm {
    pub fn into_update_order_status(self) -> OrderStatusFormResult<UpdateOrderStatus> {
        self.validate()?;

        let mut updates = UpdateOrderStatus::new();

        if let Some(name) = self.name.as_deref() {
            let name = sanitize_inline_text(name);
            if name.is_empty() {
                return Err(OrderStatusFormError::EmptyName);
            }
            updates = updates.name(name);
        }
        if let Some(value) = self.is_initial {
            updates = updates.is_initial(value);
        }
        if let Some(value) = self.is_fulfilled {
            updates = updates.is_fulfilled(value);
        }

        Ok(updates)
    }
}
