use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Entry of the mutable order status catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderStatus {
    pub id: i32,
    pub name: String,
    /// Status assigned to freshly created orders. At most one status carries it.
    pub is_initial: bool,
    /// Marks completion: orders may only enter it once every item is decided.
    pub is_fulfilled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderStatus {
    pub name: String,
    pub is_initial: bool,
    pub is_fulfilled: bool,
}

impl NewOrderStatus {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_initial: false,
            is_fulfilled: false,
        }
    }

    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    pub fn fulfilled(mut self) -> Self {
        self.is_fulfilled = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOrderStatus {
    pub name: Option<String>,
    pub is_initial: Option<bool>,
    pub is_fulfilled: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateOrderStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateOrderStatus {
    pub fn new() -> Self {
        Self {
            name: None,
            is_initial: None,
            is_fulfilled: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_initial(mut self, value: bool) -> Self {
        self.is_initial = Some(value);
        self
    }

    pub fn is_fulfilled(mut self, value: bool) -> Self {
        self.is_fulfilled = Some(value);
        self
    }
}
