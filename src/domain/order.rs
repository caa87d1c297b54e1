use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::pagination::Pagination;

/// Acceptance state of a single order line, set by the executing canteen.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemDecision {
    /// Nobody has accepted or rejected the line yet.
    #[default]
    Undecided,
    Accepted,
    Rejected,
}

impl From<Option<bool>> for ItemDecision {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Undecided,
            Some(true) => Self::Accepted,
            Some(false) => Self::Rejected,
        }
    }
}

impl From<ItemDecision> for Option<bool> {
    fn from(value: ItemDecision) -> Self {
        match value {
            ItemDecision::Undecided => None,
            ItemDecision::Accepted => Some(true),
            ItemDecision::Rejected => Some(false),
        }
    }
}

/// Line item of an order. Name, unit and price are copied from the catalog
/// when the line is created so later catalog edits do not rewrite history.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: i32,
    /// Catalog product the line was created from; `None` once the product is deleted.
    pub product_id: Option<i32>,
    pub name: String,
    pub unit: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub decision: ItemDecision,
}

impl OrderItem {
    pub fn line_total_cents(&self) -> i64 {
        line_total(self.price_cents, self.quantity)
    }
}

/// Request to move a set of priced products from one canteen to another.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i32,
    /// Canteen that placed the order and receives the goods.
    pub customer_canteen_id: i32,
    /// Canteen that ships the goods.
    pub executor_canteen_id: i32,
    pub status_id: i32,
    /// Summary price of all lines in the smallest currency unit.
    pub total_cents: i64,
    pub items: Vec<OrderItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Order {
    pub fn has_undecided_items(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.decision == ItemDecision::Undecided)
    }

    /// Whether `canteen_id` is either side of the order.
    pub fn involves_canteen(&self, canteen_id: i32) -> bool {
        self.customer_canteen_id == canteen_id || self.executor_canteen_id == canteen_id
    }

    pub fn item(&self, item_id: i32) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

/// Line item payload for a new or edited order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: Option<i32>,
    pub name: String,
    pub unit: String,
    pub price_cents: i64,
    pub quantity: i32,
}

impl NewOrderItem {
    /// Snapshot the catalog data of `product` for a line of `quantity` units.
    pub fn from_product(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: Some(product.id),
            name: product.name.clone(),
            unit: product.unit.clone(),
            price_cents: product.price_cents,
            quantity,
        }
    }

    pub fn line_total_cents(&self) -> i64 {
        line_total(self.price_cents, self.quantity)
    }
}

/// Payload required to insert an order together with its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_canteen_id: i32,
    pub executor_canteen_id: i32,
    pub status_id: i32,
    pub items: Vec<NewOrderItem>,
    /// Employee placing the order; recorded as having seen it.
    pub created_by: i32,
}

impl NewOrder {
    pub fn new(
        customer_canteen_id: i32,
        executor_canteen_id: i32,
        status_id: i32,
        created_by: i32,
    ) -> Self {
        Self {
            customer_canteen_id,
            executor_canteen_id,
            status_id,
            items: Vec::new(),
            created_by,
        }
    }

    pub fn with_items(mut self, items: Vec<NewOrderItem>) -> Self {
        self.items = items;
        self
    }

    pub fn total_cents(&self) -> i64 {
        sum_line_totals(&self.items)
    }
}

/// Replacement of every line of an existing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOrderItems {
    pub items: Vec<NewOrderItem>,
    pub updated_at: NaiveDateTime,
}

impl ReplaceOrderItems {
    pub fn new(items: Vec<NewOrderItem>) -> Self {
        Self {
            items,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn total_cents(&self) -> i64 {
        sum_line_totals(&self.items)
    }
}

/// A status change to apply, guarded by the status the caller observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub order_id: i32,
    pub from_status_id: i32,
    pub to_status_id: i32,
    pub changed_by: i32,
    /// Reject the transition while any item is undecided.
    pub require_decided_items: bool,
    pub changed_at: NaiveDateTime,
}

impl StatusTransition {
    pub fn new(order_id: i32, from_status_id: i32, to_status_id: i32, changed_by: i32) -> Self {
        Self {
            order_id,
            from_status_id,
            to_status_id,
            changed_by,
            require_decided_items: false,
            changed_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn require_decided_items(mut self, value: bool) -> Self {
        self.require_decided_items = value;
        self
    }
}

/// Query definition used to list orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Restrict to orders where this canteen is customer or executor.
    pub canteen_id: Option<i32>,
    pub status_id: Option<i32>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canteen_id(mut self, canteen_id: i32) -> Self {
        self.canteen_id = Some(canteen_id);
        self
    }

    pub fn status_id(mut self, status_id: i32) -> Self {
        self.status_id = Some(status_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

fn line_total(price_cents: i64, quantity: i32) -> i64 {
    price_cents.saturating_mul(i64::from(quantity))
}

fn sum_line_totals(items: &[NewOrderItem]) -> i64 {
    items
        .iter()
        .map(NewOrderItem::line_total_cents)
        .fold(0, i64::saturating_add)
}
