use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Audit row describing one status transition of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    pub id: i32,
    pub order_id: i32,
    pub old_status_id: i32,
    pub new_status_id: i32,
    /// Employee who performed the transition.
    pub changed_by: i32,
    pub changed_at: NaiveDateTime,
}
