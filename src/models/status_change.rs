use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::StatusTransition;
use crate::domain::status_change::StatusChange as DomainStatusChange;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::status_changes)]
pub struct StatusChange {
    pub id: i32,
    pub order_id: i32,
    pub old_status_id: i32,
    pub new_status_id: i32,
    pub changed_by: i32,
    pub changed_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::status_changes)]
pub struct NewStatusChange {
    pub order_id: i32,
    pub old_status_id: i32,
    pub new_status_id: i32,
    pub changed_by: i32,
    pub changed_at: NaiveDateTime,
}

impl From<StatusChange> for DomainStatusChange {
    fn from(value: StatusChange) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            old_status_id: value.old_status_id,
            new_status_id: value.new_status_id,
            changed_by: value.changed_by,
            changed_at: value.changed_at,
        }
    }
}

impl From<&StatusTransition> for NewStatusChange {
    fn from(value: &StatusTransition) -> Self {
        Self {
            order_id: value.order_id,
            old_status_id: value.from_status_id,
            new_status_id: value.to_status_id,
            changed_by: value.changed_by,
            changed_at: value.changed_at,
        }
    }
}
