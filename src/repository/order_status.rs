use chrono::Local;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::order_status::{
    NewOrderStatus as DomainNewOrderStatus, OrderStatus as DomainOrderStatus,
    UpdateOrderStatus as DomainUpdateOrderStatus,
};
use crate::models::order_status::{
    NewOrderStatus as DbNewOrderStatus, OrderStatus as DbOrderStatus,
    UpdateOrderStatus as DbUpdateOrderStatus,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, OrderStatusReader, OrderStatusWriter};

impl OrderStatusReader for DieselRepository {
    fn get_order_status_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrderStatus>> {
        use crate::schema::order_statuses;

        let mut conn = self.conn()?;
        let status = order_statuses::table
            .filter(order_statuses::id.eq(id))
            .first::<DbOrderStatus>(&mut conn)
            .optional()?;

        Ok(status.map(Into::into))
    }

    fn get_initial_order_status(&self) -> RepositoryResult<Option<DomainOrderStatus>> {
        use crate::schema::order_statuses;

        let mut conn = self.conn()?;
        let status = order_statuses::table
            .filter(order_statuses::is_initial.eq(true))
            .order(order_statuses::id.asc())
            .first::<DbOrderStatus>(&mut conn)
            .optional()?;

        Ok(status.map(Into::into))
    }

    fn list_order_statuses(&self) -> RepositoryResult<Vec<DomainOrderStatus>> {
        use crate::schema::order_statuses;

        let mut conn = self.conn()?;
        let statuses = order_statuses::table
            .order(order_statuses::id.asc())
            .load::<DbOrderStatus>(&mut conn)?;

        Ok(statuses.into_iter().map(Into::into).collect())
    }
}

impl OrderStatusWriter for DieselRepository {
    fn create_order_status(
        &self,
        new_status: &DomainNewOrderStatus,
    ) -> RepositoryResult<DomainOrderStatus> {
        use crate::schema::order_statuses;

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrderStatus, RepositoryError, _>(|conn| {
            if new_status.is_initial {
                clear_initial_flag(conn, None)?;
            }

            let insertable = DbNewOrderStatus::from(new_status);
            let created = diesel::insert_into(order_statuses::table)
                .values(&insertable)
                .get_result::<DbOrderStatus>(conn)?;

            Ok(created.into())
        })
    }

    fn update_order_status(
        &self,
        status_id: i32,
        updates: &DomainUpdateOrderStatus,
    ) -> RepositoryResult<DomainOrderStatus> {
        use crate::schema::{order_items, order_statuses, orders};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<DomainOrderStatus, RepositoryError, _>(|conn| {
            if updates.is_fulfilled == Some(true) {
                // Orders already holding the status would count as fulfilled
                // without every item being decided.
                let has_undecided: bool = select(exists(
                    order_items::table
                        .inner_join(orders::table)
                        .filter(orders::status_id.eq(status_id))
                        .filter(order_items::accepted.is_null()),
                ))
                .get_result(conn)?;

                if has_undecided {
                    return Err(RepositoryError::ConstraintViolation(
                        "orders in this status have undecided items".to_string(),
                    ));
                }
            }

            if updates.is_initial == Some(true) {
                clear_initial_flag(conn, Some(status_id))?;
            }

            let db_updates = DbUpdateOrderStatus::from(updates);
            let updated = diesel::update(
                order_statuses::table.filter(order_statuses::id.eq(status_id)),
            )
            .set(&db_updates)
            .get_result::<DbOrderStatus>(conn)?;

            Ok(updated.into())
        })
    }

    fn delete_order_status(&self, status_id: i32) -> RepositoryResult<()> {
        use crate::schema::{order_statuses, orders, status_changes};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let used_by_orders: bool =
                select(exists(orders::table.filter(orders::status_id.eq(status_id))))
                    .get_result(conn)?;

            let used_by_history: bool = select(exists(
                status_changes::table.filter(
                    status_changes::old_status_id
                        .eq(status_id)
                        .or(status_changes::new_status_id.eq(status_id)),
                ),
            ))
            .get_result(conn)?;

            if used_by_orders || used_by_history {
                return Err(RepositoryError::ConstraintViolation(
                    "order status is still referenced".to_string(),
                ));
            }

            let deleted = diesel::delete(
                order_statuses::table.filter(order_statuses::id.eq(status_id)),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

/// Drop the initial flag from every status except `keep`.
fn clear_initial_flag(conn: &mut SqliteConnection, keep: Option<i32>) -> RepositoryResult<()> {
    use crate::schema::order_statuses;

    let now = Local::now().naive_utc();

    match keep {
        Some(status_id) => diesel::update(
            order_statuses::table
                .filter(order_statuses::is_initial.eq(true))
                .filter(order_statuses::id.ne(status_id)),
        )
        .set((
            order_statuses::is_initial.eq(false),
            order_statuses::updated_at.eq(now),
        ))
        .execute(conn)?,
        None => diesel::update(order_statuses::table.filter(order_statuses::is_initial.eq(true)))
            .set((
                order_statuses::is_initial.eq(false),
                order_statuses::updated_at.eq(now),
            ))
            .execute(conn)?,
    };

    Ok(())
}
