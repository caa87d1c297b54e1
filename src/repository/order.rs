use std::collections::{HashMap, HashSet};

use chrono::Local;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::order::{
    ItemDecision, NewOrder as DomainNewOrder, NewOrderItem as DomainNewOrderItem,
    Order as DomainOrder, OrderListQuery, ReplaceOrderItems, StatusTransition,
};
use crate::domain::status_change::StatusChange as DomainStatusChange;
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, NewOrderView as DbNewOrderView,
    Order as DbOrder, OrderItem as DbOrderItem,
};
use crate::models::status_change::{NewStatusChange as DbNewStatusChange, StatusChange as DbStatusChange};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, OrderReader, OrderWriter};

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = load_items(&mut conn, order.id)?;

        Ok(Some(DomainOrder::from((order, items))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let OrderListQuery {
            canteen_id,
            status_id,
            pagination,
        } = query;

        let mut count_query = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(canteen) = canteen_id {
            count_query = count_query.filter(
                orders::customer_canteen_id
                    .eq(canteen)
                    .or(orders::executor_canteen_id.eq(canteen)),
            );
        }

        if let Some(status) = status_id {
            count_query = count_query.filter(orders::status_id.eq(status));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(canteen) = canteen_id {
            items = items.filter(
                orders::customer_canteen_id
                    .eq(canteen)
                    .or(orders::executor_canteen_id.eq(canteen)),
            );
        }

        if let Some(status) = status_id {
            items = items.filter(orders::status_id.eq(status));
        }

        items = items.order((orders::created_at.desc(), orders::id.desc()));

        if let Some(pagination) = pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        if db_orders.is_empty() {
            return Ok((total, Vec::new()));
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();

        let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();

        let rows = order_items::table
            .filter(order_items::order_id.eq_any(&order_ids))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        for item in rows {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                DomainOrder::from((order, items))
            })
            .collect();

        Ok((total, orders))
    }

    fn list_unviewed_order_ids(
        &self,
        employee_id: i32,
        order_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>> {
        use crate::schema::order_views;

        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;

        let viewed: HashSet<i32> = order_views::table
            .filter(order_views::employee_id.eq(employee_id))
            .filter(order_views::order_id.eq_any(order_ids))
            .select(order_views::order_id)
            .load::<i32>(&mut conn)?
            .into_iter()
            .collect();

        Ok(order_ids
            .iter()
            .copied()
            .filter(|order_id| !viewed.contains(order_id))
            .collect())
    }

    fn list_status_changes(&self, order_id: i32) -> RepositoryResult<Vec<DomainStatusChange>> {
        use crate::schema::status_changes;

        let mut conn = self.conn()?;

        let changes = status_changes::table
            .filter(status_changes::order_id.eq(order_id))
            .order((status_changes::changed_at.asc(), status_changes::id.asc()))
            .load::<DbStatusChange>(&mut conn)?;

        Ok(changes.into_iter().map(Into::into).collect())
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_views, orders};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let db_new = DbNewOrder::from(new_order);

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            let order_id = created.id;

            insert_items(conn, order_id, &new_order.items)?;

            diesel::insert_into(order_views::table)
                .values(&DbNewOrderView {
                    order_id,
                    employee_id: new_order.created_by,
                    viewed_at: created.created_at,
                })
                .execute(conn)?;

            let items = load_items(conn, order_id)?;

            Ok(DomainOrder::from((created, items)))
        })
    }

    fn replace_order_items(
        &self,
        order_id: i32,
        replacement: &ReplaceOrderItems,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<DomainOrder, RepositoryError, _>(|conn| {
            ensure_open(conn, order_id)?;

            let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
                .set((
                    orders::total_cents.eq(replacement.total_cents()),
                    orders::updated_at.eq(replacement.updated_at),
                ))
                .get_result::<DbOrder>(conn)?;

            diesel::delete(order_items::table.filter(order_items::order_id.eq(order_id)))
                .execute(conn)?;

            insert_items(conn, order_id, &replacement.items)?;
            clear_views(conn, order_id)?;

            let items = load_items(conn, order_id)?;

            Ok(DomainOrder::from((updated, items)))
        })
    }

    fn set_item_decision(
        &self,
        order_id: i32,
        item_id: i32,
        decision: ItemDecision,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<DomainOrder, RepositoryError, _>(|conn| {
            ensure_open(conn, order_id)?;

            let now = Local::now().naive_utc();
            let accepted: Option<bool> = decision.into();

            let changed = diesel::update(
                order_items::table
                    .filter(order_items::id.eq(item_id))
                    .filter(order_items::order_id.eq(order_id)),
            )
            .set((
                order_items::accepted.eq(accepted),
                order_items::updated_at.eq(now),
            ))
            .execute(conn)?;
            if changed == 0 {
                return Err(RepositoryError::NotFound);
            }

            let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
                .set(orders::updated_at.eq(now))
                .get_result::<DbOrder>(conn)?;

            let items = load_items(conn, order_id)?;

            Ok(DomainOrder::from((updated, items)))
        })
    }

    fn change_order_status(&self, transition: &StatusTransition) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders, status_changes};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let order_id = transition.order_id;

            if transition.require_decided_items {
                let has_undecided: bool = select(exists(
                    order_items::table
                        .filter(order_items::order_id.eq(order_id))
                        .filter(order_items::accepted.is_null()),
                ))
                .get_result(conn)?;

                if has_undecided {
                    return Err(RepositoryError::ConstraintViolation(
                        "order has undecided items".to_string(),
                    ));
                }
            }

            let updated = diesel::update(
                orders::table
                    .filter(orders::id.eq(order_id))
                    .filter(orders::status_id.eq(transition.from_status_id)),
            )
            .set((
                orders::status_id.eq(transition.to_status_id),
                orders::updated_at.eq(transition.changed_at),
            ))
            .get_result::<DbOrder>(conn)
            .optional()?;

            let Some(updated) = updated else {
                let order_exists: bool =
                    select(exists(orders::table.filter(orders::id.eq(order_id))))
                        .get_result(conn)?;
                return Err(if order_exists {
                    RepositoryError::Conflict
                } else {
                    RepositoryError::NotFound
                });
            };

            diesel::insert_into(status_changes::table)
                .values(&DbNewStatusChange::from(transition))
                .execute(conn)?;

            clear_views(conn, order_id)?;

            let items = load_items(conn, order_id)?;

            Ok(DomainOrder::from((updated, items)))
        })
    }

    fn mark_order_viewed(&self, order_id: i32, employee_id: i32) -> RepositoryResult<()> {
        use crate::schema::order_views;

        let mut conn = self.conn()?;

        diesel::replace_into(order_views::table)
            .values(&DbNewOrderView {
                order_id,
                employee_id,
                viewed_at: Local::now().naive_utc(),
            })
            .execute(&mut conn)?;

        Ok(())
    }

    fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        // Items, views and history go with the order through ON DELETE CASCADE.
        let deleted =
            diesel::delete(orders::table.filter(orders::id.eq(order_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn insert_items(
    conn: &mut SqliteConnection,
    order_id: i32,
    items: &[DomainNewOrderItem],
) -> RepositoryResult<()> {
    use crate::schema::order_items;

    if items.is_empty() {
        return Ok(());
    }

    let payload: Vec<DbNewOrderItem> = items
        .iter()
        .map(|item| DbNewOrderItem::from_domain(order_id, item))
        .collect();

    diesel::insert_into(order_items::table)
        .values(&payload)
        .execute(conn)?;

    Ok(())
}

fn load_items(conn: &mut SqliteConnection, order_id: i32) -> RepositoryResult<Vec<DbOrderItem>> {
    use crate::schema::order_items;

    Ok(order_items::table
        .filter(order_items::order_id.eq(order_id))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)?)
}

/// Fail unless the order's current status still allows changing its items.
fn ensure_open(conn: &mut SqliteConnection, order_id: i32) -> RepositoryResult<()> {
    use crate::schema::{order_statuses, orders};

    let fulfilled = orders::table
        .inner_join(order_statuses::table)
        .filter(orders::id.eq(order_id))
        .select(order_statuses::is_fulfilled)
        .first::<bool>(conn)
        .optional()?;

    match fulfilled {
        None => Err(RepositoryError::NotFound),
        Some(true) => Err(RepositoryError::ConstraintViolation(
            "order is fulfilled".to_string(),
        )),
        Some(false) => Ok(()),
    }
}

/// Forget who has seen the order so everyone gets it as unviewed again.
fn clear_views(conn: &mut SqliteConnection, order_id: i32) -> RepositoryResult<()> {
    use crate::schema::order_views;

    diesel::delete(order_views::table.filter(order_views::order_id.eq(order_id)))
        .execute(conn)?;

    Ok(())
}
