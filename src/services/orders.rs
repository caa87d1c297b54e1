use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::order::{
    ItemDecision, NewOrder, NewOrderItem, Order, OrderListQuery, ReplaceOrderItems,
    StatusTransition,
};
use crate::domain::status_change::StatusChange;
use crate::forms::orders::{
    ChangeStatusForm, CreateOrderForm, DecideItemForm, EditOrderItemsForm, OrderLines,
};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{CanteenReader, OrderReader, OrderStatusReader, OrderWriter, ProductReader};
use crate::services::{ServiceError, ServiceResult, ensure_admin, requested_page};

/// Query parameters accepted by the order list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub status_id: Option<i32>,
    /// Only honored for administrators; employees always see their own canteen.
    pub canteen_id: Option<i32>,
    pub page: Option<usize>,
}

/// A page of orders plus the ids the caller has not opened since they last changed.
#[derive(Debug, Serialize)]
pub struct OrdersPageData {
    pub orders: Paginated<Order>,
    pub unviewed: Vec<i32>,
}

/// Whether `user` may see `order` at all.
pub(crate) fn can_view(user: &AuthenticatedEmployee, order: &Order) -> bool {
    user.is_admin()
        || user
            .canteen_id
            .is_some_and(|canteen_id| order.involves_canteen(canteen_id))
}

/// Load an order the user is allowed to see. Hidden orders look missing.
pub(crate) fn load_visible_order<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    order_id: i32,
) -> ServiceResult<Order>
where
    R: OrderReader + ?Sized,
{
    let order = repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if !can_view(user, &order) {
        return Err(ServiceError::NotFound);
    }

    Ok(order)
}

pub fn list_orders<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: OrderQuery,
) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    let OrderQuery {
        status_id,
        canteen_id,
        page,
    } = query;
    let page = requested_page(page);

    let mut list_query = OrderListQuery::new();

    let scope = if user.is_admin() {
        canteen_id
    } else {
        match user.canteen_id {
            Some(own) => Some(own),
            None => {
                return Ok(OrdersPageData {
                    orders: Paginated::new(Vec::new(), page, 0),
                    unviewed: Vec::new(),
                });
            }
        }
    };

    if let Some(canteen_id) = scope {
        list_query = list_query.canteen_id(canteen_id);
    }
    if let Some(status_id) = status_id {
        list_query = list_query.status_id(status_id);
    }
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;

    let order_ids: Vec<i32> = orders.iter().map(|order| order.id).collect();
    let unviewed = repo
        .list_unviewed_order_ids(user.id, &order_ids)
        .map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(OrdersPageData {
        orders: Paginated::new(orders, page, total_pages),
        unviewed,
    })
}

/// Returns a visible order and records that the user has seen it.
pub fn get_order<R>(repo: &R, user: &AuthenticatedEmployee, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    let order = load_visible_order(repo, user, order_id)?;

    repo.mark_order_viewed(order.id, user.id)
        .map_err(ServiceError::from)?;

    Ok(order)
}

/// Places an order in the initial status with catalog snapshots of the requested products.
pub fn create_order<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: CreateOrderForm,
) -> ServiceResult<Order>
where
    R: OrderWriter + ProductReader + CanteenReader + OrderStatusReader + ?Sized,
{
    let draft = form
        .into_order_draft()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let customer_canteen_id = if user.is_admin() {
        let customer = draft.customer_canteen_id.ok_or_else(|| {
            ServiceError::Form("customer canteen is required".to_string())
        })?;
        ensure_canteen_exists(repo, customer, "customer")?;
        customer
    } else {
        let own = user.canteen_id.ok_or_else(|| {
            ServiceError::Precondition("employee is not assigned to a canteen".to_string())
        })?;
        if draft.customer_canteen_id.is_some_and(|requested| requested != own) {
            return Err(ServiceError::Unauthorized);
        }
        own
    };

    if customer_canteen_id == draft.executor_canteen_id {
        return Err(ServiceError::Form(
            "customer and executor canteens must differ".to_string(),
        ));
    }
    ensure_canteen_exists(repo, draft.executor_canteen_id, "executor")?;

    let initial_status = repo
        .get_initial_order_status()
        .map_err(ServiceError::from)?
        .ok_or_else(|| {
            ServiceError::Precondition("no initial order status is configured".to_string())
        })?;

    let items = price_lines(repo, &draft.lines)?;

    let new_order = NewOrder::new(
        customer_canteen_id,
        draft.executor_canteen_id,
        initial_status.id,
        user.id,
    )
    .with_items(items);

    let order = repo.create_order(&new_order).map_err(ServiceError::from)?;

    log::info!(
        "order {} created by employee {} for canteen {}",
        order.id,
        user.id,
        order.customer_canteen_id
    );

    Ok(order)
}

/// Replaces the lines of an order that is not fulfilled yet. Decisions start over.
pub fn edit_order<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    order_id: i32,
    form: EditOrderItemsForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ProductReader + OrderStatusReader + ?Sized,
{
    let lines = form
        .into_order_lines()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = load_visible_order(repo, user, order_id)?;

    if !(user.is_admin() || user.works_at(order.customer_canteen_id)) {
        return Err(ServiceError::Unauthorized);
    }
    ensure_not_fulfilled(repo, &order)?;

    let items = price_lines(repo, &lines)?;

    repo.replace_order_items(order.id, &ReplaceOrderItems::new(items))
        .map_err(state_error)
}

/// Accepts or rejects one line on behalf of the executing canteen.
pub fn decide_order_item<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    order_id: i32,
    item_id: i32,
    form: DecideItemForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + OrderStatusReader + ?Sized,
{
    let order = load_visible_order(repo, user, order_id)?;

    if !(user.is_admin() || user.works_at(order.executor_canteen_id)) {
        return Err(ServiceError::Unauthorized);
    }
    ensure_not_fulfilled(repo, &order)?;

    if order.item(item_id).is_none() {
        return Err(ServiceError::NotFound);
    }

    let decision = if form.accepted {
        ItemDecision::Accepted
    } else {
        ItemDecision::Rejected
    };

    repo.set_item_decision(order.id, item_id, decision)
        .map_err(state_error)
}

/// Moves an order to another status and records the change in its history.
pub fn change_order_status<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    order_id: i32,
    form: ChangeStatusForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + OrderStatusReader + ?Sized,
{
    ensure_admin(user)?;

    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let target = repo
        .get_order_status_by_id(form.status_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::Form(format!("status {} does not exist", form.status_id)))?;

    if target.id == order.status_id {
        return Err(ServiceError::Precondition(format!(
            "order is already in status `{}`",
            target.name
        )));
    }

    if target.is_fulfilled && order.has_undecided_items() {
        return Err(ServiceError::Precondition(
            "every item must be accepted or rejected first".to_string(),
        ));
    }

    let transition = StatusTransition::new(order.id, order.status_id, target.id, user.id)
        .require_decided_items(target.is_fulfilled);

    let updated = repo.change_order_status(&transition).map_err(state_error)?;

    log::info!(
        "order {} moved from status {} to {} by employee {}",
        order.id,
        transition.from_status_id,
        transition.to_status_id,
        user.id
    );

    Ok(updated)
}

/// Status history of a visible order, oldest entry first.
pub fn load_order_history<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    order_id: i32,
) -> ServiceResult<Vec<StatusChange>>
where
    R: OrderReader + ?Sized,
{
    let order = load_visible_order(repo, user, order_id)?;

    repo.list_status_changes(order.id)
        .map_err(ServiceError::from)
}

pub fn remove_order<R>(repo: &R, user: &AuthenticatedEmployee, order_id: i32) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    ensure_admin(user)?;

    repo.delete_order(order_id).map_err(ServiceError::from)?;

    log::info!("order {order_id} deleted by employee {}", user.id);

    Ok(())
}

fn ensure_canteen_exists<R>(repo: &R, canteen_id: i32, role: &str) -> ServiceResult<()>
where
    R: CanteenReader + ?Sized,
{
    match repo.get_canteen_by_id(canteen_id).map_err(ServiceError::from)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form(format!(
            "{role} canteen {canteen_id} does not exist"
        ))),
    }
}

/// The repository re-checks order state inside its transaction and reports
/// a refusal as a constraint violation.
fn state_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation(message) => ServiceError::Precondition(message),
        other => ServiceError::from(other),
    }
}

fn ensure_not_fulfilled<R>(repo: &R, order: &Order) -> ServiceResult<()>
where
    R: OrderStatusReader + ?Sized,
{
    let fulfilled = repo
        .get_order_status_by_id(order.status_id)
        .map_err(ServiceError::from)?
        .is_some_and(|status| status.is_fulfilled);

    if fulfilled {
        return Err(ServiceError::Precondition(
            "fulfilled orders cannot be changed".to_string(),
        ));
    }

    Ok(())
}

/// Snapshot catalog name, unit and price for every requested line.
fn price_lines<R>(repo: &R, lines: &OrderLines) -> ServiceResult<Vec<NewOrderItem>>
where
    R: ProductReader + ?Sized,
{
    let products: HashMap<i32, _> = repo
        .get_products_by_ids(&lines.product_ids())
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    lines
        .iter()
        .map(|line| {
            products
                .get(&line.product_id)
                .map(|product| NewOrderItem::from_product(product, line.quantity))
                .ok_or_else(|| {
                    ServiceError::Form(format!("product {} does not exist", line.product_id))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::canteen::Canteen;
    use crate::domain::order::OrderItem;
    use crate::domain::order_status::OrderStatus;
    use crate::domain::product::Product;
    use crate::forms::orders::OrderItemForm;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin, employee_of, fixed_datetime};

    const CUSTOMER: i32 = 1;
    const EXECUTOR: i32 = 2;
    const CREATED: i32 = 10;
    const FULFILLED: i32 = 30;

    fn status(id: i32) -> OrderStatus {
        OrderStatus {
            id,
            name: format!("status {id}"),
            is_initial: id == CREATED,
            is_fulfilled: id == FULFILLED,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn canteen(id: i32) -> Canteen {
        Canteen {
            id,
            address: format!("Street {id}"),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn product(id: i32, price_cents: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            price_cents,
            unit: "kg".to_string(),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn item(id: i32, decision: ItemDecision) -> OrderItem {
        OrderItem {
            id,
            product_id: Some(id),
            name: format!("Product {id}"),
            unit: "kg".to_string(),
            price_cents: 100,
            quantity: 2,
            decision,
        }
    }

    fn order(id: i32, status_id: i32, items: Vec<OrderItem>) -> Order {
        Order {
            id,
            customer_canteen_id: CUSTOMER,
            executor_canteen_id: EXECUTOR,
            status_id,
            total_cents: items.iter().map(OrderItem::line_total_cents).sum(),
            items,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn line(product_id: i32, quantity: i32) -> OrderItemForm {
        OrderItemForm {
            product_id,
            quantity,
        }
    }

    fn expect_order(repo: &mut MockRepository, stored: Order) {
        repo.expect_get_order_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
    }

    fn expect_statuses(repo: &mut MockRepository) {
        repo.expect_get_order_status_by_id()
            .returning(|id| Ok(Some(status(id))));
    }

    #[test]
    fn employee_without_canteen_sees_no_orders() {
        let mut repo = MockRepository::new();
        repo.expect_list_orders().times(0);

        let data = list_orders(&repo, &employee_of(None), OrderQuery::default())
            .expect("expected success");

        assert!(data.orders.items.is_empty());
        assert!(data.unviewed.is_empty());
    }

    #[test]
    fn employee_list_is_scoped_to_own_canteen() {
        let mut repo = MockRepository::new();
        repo.expect_list_orders()
            .times(1)
            .withf(|query| query.canteen_id == Some(CUSTOMER) && query.status_id == Some(CREATED))
            .returning(|_| Ok((2, vec![order(8, CREATED, vec![]), order(7, CREATED, vec![])])));
        repo.expect_list_unviewed_order_ids()
            .times(1)
            .withf(|employee_id, ids| *employee_id == 5 && ids == [8, 7])
            .returning(|_, _| Ok(vec![8]));

        let query = OrderQuery {
            status_id: Some(CREATED),
            canteen_id: Some(EXECUTOR),
            page: None,
        };

        let data = list_orders(&repo, &employee_of(Some(CUSTOMER)), query).expect("expected success");

        assert_eq!(data.orders.items.len(), 2);
        assert_eq!(data.unviewed, vec![8]);
    }

    #[test]
    fn get_order_marks_viewed_and_hides_foreign_orders() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(3, CREATED, vec![]));
        repo.expect_mark_order_viewed()
            .times(1)
            .withf(|order_id, employee_id| *order_id == 3 && *employee_id == 5)
            .returning(|_, _| Ok(()));

        let found = get_order(&repo, &employee_of(Some(EXECUTOR)), 3).expect("expected success");
        assert_eq!(found.id, 3);

        let hidden = get_order(&repo, &employee_of(Some(99)), 3);
        assert!(matches!(hidden, Err(ServiceError::NotFound)));
    }

    #[test]
    fn create_order_snapshots_products_in_initial_status() {
        let mut repo = MockRepository::new();
        repo.expect_get_canteen_by_id()
            .withf(|id| *id == EXECUTOR)
            .returning(|id| Ok(Some(canteen(id))));
        repo.expect_get_initial_order_status()
            .returning(|| Ok(Some(status(CREATED))));
        repo.expect_get_products_by_ids()
            .withf(|ids| ids == [1, 2])
            .returning(|_| Ok(vec![product(2, 300), product(1, 1250)]));
        repo.expect_create_order()
            .times(1)
            .withf(|new_order| {
                new_order.customer_canteen_id == CUSTOMER
                    && new_order.executor_canteen_id == EXECUTOR
                    && new_order.status_id == CREATED
                    && new_order.created_by == 5
                    && new_order.items[0].price_cents == 1250
                    && new_order.total_cents() == 1250 * 4 + 300
            })
            .returning(|_| Ok(order(11, CREATED, vec![])));

        let form = CreateOrderForm {
            customer_canteen_id: None,
            executor_canteen_id: EXECUTOR,
            items: vec![line(1, 4), line(2, 1)],
        };

        let created = create_order(&repo, &employee_of(Some(CUSTOMER)), form)
            .expect("expected success");
        assert_eq!(created.id, 11);
    }

    #[test]
    fn create_order_rejects_own_canteen_as_executor() {
        let repo = MockRepository::new();

        let form = CreateOrderForm {
            customer_canteen_id: None,
            executor_canteen_id: CUSTOMER,
            items: vec![line(1, 1)],
        };

        let result = create_order(&repo, &employee_of(Some(CUSTOMER)), form);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_order_for_other_canteen_is_forbidden_for_employees() {
        let repo = MockRepository::new();

        let form = CreateOrderForm {
            customer_canteen_id: Some(7),
            executor_canteen_id: EXECUTOR,
            items: vec![line(1, 1)],
        };

        let result = create_order(&repo, &employee_of(Some(CUSTOMER)), form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn create_order_requires_initial_status() {
        let mut repo = MockRepository::new();
        repo.expect_get_canteen_by_id()
            .returning(|id| Ok(Some(canteen(id))));
        repo.expect_get_initial_order_status().returning(|| Ok(None));
        repo.expect_create_order().times(0);

        let form = CreateOrderForm {
            customer_canteen_id: Some(CUSTOMER),
            executor_canteen_id: EXECUTOR,
            items: vec![line(1, 1)],
        };

        let result = create_order(&repo, &admin(), form);
        assert!(matches!(result, Err(ServiceError::Precondition(_))));
    }

    #[test]
    fn create_order_rejects_unknown_products() {
        let mut repo = MockRepository::new();
        repo.expect_get_canteen_by_id()
            .returning(|id| Ok(Some(canteen(id))));
        repo.expect_get_initial_order_status()
            .returning(|| Ok(Some(status(CREATED))));
        repo.expect_get_products_by_ids()
            .returning(|_| Ok(vec![product(1, 100)]));
        repo.expect_create_order().times(0);

        let form = CreateOrderForm {
            customer_canteen_id: None,
            executor_canteen_id: EXECUTOR,
            items: vec![line(1, 1), line(404, 1)],
        };

        let result = create_order(&repo, &employee_of(Some(CUSTOMER)), form);
        assert!(matches!(result, Err(ServiceError::Form(message)) if message.contains("404")));
    }

    #[test]
    fn edit_order_is_limited_to_customer_side() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(4, CREATED, vec![item(1, ItemDecision::Accepted)]));
        expect_statuses(&mut repo);
        repo.expect_get_products_by_ids()
            .returning(|_| Ok(vec![product(1, 500)]));
        repo.expect_replace_order_items()
            .times(1)
            .withf(|order_id, replacement| {
                *order_id == 4 && replacement.total_cents() == 1500
            })
            .returning(|_, _| Ok(order(4, CREATED, vec![item(1, ItemDecision::Undecided)])));

        let executor = employee_of(Some(EXECUTOR));
        let denied = edit_order(
            &repo,
            &executor,
            4,
            EditOrderItemsForm {
                items: vec![line(1, 3)],
            },
        );
        assert!(matches!(denied, Err(ServiceError::Unauthorized)));

        let customer = employee_of(Some(CUSTOMER));
        let edited = edit_order(
            &repo,
            &customer,
            4,
            EditOrderItemsForm {
                items: vec![line(1, 3)],
            },
        )
        .expect("expected success");
        assert!(edited.has_undecided_items());
    }

    #[test]
    fn fulfilled_orders_are_frozen() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(4, FULFILLED, vec![item(1, ItemDecision::Accepted)]));
        expect_statuses(&mut repo);
        repo.expect_replace_order_items().times(0);
        repo.expect_set_item_decision().times(0);

        let edit = edit_order(
            &repo,
            &admin(),
            4,
            EditOrderItemsForm {
                items: vec![line(1, 1)],
            },
        );
        assert!(matches!(edit, Err(ServiceError::Precondition(_))));

        let decide = decide_order_item(&repo, &admin(), 4, 1, DecideItemForm { accepted: false });
        assert!(matches!(decide, Err(ServiceError::Precondition(_))));
    }

    #[test]
    fn fulfilment_racing_an_edit_is_reported_as_precondition() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(4, CREATED, vec![item(1, ItemDecision::Accepted)]));
        expect_statuses(&mut repo);
        repo.expect_get_products_by_ids()
            .returning(|_| Ok(vec![product(1, 500)]));
        repo.expect_replace_order_items()
            .times(1)
            .returning(|_, _| {
                Err(RepositoryError::ConstraintViolation(
                    "order is fulfilled".to_string(),
                ))
            });
        repo.expect_set_item_decision()
            .times(1)
            .returning(|_, _, _| {
                Err(RepositoryError::ConstraintViolation(
                    "order is fulfilled".to_string(),
                ))
            });

        let edit = edit_order(
            &repo,
            &admin(),
            4,
            EditOrderItemsForm {
                items: vec![line(1, 2)],
            },
        );
        assert!(matches!(edit, Err(ServiceError::Precondition(_))));

        let decide = decide_order_item(&repo, &admin(), 4, 1, DecideItemForm { accepted: true });
        assert!(matches!(decide, Err(ServiceError::Precondition(_))));
    }

    #[test]
    fn executor_decides_items() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(4, CREATED, vec![item(1, ItemDecision::Undecided)]));
        expect_statuses(&mut repo);
        repo.expect_set_item_decision()
            .times(1)
            .withf(|order_id, item_id, decision| {
                *order_id == 4 && *item_id == 1 && *decision == ItemDecision::Rejected
            })
            .returning(|_, _, _| Ok(order(4, CREATED, vec![item(1, ItemDecision::Rejected)])));

        let executor = employee_of(Some(EXECUTOR));
        decide_order_item(&repo, &executor, 4, 1, DecideItemForm { accepted: false })
            .expect("expected success");

        let missing = decide_order_item(&repo, &executor, 4, 99, DecideItemForm { accepted: true });
        assert!(matches!(missing, Err(ServiceError::NotFound)));

        let customer = employee_of(Some(CUSTOMER));
        let denied = decide_order_item(&repo, &customer, 4, 1, DecideItemForm { accepted: true });
        assert!(matches!(denied, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn status_change_is_admin_only() {
        let repo = MockRepository::new();
        let result = change_order_status(
            &repo,
            &employee_of(Some(CUSTOMER)),
            4,
            ChangeStatusForm { status_id: 20 },
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn fulfilling_requires_decided_items() {
        let mut repo = MockRepository::new();
        expect_order(
            &mut repo,
            order(
                4,
                CREATED,
                vec![item(1, ItemDecision::Accepted), item(2, ItemDecision::Undecided)],
            ),
        );
        expect_statuses(&mut repo);
        repo.expect_change_order_status().times(0);

        let result = change_order_status(&repo, &admin(), 4, ChangeStatusForm { status_id: FULFILLED });
        assert!(matches!(result, Err(ServiceError::Precondition(_))));
    }

    #[test]
    fn status_change_to_same_status_is_rejected() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(4, CREATED, vec![]));
        expect_statuses(&mut repo);

        let result = change_order_status(&repo, &admin(), 4, ChangeStatusForm { status_id: CREATED });
        assert!(matches!(result, Err(ServiceError::Precondition(_))));
    }

    #[test]
    fn status_change_records_transition() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(4, CREATED, vec![item(1, ItemDecision::Accepted)]));
        expect_statuses(&mut repo);
        repo.expect_change_order_status()
            .times(1)
            .withf(|transition| {
                transition.order_id == 4
                    && transition.from_status_id == CREATED
                    && transition.to_status_id == FULFILLED
                    && transition.changed_by == 1
                    && transition.require_decided_items
            })
            .returning(|_| Ok(order(4, FULFILLED, vec![item(1, ItemDecision::Accepted)])));

        let updated = change_order_status(&repo, &admin(), 4, ChangeStatusForm { status_id: FULFILLED })
            .expect("expected success");
        assert_eq!(updated.status_id, FULFILLED);
    }

    #[test]
    fn concurrent_status_change_is_conflict() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(4, CREATED, vec![]));
        expect_statuses(&mut repo);
        repo.expect_change_order_status()
            .returning(|_| Err(RepositoryError::Conflict));

        let result = change_order_status(&repo, &admin(), 4, ChangeStatusForm { status_id: 20 });
        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn history_requires_visibility() {
        let mut repo = MockRepository::new();
        expect_order(&mut repo, order(4, CREATED, vec![]));
        repo.expect_list_status_changes()
            .times(1)
            .returning(|order_id| {
                Ok(vec![StatusChange {
                    id: 1,
                    order_id,
                    old_status_id: CREATED,
                    new_status_id: 20,
                    changed_by: 1,
                    changed_at: fixed_datetime(),
                }])
            });

        let history = load_order_history(&repo, &employee_of(Some(CUSTOMER)), 4)
            .expect("expected success");
        assert_eq!(history.len(), 1);

        let hidden = load_order_history(&repo, &employee_of(None), 4);
        assert!(matches!(hidden, Err(ServiceError::NotFound)));
    }

    #[test]
    fn remove_order_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_delete_order()
            .times(1)
            .returning(|_| Ok(()));

        assert!(matches!(
            remove_order(&repo, &employee_of(Some(CUSTOMER)), 4),
            Err(ServiceError::Unauthorized)
        ));
        remove_order(&repo, &admin(), 4).expect("expected success");
    }
}
