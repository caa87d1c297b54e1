use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::order_status::OrderStatus;
use crate::forms::order_statuses::{AddOrderStatusForm, EditOrderStatusForm};
use crate::repository::{OrderStatusReader, OrderStatusWriter};
use crate::services::{ServiceError, ServiceResult, ensure_admin};

/// Lists the whole status catalog.
pub fn load_order_statuses<R>(
    repo: &R,
    _user: &AuthenticatedEmployee,
) -> ServiceResult<Vec<OrderStatus>>
where
    R: OrderStatusReader + ?Sized,
{
    repo.list_order_statuses().map_err(ServiceError::from)
}

pub fn create_order_status<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: AddOrderStatusForm,
) -> ServiceResult<OrderStatus>
where
    R: OrderStatusWriter + ?Sized,
{
    ensure_admin(user)?;

    let new_status = form
        .into_new_order_status()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_order_status(&new_status)
        .map_err(ServiceError::from)
}

pub fn modify_order_status<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    status_id: i32,
    form: EditOrderStatusForm,
) -> ServiceResult<OrderStatus>
where
    R: OrderStatusWriter + ?Sized,
{
    ensure_admin(user)?;

    let updates = form
        .into_update_order_status()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_order_status(status_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes a status that no order or history entry uses.
pub fn remove_order_status<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    status_id: i32,
) -> ServiceResult<()>
where
    R: OrderStatusWriter + ?Sized,
{
    ensure_admin(user)?;

    repo.delete_order_status(status_id)
        .map_err(ServiceError::from)
}
