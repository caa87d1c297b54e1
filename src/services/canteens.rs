use serde::Deserialize;

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::canteen::{Canteen, CanteenListQuery};
use crate::forms::canteens::{AddCanteenForm, EditCanteenForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CanteenReader, CanteenWriter};
use crate::services::{ServiceError, ServiceResult, ensure_admin, requested_page};

/// Query parameters accepted by the canteen list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CanteenQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Lists canteens. Every employee may see them to pick an executor.
pub fn load_canteens<R>(
    repo: &R,
    _user: &AuthenticatedEmployee,
    query: CanteenQuery,
) -> ServiceResult<Paginated<Canteen>>
where
    R: CanteenReader + ?Sized,
{
    let page = requested_page(query.page);
    let mut list_query = CanteenListQuery::new();

    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        list_query = list_query.search(term);
    }

    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, canteens) = repo.list_canteens(list_query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(Paginated::new(canteens, page, total_pages))
}

pub fn load_canteen<R>(
    repo: &R,
    _user: &AuthenticatedEmployee,
    canteen_id: i32,
) -> ServiceResult<Canteen>
where
    R: CanteenReader + ?Sized,
{
    repo.get_canteen_by_id(canteen_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_canteen<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: AddCanteenForm,
) -> ServiceResult<Canteen>
where
    R: CanteenWriter + ?Sized,
{
    ensure_admin(user)?;

    let new_canteen = form
        .into_new_canteen()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_canteen(&new_canteen).map_err(ServiceError::from)
}

pub fn modify_canteen<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    canteen_id: i32,
    form: EditCanteenForm,
) -> ServiceResult<Canteen>
where
    R: CanteenWriter + ?Sized,
{
    ensure_admin(user)?;

    let updates = form
        .into_update_canteen(chrono::Local::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_canteen(canteen_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes a canteen nobody works at and no order references.
pub fn remove_canteen<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    canteen_id: i32,
) -> ServiceResult<()>
where
    R: CanteenWriter + ?Sized,
{
    ensure_admin(user)?;

    repo.delete_canteen(canteen_id).map_err(ServiceError::from)
}
