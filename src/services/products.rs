use serde::{Deserialize, Serialize};

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{AddProductForm, EditProductForm, UploadProductsForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult, ensure_admin, requested_page};

/// Query parameters accepted by the product list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Optional case-insensitive search applied to product names.
    pub search: Option<String>,
    /// Page number requested by the client (1-based).
    pub page: Option<usize>,
}

/// Result of a CSV import.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProductImport {
    pub created: usize,
}

/// Fetches a page of the product catalog.
pub fn load_products<R>(
    repo: &R,
    _user: &AuthenticatedEmployee,
    query: ProductQuery,
) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader + ?Sized,
{
    let ProductQuery { search, page } = query;
    let page = requested_page(page);

    let mut list_query = ProductListQuery::new();

    if let Some(term) = search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        list_query = list_query.search(term);
    }

    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, products) = repo.list_products(list_query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(Paginated::new(products, page, total_pages))
}

pub fn load_product<R>(
    repo: &R,
    _user: &AuthenticatedEmployee,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a new catalog product.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&new_product).map_err(ServiceError::from)
}

/// Updates name, price or unit of a product. Existing order lines keep their snapshot.
pub fn modify_product<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    product_id: i32,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_product(product_id, &updates)
        .map_err(ServiceError::from)
}

pub fn remove_product<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    repo.delete_product(product_id).map_err(ServiceError::from)
}

/// Imports products from an uploaded CSV. Either every row is stored or none.
pub fn upload_products<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: &mut UploadProductsForm,
) -> ServiceResult<ProductImport>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    let new_products = form
        .into_new_products()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo
        .create_products(&new_products)
        .map_err(ServiceError::from)?;

    log::info!("imported {created} products");

    Ok(ProductImport { created })
}
