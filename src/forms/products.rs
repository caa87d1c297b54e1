use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{parse_price_cents, sanitize_inline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a unit of measurement.
const UNIT_MAX_LEN: usize = 16;
const UNIT_MAX_LEN_VALIDATOR: u64 = UNIT_MAX_LEN as u64;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("product unit cannot be empty")]
    EmptyUnit,
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
    /// The uploaded CSV lacks one of the `name`, `price` or `unit` columns.
    #[error("upload must have `name`, `price` and `unit` columns")]
    MissingRequiredHeaders,
    #[error("row {row} is missing a product name")]
    UploadMissingName { row: usize },
    #[error("row {row} is missing a unit")]
    UploadMissingUnit { row: usize },
    #[error("row {row} has invalid price `{value}`")]
    UploadInvalidPrice { row: usize, value: String },
    #[error("upload contains no products")]
    EmptyUpload,
    #[error("error reading csv file")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Payload of the "add product" request. The price is a decimal string such as `12.50`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub price: String,
    #[validate(length(min = 1, max = UNIT_MAX_LEN_VALIDATOR))]
    pub unit: String,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let unit = sanitize_inline_text(&self.unit);
        if unit.is_empty() {
            return Err(ProductFormError::EmptyUnit);
        }

        let price_cents = parse_price_cents(&self.price)
            .ok_or(ProductFormError::InvalidPrice { value: self.price })?;

        Ok(NewProduct::new(name, price_cents, unit))
    }
}

/// Partial update of a product. Absent fields keep their value.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub price: Option<String>,
    #[validate(length(min = 1, max = UNIT_MAX_LEN_VALIDATOR))]
    pub unit: Option<String>,
}

impl EditProductForm {
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let mut updates = UpdateProduct::new();

        if let Some(name) = self.name.as_deref() {
            let name = sanitize_inline_text(name);
            if name.is_empty() {
                return Err(ProductFormError::EmptyName);
            }
            updates = updates.name(name);
        }

        if let Some(price) = self.price {
            let price_cents =
                parse_price_cents(&price).ok_or(ProductFormError::InvalidPrice { value: price })?;
            updates = updates.price_cents(price_cents);
        }

        if let Some(unit) = self.unit.as_deref() {
            let unit = sanitize_inline_text(unit);
            if unit.is_empty() {
                return Err(ProductFormError::EmptyUnit);
            }
            updates = updates.unit(unit);
        }

        Ok(updates)
    }
}

#[derive(MultipartForm)]
/// Multipart form for uploading a CSV file with new products.
pub struct UploadProductsForm {
    #[multipart(limit = "10MB")]
    /// Uploaded CSV file with `name`, `price` and `unit` columns.
    pub csv: TempFile,
}

impl UploadProductsForm {
    /// Parse the uploaded CSV file. Any invalid row rejects the whole upload.
    pub fn into_new_products(&mut self) -> ProductFormResult<Vec<NewProduct>> {
        self.csv.file.rewind()?;
        parse_products(self.csv.file.by_ref())
    }
}

fn parse_products<R: Read>(reader: R) -> ProductFormResult<Vec<NewProduct>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let position = |column: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(column))
    };

    let (Some(name_index), Some(price_index), Some(unit_index)) =
        (position("name"), position("price"), position("unit"))
    else {
        return Err(ProductFormError::MissingRequiredHeaders);
    };

    let mut products = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1, so data rows start at 2.
        let row = index + 2;

        if record.iter().all(str::is_empty) {
            continue;
        }

        let name = sanitize_inline_text(record.get(name_index).unwrap_or_default());
        if name.is_empty() {
            return Err(ProductFormError::UploadMissingName { row });
        }

        let unit = sanitize_inline_text(record.get(unit_index).unwrap_or_default());
        if unit.is_empty() {
            return Err(ProductFormError::UploadMissingUnit { row });
        }

        let raw_price = record.get(price_index).unwrap_or_default();
        let price_cents =
            parse_price_cents(raw_price).ok_or_else(|| ProductFormError::UploadInvalidPrice {
                row,
                value: raw_price.to_string(),
            })?;

        products.push(NewProduct::new(name, price_cents, unit));
    }

    if products.is_empty() {
        return Err(ProductFormError::EmptyUpload);
    }

    Ok(products)
}
