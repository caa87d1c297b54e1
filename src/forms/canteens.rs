use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::canteen::{NewCanteen, UpdateCanteen};
use crate::forms::sanitize_inline_text;

const ADDRESS_MAX_LEN: u64 = 256;

pub type CanteenFormResult<T> = Result<T, CanteenFormError>;

#[derive(Debug, Error)]
pub enum CanteenFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("canteen address cannot be empty")]
    EmptyAddress,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCanteenForm {
    #[validate(length(min = 1, max = ADDRESS_MAX_LEN))]
    pub address: String,
}

impl AddCanteenForm {
    pub fn into_new_canteen(self) -> CanteenFormResult<NewCanteen> {
        self.validate()?;

        let address = sanitize_inline_text(&self.address);
        if address.is_empty() {
            return Err(CanteenFormError::EmptyAddress);
        }

        Ok(NewCanteen::new(address))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditCanteenForm {
    #[validate(length(min = 1, max = ADDRESS_MAX_LEN))]
    pub address: String,
}

impl EditCanteenForm {
    pub fn into_update_canteen(self, updated_at: NaiveDateTime) -> CanteenFormResult<UpdateCanteen> {
        self.validate()?;

        let address = sanitize_inline_text(&self.address);
        if address.is_empty() {
            return Err(CanteenFormError::EmptyAddress);
        }

        Ok(UpdateCanteen {
            address,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_canteen_form_sanitizes_address() {
        let form = AddCanteenForm {
            address: "  Lenina \t 5  ".to_string(),
        };

        let canteen = form.into_new_canteen().expect("expected conversion to succeed");
        assert_eq!(canteen.address, "Lenina 5");
    }

    #[test]
    fn edit_canteen_form_rejects_blank_address() {
        let form = EditCanteenForm {
            address: " \n ".to_string(),
        };

        let result = form.into_update_canteen(NaiveDateTime::default());
        assert!(matches!(result, Err(CanteenFormError::EmptyAddress)));
    }
}
