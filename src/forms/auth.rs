use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::employee::normalize_phone;

pub(crate) const PASSWORD_MIN_LEN: u64 = 6;
pub(crate) const PASSWORD_MAX_LEN: u64 = 128;

pub type AuthFormResult<T> = Result<T, AuthFormError>;

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("phone number must contain digits")]
    InvalidPhone,
}

/// Credentials submitted to `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(length(min = 1, max = PASSWORD_MAX_LEN))]
    pub password: String,
}

impl LoginForm {
    /// Validate the payload and return the normalized phone number.
    pub fn normalized_phone(&self) -> AuthFormResult<String> {
        self.validate()?;

        let phone = normalize_phone(&self.phone);
        if !phone.chars().any(|ch| ch.is_ascii_digit()) {
            return Err(AuthFormError::InvalidPhone);
        }

        Ok(phone)
    }
}

/// Payload used by an employee to change their own password.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordForm {
    #[validate(length(min = 1, max = PASSWORD_MAX_LEN))]
    pub current_password: String,
    #[validate(length(min = PASSWORD_MIN_LEN, max = PASSWORD_MAX_LEN))]
    pub new_password: String,
}
