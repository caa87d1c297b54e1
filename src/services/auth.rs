use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use validator::Validate;

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::auth::{ChangePasswordForm, LoginForm};
use crate::repository::{EmployeeReader, EmployeeWriter};
use crate::services::{ServiceError, ServiceResult};

/// Hash `password` with Argon2 and a fresh random salt.
///
/// The returned PHC string carries the salt and parameters, so it is all
/// that needs to be stored.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Internal(format!("failed to hash password: {err}")))
}

/// Check `password` against a stored PHC hash. Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        log::warn!("stored password hash is malformed");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Authenticate an employee by phone number and password.
pub fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<AuthenticatedEmployee>
where
    R: EmployeeReader + ?Sized,
{
    let phone = form
        .normalized_phone()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let Some(credentials) = repo
        .get_credentials_by_phone(&phone)
        .map_err(ServiceError::from)?
    else {
        log::info!("login attempt for unknown phone");
        return Err(ServiceError::Unauthorized);
    };

    if !verify_password(&form.password, &credentials.password_hash) {
        log::info!("wrong password for employee {}", credentials.employee.id);
        return Err(ServiceError::Unauthorized);
    }

    Ok(AuthenticatedEmployee::from(&credentials.employee))
}

/// Replace the password of the logged-in employee after checking the current one.
pub fn change_password<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: ChangePasswordForm,
) -> ServiceResult<()>
where
    R: EmployeeReader + EmployeeWriter + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let credentials = repo
        .get_credentials_by_id(user.id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::Unauthorized)?;

    if !verify_password(&form.current_password, &credentials.password_hash) {
        return Err(ServiceError::Form("current password is incorrect".to_string()));
    }

    let password_hash = hash_password(&form.new_password)?;

    repo.update_password_hash(user.id, &password_hash)
        .map_err(ServiceError::from)
}
