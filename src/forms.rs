//! Login and registration forms.
//!
//! Both flows talk to the identity provider directly. Validation runs first
//! and never reaches the network; on success the session hints are written
//! and the visitor is sent home. The provider's own notification then updates
//! the navbar through the gate.

use crate::error::{MIN_PASSWORD_LEN, ValidationError};
use crate::hints::{KeyValueStore, SessionHints};
use crate::identity::{Identity, IdentityProvider, ProviderError};
use crate::navigation::{Navigator, Route};
use crate::token::{BearerToken, TokenAccessor};

pub const INCORRECT_CREDENTIALS: &str = "Incorrect email or password.";
pub const EMAIL_IN_USE: &str = "This email is already registered.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const UNKNOWN_FAILURE: &str = "An unexpected error occurred. Please try again later.";
pub const REGISTERED: &str = "Registration successful! Signing you in and returning home.";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// [`ValidationError::MissingCredentials`] when either field is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub email: String,
    pub nickname: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Checks run in a fixed order and stop at the first failure: nickname,
    /// password confirmation, password length.
    ///
    /// # Errors
    ///
    /// The first [`ValidationError`] that applies.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.nickname.trim().is_empty() {
            return Err(ValidationError::MissingNickname);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }
}

/// Inline error text for the login form.
#[must_use]
pub fn login_error_message(error: &FormError) -> String {
    match error {
        FormError::Validation(v) => v.to_string(),
        FormError::Provider(ProviderError::InvalidCredential) => INCORRECT_CREDENTIALS.to_owned(),
        FormError::Provider(_) => UNKNOWN_FAILURE.to_owned(),
    }
}

/// Inline error text for the registration form.
#[must_use]
pub fn registration_error_message(error: &FormError) -> String {
    match error {
        FormError::Validation(v) => v.to_string(),
        FormError::Provider(ProviderError::EmailInUse) => EMAIL_IN_USE.to_owned(),
        FormError::Provider(ProviderError::InvalidEmail) => INVALID_EMAIL.to_owned(),
        FormError::Provider(ProviderError::WeakPassword) => ValidationError::PasswordTooShort.to_string(),
        FormError::Provider(_) => UNKNOWN_FAILURE.to_owned(),
    }
}

/// Submit the login form.
///
/// # Errors
///
/// Validation failures, or the provider's rejection.
pub async fn sign_in(
    provider: &dyn IdentityProvider,
    store: &dyn KeyValueStore,
    navigator: &dyn Navigator,
    form: &LoginForm,
) -> Result<Identity, FormError> {
    form.validate()?;
    let identity = provider.sign_in(form.email.trim(), &form.password).await.inspect_err(|e| {
        log::error!("sign-in failed: {e}");
    })?;
    log::info!("signed in: {}", identity.uid);

    remember(provider, store, &identity, None).await;
    navigator.go(&Route::Home);
    Ok(identity)
}

/// Submit the registration form: create the account, set its display name,
/// then behave like a fresh sign-in.
///
/// # Errors
///
/// Validation failures, or the provider's rejection of either step.
pub async fn register(
    provider: &dyn IdentityProvider,
    store: &dyn KeyValueStore,
    navigator: &dyn Navigator,
    form: &RegistrationForm,
) -> Result<Identity, FormError> {
    form.validate()?;
    let nickname = form.nickname.trim();
    provider
        .create_account(form.email.trim(), &form.password)
        .await
        .inspect_err(|e| log::error!("registration failed: {e}"))?;
    let identity = provider
        .update_display_name(nickname)
        .await
        .inspect_err(|e| log::error!("setting display name failed: {e}"))?;
    log::info!("registered: {}", identity.uid);

    remember(provider, store, &identity, Some(nickname)).await;
    navigator.go(&Route::Home);
    Ok(identity)
}

async fn remember(provider: &dyn IdentityProvider, store: &dyn KeyValueStore, identity: &Identity, nickname: Option<&str>) {
    let token = TokenAccessor::new(provider).token_for(identity, false).await;
    SessionHints::new(store).record_sign_in(identity, nickname, token.as_ref().map(BearerToken::as_str));
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
