//! Conversions from external infrastructure errors into domain errors.

use pvekit_common::AuthError;
use pvekit_domain::PveError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PveError);

impl From<InfraError> for PveError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PveError> for InfraError {
    fn from(value: PveError) -> Self {
        InfraError(value)
    }
}

trait IntoPveError {
    fn into_pve(self) -> PveError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PveError */
/* -------------------------------------------------------------------------- */

impl IntoPveError for HttpError {
    fn into_pve(self) -> PveError {
        let target = self.url().map(ToString::to_string).unwrap_or_else(|| "<unknown>".into());

        if self.is_timeout() {
            return PveError::Network(format!("request to {target} timed out"));
        }
        if self.is_connect() {
            return PveError::Network(format!("could not connect to {target}: {self}"));
        }
        if self.is_builder() {
            return PveError::Internal(format!("invalid http request: {self}"));
        }
        if self.is_decode() {
            return PveError::Decode(format!("response from {target} could not be decoded: {self}"));
        }
        if let Some(status) = self.status() {
            return PveError::Api { status: status.as_u16(), message: self.to_string() };
        }
        PveError::Network(format!("http request to {target} failed: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_pve())
    }
}

/* -------------------------------------------------------------------------- */
/* AuthError → PveError */
/* -------------------------------------------------------------------------- */

impl IntoPveError for AuthError {
    fn into_pve(self) -> PveError {
        PveError::Auth(self.to_string())
    }
}

impl From<AuthError> for InfraError {
    fn from(value: AuthError) -> Self {
        InfraError(value.into_pve())
    }
}
