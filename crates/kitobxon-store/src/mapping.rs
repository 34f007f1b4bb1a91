//! Row and error mapping shared by the repositories.

use kitobxon_core::error::DomainError;

pub(crate) fn infra(e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(e.to_string())
}

pub(crate) fn corrupt(field: &'static str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::Infrastructure(format!("invalid {field} in database: {detail}"))
}

pub(crate) fn u32_from_i32(field: &'static str, v: i32) -> Result<u32, DomainError> {
    u32::try_from(v).map_err(|_| corrupt(field, v))
}

pub(crate) fn i32_from_u32(field: &'static str, v: u32) -> Result<i32, DomainError> {
    i32::try_from(v).map_err(|_| DomainError::Validation(format!("{field} overflow: {v}")))
}
