//! HTTP API endpoints.
//!
//! - [`workshops`]: catalog and workshop administration
//! - [`registrations`]: guest registration and cancellation, registration administration

pub mod registrations;
pub mod workshops;

use atelier_core::{BookingError, FieldError, PageRequest, RegistrationNumber};
use atelier_web::AppError;
use serde::Deserialize;

/// Pagination query parameters (`page` is 0-indexed, `pageSize` defaults to 20, max 100).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Page index
    pub page: Option<u32>,
    /// Items per page
    pub page_size: Option<u32>,
}

impl PageQuery {
    fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

fn invalid(error: FieldError) -> AppError {
    BookingError::from(error).into()
}

/// A malformed registration number cannot exist, so it is reported as not found.
fn registration_number(raw: &str) -> Result<RegistrationNumber, AppError> {
    RegistrationNumber::parse(raw).map_err(|_| BookingError::RegistrationNotFound.into())
}
