use thiserror::Error;

use crate::availability::AvailabilityError;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Booking conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

impl From<AvailabilityError> for BookingError {
    fn from(err: AvailabilityError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
