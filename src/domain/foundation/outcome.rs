//! Outcome algebra - success/failure without exceptions.
//!
//! `Outcome<T>` is a plain `Result<T, ErrorDetail>`: exactly one of the
//! value or the error is present, and `?` short-circuits a failed
//! computation through every layer unchanged.
//!
//! [`OutcomeExt`] adds the discriminators and the checked accessor used
//! by callers that inspect an outcome instead of propagating it.

use super::ErrorDetail;

/// Success/failure container with a typed error payload.
pub type Outcome<T> = Result<T, ErrorDetail>;

/// Wraps a value in a successful outcome.
pub fn success<T>(value: T) -> Outcome<T> {
    Ok(value)
}

/// Wraps an error detail in a failed outcome.
pub fn failure<T>(error: ErrorDetail) -> Outcome<T> {
    Err(error)
}

/// Maps `None` to a `NullValue` failure and `Some` to success.
pub fn create<T>(value: Option<T>) -> Outcome<T> {
    value.ok_or_else(ErrorDetail::null_value)
}

/// Discriminators and accessors on [`Outcome`].
pub trait OutcomeExt<T> {
    fn is_success(&self) -> bool;

    fn is_failure(&self) -> bool;

    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// Panics when called on a failure. Reading the value of a failed
    /// outcome is a programming error, not a domain error.
    fn value(self) -> T;

    /// Returns the error detail of a failure, `None` on success.
    fn error(&self) -> Option<&ErrorDetail>;
}

impl<T> OutcomeExt<T> for Outcome<T> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }

    fn is_failure(&self) -> bool {
        self.is_err()
    }

    #[track_caller]
    fn value(self) -> T {
        match self {
            Ok(value) => value,
            Err(error) => panic!(
                "InvalidOperation: The value of a failure result cannot be accessed ({})",
                error
            ),
        }
    }

    fn error(&self) -> Option<&ErrorDetail> {
        self.as_ref().err()
    }
}
