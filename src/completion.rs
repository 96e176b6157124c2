//! Facilities to represent the completion of asynchronous operations
//!
//! An asynchronous operation resolves through exactly one of three channels:
//!
//! - The value channel, which signals success and carries the result
//! - The error channel, which signals failure and carries an `ExecError`
//! - The done channel, which signals cancellation and carries nothing
//!
//! Rather than exposing three separate entry points, the whole protocol speaks
//! in terms of the tagged `Completion` type below. Since a receiver consumes
//! exactly one `Completion`, the three outcomes are mutually exclusive by
//! construction.

use crate::error::ExecError;


/// Representation of an asynchronous operation's final outcome
///
/// Once an operation has produced a `Completion`, it is terminal: no further
/// completion can follow for the same operation.
///
#[derive(Clone, Debug)]
pub enum Completion<T> {
    /// The operation succeeded and produced a value
    Value(T),

    /// The operation failed
    Error(ExecError),

    /// The operation was cancelled, producing neither a value nor an error
    Done,
}
//
impl<T> Completion<T> {
    /// Truth that the operation succeeded
    pub fn is_value(&self) -> bool {
        matches!(self, Completion::Value(_))
    }

    /// Truth that the operation failed
    pub fn is_error(&self) -> bool {
        matches!(self, Completion::Error(_))
    }

    /// Truth that the operation was cancelled
    pub fn is_done(&self) -> bool {
        matches!(self, Completion::Done)
    }

    /// Transform the value of a successful completion, forwarding errors and
    /// cancellations unchanged
    pub fn map<U, F>(self, f: F) -> Completion<U>
        where F: FnOnce(T) -> U
    {
        match self {
            Completion::Value(value) => Completion::Value(f(value)),
            Completion::Error(error) => Completion::Error(error),
            Completion::Done => Completion::Done,
        }
    }

    /// Convert into a standard result, where cancellation is `Ok(None)`
    pub fn into_result(self) -> Result<Option<T>, ExecError> {
        match self {
            Completion::Value(value) => Ok(Some(value)),
            Completion::Error(error) => Err(error),
            Completion::Done => Ok(None),
        }
    }

    /// Short name of the channel through which this completion was sent
    pub fn channel(&self) -> &'static str {
        match self {
            Completion::Value(_) => "value",
            Completion::Error(_) => "error",
            Completion::Done => "done",
        }
    }
}
//
impl<T> From<Result<T, ExecError>> for Completion<T> {
    fn from(result: Result<T, ExecError>) -> Self {
        match result {
            Ok(value) => Completion::Value(value),
            Err(error) => Completion::Error(error),
        }
    }
}
