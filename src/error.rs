//! Error payloads transported by the completion protocol
//!
//! Every sender in this crate shares a single error channel, whose payload is
//! the `ExecError` type below. Errors produced by the computation itself are
//! wrapped in `ExecError::Custom` without losing their identity, so that the
//! consumer at the end of a pipeline can downcast them back to whatever type
//! the producer emitted.
//!
//! The remaining variants describe outcomes that the protocol itself produces
//! on behalf of a computation which could not report anything meaningful.

use std::error::Error;
use std::sync::Arc;
use thiserror::Error;


/// Opaque error payload carried by the error completion channel
#[derive(Clone, Debug, Error)]
pub enum ExecError {
    /// The computation failed with an application-specific error
    #[error(transparent)]
    Custom(Arc<dyn Error + Send + Sync + 'static>),

    /// The computation completed through the cancellation channel, and the
    /// consumer asked for a value
    #[error("operation was cancelled")]
    Cancelled,

    /// The producer was dropped before it signaled any completion
    #[error("operation was abandoned before it completed")]
    Abandoned,

    /// A continuation panicked while processing a value
    #[error("continuation panicked: {0}")]
    Panicked(String),
}
//
impl ExecError {
    /// Wrap an application-specific error
    pub fn custom<E>(error: E) -> Self
        where E: Error + Send + Sync + 'static
    {
        ExecError::Custom(Arc::new(error))
    }

    /// Access the application-specific error, if it has the requested type
    pub fn downcast_ref<E>(&self) -> Option<&E>
        where E: Error + 'static
    {
        match self {
            ExecError::Custom(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Turn the payload of a caught panic into an error
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_owned()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "<non-string panic payload>".to_owned()
        };
        ExecError::Panicked(message)
    }
}
