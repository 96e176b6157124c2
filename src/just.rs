//! Inline senders, which complete synchronously on start
//!
//! These senders follow the traditional pattern of directly signaling their
//! completion from within `start()`, on the caller's thread. They are the
//! natural starting point of a pipeline when the initial input is already
//! known, and a convenient way to inject errors and cancellations in tests.

use crate::completion::Completion;
use crate::error::ExecError;
use crate::receiver::Receiver;
use crate::sender::{self, Connect, OperationState, Sender};
use std::marker::PhantomData;


/// Sender which completes with a predetermined outcome
pub struct Just<T> {
    completion: Completion<T>,
}
//
impl<T> Sender for Just<T> {
    type Value = T;
    const SENDS_DONE: bool = false;
}
//
impl<T, R: Receiver<T>> Connect<R> for Just<T> {
    type Operation = InlineOperation<T, R>;

    fn connect(self, receiver: R) -> Self::Operation {
        InlineOperation {
            pending: Some((self.completion, receiver)),
        }
    }
}


/// Sender which completes through the cancellation channel
pub struct JustDone<T> {
    value: PhantomData<fn() -> T>,
}
//
impl<T> Sender for JustDone<T> {
    type Value = T;
    const SENDS_DONE: bool = true;
}
//
impl<T, R: Receiver<T>> Connect<R> for JustDone<T> {
    type Operation = InlineOperation<T, R>;

    fn connect(self, receiver: R) -> Self::Operation {
        InlineOperation {
            pending: Some((Completion::Done, receiver)),
        }
    }
}


/// Sender which completes with a value
pub fn just<T>(value: T) -> Just<T> {
    Just {
        completion: Completion::Value(value),
    }
}

/// Sender which completes with an error
pub fn just_error<T>(error: ExecError) -> Just<T> {
    Just {
        completion: Completion::Error(error),
    }
}

/// Sender which completes through the cancellation channel
pub fn just_done<T>() -> JustDone<T> {
    JustDone { value: PhantomData }
}


/// Operation state of the inline senders
pub struct InlineOperation<T, R: Receiver<T>> {
    /// Outcome and receiver, consumed on start
    pending: Option<(Completion<T>, R)>,
}
//
impl<T, R: Receiver<T>> OperationState for InlineOperation<T, R> {
    fn start(&mut self) {
        let (completion, receiver) = sender::take_on_start(&mut self.pending);
        log::trace!("inline operation completing through the {} channel",
                    completion.channel());
        receiver.complete(completion);
    }
}
