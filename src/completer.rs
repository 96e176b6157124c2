//! General implementation of an operation completer
//!
//! This module contains a generic producer-side handle, suitable for signaling
//! the completion of an asynchronous operation no matter where the consumer
//! lives and how it plans on observing that completion.
//!
//! The completer enforces the single-completion rule at run time, for those
//! producers which cannot give up ownership of their receiver when signaling.
//! It also makes sure that a producer which dies before signaling anything
//! does not leave the consumer hanging: dropping an unfinished completer
//! signals `ExecError::Abandoned`.

use crate::completion::Completion;
use crate::error::ExecError;
use crate::receiver::Receiver;


/// Producer-side handle, used to signal the completion of an operation
pub struct Completer<Sink: CompletionSink> {
    /// Destination of the completion
    sink: Sink,

    /// Flag indicating that the operation has completed
    completed: bool,
}
//
impl<Sink: CompletionSink> Completer<Sink> {
    /// Create a new completer around some completion destination
    pub fn new(sink: Sink) -> Self {
        Completer {
            sink,
            completed: false,
        }
    }

    /// Truth that the operation has already completed
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Signal the completion of the operation
    ///
    /// Signaling a completion twice is a usage violation, which panics.
    ///
    pub fn complete(&mut self, completion: Completion<Sink::Value>) {
        assert!(!self.completed, "operation completed twice");
        self.completed = true;
        self.sink.deliver(completion);
    }

    /// Signal success
    pub fn set_value(&mut self, value: Sink::Value) {
        self.complete(Completion::Value(value));
    }

    /// Signal failure
    pub fn set_error(&mut self, error: ExecError) {
        self.complete(Completion::Error(error));
    }

    /// Signal cancellation
    pub fn set_done(&mut self) {
        self.complete(Completion::Done);
    }
}
//
impl<Sink: CompletionSink> Drop for Completer<Sink> {
    /// If the completer is dropped before the operation has completed,
    /// notify the consumer in order to prevent it from hanging
    fn drop(&mut self) {
        if !self.completed {
            log::warn!("completer dropped before signaling, abandoning operation");
            self.complete(Completion::Error(ExecError::Abandoned));
        }
    }
}


/// Destination of the completion signaled through a `Completer`
pub trait CompletionSink {
    /// Type of value produced by the operation on success
    type Value;

    /// Method used to forward the completion to the consumer
    fn deliver(&mut self, completion: Completion<Self::Value>);
}


/// Completion sink which forwards to a receiver
pub struct ReceiverSink<T, R: Receiver<T>> {
    receiver: Option<R>,
    value: std::marker::PhantomData<fn(T)>,
}
//
impl<T, R: Receiver<T>> ReceiverSink<T, R> {
    /// Wrap a receiver
    pub fn new(receiver: R) -> Self {
        ReceiverSink {
            receiver: Some(receiver),
            value: std::marker::PhantomData,
        }
    }
}
//
impl<T, R: Receiver<T>> CompletionSink for ReceiverSink<T, R> {
    type Value = T;

    fn deliver(&mut self, completion: Completion<T>) {
        // Completer only delivers once, so the receiver is always there
        if let Some(receiver) = self.receiver.take() {
            receiver.complete(completion);
        }
    }
}


/// Completer which signals a receiver
pub fn for_receiver<T, R: Receiver<T>>(receiver: R)
    -> Completer<ReceiverSink<T, R>>
{
    Completer::new(ReceiverSink::new(receiver))
}
