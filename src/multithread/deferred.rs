//! Senders completed from another execution context
//!
//! A deferred sender is the point where some external executor (a thread, a
//! thread pool, an IO completion handler...) hands the outcome of its work
//! over to the completion protocol. It is created together with a completer,
//! which can be moved to the execution context that does the work, while the
//! sender itself is composed into a pipeline and eventually started.
//!
//! Starting the operation and signaling its completion may happen in either
//! order, on different threads. Whichever comes last delivers the completion
//! to the receiver, exactly once.

use crate::completer::{Completer, CompletionSink};
use crate::completion::Completion;
use crate::receiver::Receiver;
use crate::sender::{self, Connect, OperationState, Sender};
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};


/// Create a deferred sender, and the completer used to complete it
pub fn deferred<T>() -> (DeferredSender<T>, DeferredCompleter<T>) {
    let shared = Arc::new(
        SharedState {
            handoff: Mutex::new(Handoff::Idle),
        }
    );
    (
        DeferredSender { shared: shared.clone() },
        Completer::new(DeferredSink { shared }),
    )
}


/// Sender whose completion is signaled through a `DeferredCompleter`
pub struct DeferredSender<T> {
    /// Reference-counted shared state
    shared: Arc<SharedState<T>>,
}
//
impl<T> Sender for DeferredSender<T> {
    type Value = T;
    const SENDS_DONE: bool = true;
}
//
impl<T, R> Connect<R> for DeferredSender<T>
    where T: Send + 'static,
          R: Receiver<T> + Send + 'static
{
    type Operation = DeferredOperation<T, R>;

    fn connect(self, receiver: R) -> Self::Operation {
        DeferredOperation {
            shared: self.shared,
            receiver: Some(receiver),
        }
    }
}


/// Producer-side handle of a deferred sender
pub type DeferredCompleter<T> = Completer<DeferredSink<T>>;


/// Completion sink of deferred senders
pub struct DeferredSink<T> {
    /// Reference-counted shared state
    shared: Arc<SharedState<T>>,
}
//
impl<T> CompletionSink for DeferredSink<T> {
    type Value = T;

    fn deliver(&mut self, completion: Completion<T>) {
        let mut handoff = self.shared.lock();
        match mem::replace(&mut *handoff, Handoff::Delivered) {
            // Not started yet, keep the completion for start()
            Handoff::Idle => *handoff = Handoff::Completed(completion),

            // Already started, deliver outside of the lock
            Handoff::Started(receiver) => {
                drop(handoff);
                log::trace!("delivering deferred completion through the {} \
                             channel", completion.channel());
                receiver(completion);
            }

            // Completer enforces single completion
            Handoff::Completed(_) | Handoff::Delivered => {
                unreachable!("deferred operation completed twice")
            }
        }
    }
}


/// Operation state of deferred senders
pub struct DeferredOperation<T, R> {
    /// Reference-counted shared state
    shared: Arc<SharedState<T>>,

    /// Receiver, parked in the shared state on start
    receiver: Option<R>,
}
//
impl<T, R> OperationState for DeferredOperation<T, R>
    where T: Send + 'static,
          R: Receiver<T> + Send + 'static
{
    fn start(&mut self) {
        let receiver = sender::take_on_start(&mut self.receiver);
        let mut handoff = self.shared.lock();
        match mem::replace(&mut *handoff, Handoff::Delivered) {
            // Not completed yet, park the receiver for the completer
            Handoff::Idle => {
                *handoff = Handoff::Started(
                    Box::new(move |completion| receiver.complete(completion))
                );
            }

            // Already completed, deliver right away outside of the lock
            Handoff::Completed(completion) => {
                drop(handoff);
                receiver.complete(completion);
            }

            // Senders are consumed on connection, so there is only one
            // operation per shared state
            Handoff::Started(_) | Handoff::Delivered => {
                unreachable!("deferred sender connected twice")
            }
        }
    }
}


/// State shared between a deferred sender and its completer
struct SharedState<T> {
    /// Progress of the handoff between the two sides (mutex-protected)
    handoff: Mutex<Handoff<T>>,
}
//
impl<T> SharedState<T> {
    fn lock(&self) -> MutexGuard<Handoff<T>> {
        self.handoff.lock().unwrap_or_else(PoisonError::into_inner)
    }
}


/// Type-erased receiver, parked until the completion comes in
type ParkedReceiver<T> = Box<dyn FnOnce(Completion<T>) + Send>;


/// Progress of the handoff of a completion to a receiver
enum Handoff<T> {
    /// Neither started nor completed
    Idle,

    /// Started, waiting for the completion
    Started(ParkedReceiver<T>),

    /// Completed, waiting for start
    Completed(Completion<T>),

    /// Completion has been handed over
    Delivered,
}
