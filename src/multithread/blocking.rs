//! Blocking extraction of asynchronous results
//!
//! This module provides the way out of the asynchronous world: connecting a
//! sender to a receiver backed by a mutex and a condition variable, starting
//! it, and blocking the calling thread until the completion comes in. This
//! synchronization mechanism is easy to use and reason about, but should be
//! used with care as the unpredictable delays that it introduces can be
//! harmful to performance.
//!
//! There is no timeout and no way to cancel the wait from the consumer side.
//! Callers which need either must layer it on top of the sender they wait for.

use crate::completion::Completion;
use crate::error::ExecError;
use crate::receiver::Receiver;
use crate::sender::{Connect, OperationState, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};


/// Block until a sender completes, and return its value
///
/// Errors are returned with their original payload. A sender which completes
/// through the cancellation channel yields `ExecError::Cancelled`.
///
pub fn get<S>(sender: S) -> Result<<S as Sender>::Value, ExecError>
    where S: Sender + Connect<GetReceiver<<S as Sender>::Value>>
{
    match wait(sender) {
        Completion::Value(value) => Ok(value),
        Completion::Error(error) => Err(error),
        Completion::Done => Err(ExecError::Cancelled),
    }
}

/// Block until a sender completes, and return its completion as is
pub fn wait<S>(sender: S) -> Completion<<S as Sender>::Value>
    where S: Sender + Connect<GetReceiver<<S as Sender>::Value>>
{
    // Build the state shared with the producer, and a receiver bound to it
    let state = Arc::new(CompletionState::new());
    let receiver = GetReceiver { state: state.clone() };

    // Connect and start the operation. It must outlive the wait.
    let mut operation = sender.connect(receiver);
    log::trace!("starting operation, blocking until it completes");
    operation.start();

    // Wait for the completion, re-checking after every wake-up
    let slot = state.lock();
    let mut slot = state.done_cv
                        .wait_while(slot, |slot| slot.completion.is_none())
                        .unwrap_or_else(PoisonError::into_inner);
    let completion = slot.take();
    log::trace!("operation completed through the {} channel",
                completion.channel());
    completion
}


/// Receiver which stores the completion in a shared state and wakes the
/// thread blocked on it
pub struct GetReceiver<T> {
    /// Reference-counted shared state
    state: Arc<CompletionState<T>>,
}
//
impl<T> Receiver<T> for GetReceiver<T> {
    fn complete(self, completion: Completion<T>) {
        let mut slot = self.state.lock();
        assert!(!slot.done, "operation completed twice");
        slot.done = true;
        slot.completion = Some(completion);
        self.state.done_cv.notify_one();
    }
}


/// State shared between the waiting thread and the producer
struct CompletionState<T> {
    /// Captured completion (mutex-protected)
    slot: Mutex<Slot<T>>,

    /// Condition variable used to wake the waiting thread up
    done_cv: Condvar,
}
//
impl<T> CompletionState<T> {
    fn new() -> Self {
        CompletionState {
            slot: Mutex::new(Slot { done: false, completion: None }),
            done_cv: Condvar::new(),
        }
    }

    /// Lock the slot. It is only ever written in one go, so a panic in
    /// another thread cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
//
struct Slot<T> {
    /// Whether a completion was received
    done: bool,

    /// Completion, until it is handed over to the waiting thread
    completion: Option<Completion<T>>,
}
//
impl<T> Slot<T> {
    /// Hand the completion over to the waiting thread
    fn take(&mut self) -> Completion<T> {
        debug_assert!(self.done);
        self.completion.take().unwrap_or(Completion::Error(ExecError::Abandoned))
    }
}


/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::just::{just, just_done, just_error};
    use crate::multithread::deferred::deferred;
    use crate::sender::SenderExt;
    use std::error::Error;
    use std::fmt;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    struct Overflow(&'static str);
    //
    impl fmt::Display for Overflow {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "overflow in {}", self.0)
        }
    }
    //
    impl Error for Overflow {}

    /// Inline senders are extracted without ever blocking
    #[test]
    fn inline_value() {
        assert_eq!(get(just(7)).unwrap(), 7);
        assert_eq!(just("abc").get().unwrap(), "abc");
    }

    /// Errors are raised with their original payload
    #[test]
    fn error_identity() {
        let error = get(just_error::<u8>(ExecError::custom(Overflow("add"))))
            .unwrap_err();
        assert_eq!(error.downcast_ref::<Overflow>(), Some(&Overflow("add")));
    }

    /// Cancellation is raised as a distinct failure, or observed as is
    #[test]
    fn cancellation() {
        assert!(matches!(get(just_done::<u8>()), Err(ExecError::Cancelled)));
        assert!(wait(just_done::<u8>()).is_done());
    }

    /// Completions signaled from another thread are picked up, no matter how
    /// long the producer takes
    #[test]
    fn cross_thread_signaling() {
        for &delay_ms in &[0, 50] {
            let (sender, mut completer) = deferred::<u64>();
            let producer = thread::spawn(move || {
                thread::sleep(Duration::from_millis(delay_ms));
                completer.set_value(delay_ms + 1);
            });
            assert_eq!(get(sender.then(|x: u64| x * 10)).unwrap(),
                       (delay_ms + 1) * 10);
            producer.join().unwrap();
        }
    }

    /// Completions signaled before the wait starts are not lost
    #[test]
    fn completed_before_wait() {
        let (sender, mut completer) = deferred::<&str>();
        thread::spawn(move || completer.set_value("early"))
            .join()
            .unwrap();
        assert_eq!(get(sender).unwrap(), "early");
    }

    /// A producer dying without signaling does not leave get() hanging
    #[test]
    fn abandoned_producer() {
        let (sender, completer) = deferred::<u8>();
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            drop(completer);
        });
        assert!(matches!(get(sender), Err(ExecError::Abandoned)));
        producer.join().unwrap();
    }

    /// Check that get() actually blocks until the completion comes in
    #[test]
    fn blocks_until_completion() {
        let (sender, mut completer) = deferred::<u32>();
        let (progress_tx, progress_rx) = mpsc::channel();

        // Create the worker thread, which will do all the waiting
        let worker = thread::spawn(move || {
            progress_tx.send("waiting").unwrap();
            let result = get(sender);
            progress_tx.send("done").unwrap();
            result
        });

        // The worker should start waiting quite quickly...
        let timeout = Duration::from_millis(100);
        assert_eq!(progress_rx.recv_timeout(timeout).unwrap(), "waiting");

        // ...and then stay blocked until the completion is signaled
        assert!(progress_rx.recv_timeout(timeout).is_err());
        completer.set_value(99);
        assert_eq!(progress_rx.recv_timeout(Duration::from_secs(5)).unwrap(),
                   "done");
        assert_eq!(worker.join().unwrap().unwrap(), 99);
    }
}
